use chatstat_core::application::{ReportService, StatisticsService, WordCloudService};
use chatstat_core::ports::Confirmation;
use chatstat_core::utils::dates_inclusive;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use jieba_adapter::JiebaSegmenter;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use transcript_adapter::{load_stop_words, FileTranscriptSource};
use wordcloud_adapter::ImageWordCloudRenderer;
use xlsx_adapter::{XlsxCountsWriter, XlsxSpeakerWriter};

mod config;
mod console;
mod error;
mod pipeline;

use config::Config;
use console::{AlwaysAccept, PromptConfirmation};
use pipeline::Pipeline;

const COUNTS_FILE: &str = "counts.xlsx";
const SPEAK_COUNTS_FILE: &str = "speak_counts.xlsx";
const WORD_CLOUD_FILE: &str = "wordcloud.png";

/// Statistics for exported group chat transcripts
#[derive(Parser, Debug)]
#[command(name = "chatstat", version)]
#[command(about = "Counts messages per day and per member of an exported group chat, and draws its word cloud")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the daily counts and speaker spreadsheets and the word cloud
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Directory the spreadsheets and the image are written to
        #[arg(short = 'o', long = "output-dir", required = true)]
        output_dir: PathBuf,

        /// Font used to draw the word cloud
        #[arg(long = "font")]
        font: Option<PathBuf>,

        /// Keep the first word cloud without asking
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Seed of the first word cloud layout
        #[arg(long = "seed", default_value_t = 0)]
        seed: u64,
    },

    /// Print the most frequent words
    Top {
        #[command(flatten)]
        input: InputArgs,

        /// Number of words to print
        #[arg(short = 'n', long = "count", default_value_t = 9)]
        count: usize,
    },

    /// Print the most frequent words of each day in the date range
    Daily {
        #[command(flatten)]
        input: InputArgs,

        /// Number of words to print per day
        #[arg(short = 'n', long = "count", default_value_t = 9)]
        count: usize,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the exported transcript (.txt)
    #[arg(short = 'i', long = "input-file", required = true)]
    input_file: PathBuf,

    /// First day to include (YYYY-MM-DD)
    #[arg(long = "from")]
    from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long = "to")]
    to: Option<String>,

    /// Stop-word list, one word per line
    #[arg(long = "stopwords")]
    stopwords: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(Some(message)) => println!("{}", message),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Executes the chosen command. Returns a closing message for commands that
/// write files.
fn run(cli: Cli) -> Result<Option<String>, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Report {
            input,
            output_dir,
            font,
            yes,
            seed,
        } => {
            let (service, pipeline, _) = prepare(&config, &input, false)?;
            let stats = service.collect(&pipeline.options())?;

            // Validate the cloud settings and load the font before writing anything
            let cloud_config = config.cloud_config()?;
            let renderer = ImageWordCloudRenderer::from_file(&config.font_path(font.as_deref()))?;

            let reports = ReportService::new(
                Box::new(XlsxCountsWriter::new(output_dir.join(COUNTS_FILE))),
                Box::new(XlsxSpeakerWriter::new(output_dir.join(SPEAK_COUNTS_FILE))),
            );
            // Write the spreadsheets
            reports.execute_reports(&stats)?;

            // Render the word cloud until the operator keeps one
            let cloud = WordCloudService::new(Box::new(renderer), cloud_config, seed);
            let mut confirmation: Box<dyn Confirmation> = if yes {
                Box::new(AlwaysAccept)
            } else {
                Box::new(PromptConfirmation::new(io::stdin().lock(), io::stdout()))
            };
            cloud.export(&stats.words, &output_dir.join(WORD_CLOUD_FILE), confirmation.as_mut())?;

            Ok(Some(format!(
                "Successfully wrote {} messages from {} speakers to {}",
                stats.accepted_messages(),
                stats.speak_counts.len(),
                output_dir.display()
            )))
        }
        Command::Top { input, count } => {
            let (service, pipeline, _) = prepare(&config, &input, false)?;
            let stats = service.collect(&pipeline.options())?;
            let words = chatstat_core::report::top_words(&stats.words, count);
            console::write_words(&mut io::stdout().lock(), &words)?;
            Ok(None)
        }
        Command::Daily { input, count } => {
            let (service, pipeline, range) = prepare(&config, &input, true)?;
            let (first, last) = range.ok_or(error::Error::MissingDateRange)?;
            let daily = service.daily_top_words(&dates_inclusive(first, last), &pipeline.options(), count)?;
            console::write_daily(&mut io::stdout().lock(), &daily)?;
            Ok(None)
        }
    }
}

type DateRange = Option<(NaiveDate, NaiveDate)>;

/// Loads the stop words and segmenter vocabulary once and wires the
/// transcript source.
fn prepare(
    config: &Config,
    input: &InputArgs,
    require_range: bool,
) -> Result<(StatisticsService, Pipeline, DateRange), Box<dyn Error>> {
    let range = config.date_range(input.from.as_deref(), input.to.as_deref())?;
    if require_range && range.is_none() {
        return Err(error::Error::MissingDateRange.into());
    }

    let stop_words = load_stop_words(&config.stopwords_path(input.stopwords.as_deref()))?;
    let segmenter = JiebaSegmenter::new(&config.custom_words());
    info!(transcript = %input.input_file.display(), ?range, "starting");

    let service = StatisticsService::new(Box::new(FileTranscriptSource::new(&input.input_file)));
    Ok((service, Pipeline::new(Box::new(segmenter), stop_words, range), range))
}
