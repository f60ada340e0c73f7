use crate::cloud::{layout, CloudConfig};
use crate::domain::ChatStatistics;
use crate::filters::DateRangeFilter;
use crate::parser::{parse_transcript, StatisticsOptions};
use crate::ports::{Confirmation, CountsWriter, Result, SpeakerWriter, TranscriptSource, WordCloudRenderer};
use crate::report::{day_count_rows, speaker_ranking, top_words, word_frequencies};
use crate::utils::format_date;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, info};

/// Application service that turns a transcript into statistics
pub struct StatisticsService {
    source: Box<dyn TranscriptSource>,
}

/// Most frequent words of a single day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTopWords {
    pub date: String,
    pub words: Vec<String>,
}

impl StatisticsService {
    pub fn new(source: Box<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    /// Parses the whole transcript once with the given filters
    pub fn collect(&self, options: &StatisticsOptions<'_>) -> Result<ChatStatistics> {
        let reader = self.source.open()?;
        let stats = parse_transcript(reader, options)?;
        info!(
            source = %self.source.describe(),
            messages = stats.accepted_messages(),
            speakers = stats.speak_counts.len(),
            "collected statistics"
        );
        Ok(stats)
    }

    /// Re-parses the transcript once per day, keeping only that day's
    /// messages, and reports the `count` most frequent words of each.
    ///
    /// The message filter of `options` is replaced by a single-day
    /// [`DateRangeFilter`].
    pub fn daily_top_words(
        &self,
        days: &[NaiveDate],
        options: &StatisticsOptions<'_>,
        count: usize,
    ) -> Result<Vec<DailyTopWords>> {
        let mut daily = Vec::with_capacity(days.len());
        for &day in days {
            let filter = DateRangeFilter::single_day(day);
            let day_options = options.with_message_filter(&filter);
            let stats = parse_transcript(self.source.open()?, &day_options)?;
            daily.push(DailyTopWords {
                date: format_date(day),
                words: top_words(&stats.words, count),
            });
        }
        Ok(daily)
    }
}

/// Application service that writes the spreadsheet reports
pub struct ReportService {
    counts_writer: Box<dyn CountsWriter>,
    speaker_writer: Box<dyn SpeakerWriter>,
}

impl ReportService {
    pub fn new(counts_writer: Box<dyn CountsWriter>, speaker_writer: Box<dyn SpeakerWriter>) -> Self {
        Self {
            counts_writer,
            speaker_writer,
        }
    }

    /// Writes the speaker ranking, then the per-day counts
    pub fn execute_reports(&self, stats: &ChatStatistics) -> Result<()> {
        self.speaker_writer.write_speakers(&speaker_ranking(stats))?;
        self.counts_writer.write_counts(&day_count_rows(stats))?;
        Ok(())
    }
}

/// Application service that renders the word cloud until the operator is happy with it
pub struct WordCloudService {
    renderer: Box<dyn WordCloudRenderer>,
    config: CloudConfig,
    base_seed: u64,
}

impl WordCloudService {
    pub fn new(renderer: Box<dyn WordCloudRenderer>, config: CloudConfig, base_seed: u64) -> Self {
        Self {
            renderer,
            config,
            base_seed,
        }
    }

    /// Lays out and renders `words` to `output`, again with a fresh seed each
    /// time `confirmation` declines. Returns the number of renders.
    pub fn export(&self, words: &[String], output: &Path, confirmation: &mut dyn Confirmation) -> Result<u32> {
        // Count the words once, every attempt lays out the same frequencies
        let frequencies = word_frequencies(words);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let seed = self.base_seed.wrapping_add(u64::from(attempt - 1));
            // Each attempt gets its own seed so a rejected layout is not repeated
            let mut rng = StdRng::seed_from_u64(seed);
            let cloud = layout(&frequencies, &self.config, self.renderer.as_ref(), &mut rng);
            debug!(attempt, seed, placed = cloud.words.len(), "laid out word cloud");

            // Render, then ask whether to keep it
            self.renderer.render(&cloud, output)?;
            if confirmation.confirm(attempt, output)? {
                info!(output = %output.display(), attempts = attempt, "word cloud accepted");
                return Ok(attempt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::CloudLayout;
    use crate::filters::{CommonFilter, ReservedIdSpeakFilter};
    use crate::ports::TextMeasure;
    use crate::report::{DayCountRow, SpeakerRow};
    use crate::tokenizer::{Tokenizer, UnicodeSegmenter};
    use std::cell::RefCell;
    use std::io::{BufRead, Cursor};
    use std::rc::Rc;

    const TRANSCRIPT: &str = "\
2023-09-14 09:00:00 Alice(111)
rust rust cargo
2023-09-15 10:00:00 Bob(222)
rust borrow
2023-09-15 10:05:00 匿名消息(80000000)
cargo
2023-09-16 11:00:00 Bob(222)
borrow checker
";

    struct StringSource(&'static str);

    impl TranscriptSource for StringSource {
        fn open(&self) -> Result<Box<dyn BufRead>> {
            Ok(Box::new(Cursor::new(self.0)))
        }

        fn describe(&self) -> String {
            "in-memory".to_string()
        }
    }

    #[derive(Default)]
    struct Captured {
        counts: Vec<DayCountRow>,
        speakers: Vec<SpeakerRow>,
        order: Vec<&'static str>,
    }

    struct CapturingWriter(Rc<RefCell<Captured>>);

    impl CountsWriter for CapturingWriter {
        fn write_counts(&self, rows: &[DayCountRow]) -> Result<()> {
            let mut captured = self.0.borrow_mut();
            captured.counts = rows.to_vec();
            captured.order.push("counts");
            Ok(())
        }
    }

    impl SpeakerWriter for CapturingWriter {
        fn write_speakers(&self, rows: &[SpeakerRow]) -> Result<()> {
            let mut captured = self.0.borrow_mut();
            captured.speakers = rows.to_vec();
            captured.order.push("speakers");
            Ok(())
        }
    }

    struct FailingWriter;

    impl SpeakerWriter for FailingWriter {
        fn write_speakers(&self, _rows: &[SpeakerRow]) -> Result<()> {
            Err("output path is not writable".into())
        }
    }

    struct RecordingRenderer(Rc<RefCell<Vec<CloudLayout>>>);

    impl TextMeasure for RecordingRenderer {
        fn measure(&self, text: &str, font_size: u32) -> (u32, u32) {
            (text.chars().count() as u32 * font_size / 2, font_size)
        }
    }

    impl WordCloudRenderer for RecordingRenderer {
        fn render(&self, layout: &CloudLayout, _output: &Path) -> Result<()> {
            self.0.borrow_mut().push(layout.clone());
            Ok(())
        }
    }

    struct Scripted(Vec<bool>);

    impl Confirmation for Scripted {
        fn confirm(&mut self, _attempt: u32, _output: &Path) -> Result<bool> {
            Ok(self.0.remove(0))
        }
    }

    fn small_cloud() -> CloudConfig {
        CloudConfig {
            width: 160,
            height: 120,
            ..CloudConfig::default()
        }
    }

    #[test]
    fn test_collect_parses_source() {
        let segmenter = UnicodeSegmenter::default();
        let common = CommonFilter::default();
        let speak = ReservedIdSpeakFilter::default();
        let options = StatisticsOptions::new(Tokenizer::new(&segmenter))
            .with_message_filter(&common)
            .with_speak_filter(&speak);
        let service = StatisticsService::new(Box::new(StringSource(TRANSCRIPT)));

        let stats = service.collect(&options).unwrap();

        assert_eq!(stats.accepted_messages(), 4);
        assert_eq!(stats.anonymous_messages(), 1);
        assert_eq!(stats.speak_counts["222"], 2);
        assert_eq!(stats.speak_counts.len(), 2);
    }

    #[test]
    fn test_daily_top_words() {
        let segmenter = UnicodeSegmenter::default();
        let options = StatisticsOptions::new(Tokenizer::new(&segmenter));
        let service = StatisticsService::new(Box::new(StringSource(TRANSCRIPT)));
        let days = crate::utils::dates_inclusive(
            NaiveDate::from_ymd_opt(2023, 9, 14).unwrap(),
            NaiveDate::from_ymd_opt(2023, 9, 17).unwrap(),
        );

        let daily = service.daily_top_words(&days, &options, 1).unwrap();

        assert_eq!(daily.len(), 4);
        assert_eq!(daily[0].date, "2023-09-14");
        assert_eq!(daily[0].words, vec!["rust"]);
        assert_eq!(daily[1].words, vec!["rust"]);
        assert_eq!(daily[2].words, vec!["borrow"]);
        assert!(daily[3].words.is_empty());
    }

    #[test]
    fn test_execute_reports_writes_both() {
        let captured = Rc::new(RefCell::new(Captured::default()));
        let service = ReportService::new(
            Box::new(CapturingWriter(captured.clone())),
            Box::new(CapturingWriter(captured.clone())),
        );
        let segmenter = UnicodeSegmenter::default();
        let stats = StatisticsService::new(Box::new(StringSource(TRANSCRIPT)))
            .collect(&StatisticsOptions::new(Tokenizer::new(&segmenter)))
            .unwrap();

        service.execute_reports(&stats).unwrap();

        let captured = captured.borrow();
        assert_eq!(captured.order, vec!["speakers", "counts"]);
        assert_eq!(captured.counts.len(), 3);
        assert_eq!(captured.counts[1].anonymous_percent, 50.0);
        assert_eq!(captured.speakers[0].name, "Bob");
        assert_eq!(captured.speakers[0].count, 2);
    }

    #[test]
    fn test_execute_reports_propagates_writer_error() {
        let captured = Rc::new(RefCell::new(Captured::default()));
        let service = ReportService::new(Box::new(CapturingWriter(captured.clone())), Box::new(FailingWriter));

        let err = service.execute_reports(&ChatStatistics::default()).unwrap_err();

        assert_eq!(err.to_string(), "output path is not writable");
        assert!(captured.borrow().order.is_empty());
    }

    #[test]
    fn test_word_cloud_regenerates_until_confirmed() {
        let renders = Rc::new(RefCell::new(Vec::new()));
        let service = WordCloudService::new(Box::new(RecordingRenderer(renders.clone())), small_cloud(), 11);
        let words: Vec<String> = ["rust", "rust", "cargo"].iter().map(|w| w.to_string()).collect();
        let mut confirmation = Scripted(vec![false, false, true]);

        let attempts = service
            .export(&words, Path::new("cloud.png"), &mut confirmation)
            .unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(renders.borrow().len(), 3);
        assert!(confirmation.0.is_empty());
    }

    #[test]
    fn test_word_cloud_first_attempt_accepted() {
        let renders = Rc::new(RefCell::new(Vec::new()));
        let service = WordCloudService::new(Box::new(RecordingRenderer(renders.clone())), small_cloud(), 0);
        let words: Vec<String> = vec!["hello".to_string()];

        let attempts = service
            .export(&words, Path::new("cloud.png"), &mut Scripted(vec![true]))
            .unwrap();

        assert_eq!(attempts, 1);
        assert_eq!(renders.borrow()[0].words[0].text, "hello");
    }
}
