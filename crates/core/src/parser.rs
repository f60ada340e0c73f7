use crate::aggregator::Aggregator;
use crate::domain::{ChatStatistics, Record};
use crate::error::StatsError;
use crate::filters::{AcceptAll, MessageFilter, SpeakFilter};
use crate::tokenizer::Tokenizer;
use crate::utils::extract_date_prefix;
use std::io::BufRead;
use tracing::{debug, warn};

/// Filters and tokenizer for one statistics run.
#[derive(Clone, Copy)]
pub struct StatisticsOptions<'a> {
    pub message_filter: &'a dyn MessageFilter,
    pub speak_filter: &'a dyn SpeakFilter,
    pub tokenizer: Tokenizer<'a>,
}

impl<'a> StatisticsOptions<'a> {
    /// Accepts every message and credits every sender.
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        Self {
            message_filter: &AcceptAll,
            speak_filter: &AcceptAll,
            tokenizer,
        }
    }

    pub fn with_message_filter(mut self, message_filter: &'a dyn MessageFilter) -> Self {
        self.message_filter = message_filter;
        self
    }

    pub fn with_speak_filter(mut self, speak_filter: &'a dyn SpeakFilter) -> Self {
        self.speak_filter = speak_filter;
        self
    }
}

/// Sender details taken from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub date: String,
    pub name: String,
    pub id: String,
}

/// Splits a header line into date, display name and sender id.
///
/// The name field is everything after the date and time fields. The id sits
/// between the last `(` (or, failing that, the last `<`) and the closing
/// character at the end of the line.
pub fn parse_header(line: &str, line_no: usize) -> Result<Header, StatsError> {
    let malformed = || StatsError::MalformedHeader {
        line_no,
        line: line.to_string(),
    };

    let date = extract_date_prefix(line).ok_or_else(malformed)?;
    let name_field = line.split(' ').skip(2).collect::<Vec<_>>().join(" ");
    let delimiter = name_field
        .rfind('(')
        .or_else(|| name_field.rfind('<'))
        .ok_or_else(malformed)?;

    let mut id = name_field[delimiter + 1..].chars();
    id.next_back();

    Ok(Header {
        date: date.to_string(),
        name: name_field[..delimiter].to_string(),
        id: id.as_str().to_string(),
    })
}

/// A header line waiting for its body.
struct PendingHeader {
    line_no: usize,
    line: String,
}

/// Reads a whole transcript and returns the aggregates for the accepted records.
///
/// Records are two lines: a header starting with `YYYY-MM-DD`, then the
/// message body. Every other line is ignored.
pub fn parse_transcript<R: BufRead>(
    reader: R,
    options: &StatisticsOptions<'_>,
) -> Result<ChatStatistics, StatsError> {
    let mut aggregator = Aggregator::new();
    let mut pending: Option<PendingHeader> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let raw = line?;
        let line = raw.trim();

        if extract_date_prefix(line).is_some() {
            // A new header while one is still pending means the first had no body
            if let Some(orphan) = pending.replace(PendingHeader {
                line_no,
                line: line.to_string(),
            }) {
                warn!(
                    line_no = orphan.line_no,
                    header = %orphan.line,
                    "header line has no message body, skipping it"
                );
                aggregator.note_orphan_header();
            }
        } else if let Some(header) = pending.take() {
            // The line after a header is its body, even when blank
            let Header { date, name, id } = parse_header(&header.line, header.line_no)?;
            let record = Record {
                date,
                sender_name: name,
                sender_id: id,
                message: line.to_string(),
            };
            accept_record(&mut aggregator, &record, options);
        }
    }

    if let Some(header) = pending {
        debug!(line_no = header.line_no, "transcript ends with a header line");
    }

    let stats = aggregator.finish();
    debug!(
        accepted = stats.accepted_messages(),
        days = stats.total_counts.len(),
        speakers = stats.speak_counts.len(),
        words = stats.words.len(),
        orphan_headers = stats.orphan_headers,
        "parsed transcript"
    );
    Ok(stats)
}

fn accept_record(aggregator: &mut Aggregator, record: &Record, options: &StatisticsOptions<'_>) {
    if !options.message_filter.accept(
        &record.date,
        &record.sender_name,
        &record.sender_id,
        &record.message,
    ) {
        return;
    }

    aggregator.count_message(record);

    if options
        .speak_filter
        .accept(&record.sender_name, &record.sender_id)
    {
        aggregator.credit_speaker(record);
    }

    aggregator.add_words(options.tokenizer.tokenize(&record.message));
}
