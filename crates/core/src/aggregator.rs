use crate::domain::{ChatStatistics, DayCounts, Record, ANONYMOUS_ID};

/// Accumulates a [`ChatStatistics`] one record at a time.
///
/// Filtering happens before records reach the aggregator; every call here is
/// an unconditional append-or-increment.
#[derive(Debug, Default)]
pub struct Aggregator {
    stats: ChatStatistics,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an accepted message towards its day, and towards the anonymous
    /// tally when it came from the anonymous sender.
    pub fn count_message(&mut self, record: &Record) {
        increment(&mut self.stats.total_counts, &record.date);
        if record.sender_id == ANONYMOUS_ID {
            increment(&mut self.stats.anonymous_counts, &record.date);
        }
    }

    /// Credits the sender with one message and remembers their latest name.
    pub fn credit_speaker(&mut self, record: &Record) {
        *self
            .stats
            .speak_counts
            .entry(record.sender_id.clone())
            .or_insert(0) += 1;
        self.stats
            .card_names
            .insert(record.sender_id.clone(), record.sender_name.clone());
    }

    pub fn add_words(&mut self, words: impl IntoIterator<Item = String>) {
        self.stats.words.extend(words);
    }

    pub fn note_orphan_header(&mut self) {
        self.stats.orphan_headers += 1;
    }

    pub fn finish(self) -> ChatStatistics {
        self.stats
    }
}

fn increment(counts: &mut DayCounts, date: &str) {
    match counts.get_mut(date) {
        Some(count) => *count += 1,
        None => {
            counts.insert(date.to_string(), 1);
        }
    }
}
