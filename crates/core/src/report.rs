use crate::domain::ChatStatistics;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DayCountRow {
    pub date: String,
    pub total: u64,
    pub anonymous: u64,
    /// Share of the day's messages that were anonymous, 0 to 100.
    pub anonymous_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRow {
    pub name: String,
    pub count: u64,
}

/// One row per day that has at least one accepted message, in first-seen order.
pub fn day_count_rows(stats: &ChatStatistics) -> Vec<DayCountRow> {
    stats
        .total_counts
        .iter()
        .map(|(date, &total)| {
            let anonymous = stats.anonymous_counts.get(date).copied().unwrap_or(0);
            let anonymous_percent = if total == 0 {
                0.0
            } else {
                100.0 * anonymous as f64 / total as f64
            };
            DayCountRow {
                date: date.clone(),
                total,
                anonymous,
                anonymous_percent,
            }
        })
        .collect()
}

/// Speakers by descending speak count. Ties keep the order in which the
/// speakers first appeared.
pub fn speaker_ranking(stats: &ChatStatistics) -> Vec<SpeakerRow> {
    let mut rows: Vec<SpeakerRow> = stats
        .speak_counts
        .iter()
        .map(|(id, &count)| SpeakerRow {
            name: stats.card_name(id).unwrap_or(id).to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Distinct words by descending frequency; ties keep first-seen order.
pub fn word_frequencies(words: &[String]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for word in words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    frequencies
}

/// The `count` most frequent words, or all of them if there are fewer.
pub fn top_words(words: &[String], count: usize) -> Vec<String> {
    word_frequencies(words)
        .into_iter()
        .take(count)
        .map(|(word, _)| word)
        .collect()
}
