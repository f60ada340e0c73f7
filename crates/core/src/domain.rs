use indexmap::IndexMap;

/// Sender id the export uses for anonymous group messages.
pub const ANONYMOUS_ID: &str = "80000000";

/// Sender id the export uses for system notices.
pub const SYSTEM_ID: &str = "1000000";

/// Date string to message count, in first-seen order.
pub type DayCounts = IndexMap<String, u64>;

/// One message reconstructed from a header line and its body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: String, // "YYYY-MM-DD"
    pub sender_name: String,
    pub sender_id: String,
    pub message: String,
}

/// Everything collected from a single pass over a transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatStatistics {
    /// Tokens of every accepted message, in transcript order.
    pub words: Vec<String>,
    /// Accepted messages per day.
    pub total_counts: DayCounts,
    /// Accepted anonymous messages per day. Only days with at least one are present.
    pub anonymous_counts: DayCounts,
    /// Speak count per sender id, in first-seen order.
    pub speak_counts: IndexMap<String, u64>,
    /// Latest display name per sender id.
    pub card_names: IndexMap<String, String>,
    /// Header lines directly followed by another header, which produced no record.
    pub orphan_headers: usize,
}

impl ChatStatistics {
    /// Number of records that passed the message filter.
    pub fn accepted_messages(&self) -> u64 {
        self.total_counts.values().sum()
    }

    pub fn anonymous_messages(&self) -> u64 {
        self.anonymous_counts.values().sum()
    }

    pub fn card_name(&self, sender_id: &str) -> Option<&str> {
        self.card_names.get(sender_id).map(String::as_str)
    }
}
