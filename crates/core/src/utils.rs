use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date prefix pattern is valid"));

/// Returns the leading `YYYY-MM-DD` of a line, if it starts with one.
/// Header lines of the export are recognised by this prefix alone.
pub fn extract_date_prefix(line: &str) -> Option<&str> {
    DATE_PREFIX.find(line).map(|m| m.as_str())
}

/// Parses a calendar date.
/// Supports formats: "2023-09-15", "2023/09/15", "20230915"
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Some(date);
        }
    }

    None
}

/// Every date from `first` to `last`, both included. Empty when `last < first`.
pub fn dates_inclusive(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|date| *date <= last).collect()
}

/// Formats a date the way the export writes it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
