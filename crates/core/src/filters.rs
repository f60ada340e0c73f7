use crate::domain::{ANONYMOUS_ID, SYSTEM_ID};
use crate::utils::parse_date;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

/// Decides whether a message is counted at all.
pub trait MessageFilter {
    fn accept(&self, date: &str, name: &str, id: &str, message: &str) -> bool;
}

/// Decides whether a sender is credited with speaking.
pub trait SpeakFilter {
    fn accept(&self, name: &str, id: &str) -> bool;
}

/// Decides whether a token goes into the word list.
pub trait WordFilter {
    fn accept(&self, word: &str) -> bool;
}

/// Rewrites message text before tokenization.
pub trait Preprocessor {
    fn process<'a>(&self, message: &'a str) -> Cow<'a, str>;
}

impl<F> MessageFilter for F
where
    F: Fn(&str, &str, &str, &str) -> bool,
{
    fn accept(&self, date: &str, name: &str, id: &str, message: &str) -> bool {
        self(date, name, id, message)
    }
}

impl<F> SpeakFilter for F
where
    F: Fn(&str, &str) -> bool,
{
    fn accept(&self, name: &str, id: &str) -> bool {
        self(name, id)
    }
}

impl<F> WordFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accept(&self, word: &str) -> bool {
        self(word)
    }
}

impl<F> Preprocessor for F
where
    F: Fn(&str) -> String,
{
    fn process<'a>(&self, message: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(message))
    }
}

/// Accepts every message, sender and word.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl MessageFilter for AcceptAll {
    fn accept(&self, _date: &str, _name: &str, _id: &str, _message: &str) -> bool {
        true
    }
}

impl SpeakFilter for AcceptAll {
    fn accept(&self, _name: &str, _id: &str) -> bool {
        true
    }
}

impl WordFilter for AcceptAll {
    fn accept(&self, _word: &str) -> bool {
        true
    }
}

/// Leaves message text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreprocessing;

impl Preprocessor for NoPreprocessing {
    fn process<'a>(&self, message: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(message)
    }
}

/// Notices the client inserts into the export as if they were messages.
pub const SYSTEM_NOTICES: [&str; 6] = [
    "一条匿名消息被撤回",
    "撤回了一条成员消息",
    "撤回了一条消息",
    "被设为了精华消息",
    "不支持的消息类型",
    "请使用最新版手机QQ",
];

/// Rejects system messages: the reserved system sender and known notices.
#[derive(Debug, Clone)]
pub struct CommonFilter {
    system_id: String,
    notices: Vec<String>,
}

impl Default for CommonFilter {
    fn default() -> Self {
        Self {
            system_id: SYSTEM_ID.to_string(),
            notices: SYSTEM_NOTICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CommonFilter {
    pub fn accepts(&self, id: &str, message: &str) -> bool {
        id != self.system_id && !self.notices.iter().any(|notice| message.contains(notice.as_str()))
    }
}

impl MessageFilter for CommonFilter {
    fn accept(&self, _date: &str, _name: &str, id: &str, message: &str) -> bool {
        self.accepts(id, message)
    }
}

/// Keeps messages dated within `first..=last` that also pass [`CommonFilter`].
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    first: NaiveDate,
    last: NaiveDate,
    common: CommonFilter,
}

impl DateRangeFilter {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            first,
            last,
            common: CommonFilter::default(),
        }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, date: &str) -> bool {
        parse_date(date).is_some_and(|d| self.first <= d && d <= self.last)
    }
}

impl MessageFilter for DateRangeFilter {
    fn accept(&self, date: &str, _name: &str, id: &str, message: &str) -> bool {
        self.contains(date) && self.common.accepts(id, message)
    }
}

/// Drops single-character tokens and stop words.
#[derive(Debug, Clone, Default)]
pub struct StopWordFilter {
    stop_words: HashSet<String>,
}

impl StopWordFilter {
    const MIN_CHARS: usize = 2;

    pub fn new(stop_words: HashSet<String>) -> Self {
        Self { stop_words }
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl WordFilter for StopWordFilter {
    fn accept(&self, word: &str) -> bool {
        word.chars().count() >= Self::MIN_CHARS && !self.stop_words.contains(word)
    }
}

/// Withholds speaking credit from the anonymous and system senders.
/// Their messages still count towards the daily totals.
#[derive(Debug, Clone)]
pub struct ReservedIdSpeakFilter {
    excluded: Vec<String>,
}

impl Default for ReservedIdSpeakFilter {
    fn default() -> Self {
        Self {
            excluded: vec![ANONYMOUS_ID.to_string(), SYSTEM_ID.to_string()],
        }
    }
}

impl SpeakFilter for ReservedIdSpeakFilter {
    fn accept(&self, _name: &str, id: &str) -> bool {
        !self.excluded.iter().any(|excluded| excluded == id)
    }
}

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\S+ ").expect("mention pattern is valid"));

/// Removes `@name ` mentions so member names do not flood the word list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionStripper;

impl Preprocessor for MentionStripper {
    fn process<'a>(&self, message: &'a str) -> Cow<'a, str> {
        MENTION.replace_all(message, "")
    }
}
