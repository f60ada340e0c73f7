use chatstat_core::filters::{
    CommonFilter, DateRangeFilter, MentionStripper, MessageFilter, ReservedIdSpeakFilter,
    StopWordFilter,
};
use chatstat_core::parser::StatisticsOptions;
use chatstat_core::ports::Segmenter;
use chatstat_core::tokenizer::Tokenizer;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Owns the filters and segmenter of one run and lends them out as options.
pub struct Pipeline {
    segmenter: Box<dyn Segmenter>,
    word_filter: StopWordFilter,
    message_filter: Box<dyn MessageFilter>,
    speak_filter: ReservedIdSpeakFilter,
}

impl Pipeline {
    /// Mentions are stripped, stop words and single characters dropped, the
    /// anonymous and system senders get no speaking credit. With a date range
    /// only messages inside it count; system notices never do.
    pub fn new(
        segmenter: Box<dyn Segmenter>,
        stop_words: HashSet<String>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Self {
        let message_filter: Box<dyn MessageFilter> = match range {
            Some((first, last)) => Box::new(DateRangeFilter::new(first, last)),
            None => Box::new(CommonFilter::default()),
        };
        let word_filter = StopWordFilter::new(stop_words);
        if word_filter.is_empty() {
            warn!("stop-word list is empty, only single characters will be dropped");
        } else {
            debug!(stop_words = word_filter.len(), "stop-word filter ready");
        }

        Self {
            segmenter,
            word_filter,
            message_filter,
            speak_filter: ReservedIdSpeakFilter::default(),
        }
    }

    pub fn options(&self) -> StatisticsOptions<'_> {
        let tokenizer = Tokenizer::new(self.segmenter.as_ref())
            .with_preprocessor(&MentionStripper)
            .with_word_filter(&self.word_filter);
        StatisticsOptions::new(tokenizer)
            .with_message_filter(self.message_filter.as_ref())
            .with_speak_filter(&self.speak_filter)
    }
}
