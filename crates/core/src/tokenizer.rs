use crate::filters::{AcceptAll, NoPreprocessing, Preprocessor, WordFilter};
use crate::ports::Segmenter;
use unicode_segmentation::UnicodeSegmentation;

/// Terms the segmenter must keep whole unless configured otherwise.
pub const DEFAULT_CUSTOM_WORDS: [&str; 3] = ["出了", "工程硕博", "计算学部"];

/// Preprocess, segment, then filter.
#[derive(Clone, Copy)]
pub struct Tokenizer<'a> {
    segmenter: &'a dyn Segmenter,
    preprocessor: &'a dyn Preprocessor,
    word_filter: &'a dyn WordFilter,
}

impl<'a> Tokenizer<'a> {
    /// A tokenizer that keeps every token and does not touch the text.
    pub fn new(segmenter: &'a dyn Segmenter) -> Self {
        Self {
            segmenter,
            preprocessor: &NoPreprocessing,
            word_filter: &AcceptAll,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: &'a dyn Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_word_filter(mut self, word_filter: &'a dyn WordFilter) -> Self {
        self.word_filter = word_filter;
        self
    }

    pub fn tokenize(&self, message: &str) -> Vec<String> {
        let text = self.preprocessor.process(message);
        self.segmenter
            .segment(&text)
            .into_iter()
            .filter(|word| self.word_filter.accept(word))
            .collect()
    }
}

/// Segmenter built on Unicode word boundaries (UAX #29).
///
/// Custom terms are matched first, longest first, and emitted whole; the text
/// between them is split with [`UnicodeSegmentation::unicode_words`], which
/// drops punctuation and whitespace. Han text falls apart into single
/// ideographs, so Chinese transcripts want a dictionary segmenter instead.
#[derive(Debug, Clone, Default)]
pub struct UnicodeSegmenter {
    custom_words: Vec<String>,
}

impl UnicodeSegmenter {
    pub fn new<S: AsRef<str>>(custom_words: &[S]) -> Self {
        let mut custom_words: Vec<String> = custom_words
            .iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        custom_words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        custom_words.dedup();
        Self { custom_words }
    }
}

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut span_start = 0;
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            match self.custom_words.iter().find(|w| rest.starts_with(w.as_str())) {
                Some(word) => {
                    tokens.extend(text[span_start..pos].unicode_words().map(str::to_string));
                    tokens.push(word.clone());
                    pos += word.len();
                    span_start = pos;
                }
                None => pos += rest.chars().next().map_or(1, char::len_utf8),
            }
        }
        tokens.extend(text[span_start..].unicode_words().map(str::to_string));

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{MentionStripper, StopWordFilter};
    use std::collections::HashSet;

    #[test]
    fn test_unicode_segmenter_splits_words() {
        let segmenter = UnicodeSegmenter::default();
        assert_eq!(segmenter.segment("hello, world!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_unicode_segmenter_keeps_custom_words_whole() {
        let segmenter = UnicodeSegmenter::new(&DEFAULT_CUSTOM_WORDS);
        let tokens = segmenter.segment("欢迎计算学部的同学");
        assert!(tokens.contains(&"计算学部".to_string()));
        assert!(!tokens.contains(&"计".to_string()));
    }

    #[test]
    fn test_unicode_segmenter_prefers_longest_custom_word() {
        let segmenter = UnicodeSegmenter::new(&["工程", "工程硕博"]);
        assert_eq!(segmenter.segment("工程硕博"), vec!["工程硕博"]);
    }

    #[test]
    fn test_unicode_segmenter_ignores_blank_custom_words() {
        let segmenter = UnicodeSegmenter::new(&["", "  "]);
        assert_eq!(segmenter.segment("plain text"), vec!["plain", "text"]);
    }

    #[test]
    fn test_tokenizer_defaults_keep_everything() {
        let segmenter = UnicodeSegmenter::default();
        let tokenizer = Tokenizer::new(&segmenter);
        assert_eq!(tokenizer.tokenize("a big cat"), vec!["a", "big", "cat"]);
    }

    #[test]
    fn test_tokenizer_applies_preprocessor_then_filter() {
        let segmenter = UnicodeSegmenter::default();
        let stop_words: HashSet<String> = ["cat".to_string()].into_iter().collect();
        let word_filter = StopWordFilter::new(stop_words);
        let tokenizer = Tokenizer::new(&segmenter)
            .with_preprocessor(&MentionStripper)
            .with_word_filter(&word_filter);

        assert_eq!(tokenizer.tokenize("@Bob a big cat moves"), vec!["big", "moves"]);
    }

    #[test]
    fn test_tokenizer_is_deterministic() {
        let segmenter = UnicodeSegmenter::new(&DEFAULT_CUSTOM_WORDS);
        let tokenizer = Tokenizer::new(&segmenter).with_preprocessor(&MentionStripper);
        let message = "@Alice 计算学部 hello there";
        assert_eq!(tokenizer.tokenize(message), tokenizer.tokenize(message));
    }
}
