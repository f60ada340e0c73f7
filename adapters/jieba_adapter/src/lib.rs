use chatstat_core::ports::Segmenter;
use jieba_rs::Jieba;

/// Dictionary-based Chinese segmenter.
///
/// Mixed-script text is handled too: runs of Latin letters and digits come
/// out as single tokens, punctuation and spaces as their own tokens.
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    /// Loads the bundled dictionary and forces each of `custom_words` to stay whole.
    pub fn new<S: AsRef<str>>(custom_words: &[S]) -> Self {
        let mut jieba = Jieba::new();
        for word in custom_words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                jieba.add_word(word, None, None);
            }
        }
        Self { jieba }
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_word_stays_whole() {
        let segmenter = JiebaSegmenter::new(&["计算学部"]);
        let tokens = segmenter.segment("欢迎来到计算学部");
        assert!(tokens.contains(&"计算学部".to_string()), "{tokens:?}");
    }

    #[test]
    fn test_tokens_cover_the_input() {
        let segmenter = JiebaSegmenter::new::<&str>(&[]);
        let text = "今天天气不错 hello";
        assert_eq!(segmenter.segment(text).concat(), text);
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let segmenter = JiebaSegmenter::new(&["工程硕博"]);
        let text = "工程硕博的同学出了新的通知";
        assert_eq!(segmenter.segment(text), segmenter.segment(text));
    }
}
