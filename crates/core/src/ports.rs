use crate::cloud::CloudLayout;
use crate::report::{DayCountRow, SpeakerRow};
use std::error::Error;
use std::io::BufRead;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Where transcript lines come from
pub trait TranscriptSource {
    /// Opens a fresh reader positioned at the start of the transcript.
    fn open(&self) -> Result<Box<dyn BufRead>>;

    /// Human readable description used in log output
    fn describe(&self) -> String;
}

/// Splits message text into word tokens.
///
/// Implementations are configured once (custom vocabulary included) and
/// must return the same tokens for the same input every time.
pub trait Segmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Writes per-day message counts
pub trait CountsWriter {
    fn write_counts(&self, rows: &[DayCountRow]) -> Result<()>;
}

/// Writes the speaker ranking
pub trait SpeakerWriter {
    fn write_speakers(&self, rows: &[SpeakerRow]) -> Result<()>;
}

/// Measures the pixel box of a word rendered at a given font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: u32) -> (u32, u32);
}

/// Draws a laid out word cloud to an image file.
pub trait WordCloudRenderer: TextMeasure {
    fn render(&self, layout: &CloudLayout, output: &Path) -> Result<()>;
}

/// Decides whether a rendered word cloud is good enough to keep.
pub trait Confirmation {
    /// `attempt` starts at 1.
    fn confirm(&mut self, attempt: u32, output: &Path) -> Result<bool>;
}
