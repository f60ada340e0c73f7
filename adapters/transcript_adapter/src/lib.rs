use chatstat_core::ports::{Result, TranscriptSource};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File implementation of the TranscriptSource trait
pub struct FileTranscriptSource {
    path: PathBuf,
}

impl FileTranscriptSource {
    /// Creates a new FileTranscriptSource for an exported transcript
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TranscriptSource for FileTranscriptSource {
    fn open(&self) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.path)
            .map_err(|e| format!("cannot open transcript {}: {}", self.path.display(), e))?;
        debug!(path = %self.path.display(), "opened transcript");
        Ok(Box::new(BufReader::new(file)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads a stop-word list: one word per line, surrounding whitespace
/// trimmed, blank lines skipped.
pub fn load_stop_words(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path)
        .map_err(|e| format!("cannot open stop-word file {}: {}", path.display(), e))?;

    // One word per line, blank lines carry no word
    let mut stop_words = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            stop_words.insert(word.to_string());
        }
    }

    info!(path = %path.display(), count = stop_words.len(), "loaded stop words");
    Ok(stop_words)
}
