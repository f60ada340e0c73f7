use crate::error::Error;
use chatstat_core::cloud::{parse_hex_color, CloudConfig};
use chatstat_core::tokenizer::DEFAULT_CUSTOM_WORDS;
use chatstat_core::utils::parse_date;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_STOPWORDS: &str = "./stopwords.dat";
pub const DEFAULT_FONT: &str = "./msyh.ttc";

/// Optional TOML settings. Command line flags win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    pub stopwords: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub custom_words: Option<Vec<String>>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub cloud: CloudSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CloudSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_words: Option<usize>,
    pub background: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    pub fn stopwords_path(&self, flag: Option<&Path>) -> PathBuf {
        pick_path(flag, self.stopwords.as_deref(), DEFAULT_STOPWORDS)
    }

    pub fn font_path(&self, flag: Option<&Path>) -> PathBuf {
        pick_path(flag, self.font.as_deref(), DEFAULT_FONT)
    }

    pub fn custom_words(&self) -> Vec<String> {
        match &self.custom_words {
            Some(words) => words.clone(),
            None => DEFAULT_CUSTOM_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Inclusive date range from the flags, else from the file. `None` when
    /// neither gives one.
    pub fn date_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<(NaiveDate, NaiveDate)>, Error> {
        let (from, to) = if from.is_some() || to.is_some() {
            (from, to)
        } else {
            (self.from.as_deref(), self.to.as_deref())
        };

        match (from, to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => {
                let first = parse_date(from).ok_or_else(|| Error::InvalidDate(from.to_string()))?;
                let last = parse_date(to).ok_or_else(|| Error::InvalidDate(to.to_string()))?;
                if last < first {
                    return Err(Error::ReversedDateRange(first, last));
                }
                Ok(Some((first, last)))
            }
            _ => Err(Error::IncompleteDateRange),
        }
    }

    pub fn cloud_config(&self) -> Result<CloudConfig, Error> {
        let mut config = CloudConfig::default();
        if let Some(width) = self.cloud.width {
            config.width = width;
        }
        if let Some(height) = self.cloud.height {
            config.height = height;
        }
        if let Some(max_words) = self.cloud.max_words {
            config.max_words = max_words;
        }
        if let Some(background) = &self.cloud.background {
            config.background =
                parse_hex_color(background).ok_or_else(|| Error::InvalidColor(background.clone()))?;
        }
        Ok(config)
    }
}

fn pick_path(flag: Option<&Path>, file: Option<&Path>, default: &str) -> PathBuf {
    flag.or(file).unwrap_or_else(|| Path::new(default)).to_path_buf()
}
