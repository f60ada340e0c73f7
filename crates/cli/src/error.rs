use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("--from and --to must be given together")]
    IncompleteDateRange,

    #[error("date range ends before it starts: {0} > {1}")]
    ReversedDateRange(NaiveDate, NaiveDate),

    #[error("this command needs a date range (--from and --to)")]
    MissingDateRange,

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
