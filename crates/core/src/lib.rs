pub mod aggregator;
pub mod application;
pub mod cloud;
pub mod domain;
pub mod error;
pub mod filters;
pub mod parser;
pub mod ports;
pub mod report;
pub mod tokenizer;
pub mod utils;

pub use error::StatsError;
