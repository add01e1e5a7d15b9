//! Error types for GEX flow analytics
//!
//! Only the edges of the crate (configuration, batch parsing, the report
//! binary) return errors, plus `ProcessOutcome::into_result` for callers
//! that treat an empty batch as a failure. Bad records inside a batch are dropped, not raised.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GexError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type GexResult<T> = Result<T, GexError>;

impl GexError {
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for GexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
