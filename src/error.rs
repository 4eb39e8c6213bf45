//! Error types for sqlstrip

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Stream read failed: {0}")]
    StreamRead(#[source] std::io::Error),

    #[error("Failed to open script {path}: {source}")]
    ScriptOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {attempts} attempts ({waited:?})")]
    Timeout { attempts: u32, waited: Duration },

    #[error("Gave up after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if retrying the failed operation could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Io(_) | Error::StreamRead(_) | Error::Timeout { .. })
    }
}
