use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("connection to {url} failed")]
    Connect {
        url: String,
        source: redis::RedisError,
    },

    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("malformed record at {}:{}: {}", .path.display(), .line, .reason)]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("dataset {} contains no records", .0.display())]
    EmptyDataset(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sample size {n} out of range (expected 1 to {max_id})")]
    InvalidSampleSize { n: i64, max_id: u64 },

    #[error("store error ({category}): {message}")]
    Store { category: String, message: String },
}

impl Error {
    /// Short category string surfaced in failed fetch reports.
    pub fn category(&self) -> &str {
        match self {
            Error::Connect { .. } => "connect",
            Error::DatasetNotFound(_) | Error::MalformedRecord { .. } | Error::EmptyDataset(_) => {
                "dataset"
            }
            Error::Io(_) => "io",
            Error::InvalidSampleSize { .. } => "sample",
            Error::Store { category, .. } => category,
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store {
            category: err.category().to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
