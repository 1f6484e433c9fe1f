// Error taxonomy for one check cycle. Every variant aborts the cycle and is
// reported as UNKNOWN; per-counter problems are values (see delta::CounterCondition).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    /// Malformed threshold/filter text or invalid config file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Counter source unreachable, or a worker failed mid-collection.
    #[error("connection error: {0}")]
    Connection(String),

    /// Previous-sample file unreadable/corrupt, or current one unwritable.
    #[error("storage error ({}): {message}", .path.display())]
    Storage { path: PathBuf, message: String },
}

impl CheckError {
    pub fn config(msg: impl Into<String>) -> Self {
        CheckError::Configuration(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        CheckError::Connection(msg.into())
    }

    pub fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CheckError::Storage {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_names_the_file() {
        let err = CheckError::storage("/var/tmp/sw1.samples", "permission denied");
        assert_eq!(
            err.to_string(),
            "storage error (/var/tmp/sw1.samples): permission denied"
        );
    }

    #[test]
    fn config_error_display() {
        let err = CheckError::config("bad range '5:1'");
        assert_eq!(err.to_string(), "configuration error: bad range '5:1'");
    }
}
