//! Store errors - failures reading or writing log files

use std::path::PathBuf;
use thiserror::Error;

use crate::log::LogIdentity;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Log store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read log file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed log file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Log file {} belongs to {found}, expected {expected}", .path.display())]
    IdentityMismatch {
        path: PathBuf,
        expected: LogIdentity,
        found: LogIdentity,
    },

    #[error("Log file {} has an is_guild flag that contradicts its header", .path.display())]
    InconsistentHeader { path: PathBuf },

    #[error("Failed to encode log file: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// Get an error code string for structured logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "LOG_READ_FAILED",
            Self::Write { .. } => "LOG_WRITE_FAILED",
            Self::Malformed { .. } => "LOG_MALFORMED",
            Self::IdentityMismatch { .. } => "LOG_IDENTITY_MISMATCH",
            Self::InconsistentHeader { .. } => "LOG_INCONSISTENT_HEADER",
            Self::Encode(_) => "LOG_ENCODE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Snowflake;

    #[test]
    fn test_error_codes() {
        let err = StoreError::Write {
            path: PathBuf::from("logs/guild/1.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.code(), "LOG_WRITE_FAILED");
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::IdentityMismatch {
            path: PathBuf::from("logs/guild/1.json"),
            expected: LogIdentity::Guild(Snowflake::new(1)),
            found: LogIdentity::Guild(Snowflake::new(2)),
        };
        assert_eq!(
            err.to_string(),
            "Log file logs/guild/1.json belongs to guild/2, expected guild/1"
        );
        assert_eq!(err.code(), "LOG_IDENTITY_MISMATCH");
    }
}
