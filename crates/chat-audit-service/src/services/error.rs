//! Adapter error types

use chat_audit_core::StoreError;

/// Failure while handling one event
///
/// Either kind ends processing of the current event only.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The log could not be loaded or written
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The event payload was malformed or incomplete
    #[error("Adapter fault: {0}")]
    Fault(String),
}

impl AdapterError {
    /// Create a fault error
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }

    /// Get an error code string for structured logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.code(),
            Self::Fault(_) => "ADAPTER_FAULT",
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes() {
        assert_eq!(AdapterError::fault("missing guild").code(), "ADAPTER_FAULT");

        let err = AdapterError::from(StoreError::Read {
            path: PathBuf::from("x.json"),
            source: std::io::Error::other("io"),
        });
        assert_eq!(err.code(), "LOG_READ_FAILED");
        assert!(!err.is_fault());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AdapterError::fault("missing guild").to_string(),
            "Adapter fault: missing guild"
        );
    }
}
