//! Application error types
//!
//! Errors that end the process. Per-event failures are handled where the
//! event runs and never reach this type.

use chat_audit_core::StoreError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Storage errors
    #[error(transparent)]
    Storage(#[from] StoreError),

    // Gateway session errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for structured logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Storage(e) => e.code(),
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a gateway error
    #[must_use]
    pub fn gateway(msg: impl std::fmt::Display) -> Self {
        Self::Gateway(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
