//! Gateway error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that end a gateway session abnormally
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// A frame could not be encoded or decoded
    #[error("Malformed frame: {0}")]
    Frame(#[from] serde_json::Error),

    /// The first frame was not Hello
    #[error("Handshake failed: {0}")]
    Handshake(String),
}

impl GatewayError {
    pub fn handshake(msg: impl Into<String>) -> Self {
        Self::Handshake(msg.into())
    }
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
