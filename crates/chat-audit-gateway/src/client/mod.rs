//! Gateway client
//!
//! One session per process: connect, identify, keep the heartbeat going,
//! and hand every dispatch to the audit pipeline. No resume or reconnect.

mod heartbeat;
mod router;
mod session;

pub use heartbeat::Heartbeat;
pub use session::{GatewayClient, SessionEnd};
