//! Audit services
//!
//! `EventAdapter` is the entry point; the per-domain services below it hold
//! one operation per event kind.

mod adapter;
mod channel;
mod context;
mod error;
mod member;
mod message;

pub use adapter::EventAdapter;
pub use channel::ChannelAuditService;
pub use context::AdapterContext;
pub use error::{AdapterError, AdapterResult};
pub use member::MemberAuditService;
pub use message::MessageAuditService;
