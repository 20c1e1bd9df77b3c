//! # chat-audit-service
//!
//! Event adapter: one mapping operation per observed event kind. Each
//! operation builds a record stamped with the observation time and hands it
//! to the log repository.

pub mod dto;
pub mod services;

pub use dto::AuditEvent;
pub use services::{AdapterError, AdapterResult, EventAdapter};
