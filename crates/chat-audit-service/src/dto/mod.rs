//! Event payloads delivered by the binding layer, and their record mappers

pub mod events;
pub mod mappers;

pub use events::AuditEvent;
