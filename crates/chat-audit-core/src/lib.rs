//! # chat-audit-core
//!
//! Domain layer for the audit logger: typed snapshots of platform objects,
//! the per-conversation log file model, event records, and the store port.
//! This crate has no dependency on the gateway or on the filesystem.

pub mod entities;
pub mod error;
pub mod events;
pub mod log;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Category, ChannelKind, ChannelSnapshot, Conversation, DirectChannel, GuildSnapshot,
    MemberSnapshot, MessageSnapshot, UserSnapshot,
};
pub use error::{StoreError, StoreResult};
pub use events::{EventRecord, RecordKind, RecordType};
pub use log::{DirectHeader, GuildHeader, LogFile, LogHeader, LogIdentity};
pub use traits::LogRepository;
pub use value_objects::{Snowflake, SnowflakeParseError};
