//! Repository traits (ports) - define the interface for log persistence
//!
//! The domain layer defines what it needs, and the store crate provides the
//! implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::entities::Conversation;
use crate::error::StoreResult;
use crate::events::EventRecord;
use crate::log::LogFile;

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Load the log for a conversation, or synthesize an empty one
    ///
    /// Returns the log together with the location it is persisted to.
    async fn resolve(&self, conversation: &Conversation) -> StoreResult<(LogFile, PathBuf)>;

    /// Overwrite `location` with the full content of `log`
    async fn persist(&self, log: &LogFile, location: &Path) -> StoreResult<()>;

    /// Resolve, append, and persist one record while holding the
    /// conversation's lock
    ///
    /// Returns the number of records in the log after the append.
    async fn record(&self, conversation: &Conversation, record: EventRecord) -> StoreResult<usize>;
}
