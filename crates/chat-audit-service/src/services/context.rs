//! Shared dependencies of the audit services

use chat_audit_core::{Conversation, EventRecord, LogRepository, RecordKind};
use std::sync::Arc;

use super::error::AdapterResult;

/// Dependencies injected at startup
#[derive(Clone)]
pub struct AdapterContext {
    repository: Arc<dyn LogRepository>,
}

impl AdapterContext {
    pub fn new(repository: Arc<dyn LogRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn LogRepository> {
        &self.repository
    }

    /// Stamp a record with the observation time and store it
    ///
    /// Returns the number of records in the target log afterwards.
    pub async fn write(&self, conversation: &Conversation, kind: RecordKind) -> AdapterResult<usize> {
        let record = EventRecord::now(kind);
        let count = self.repository.record(conversation, record).await?;
        Ok(count)
    }
}

impl std::fmt::Debug for AdapterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterContext").finish_non_exhaustive()
    }
}
