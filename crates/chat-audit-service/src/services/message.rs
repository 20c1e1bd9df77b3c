//! Message audit service
//!
//! Deletions, bulk deletions and edits of messages the client still held in
//! its cache.

use chat_audit_core::{MessageSnapshot, RecordKind};
use tracing::{debug, instrument};

use crate::dto::mappers;

use super::context::AdapterContext;
use super::error::{AdapterError, AdapterResult};

/// Message audit service
pub struct MessageAuditService<'a> {
    ctx: &'a AdapterContext,
}

impl<'a> MessageAuditService<'a> {
    pub fn new(ctx: &'a AdapterContext) -> Self {
        Self { ctx }
    }

    /// Record one deleted message in the log of its conversation
    #[instrument(skip_all, fields(message_id = %message.id, log = %message.conversation.identity()))]
    pub async fn on_delete(&self, message: &MessageSnapshot) -> AdapterResult<usize> {
        let record = mappers::message_delete(message);
        let count = self
            .ctx
            .write(&message.conversation, RecordKind::MessageDelete(record))
            .await?;

        debug!(events = count, "Message delete recorded");
        Ok(1)
    }

    /// Record each message of a bulk deletion as its own delete record
    ///
    /// Messages are written one after another in the order given, each with
    /// its own load and persist. The first failure stops the batch; records
    /// already written stay written.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn on_bulk_delete(&self, messages: &[MessageSnapshot]) -> AdapterResult<usize> {
        let mut written = 0;
        for message in messages {
            written += self.on_delete(message).await?;
        }
        Ok(written)
    }

    /// Record an edit, with `before` and `after` views of the same message
    #[instrument(skip_all, fields(message_id = %before.id, log = %before.conversation.identity()))]
    pub async fn on_edit(
        &self,
        before: &MessageSnapshot,
        after: &MessageSnapshot,
    ) -> AdapterResult<usize> {
        if before.id != after.id {
            return Err(AdapterError::fault(format!(
                "edit snapshots disagree on message id: {} vs {}",
                before.id, after.id
            )));
        }

        let record = mappers::message_edit(before, after);
        let count = self
            .ctx
            .write(&before.conversation, RecordKind::MessageEdit(record))
            .await?;

        debug!(events = count, "Message edit recorded");
        Ok(1)
    }
}
