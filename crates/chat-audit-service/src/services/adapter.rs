//! Event adapter - the single entry point for observed events

use chat_audit_core::{
    ChannelSnapshot, LogRepository, MemberSnapshot, MessageSnapshot, UserSnapshot,
};
use std::sync::Arc;
use tracing::instrument;

use crate::dto::AuditEvent;

use super::channel::ChannelAuditService;
use super::context::AdapterContext;
use super::error::AdapterResult;
use super::member::MemberAuditService;
use super::message::MessageAuditService;

/// Maps each observed event to log records and stores them
///
/// Cheap to clone; every clone writes through the same repository, so
/// events may be handled from concurrent tasks.
#[derive(Clone, Debug)]
pub struct EventAdapter {
    ctx: AdapterContext,
}

impl EventAdapter {
    pub fn new(repository: Arc<dyn LogRepository>) -> Self {
        Self {
            ctx: AdapterContext::new(repository),
        }
    }

    pub fn context(&self) -> &AdapterContext {
        &self.ctx
    }

    /// Dispatch an event to its operation
    ///
    /// Returns the number of records written.
    #[instrument(skip_all, fields(event = %event))]
    pub async fn handle(&self, event: AuditEvent) -> AdapterResult<usize> {
        match event {
            AuditEvent::MessageDeleted(message) => self.on_message_delete(&message).await,
            AuditEvent::MessagesBulkDeleted(messages) => {
                self.on_bulk_message_delete(&messages).await
            }
            AuditEvent::MessageEdited { before, after } => {
                self.on_message_edit(&before, &after).await
            }
            AuditEvent::ChannelCreated(channel) => self.on_channel_create(&channel).await,
            AuditEvent::ChannelDeleted(channel) => self.on_channel_delete(&channel).await,
            AuditEvent::ChannelUpdated { before, after } => {
                self.on_channel_update(&before, &after).await
            }
            AuditEvent::MemberJoined(member) => self.on_member_join(&member).await,
            AuditEvent::MemberLeft(member) => self.on_member_remove(&member).await,
            AuditEvent::MemberUpdated { before, after } => {
                self.on_member_update(&before, &after).await
            }
            AuditEvent::UserUpdated {
                before,
                after,
                memberships,
            } => self.on_user_update(&before, &after, &memberships).await,
        }
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub async fn on_message_delete(&self, message: &MessageSnapshot) -> AdapterResult<usize> {
        MessageAuditService::new(&self.ctx).on_delete(message).await
    }

    pub async fn on_bulk_message_delete(
        &self,
        messages: &[MessageSnapshot],
    ) -> AdapterResult<usize> {
        MessageAuditService::new(&self.ctx)
            .on_bulk_delete(messages)
            .await
    }

    pub async fn on_message_edit(
        &self,
        before: &MessageSnapshot,
        after: &MessageSnapshot,
    ) -> AdapterResult<usize> {
        MessageAuditService::new(&self.ctx).on_edit(before, after).await
    }

    // ========================================================================
    // Channels
    // ========================================================================

    pub async fn on_channel_create(&self, channel: &ChannelSnapshot) -> AdapterResult<usize> {
        ChannelAuditService::new(&self.ctx).on_create(channel).await
    }

    pub async fn on_channel_delete(&self, channel: &ChannelSnapshot) -> AdapterResult<usize> {
        ChannelAuditService::new(&self.ctx).on_delete(channel).await
    }

    pub async fn on_channel_update(
        &self,
        before: &ChannelSnapshot,
        after: &ChannelSnapshot,
    ) -> AdapterResult<usize> {
        ChannelAuditService::new(&self.ctx)
            .on_update(before, after)
            .await
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub async fn on_member_join(&self, member: &MemberSnapshot) -> AdapterResult<usize> {
        MemberAuditService::new(&self.ctx).on_join(member).await
    }

    pub async fn on_member_remove(&self, member: &MemberSnapshot) -> AdapterResult<usize> {
        MemberAuditService::new(&self.ctx).on_remove(member).await
    }

    pub async fn on_member_update(
        &self,
        before: &MemberSnapshot,
        after: &MemberSnapshot,
    ) -> AdapterResult<usize> {
        MemberAuditService::new(&self.ctx)
            .on_update(before, after)
            .await
    }

    pub async fn on_user_update(
        &self,
        before: &UserSnapshot,
        after: &UserSnapshot,
        memberships: &[MemberSnapshot],
    ) -> AdapterResult<usize> {
        MemberAuditService::new(&self.ctx)
            .on_user_update(before, after, memberships)
            .await
    }
}
