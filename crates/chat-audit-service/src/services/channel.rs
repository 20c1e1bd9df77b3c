//! Channel audit service

use chat_audit_core::{ChannelSnapshot, Conversation, RecordKind};
use tracing::{debug, instrument};

use crate::dto::mappers;

use super::context::AdapterContext;
use super::error::{AdapterError, AdapterResult};

/// Channel audit service
///
/// Channel records always go to the log of the guild that owns the channel.
pub struct ChannelAuditService<'a> {
    ctx: &'a AdapterContext,
}

impl<'a> ChannelAuditService<'a> {
    pub fn new(ctx: &'a AdapterContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip_all, fields(channel_id = %channel.id, guild_id = %channel.guild.id))]
    pub async fn on_create(&self, channel: &ChannelSnapshot) -> AdapterResult<usize> {
        let record = RecordKind::ChannelCreate(mappers::channel(channel));
        self.write(channel, record).await
    }

    #[instrument(skip_all, fields(channel_id = %channel.id, guild_id = %channel.guild.id))]
    pub async fn on_delete(&self, channel: &ChannelSnapshot) -> AdapterResult<usize> {
        let record = RecordKind::ChannelDelete(mappers::channel(channel));
        self.write(channel, record).await
    }

    #[instrument(skip_all, fields(channel_id = %before.id, guild_id = %before.guild.id))]
    pub async fn on_update(
        &self,
        before: &ChannelSnapshot,
        after: &ChannelSnapshot,
    ) -> AdapterResult<usize> {
        if before.id != after.id || before.guild.id != after.guild.id {
            return Err(AdapterError::fault(format!(
                "update snapshots disagree on channel: {}/{} vs {}/{}",
                before.guild.id, before.id, after.guild.id, after.id
            )));
        }

        let record = RecordKind::ChannelUpdate(mappers::channel_update(before, after));
        self.write(before, record).await
    }

    async fn write(&self, channel: &ChannelSnapshot, record: RecordKind) -> AdapterResult<usize> {
        let record_type = record.record_type();
        let conversation = Conversation::Guild(channel.guild.clone());
        let count = self.ctx.write(&conversation, record).await?;

        debug!(record = %record_type, events = count, "Channel record written");
        Ok(1)
    }
}
