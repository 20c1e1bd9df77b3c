//! Member audit service
//!
//! Joins, departures, and changes to members and user profiles.

use chat_audit_core::{Conversation, MemberSnapshot, RecordKind, UserSnapshot};
use tracing::{debug, instrument, warn};

use crate::dto::mappers;

use super::context::AdapterContext;
use super::error::{AdapterError, AdapterResult};

/// Member audit service
pub struct MemberAuditService<'a> {
    ctx: &'a AdapterContext,
}

impl<'a> MemberAuditService<'a> {
    pub fn new(ctx: &'a AdapterContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip_all, fields(user_id = %member.user.id, guild_id = %member.guild.id))]
    pub async fn on_join(&self, member: &MemberSnapshot) -> AdapterResult<usize> {
        let record = RecordKind::MemberJoin(mappers::member(member));
        self.write(member, record).await
    }

    #[instrument(skip_all, fields(user_id = %member.user.id, guild_id = %member.guild.id))]
    pub async fn on_remove(&self, member: &MemberSnapshot) -> AdapterResult<usize> {
        let record = RecordKind::MemberRemove(mappers::member(member));
        self.write(member, record).await
    }

    #[instrument(skip_all, fields(user_id = %before.user.id, guild_id = %before.guild.id))]
    pub async fn on_update(
        &self,
        before: &MemberSnapshot,
        after: &MemberSnapshot,
    ) -> AdapterResult<usize> {
        if before.user.id != after.user.id || before.guild.id != after.guild.id {
            return Err(AdapterError::fault(format!(
                "update snapshots disagree on member: {}/{} vs {}/{}",
                before.guild.id, before.user.id, after.guild.id, after.user.id
            )));
        }

        let record = RecordKind::MemberUpdate(mappers::member_update(before, after));
        self.write(before, record).await
    }

    /// Record a profile change in every guild the user is known to be in
    ///
    /// A user with no known memberships produces no records.
    #[instrument(skip_all, fields(user_id = %before.id, guilds = memberships.len()))]
    pub async fn on_user_update(
        &self,
        before: &UserSnapshot,
        after: &UserSnapshot,
        memberships: &[MemberSnapshot],
    ) -> AdapterResult<usize> {
        if before.id != after.id {
            return Err(AdapterError::fault(format!(
                "update snapshots disagree on user id: {} vs {}",
                before.id, after.id
            )));
        }

        if memberships.is_empty() {
            debug!("User shares no known guild, nothing recorded");
            return Ok(0);
        }

        let mut written = 0;
        for membership in memberships {
            if membership.user.id != before.id {
                warn!(member = %membership.user.id, "Skipping membership of another user");
                continue;
            }
            let record = RecordKind::MemberUpdate(mappers::user_update(before, after, membership));
            written += self.write(membership, record).await?;
        }
        Ok(written)
    }

    async fn write(&self, member: &MemberSnapshot, record: RecordKind) -> AdapterResult<usize> {
        let record_type = record.record_type();
        let conversation = Conversation::Guild(member.guild.clone());
        let count = self.ctx.write(&conversation, record).await?;

        debug!(record = %record_type, events = count, "Member record written");
        Ok(1)
    }
}
