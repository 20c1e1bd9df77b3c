//! Dispatch handler
//!
//! Applies each dispatch to the snapshot cache and turns the ones the audit
//! log cares about into `AuditEvent`s. Runs synchronously in dispatch order,
//! so every event carries the state from just before it was applied.

use chat_audit_core::{MemberSnapshot, MessageSnapshot, Snowflake};
use chat_audit_service::{AdapterError, AdapterResult, AuditEvent};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::cache::SnapshotCache;
use crate::events::{
    AttachmentPayload, ChannelPayload, GatewayEventType, GuildDeletePayload,
    GuildMemberRemovePayload, GuildPayload, GuildRoleDeletePayload, GuildRolePayload,
    MemberPayload, MessageDeleteBulkPayload, MessageDeletePayload, MessagePayload,
    MessageUpdatePayload, ReadyPayload, UserPayload,
};

/// Translates dispatches into audit events
#[derive(Debug, Clone)]
pub struct DispatchHandler {
    cache: Arc<SnapshotCache>,
}

impl DispatchHandler {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Apply one dispatch, returning the events it produced
    ///
    /// A payload that does not decode, or that refers to a guild the cache
    /// never saw, is a fault.
    pub fn handle(&self, event_name: &str, data: &Value) -> AdapterResult<Vec<AuditEvent>> {
        let Some(event) = GatewayEventType::from_str(event_name) else {
            trace!(event = event_name, "Ignoring dispatch");
            return Ok(Vec::new());
        };

        match event {
            GatewayEventType::Ready => self.on_ready(decode(event, data)?),
            GatewayEventType::GuildCreate => {
                if data.get("unavailable").and_then(Value::as_bool) == Some(true) {
                    debug!("Guild unavailable, waiting for it to come back");
                    return Ok(Vec::new());
                }
                self.cache.load_guild(&decode::<GuildPayload>(event, data)?);
                Ok(Vec::new())
            }
            GatewayEventType::GuildUpdate => {
                self.cache.update_guild(&decode::<GuildPayload>(event, data)?);
                Ok(Vec::new())
            }
            GatewayEventType::GuildDelete => {
                let payload: GuildDeletePayload = decode(event, data)?;
                if !payload.unavailable {
                    self.cache.remove_guild(payload.id);
                }
                Ok(Vec::new())
            }
            GatewayEventType::GuildRoleCreate | GatewayEventType::GuildRoleUpdate => {
                let payload: GuildRolePayload = decode(event, data)?;
                if !self.cache.upsert_role(payload.guild_id, &payload.role) {
                    return Err(unknown_guild(event, payload.guild_id));
                }
                Ok(Vec::new())
            }
            GatewayEventType::GuildRoleDelete => {
                let payload: GuildRoleDeletePayload = decode(event, data)?;
                self.cache.remove_role(payload.guild_id, payload.role_id);
                Ok(Vec::new())
            }
            GatewayEventType::ChannelCreate => self.on_channel_create(decode(event, data)?),
            GatewayEventType::ChannelUpdate => self.on_channel_update(decode(event, data)?),
            GatewayEventType::ChannelDelete => self.on_channel_delete(decode(event, data)?),
            GatewayEventType::MessageCreate => self.on_message_create(decode(event, data)?),
            GatewayEventType::MessageUpdate => self.on_message_update(decode(event, data)?),
            GatewayEventType::MessageDelete => {
                let payload: MessageDeletePayload = decode(event, data)?;
                Ok(self
                    .cache
                    .remove_message(payload.id)
                    .map(AuditEvent::MessageDeleted)
                    .into_iter()
                    .collect())
            }
            GatewayEventType::MessageDeleteBulk => {
                let payload: MessageDeleteBulkPayload = decode(event, data)?;
                let messages: Vec<MessageSnapshot> = payload
                    .ids
                    .iter()
                    .filter_map(|id| self.cache.remove_message(*id))
                    .collect();
                if messages.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![AuditEvent::MessagesBulkDeleted(messages)])
            }
            GatewayEventType::GuildMemberAdd => self.on_member_add(decode(event, data)?),
            GatewayEventType::GuildMemberUpdate => self.on_member_update(decode(event, data)?),
            GatewayEventType::GuildMemberRemove => self.on_member_remove(decode(event, data)?),
            GatewayEventType::UserUpdate => self.on_user_update(decode(event, data)?),
        }
    }

    fn on_ready(&self, ready: ReadyPayload) -> AdapterResult<Vec<AuditEvent>> {
        self.cache.set_current_user(&ready.user);
        info!(
            user = %ready.user.username,
            user_id = %ready.user.id,
            guilds = ready.guilds.len(),
            version = ready.v,
            "Session ready"
        );
        Ok(Vec::new())
    }

    // ========================================================================
    // Channels
    // ========================================================================

    fn on_channel_create(&self, payload: ChannelPayload) -> AdapterResult<Vec<AuditEvent>> {
        self.cache.upsert_channel(&payload);
        let Some(guild_id) = payload.guild_id else {
            return Ok(Vec::new());
        };

        let channel = self
            .cache
            .channel(payload.id)
            .ok_or_else(|| unknown_guild(GatewayEventType::ChannelCreate, guild_id))?;
        Ok(vec![AuditEvent::ChannelCreated(channel)])
    }

    fn on_channel_update(&self, payload: ChannelPayload) -> AdapterResult<Vec<AuditEvent>> {
        let before = self.cache.channel(payload.id);
        self.cache.upsert_channel(&payload);
        let Some(guild_id) = payload.guild_id else {
            return Ok(Vec::new());
        };

        let Some(before) = before else {
            debug!(channel_id = %payload.id, "Update for uncached channel");
            return Ok(Vec::new());
        };
        let after = self
            .cache
            .channel(payload.id)
            .ok_or_else(|| unknown_guild(GatewayEventType::ChannelUpdate, guild_id))?;
        Ok(vec![AuditEvent::ChannelUpdated { before, after }])
    }

    fn on_channel_delete(&self, payload: ChannelPayload) -> AdapterResult<Vec<AuditEvent>> {
        let Some(guild_id) = payload.guild_id else {
            self.cache.remove_channel(payload.id);
            return Ok(Vec::new());
        };

        // The delete payload is a full channel object; cache it so the
        // category resolves even if the channel was never seen.
        self.cache.upsert_channel(&payload);
        let channel = self
            .cache
            .remove_channel(payload.id)
            .ok_or_else(|| unknown_guild(GatewayEventType::ChannelDelete, guild_id))?;
        Ok(vec![AuditEvent::ChannelDeleted(channel)])
    }

    // ========================================================================
    // Messages
    // ========================================================================

    fn on_message_create(&self, payload: MessagePayload) -> AdapterResult<Vec<AuditEvent>> {
        let Some(conversation) =
            self.cache
                .conversation_for(payload.channel_id, payload.guild_id, &payload.author)
        else {
            debug!(message_id = %payload.id, channel_id = %payload.channel_id, "Message outside any known conversation");
            return Ok(Vec::new());
        };

        let author = self.cache.upsert_user(&payload.author);
        let message = MessageSnapshot::new(
            payload.id,
            payload.channel_id,
            conversation,
            author,
            payload.content,
        )
        .with_attachments(attachment_urls(&payload.attachments));

        self.cache.cache_message(message);
        Ok(Vec::new())
    }

    fn on_message_update(&self, payload: MessageUpdatePayload) -> AdapterResult<Vec<AuditEvent>> {
        let Some(before) = self.cache.message(payload.id) else {
            trace!(message_id = %payload.id, "Edit of uncached message");
            return Ok(Vec::new());
        };

        let mut after = before.clone();
        if let Some(content) = payload.content {
            after.content = content;
        }
        if let Some(attachments) = &payload.attachments {
            after.attachments = attachment_urls(attachments);
        }

        self.cache.cache_message(after.clone());
        Ok(vec![AuditEvent::MessageEdited { before, after }])
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn on_member_add(&self, payload: MemberPayload) -> AdapterResult<Vec<AuditEvent>> {
        let event = GatewayEventType::GuildMemberAdd;
        let guild_id = payload.guild_id.ok_or_else(|| missing_guild_id(event))?;

        self.cache.upsert_member(guild_id, &payload);
        let member = self
            .cache
            .member(guild_id, payload.user.id)
            .ok_or_else(|| unknown_guild(event, guild_id))?;
        Ok(vec![AuditEvent::MemberJoined(member)])
    }

    /// A member update can carry a membership change, a profile change, or
    /// both; the profile change is reported first.
    fn on_member_update(&self, payload: MemberPayload) -> AdapterResult<Vec<AuditEvent>> {
        let event = GatewayEventType::GuildMemberUpdate;
        let guild_id = payload.guild_id.ok_or_else(|| missing_guild_id(event))?;
        if self.cache.guild(guild_id).is_none() {
            return Err(unknown_guild(event, guild_id));
        }

        let user_id = payload.user.id;
        let before_user = self.cache.user(user_id);
        let before_member = self.cache.member(guild_id, user_id);

        self.cache.upsert_member(guild_id, &payload);
        let after_member = self
            .cache
            .member(guild_id, user_id)
            .ok_or_else(|| unknown_guild(event, guild_id))?;

        let mut events = Vec::new();
        if let Some(before) = before_user.filter(|user| *user != after_member.user) {
            events.push(AuditEvent::UserUpdated {
                before,
                after: after_member.user.clone(),
                memberships: self.cache.memberships(user_id),
            });
        }
        if let Some(before) = before_member.filter(|member| membership_changed(member, &after_member)) {
            events.push(AuditEvent::MemberUpdated {
                before,
                after: after_member,
            });
        }
        Ok(events)
    }

    fn on_member_remove(&self, payload: GuildMemberRemovePayload) -> AdapterResult<Vec<AuditEvent>> {
        let event = GatewayEventType::GuildMemberRemove;
        let member = match self.cache.remove_member(payload.guild_id, payload.user.id) {
            Some(member) => member,
            None => {
                let guild = self
                    .cache
                    .guild(payload.guild_id)
                    .ok_or_else(|| unknown_guild(event, payload.guild_id))?;
                let user = self.cache.upsert_user(&payload.user);
                MemberSnapshot::new(guild, user).with_roles(vec!["@everyone".to_string()])
            }
        };
        Ok(vec![AuditEvent::MemberLeft(member)])
    }

    /// USER_UPDATE only describes the current user
    fn on_user_update(&self, payload: UserPayload) -> AdapterResult<Vec<AuditEvent>> {
        let before = self.cache.current_user();
        self.cache.set_current_user(&payload);
        let after = self.cache.upsert_user(&payload);

        match before {
            Some(before) if before != after => Ok(vec![AuditEvent::UserUpdated {
                memberships: self.cache.memberships(after.id),
                before,
                after,
            }]),
            _ => Ok(Vec::new()),
        }
    }
}

fn decode<T: DeserializeOwned>(event: GatewayEventType, data: &Value) -> AdapterResult<T> {
    <T as Deserialize>::deserialize(data).map_err(|e| AdapterError::fault(format!("undecodable {event} payload: {e}")))
}

fn unknown_guild(event: GatewayEventType, guild_id: Snowflake) -> AdapterError {
    AdapterError::fault(format!("{event} for unknown guild {guild_id}"))
}

fn missing_guild_id(event: GatewayEventType) -> AdapterError {
    AdapterError::fault(format!("{event} without guild_id"))
}

fn attachment_urls(attachments: &[AttachmentPayload]) -> Vec<String> {
    attachments.iter().map(|a| a.url.clone()).collect()
}

fn membership_changed(before: &MemberSnapshot, after: &MemberSnapshot) -> bool {
    before.nickname != after.nickname || before.roles != after.roles
}
