//! Snapshot cache over gateway state

use chat_audit_core::{
    Category, ChannelKind, ChannelSnapshot, Conversation, DirectChannel, GuildSnapshot,
    MemberSnapshot, MessageSnapshot, Snowflake, UserSnapshot,
};
use dashmap::{DashMap, DashSet};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

use super::MessageCache;
use crate::events::{ChannelPayload, GuildPayload, MemberPayload, RolePayload, UserPayload};

/// Name of the implicit role every member holds
const EVERYONE_ROLE: &str = "@everyone";

#[derive(Debug, Clone)]
struct GuildEntry {
    snapshot: GuildSnapshot,
    roles: HashMap<Snowflake, RolePayload>,
}

#[derive(Debug, Clone)]
struct GuildChannel {
    guild_id: Snowflake,
    kind: ChannelKind,
    name: String,
    nsfw: bool,
    topic: Option<String>,
    slowmode_delay: u32,
    parent_id: Option<Snowflake>,
}

#[derive(Debug, Clone)]
struct MemberEntry {
    nick: Option<String>,
    roles: Vec<Snowflake>,
}

/// Shared, thread-safe view of the gateway state
///
/// Updated in dispatch order by the session loop and read when building
/// snapshots. No lock is held across an `.await`.
#[derive(Debug)]
pub struct SnapshotCache {
    current_user: RwLock<Option<UserSnapshot>>,
    guilds: DashMap<Snowflake, GuildEntry>,
    channels: DashMap<Snowflake, GuildChannel>,
    direct_channels: DashMap<Snowflake, DirectChannel>,
    /// Group DM channels; their messages are not audited
    group_channels: DashSet<Snowflake>,
    users: DashMap<Snowflake, UserSnapshot>,
    /// Keyed by (guild id, user id)
    members: DashMap<(Snowflake, Snowflake), MemberEntry>,
    messages: Mutex<MessageCache>,
}

impl SnapshotCache {
    pub fn new(max_messages: usize) -> Self {
        Self {
            current_user: RwLock::new(None),
            guilds: DashMap::new(),
            channels: DashMap::new(),
            direct_channels: DashMap::new(),
            group_channels: DashSet::new(),
            users: DashMap::new(),
            members: DashMap::new(),
            messages: Mutex::new(MessageCache::new(max_messages)),
        }
    }

    // ========================================================================
    // Current user
    // ========================================================================

    pub fn set_current_user(&self, user: &UserPayload) {
        let snapshot = user_snapshot(user);
        self.users.insert(snapshot.id, snapshot.clone());
        *self.current_user.write() = Some(snapshot);
    }

    pub fn current_user(&self) -> Option<UserSnapshot> {
        self.current_user.read().clone()
    }

    // ========================================================================
    // Guilds and roles
    // ========================================================================

    /// Load a full guild (GUILD_CREATE): metadata, roles, channels, members
    pub fn load_guild(&self, guild: &GuildPayload) {
        self.update_guild(guild);

        for channel in &guild.channels {
            self.upsert_guild_channel(guild.id, channel);
        }
        for member in &guild.members {
            self.upsert_member(guild.id, member);
        }
    }

    /// Replace guild metadata and roles (GUILD_UPDATE)
    pub fn update_guild(&self, guild: &GuildPayload) {
        let mut snapshot = GuildSnapshot::new(guild.id, guild.name.clone());
        snapshot.icon = guild.icon.clone();

        let roles = guild
            .roles
            .iter()
            .map(|role| (role.id, role.clone()))
            .collect();

        self.guilds.insert(guild.id, GuildEntry { snapshot, roles });
    }

    /// Forget a guild along with its channels and memberships
    pub fn remove_guild(&self, guild_id: Snowflake) {
        self.guilds.remove(&guild_id);
        self.channels.retain(|_, channel| channel.guild_id != guild_id);
        self.members.retain(|(guild, _), _| *guild != guild_id);
    }

    pub fn guild(&self, guild_id: Snowflake) -> Option<GuildSnapshot> {
        self.guilds.get(&guild_id).map(|entry| entry.snapshot.clone())
    }

    /// Returns false when the guild is unknown
    pub fn upsert_role(&self, guild_id: Snowflake, role: &RolePayload) -> bool {
        match self.guilds.get_mut(&guild_id) {
            Some(mut entry) => {
                entry.roles.insert(role.id, role.clone());
                true
            }
            None => false,
        }
    }

    pub fn remove_role(&self, guild_id: Snowflake, role_id: Snowflake) {
        if let Some(mut entry) = self.guilds.get_mut(&guild_id) {
            entry.roles.remove(&role_id);
        }
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Cache a channel from CHANNEL_CREATE or CHANNEL_UPDATE
    ///
    /// Direct-message channels are remembered by recipient; group channels
    /// are remembered only so their messages can be skipped.
    pub fn upsert_channel(&self, channel: &ChannelPayload) {
        match channel.guild_id {
            Some(guild_id) => self.upsert_guild_channel(guild_id, channel),
            None => match ChannelKind::from(channel.kind) {
                ChannelKind::Private => {
                    if let Some(recipient) = channel.recipients.first() {
                        self.remember_direct_channel(channel.id, recipient);
                    }
                }
                ChannelKind::Group => {
                    self.group_channels.insert(channel.id);
                }
                _ => {}
            },
        }
    }

    fn upsert_guild_channel(&self, guild_id: Snowflake, channel: &ChannelPayload) {
        self.channels.insert(
            channel.id,
            GuildChannel {
                guild_id,
                kind: ChannelKind::from(channel.kind),
                name: channel.name.clone().unwrap_or_default(),
                nsfw: channel.nsfw,
                topic: channel.topic.clone(),
                slowmode_delay: channel.rate_limit_per_user,
                parent_id: channel.parent_id,
            },
        );
    }

    /// Snapshot of a cached guild channel, with its category resolved
    pub fn channel(&self, channel_id: Snowflake) -> Option<ChannelSnapshot> {
        let entry = self.channels.get(&channel_id)?.clone();
        let guild = self.guild(entry.guild_id)?;

        let category = entry.parent_id.and_then(|parent_id| {
            self.channels.get(&parent_id).map(|parent| Category {
                id: parent_id,
                name: parent.name.clone(),
            })
        });

        Some(ChannelSnapshot {
            id: channel_id,
            guild,
            kind: entry.kind,
            name: entry.name,
            category,
            nsfw: entry.nsfw,
            topic: entry.topic,
            slowmode_delay: entry.slowmode_delay,
        })
    }

    /// Remove a channel, returning its last snapshot
    pub fn remove_channel(&self, channel_id: Snowflake) -> Option<ChannelSnapshot> {
        let snapshot = self.channel(channel_id);
        self.channels.remove(&channel_id);
        self.direct_channels.remove(&channel_id);
        self.group_channels.remove(&channel_id);
        snapshot
    }

    pub fn direct_channel(&self, channel_id: Snowflake) -> Option<DirectChannel> {
        self.direct_channels.get(&channel_id).map(|dm| dm.clone())
    }

    pub fn remember_direct_channel(&self, channel_id: Snowflake, recipient: &UserPayload) {
        let recipient = self.upsert_user(recipient);
        self.direct_channels
            .insert(channel_id, DirectChannel::new(channel_id, recipient));
    }

    /// Conversation a message in `channel_id` belongs to
    ///
    /// An unknown DM channel is learned from the author when the author is not
    /// the current user. Messages sent by the current user into a DM channel
    /// never seen before cannot be attributed and yield `None`, as do messages
    /// in group channels.
    pub fn conversation_for(
        &self,
        channel_id: Snowflake,
        guild_id: Option<Snowflake>,
        author: &UserPayload,
    ) -> Option<Conversation> {
        if let Some(guild_id) = guild_id {
            return self.guild(guild_id).map(Conversation::Guild);
        }

        if let Some(dm) = self.direct_channel(channel_id) {
            return Some(Conversation::Direct(dm));
        }
        if self.group_channels.contains(&channel_id) {
            return None;
        }

        let is_self = self
            .current_user
            .read()
            .as_ref()
            .is_some_and(|me| me.id == author.id);
        if is_self {
            return None;
        }

        self.remember_direct_channel(channel_id, author);
        self.direct_channel(channel_id).map(Conversation::Direct)
    }

    // ========================================================================
    // Users and members
    // ========================================================================

    pub fn user(&self, user_id: Snowflake) -> Option<UserSnapshot> {
        self.users.get(&user_id).map(|user| user.clone())
    }

    /// Cache the user and return the new snapshot
    pub fn upsert_user(&self, user: &UserPayload) -> UserSnapshot {
        let snapshot = user_snapshot(user);
        self.users.insert(snapshot.id, snapshot.clone());
        snapshot
    }

    pub fn upsert_member(&self, guild_id: Snowflake, member: &MemberPayload) {
        self.upsert_user(&member.user);
        self.members.insert(
            (guild_id, member.user.id),
            MemberEntry {
                nick: member.nick.clone(),
                roles: member.roles.clone(),
            },
        );
    }

    /// Snapshot of a cached membership
    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<MemberSnapshot> {
        let entry = self.members.get(&(guild_id, user_id))?.clone();
        let guild = self.guild(guild_id)?;
        let user = self.user(user_id)?;

        Some(MemberSnapshot {
            roles: self.role_names(guild_id, &entry.roles),
            nickname: entry.nick,
            guild,
            user,
        })
    }

    /// Forget a membership, returning its last snapshot
    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<MemberSnapshot> {
        let snapshot = self.member(guild_id, user_id);
        self.members.remove(&(guild_id, user_id));
        snapshot
    }

    /// Every known membership of a user, ordered by guild id
    pub fn memberships(&self, user_id: Snowflake) -> Vec<MemberSnapshot> {
        let mut guild_ids: Vec<Snowflake> = self
            .members
            .iter()
            .filter(|entry| entry.key().1 == user_id)
            .map(|entry| entry.key().0)
            .collect();
        guild_ids.sort_unstable();

        guild_ids
            .into_iter()
            .filter_map(|guild_id| self.member(guild_id, user_id))
            .collect()
    }

    /// Role names with `@everyone` first, then by position
    ///
    /// Role ids the cache does not know are skipped.
    fn role_names(&self, guild_id: Snowflake, role_ids: &[Snowflake]) -> Vec<String> {
        let mut names = vec![EVERYONE_ROLE.to_string()];

        if let Some(entry) = self.guilds.get(&guild_id) {
            let mut roles: Vec<&RolePayload> = role_ids
                .iter()
                .filter(|id| **id != guild_id)
                .filter_map(|id| entry.roles.get(id))
                .collect();
            roles.sort_by_key(|role| (role.position, role.id));
            names.extend(roles.into_iter().map(|role| role.name.clone()));
        }

        names
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn cache_message(&self, message: MessageSnapshot) {
        self.messages.lock().insert(message);
    }

    pub fn message(&self, message_id: Snowflake) -> Option<MessageSnapshot> {
        self.messages.lock().get(message_id).cloned()
    }

    pub fn remove_message(&self, message_id: Snowflake) -> Option<MessageSnapshot> {
        self.messages.lock().remove(message_id)
    }
}

/// Convert a wire user into a snapshot
pub(crate) fn user_snapshot(user: &UserPayload) -> UserSnapshot {
    UserSnapshot {
        id: user.id,
        username: user.username.clone(),
        discriminator: user.discriminator.clone(),
        avatar: user.avatar.clone(),
    }
}
