//! Dispatch payload shapes
//!
//! Only the fields the audit log reads are modelled; everything else in a
//! payload is ignored. Ids arrive as strings.

use chat_audit_core::Snowflake;
use serde::Deserialize;

// === Connection ===

/// READY
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyPayload {
    pub v: u8,
    pub user: UserPayload,
    pub session_id: String,
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
}

/// Guild announced in READY, followed later by a GUILD_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

// === Users ===

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

fn default_discriminator() -> String {
    "0".to_string()
}

// === Guilds ===

/// GUILD_CREATE and GUILD_UPDATE
///
/// GUILD_UPDATE carries no channels or members.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildPayload {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub roles: Vec<RolePayload>,
    #[serde(default)]
    pub channels: Vec<ChannelPayload>,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
}

/// GUILD_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildDeletePayload {
    pub id: Snowflake,
    /// Outage rather than removal
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RolePayload {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i64,
}

/// GUILD_ROLE_CREATE and GUILD_ROLE_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRolePayload {
    pub guild_id: Snowflake,
    pub role: RolePayload,
}

/// GUILD_ROLE_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRoleDeletePayload {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

// === Channels ===

/// CHANNEL_CREATE, CHANNEL_UPDATE, CHANNEL_DELETE, and the channels of a
/// GUILD_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub rate_limit_per_user: u32,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    /// Direct-message channels only
    #[serde(default)]
    pub recipients: Vec<UserPayload>,
}

// === Messages ===

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    pub id: Snowflake,
    pub url: String,
}

/// MESSAGE_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

/// MESSAGE_UPDATE; absent fields are unchanged
#[derive(Debug, Clone, Deserialize)]
pub struct MessageUpdatePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<AttachmentPayload>>,
}

/// MESSAGE_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeletePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// MESSAGE_DELETE_BULK
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDeleteBulkPayload {
    pub ids: Vec<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

// === Members ===

/// GUILD_MEMBER_ADD, GUILD_MEMBER_UPDATE, and the members of a GUILD_CREATE
#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    /// Absent inside GUILD_CREATE, where the guild is implied
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user: UserPayload,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// GUILD_MEMBER_REMOVE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMemberRemovePayload {
    pub guild_id: Snowflake,
    pub user: UserPayload,
}
