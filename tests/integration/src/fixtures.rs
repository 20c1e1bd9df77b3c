//! Snapshot and gateway payload fixtures

use chat_audit_core::{
    ChannelKind, ChannelSnapshot, DirectChannel, GuildSnapshot, MemberSnapshot, MessageSnapshot,
    Snowflake, UserSnapshot,
};
use serde_json::{json, Value};

pub const GUILD_ID: u64 = 1_000;
pub const TEXT_CHANNEL_ID: u64 = 2_000;
pub const CATEGORY_ID: u64 = 2_100;
pub const DM_CHANNEL_ID: u64 = 3_000;
pub const SELF_ID: u64 = 10;
pub const ALICE_ID: u64 = 11;
pub const BOB_ID: u64 = 12;
pub const MODERATOR_ROLE_ID: u64 = 500;

// ============================================================================
// Snapshots
// ============================================================================

pub fn guild() -> GuildSnapshot {
    GuildSnapshot::new(Snowflake::new(GUILD_ID), "Rust Guild").with_icon("guildicon")
}

pub fn alice() -> UserSnapshot {
    UserSnapshot::new(Snowflake::new(ALICE_ID), "alice", "0001").with_avatar("aliceavatar")
}

pub fn bob() -> UserSnapshot {
    UserSnapshot::new(Snowflake::new(BOB_ID), "bob", "0002")
}

pub fn text_channel() -> ChannelSnapshot {
    ChannelSnapshot::new(Snowflake::new(TEXT_CHANNEL_ID), guild(), ChannelKind::Text, "general")
        .with_category(Snowflake::new(CATEGORY_ID), "Text Channels")
}

pub fn direct_channel() -> DirectChannel {
    DirectChannel::new(Snowflake::new(DM_CHANNEL_ID), bob())
}

pub fn guild_message(id: u64, content: &str) -> MessageSnapshot {
    MessageSnapshot::new(
        Snowflake::new(id),
        Snowflake::new(TEXT_CHANNEL_ID),
        guild().into(),
        alice(),
        content,
    )
}

pub fn direct_message(id: u64, content: &str) -> MessageSnapshot {
    MessageSnapshot::new(
        Snowflake::new(id),
        Snowflake::new(DM_CHANNEL_ID),
        direct_channel().into(),
        bob(),
        content,
    )
}

pub fn member(user: UserSnapshot, roles: &[&str]) -> MemberSnapshot {
    MemberSnapshot::new(guild(), user).with_roles(roles.iter().map(|r| (*r).to_string()).collect())
}

// ============================================================================
// Gateway payloads
// ============================================================================

pub fn user_payload(id: u64, username: &str, discriminator: &str) -> Value {
    json!({
        "id": id.to_string(),
        "username": username,
        "discriminator": discriminator,
        "avatar": null,
    })
}

pub fn ready_payload() -> Value {
    json!({
        "v": 10,
        "user": user_payload(SELF_ID, "auditor", "0000"),
        "session_id": "mock-session",
        "guilds": [{"id": GUILD_ID.to_string(), "unavailable": true}],
    })
}

/// Guild with a category, one text channel, two roles, and alice as member
pub fn guild_create_payload() -> Value {
    json!({
        "id": GUILD_ID.to_string(),
        "name": "Rust Guild",
        "icon": "guildicon",
        "roles": [
            {"id": GUILD_ID.to_string(), "name": "@everyone", "position": 0},
            {"id": MODERATOR_ROLE_ID.to_string(), "name": "Moderator", "position": 1},
        ],
        "channels": [
            {"id": CATEGORY_ID.to_string(), "type": 4, "name": "Text Channels"},
            {
                "id": TEXT_CHANNEL_ID.to_string(),
                "type": 0,
                "name": "general",
                "topic": "chat",
                "parent_id": CATEGORY_ID.to_string(),
            },
        ],
        "members": [
            {"user": user_payload(ALICE_ID, "alice", "0001"), "nick": null, "roles": []},
        ],
    })
}

pub fn message_create_payload(id: u64, author: Value, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": TEXT_CHANNEL_ID.to_string(),
        "guild_id": GUILD_ID.to_string(),
        "author": author,
        "content": content,
        "attachments": [],
    })
}

pub fn direct_message_create_payload(id: u64, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": DM_CHANNEL_ID.to_string(),
        "author": user_payload(BOB_ID, "bob", "0002"),
        "content": content,
        "attachments": [],
    })
}

pub fn message_update_payload(id: u64, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": TEXT_CHANNEL_ID.to_string(),
        "guild_id": GUILD_ID.to_string(),
        "content": content,
    })
}

pub fn message_delete_payload(id: u64, channel_id: u64, guild_id: Option<u64>) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": channel_id.to_string(),
        "guild_id": guild_id.map(|g| g.to_string()),
    })
}

pub fn message_delete_bulk_payload(ids: &[u64]) -> Value {
    json!({
        "ids": ids.iter().map(u64::to_string).collect::<Vec<_>>(),
        "channel_id": TEXT_CHANNEL_ID.to_string(),
        "guild_id": GUILD_ID.to_string(),
    })
}

pub fn channel_update_payload(name: &str, topic: &str) -> Value {
    json!({
        "id": TEXT_CHANNEL_ID.to_string(),
        "type": 0,
        "guild_id": GUILD_ID.to_string(),
        "name": name,
        "topic": topic,
        "nsfw": true,
        "rate_limit_per_user": 10,
        "parent_id": CATEGORY_ID.to_string(),
    })
}

pub fn member_add_payload(user: Value) -> Value {
    json!({"guild_id": GUILD_ID.to_string(), "user": user, "nick": null, "roles": []})
}

pub fn member_update_payload(user: Value, roles: &[u64]) -> Value {
    json!({
        "guild_id": GUILD_ID.to_string(),
        "user": user,
        "nick": null,
        "roles": roles.iter().map(u64::to_string).collect::<Vec<_>>(),
    })
}

pub fn member_remove_payload(user: Value) -> Value {
    json!({"guild_id": GUILD_ID.to_string(), "user": user})
}
