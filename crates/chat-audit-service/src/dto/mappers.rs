//! Snapshot to record mappers
//!
//! One function per record shape. All of them are pure; timestamps are added
//! by the caller.

use chat_audit_core::events::{
    ChannelRecord, ChannelUpdateRecord, MemberRecord, MemberUpdateRecord, MessageDeleteRecord,
    MessageEditRecord,
};
use chat_audit_core::{ChannelSnapshot, MemberSnapshot, MessageSnapshot, UserSnapshot};

// ============================================================================
// Message Mappers
// ============================================================================

pub fn message_delete(message: &MessageSnapshot) -> MessageDeleteRecord {
    MessageDeleteRecord {
        author: message.author.tag(),
        author_id: message.author.id,
        author_icon: message.author.avatar_url(),
        content: message.content.clone(),
        attachments: message.attachments.clone(),
        jump_url: message.jump_url(),
    }
}

/// Author and link come from `before`
pub fn message_edit(before: &MessageSnapshot, after: &MessageSnapshot) -> MessageEditRecord {
    MessageEditRecord {
        author: before.author.tag(),
        author_id: before.author.id,
        author_icon: before.author.avatar_url(),
        before_content: before.content.clone(),
        before_attachments: before.attachments.clone(),
        after_content: after.content.clone(),
        after_attachments: after.attachments.clone(),
        jump_url: before.jump_url(),
    }
}

// ============================================================================
// Channel Mappers
// ============================================================================

pub fn channel(channel: &ChannelSnapshot) -> ChannelRecord {
    ChannelRecord {
        channel_id: channel.id,
        channel_type: channel.kind.as_str().to_string(),
        channel_name: channel.name.clone(),
        category_name: channel.category.as_ref().map(|c| c.name.clone()),
        category_id: channel.category.as_ref().map(|c| c.id),
    }
}

/// Identity, type, and category come from `before`
pub fn channel_update(before: &ChannelSnapshot, after: &ChannelSnapshot) -> ChannelUpdateRecord {
    ChannelUpdateRecord {
        channel_id: before.id,
        channel_type: before.kind.as_str().to_string(),
        before_channel_name: before.name.clone(),
        after_channel_name: after.name.clone(),
        before_nsfw: before.nsfw,
        after_nsfw: after.nsfw,
        before_topic: before.topic.clone(),
        after_topic: after.topic.clone(),
        before_slowmode_delay: before.slowmode_delay,
        after_slowmode_delay: after.slowmode_delay,
        category_name: before.category.as_ref().map(|c| c.name.clone()),
        category_id: before.category.as_ref().map(|c| c.id),
    }
}

// ============================================================================
// Member Mappers
// ============================================================================

pub fn member(member: &MemberSnapshot) -> MemberRecord {
    MemberRecord {
        user_id: member.user.id,
        name: member.name(),
        avatar_url: member.avatar_url(),
    }
}

pub fn member_update(before: &MemberSnapshot, after: &MemberSnapshot) -> MemberUpdateRecord {
    MemberUpdateRecord {
        user_id: before.user.id,
        before_avatar_url: before.avatar_url(),
        after_avatar_url: after.avatar_url(),
        before_name: before.name(),
        after_name: after.name(),
        before_roles: before.roles.clone(),
        after_roles: after.roles.clone(),
    }
}

/// Profile change seen through one guild membership; roles are unchanged
pub fn user_update(
    before: &UserSnapshot,
    after: &UserSnapshot,
    membership: &MemberSnapshot,
) -> MemberUpdateRecord {
    MemberUpdateRecord {
        user_id: before.id,
        before_avatar_url: before.avatar_url(),
        after_avatar_url: after.avatar_url(),
        before_name: before.tag(),
        after_name: after.tag(),
        before_roles: membership.roles.clone(),
        after_roles: membership.roles.clone(),
    }
}
