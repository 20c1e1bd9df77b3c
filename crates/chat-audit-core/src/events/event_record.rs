//! Event records - the immutable entries of a log file
//!
//! Serialized shape:
//!
//! ```json
//! { "timestamp": 1700000000, "type": "Message Delete", "author": "alice#0001", ... }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// One timestamped, tagged log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unix time (seconds) at which the event was observed
    pub timestamp: i64,
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl EventRecord {
    /// Create a record stamped with the current time
    pub fn now(kind: RecordKind) -> Self {
        Self::at(Utc::now().timestamp(), kind)
    }

    /// Create a record with an explicit timestamp
    pub fn at(timestamp: i64, kind: RecordKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn record_type(&self) -> RecordType {
        self.kind.record_type()
    }
}

/// Kind-specific record fields, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecordKind {
    #[serde(rename = "Message Delete")]
    MessageDelete(MessageDeleteRecord),
    #[serde(rename = "Message Edit")]
    MessageEdit(MessageEditRecord),
    #[serde(rename = "Channel Create")]
    ChannelCreate(ChannelRecord),
    #[serde(rename = "Channel Delete")]
    ChannelDelete(ChannelRecord),
    #[serde(rename = "Channel Update")]
    ChannelUpdate(ChannelUpdateRecord),
    #[serde(rename = "Member Join")]
    MemberJoin(MemberRecord),
    #[serde(rename = "Member Remove")]
    MemberRemove(MemberRecord),
    #[serde(rename = "Member Update")]
    MemberUpdate(MemberUpdateRecord),
    /// Member change written by older loggers, labelled "Member Join" and
    /// without a user id
    #[serde(untagged)]
    LegacyMemberChange(LegacyMemberChangeRecord),
    /// Member join or removal written by older loggers, without a user id
    #[serde(untagged)]
    LegacyMember(LegacyMemberRecord),
}

impl RecordKind {
    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::MessageDelete(_) => RecordType::MessageDelete,
            Self::MessageEdit(_) => RecordType::MessageEdit,
            Self::ChannelCreate(_) => RecordType::ChannelCreate,
            Self::ChannelDelete(_) => RecordType::ChannelDelete,
            Self::ChannelUpdate(_) => RecordType::ChannelUpdate,
            Self::MemberJoin(_) => RecordType::MemberJoin,
            Self::MemberRemove(_) => RecordType::MemberRemove,
            Self::MemberUpdate(_) => RecordType::MemberUpdate,
            Self::LegacyMemberChange(_) | Self::LegacyMember(_) => RecordType::MemberJoin,
        }
    }
}

/// Record type labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    MessageDelete,
    MessageEdit,
    ChannelCreate,
    ChannelDelete,
    ChannelUpdate,
    MemberJoin,
    MemberRemove,
    MemberUpdate,
}

impl RecordType {
    /// Label written into the `type` field
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MessageDelete => "Message Delete",
            Self::MessageEdit => "Message Edit",
            Self::ChannelCreate => "Channel Create",
            Self::ChannelDelete => "Channel Delete",
            Self::ChannelUpdate => "Channel Update",
            Self::MemberJoin => "Member Join",
            Self::MemberRemove => "Member Remove",
            Self::MemberUpdate => "Member Update",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Message records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeleteRecord {
    pub author: String,
    pub author_id: Snowflake,
    pub author_icon: String,
    pub content: String,
    pub attachments: Vec<String>,
    pub jump_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEditRecord {
    pub author: String,
    pub author_id: Snowflake,
    pub author_icon: String,
    pub before_content: String,
    pub before_attachments: Vec<String>,
    pub after_content: String,
    pub after_attachments: Vec<String>,
    pub jump_url: String,
}

// =============================================================================
// Channel records
// =============================================================================

/// Channel create/delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_id: Snowflake,
    pub channel_type: String,
    pub channel_name: String,
    /// `null` for uncategorized channels
    pub category_name: Option<String>,
    pub category_id: Option<Snowflake>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUpdateRecord {
    pub channel_id: Snowflake,
    pub channel_type: String,
    pub before_channel_name: String,
    pub after_channel_name: String,
    pub before_nsfw: bool,
    pub after_nsfw: bool,
    pub before_topic: Option<String>,
    pub after_topic: Option<String>,
    pub before_slowmode_delay: u32,
    pub after_slowmode_delay: u32,
    pub category_name: Option<String>,
    pub category_id: Option<Snowflake>,
}

// =============================================================================
// Member records
// =============================================================================

/// Member join/remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub user_id: Snowflake,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdateRecord {
    pub user_id: Snowflake,
    pub before_avatar_url: String,
    pub after_avatar_url: String,
    pub before_name: String,
    pub after_name: String,
    pub before_roles: Vec<String>,
    pub after_roles: Vec<String>,
}

// =============================================================================
// Legacy member records
//
// Older logs label every member record "Member Join". They are kept verbatim
// so a rewrite of the file does not lose them.
// =============================================================================

/// The only label older loggers wrote on member records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyMemberLabel {
    #[serde(rename = "Member Join")]
    MemberJoin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMemberRecord {
    #[serde(rename = "type")]
    pub label: LegacyMemberLabel,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMemberChangeRecord {
    #[serde(rename = "type")]
    pub label: LegacyMemberLabel,
    pub before_avatar_url: String,
    pub after_avatar_url: String,
    pub before_name: String,
    pub after_name: String,
    pub before_roles: Vec<String>,
    pub after_roles: Vec<String>,
}
