//! Channel snapshots - guild channels, categories, and direct-message channels

use serde::{Deserialize, Serialize};

use super::{GuildSnapshot, UserSnapshot};
use crate::log::LogIdentity;
use crate::value_objects::Snowflake;

/// Channel type, named the way audit records spell it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    Private,
    Voice,
    Group,
    Category,
    News,
    NewsThread,
    PublicThread,
    PrivateThread,
    StageVoice,
    Directory,
    Forum,
    Media,
    Unknown,
}

impl ChannelKind {
    /// Name written into the `channel_type` field of records
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Private => "private",
            Self::Voice => "voice",
            Self::Group => "group",
            Self::Category => "category",
            Self::News => "news",
            Self::NewsThread => "news_thread",
            Self::PublicThread => "public_thread",
            Self::PrivateThread => "private_thread",
            Self::StageVoice => "stage_voice",
            Self::Directory => "directory",
            Self::Forum => "forum",
            Self::Media => "media",
            Self::Unknown => "unknown",
        }
    }
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Text,
            1 => Self::Private,
            2 => Self::Voice,
            3 => Self::Group,
            4 => Self::Category,
            5 => Self::News,
            10 => Self::NewsThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::StageVoice,
            14 => Self::Directory,
            15 => Self::Forum,
            16 => Self::Media,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category a guild channel is filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Snowflake,
    pub name: String,
}

/// Guild channel state at the time an event was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub id: Snowflake,
    pub guild: GuildSnapshot,
    pub kind: ChannelKind,
    pub name: String,
    pub category: Option<Category>,
    pub nsfw: bool,
    pub topic: Option<String>,
    /// Slowmode delay in seconds
    pub slowmode_delay: u32,
}

impl ChannelSnapshot {
    pub fn new(id: Snowflake, guild: GuildSnapshot, kind: ChannelKind, name: impl Into<String>) -> Self {
        Self {
            id,
            guild,
            kind,
            name: name.into(),
            category: None,
            nsfw: false,
            topic: None,
            slowmode_delay: 0,
        }
    }

    #[must_use]
    pub fn with_category(mut self, id: Snowflake, name: impl Into<String>) -> Self {
        self.category = Some(Category {
            id,
            name: name.into(),
        });
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// One-to-one direct-message channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectChannel {
    pub id: Snowflake,
    /// The other participant
    pub recipient: UserSnapshot,
}

impl DirectChannel {
    pub fn new(id: Snowflake, recipient: UserSnapshot) -> Self {
        Self { id, recipient }
    }

    /// Human-readable channel label
    pub fn label(&self) -> String {
        format!("Direct Message with {}", self.recipient.tag())
    }
}

/// The conversation an event belongs to; selects the log file it is written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conversation {
    Guild(GuildSnapshot),
    Direct(DirectChannel),
}

impl Conversation {
    /// Partition key of the log file for this conversation
    ///
    /// Guilds are keyed by guild id, direct messages by the recipient's id.
    pub fn identity(&self) -> LogIdentity {
        match self {
            Self::Guild(guild) => LogIdentity::Guild(guild.id),
            Self::Direct(dm) => LogIdentity::Direct(dm.recipient.id),
        }
    }

    /// Guild id for jump links (`@me` for direct messages)
    pub fn jump_scope(&self) -> String {
        match self {
            Self::Guild(guild) => guild.id.to_string(),
            Self::Direct(_) => "@me".to_string(),
        }
    }
}

impl From<GuildSnapshot> for Conversation {
    fn from(guild: GuildSnapshot) -> Self {
        Self::Guild(guild)
    }
}

impl From<DirectChannel> for Conversation {
    fn from(dm: DirectChannel) -> Self {
        Self::Direct(dm)
    }
}
