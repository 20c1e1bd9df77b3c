//! Log file model - a header followed by an ordered list of event records
//!
//! Guild file:
//!
//! ```json
//! { "guild_name": "...", "guild_id": 1, "guild_icon": "...", "is_guild": true, "events": [] }
//! ```
//!
//! Direct-message file:
//!
//! ```json
//! { "DM_name": "...", "DM_id": 2, "DM_user_id": 3, "DM_icon": "...", "is_guild": false, "events": [] }
//! ```

use serde::{Deserialize, Serialize};

use super::LogIdentity;
use crate::entities::{Conversation, DirectChannel, GuildSnapshot};
use crate::events::EventRecord;
use crate::value_objects::Snowflake;

/// Header of a guild log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildHeader {
    /// Older files spell this key `guid_name`
    #[serde(alias = "guid_name")]
    pub guild_name: String,
    pub guild_id: Snowflake,
    pub guild_icon: String,
    pub is_guild: bool,
}

/// Header of a direct-message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectHeader {
    #[serde(rename = "DM_name")]
    pub name: String,
    #[serde(rename = "DM_id")]
    pub channel_id: Snowflake,
    #[serde(rename = "DM_user_id")]
    pub user_id: Snowflake,
    #[serde(rename = "DM_icon")]
    pub icon: String,
    pub is_guild: bool,
}

/// Log file header, fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogHeader {
    Guild(GuildHeader),
    Direct(DirectHeader),
}

impl LogHeader {
    /// Header for a guild seen for the first time
    pub fn for_guild(guild: &GuildSnapshot) -> Self {
        Self::Guild(GuildHeader {
            guild_name: guild.name.clone(),
            guild_id: guild.id,
            guild_icon: guild.icon_url(),
            is_guild: true,
        })
    }

    /// Header for a direct-message channel seen for the first time
    pub fn for_direct(dm: &DirectChannel) -> Self {
        Self::Direct(DirectHeader {
            name: dm.label(),
            channel_id: dm.id,
            user_id: dm.recipient.id,
            icon: dm.recipient.avatar_url(),
            is_guild: false,
        })
    }

    pub fn for_conversation(conversation: &Conversation) -> Self {
        match conversation {
            Conversation::Guild(guild) => Self::for_guild(guild),
            Conversation::Direct(dm) => Self::for_direct(dm),
        }
    }

    /// Identity this header was created for
    pub fn identity(&self) -> LogIdentity {
        match self {
            Self::Guild(header) => LogIdentity::Guild(header.guild_id),
            Self::Direct(header) => LogIdentity::Direct(header.user_id),
        }
    }

    /// Check the stored `is_guild` flag agrees with the header shape
    pub fn is_consistent(&self) -> bool {
        match self {
            Self::Guild(header) => header.is_guild,
            Self::Direct(header) => !header.is_guild,
        }
    }
}

/// A per-identity log: header plus records in the order they were appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    #[serde(flatten)]
    header: LogHeader,
    events: Vec<EventRecord>,
}

impl LogFile {
    /// Empty log for a conversation that has no file yet
    pub fn new(conversation: &Conversation) -> Self {
        Self {
            header: LogHeader::for_conversation(conversation),
            events: Vec::new(),
        }
    }

    pub fn header(&self) -> &LogHeader {
        &self.header
    }

    pub fn identity(&self) -> LogIdentity {
        self.header.identity()
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Add a record to the end of the body
    ///
    /// In-memory only; nothing reaches the backing store until the file is
    /// persisted.
    pub fn append(&mut self, record: EventRecord) {
        self.events.push(record);
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
