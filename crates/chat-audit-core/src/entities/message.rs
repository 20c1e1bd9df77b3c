//! Message snapshot

use serde::{Deserialize, Serialize};

use super::{Conversation, UserSnapshot, APP_BASE_URL};
use crate::value_objects::Snowflake;

/// Message content at the time an event was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub conversation: Conversation,
    pub author: UserSnapshot,
    pub content: String,
    /// Attachment URLs in upload order
    pub attachments: Vec<String>,
}

impl MessageSnapshot {
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        conversation: Conversation,
        author: UserSnapshot,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            conversation,
            author,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Link that opens the message in a client
    pub fn jump_url(&self) -> String {
        format!(
            "{APP_BASE_URL}/channels/{}/{}/{}",
            self.conversation.jump_scope(),
            self.channel_id,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DirectChannel, GuildSnapshot};

    fn author() -> UserSnapshot {
        UserSnapshot::new(Snowflake::new(3), "alice", "0001")
    }

    #[test]
    fn test_guild_jump_url() {
        let guild = GuildSnapshot::new(Snowflake::new(1), "guild");
        let msg = MessageSnapshot::new(Snowflake::new(30), Snowflake::new(2), guild.into(), author(), "hi");
        assert_eq!(msg.jump_url(), "https://discord.com/channels/1/2/30");
    }

    #[test]
    fn test_direct_jump_url() {
        let dm = DirectChannel::new(Snowflake::new(2), author());
        let msg = MessageSnapshot::new(Snowflake::new(30), Snowflake::new(2), dm.into(), author(), "hi");
        assert_eq!(msg.jump_url(), "https://discord.com/channels/@me/2/30");
    }
}
