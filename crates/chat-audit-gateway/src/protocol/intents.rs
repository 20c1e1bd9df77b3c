//! Gateway intents

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Event groups the session subscribes to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        /// Guild and channel lifecycle, roles
        const GUILDS          = 1 << 0;
        /// Member join, leave, and update (privileged)
        const GUILD_MEMBERS   = 1 << 1;
        /// Messages in guild channels
        const GUILD_MESSAGES  = 1 << 9;
        /// Messages in direct-message channels
        const DIRECT_MESSAGES = 1 << 12;
        /// Message content and attachments (privileged)
        const MESSAGE_CONTENT = 1 << 15;

        /// Everything the audit log listens to
        const AUDIT = Self::GUILDS.bits()
            | Self::GUILD_MEMBERS.bits()
            | Self::GUILD_MESSAGES.bits()
            | Self::DIRECT_MESSAGES.bits()
            | Self::MESSAGE_CONTENT.bits();
    }
}

impl Default for Intents {
    fn default() -> Self {
        Self::AUDIT
    }
}

// Sent as a plain integer in Identify
impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}
