//! User snapshot - the public profile of a chat user

use serde::{Deserialize, Serialize};

use super::CDN_BASE_URL;
use crate::value_objects::Snowflake;

/// Public profile of a user at the time an event was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
}

impl UserSnapshot {
    /// Create a snapshot without an avatar
    pub fn new(id: Snowflake, username: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: discriminator.into(),
            avatar: None,
        }
    }

    /// Set the avatar hash
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Display tag: `username#discriminator`, or the bare username for
    /// accounts migrated off discriminators (discriminator `0`)
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }

    /// Absolute avatar URL, falling back to the default avatar
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{CDN_BASE_URL}/avatars/{}/{hash}.{ext}", self.id)
            }
            None => format!(
                "{CDN_BASE_URL}/embed/avatars/{}.png",
                self.default_avatar_index()
            ),
        }
    }

    /// Default avatar index: discriminator mod 5 for legacy accounts,
    /// `(id >> 22) mod 6` for migrated accounts
    fn default_avatar_index(&self) -> u64 {
        match self.discriminator.parse::<u64>() {
            Ok(0) | Err(_) => (self.id.into_inner() >> 22) % 6,
            Ok(discriminator) => discriminator % 5,
        }
    }
}
