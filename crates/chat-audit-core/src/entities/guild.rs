//! Guild snapshot

use serde::{Deserialize, Serialize};

use super::CDN_BASE_URL;
use crate::value_objects::Snowflake;

/// Guild as seen by the binding layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub id: Snowflake,
    pub name: String,
    pub icon: Option<String>,
}

impl GuildSnapshot {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Absolute icon URL, or an empty string when the guild has no icon
    pub fn icon_url(&self) -> String {
        match &self.icon {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{CDN_BASE_URL}/icons/{}/{hash}.{ext}", self.id)
            }
            None => String::new(),
        }
    }
}
