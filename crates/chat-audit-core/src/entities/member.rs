//! Guild member snapshot

use serde::{Deserialize, Serialize};

use super::{GuildSnapshot, UserSnapshot};

/// A user's membership in a guild at the time an event was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub guild: GuildSnapshot,
    pub user: UserSnapshot,
    pub nickname: Option<String>,
    /// Role names, `@everyone` first, then by position
    pub roles: Vec<String>,
}

impl MemberSnapshot {
    pub fn new(guild: GuildSnapshot, user: UserSnapshot) -> Self {
        Self {
            guild,
            user,
            nickname: None,
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Display name used in records (the account tag, not the nickname)
    pub fn name(&self) -> String {
        self.user.tag()
    }

    pub fn avatar_url(&self) -> String {
        self.user.avatar_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Snowflake;

    #[test]
    fn test_member_name_ignores_nickname() {
        let mut member = MemberSnapshot::new(
            GuildSnapshot::new(Snowflake::new(1), "guild"),
            UserSnapshot::new(Snowflake::new(2), "carol", "0003"),
        );
        member.nickname = Some("Caz".to_string());
        assert_eq!(member.name(), "carol#0003");
    }
}
