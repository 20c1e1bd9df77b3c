//! Log identity - the partition key selecting a log file

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Partition key of a log file
///
/// Guild logs and direct-message logs live in disjoint partitions, so a guild
/// and a user that happen to share a numeric id never share a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "partition", content = "id", rename_all = "snake_case")]
pub enum LogIdentity {
    /// Keyed by guild id
    Guild(Snowflake),
    /// Keyed by the recipient's user id
    Direct(Snowflake),
}

impl LogIdentity {
    /// Directory name of the partition
    #[must_use]
    pub const fn partition(&self) -> &'static str {
        match self {
            Self::Guild(_) => "guild",
            Self::Direct(_) => "dm",
        }
    }

    #[must_use]
    pub const fn id(&self) -> Snowflake {
        match self {
            Self::Guild(id) | Self::Direct(id) => *id,
        }
    }

    #[must_use]
    pub const fn is_guild(&self) -> bool {
        matches!(self, Self::Guild(_))
    }
}

impl fmt::Display for LogIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition(), self.id())
    }
}
