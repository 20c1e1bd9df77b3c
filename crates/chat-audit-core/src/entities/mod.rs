//! Entities - typed snapshots of chat platform objects
//!
//! Snapshots are immutable copies of what the gateway reported at the time an
//! event was observed. The binding layer builds them; the event adapter reads
//! them without any dynamic field lookup.

mod channel;
mod guild;
mod member;
mod message;
mod user;

pub use channel::{Category, ChannelKind, ChannelSnapshot, Conversation, DirectChannel};
pub use guild::GuildSnapshot;
pub use member::MemberSnapshot;
pub use message::MessageSnapshot;
pub use user::UserSnapshot;

/// Base URL for user avatars, guild icons, and default avatars
pub const CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// Base URL for message jump links
pub const APP_BASE_URL: &str = "https://discord.com";
