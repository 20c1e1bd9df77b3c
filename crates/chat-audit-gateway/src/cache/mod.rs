//! Snapshot cache
//!
//! Remembers what the gateway last reported about guilds, channels, users,
//! memberships, and recent messages, so that change and delete events can be
//! reported with the state from before the change.

mod messages;
mod snapshot;

pub use messages::MessageCache;
pub use snapshot::SnapshotCache;
