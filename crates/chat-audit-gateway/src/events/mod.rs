//! Dispatch events
//!
//! Event names and the wire shapes of the dispatches the binding layer reads.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    AttachmentPayload, ChannelPayload, GuildDeletePayload, GuildMemberRemovePayload,
    GuildPayload, GuildRoleDeletePayload, GuildRolePayload, MemberPayload,
    MessageDeleteBulkPayload, MessageDeletePayload, MessagePayload, MessageUpdatePayload,
    ReadyPayload, RolePayload, UnavailableGuild, UserPayload,
};
