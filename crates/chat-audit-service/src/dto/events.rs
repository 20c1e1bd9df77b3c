//! Typed notifications from the chat client

use chat_audit_core::{
    ChannelSnapshot, LogIdentity, MemberSnapshot, MessageSnapshot, UserSnapshot,
};

/// One notification from the chat client, with before/after snapshots where
/// the event describes a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    MessageDeleted(MessageSnapshot),
    /// Messages in the order the platform reported them
    MessagesBulkDeleted(Vec<MessageSnapshot>),
    MessageEdited {
        before: MessageSnapshot,
        after: MessageSnapshot,
    },
    ChannelCreated(ChannelSnapshot),
    ChannelDeleted(ChannelSnapshot),
    ChannelUpdated {
        before: ChannelSnapshot,
        after: ChannelSnapshot,
    },
    MemberJoined(MemberSnapshot),
    MemberLeft(MemberSnapshot),
    MemberUpdated {
        before: MemberSnapshot,
        after: MemberSnapshot,
    },
    /// Profile change of a user; `memberships` are the guilds the user is
    /// known to be in
    UserUpdated {
        before: UserSnapshot,
        after: UserSnapshot,
        memberships: Vec<MemberSnapshot>,
    },
}

impl AuditEvent {
    /// Listener-style name, for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MessageDeleted(_) => "message_delete",
            Self::MessagesBulkDeleted(_) => "bulk_message_delete",
            Self::MessageEdited { .. } => "message_edit",
            Self::ChannelCreated(_) => "guild_channel_create",
            Self::ChannelDeleted(_) => "guild_channel_delete",
            Self::ChannelUpdated { .. } => "guild_channel_update",
            Self::MemberJoined(_) => "member_join",
            Self::MemberLeft(_) => "member_remove",
            Self::MemberUpdated { .. } => "member_update",
            Self::UserUpdated { .. } => "user_update",
        }
    }

    /// Log the event writes to first, `None` if it writes nothing
    pub fn log_identity(&self) -> Option<LogIdentity> {
        match self {
            Self::MessageDeleted(message) | Self::MessageEdited { before: message, .. } => {
                Some(message.conversation.identity())
            }
            Self::MessagesBulkDeleted(messages) => {
                messages.first().map(|m| m.conversation.identity())
            }
            Self::ChannelCreated(channel)
            | Self::ChannelDeleted(channel)
            | Self::ChannelUpdated { before: channel, .. } => {
                Some(LogIdentity::Guild(channel.guild.id))
            }
            Self::MemberJoined(member)
            | Self::MemberLeft(member)
            | Self::MemberUpdated { before: member, .. } => Some(LogIdentity::Guild(member.guild.id)),
            Self::UserUpdated { memberships, .. } => memberships
                .first()
                .map(|m| LogIdentity::Guild(m.guild.id)),
        }
    }

    /// Split into events that each write to exactly one log
    ///
    /// A user update becomes one event per membership and a bulk delete one
    /// event per run of messages sharing a log. Order is kept within every
    /// log. Events that write nothing split into nothing.
    pub fn split_by_log(self) -> Vec<(LogIdentity, Self)> {
        match self {
            Self::MessagesBulkDeleted(messages) => {
                let mut runs: Vec<(LogIdentity, Vec<MessageSnapshot>)> = Vec::new();
                for message in messages {
                    let identity = message.conversation.identity();
                    match runs.last_mut() {
                        Some((last, run)) if *last == identity => run.push(message),
                        _ => runs.push((identity, vec![message])),
                    }
                }
                runs.into_iter()
                    .map(|(identity, run)| (identity, Self::MessagesBulkDeleted(run)))
                    .collect()
            }
            Self::UserUpdated {
                before,
                after,
                memberships,
            } => memberships
                .into_iter()
                .map(|membership| {
                    let identity = LogIdentity::Guild(membership.guild.id);
                    let event = Self::UserUpdated {
                        before: before.clone(),
                        after: after.clone(),
                        memberships: vec![membership],
                    };
                    (identity, event)
                })
                .collect(),
            other => other
                .log_identity()
                .map(|identity| (identity, other))
                .into_iter()
                .collect(),
        }
    }
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
