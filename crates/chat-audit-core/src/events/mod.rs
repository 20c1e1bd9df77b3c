//! Event records written to log files

mod event_record;

pub use event_record::{
    ChannelRecord, ChannelUpdateRecord, EventRecord, LegacyMemberChangeRecord, LegacyMemberLabel,
    LegacyMemberRecord, MemberRecord, MemberUpdateRecord, MessageDeleteRecord, MessageEditRecord,
    RecordKind, RecordType,
};
