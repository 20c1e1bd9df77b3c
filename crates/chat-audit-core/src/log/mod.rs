//! Log files - one per conversation identity

mod identity;
mod log_file;

pub use identity::LogIdentity;
pub use log_file::{DirectHeader, GuildHeader, LogFile, LogHeader};

