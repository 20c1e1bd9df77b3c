//! # chat-audit-store
//!
//! Record store backed by one pretty-printed JSON file per conversation.
//!
//! Layout:
//! - `<root>/guild/<guild_id>.json`
//! - `<root>/dm/<recipient_id>.json`

pub mod layout;
pub mod locks;
pub mod repositories;

pub use layout::LogLayout;
pub use locks::{IdentityGuard, IdentityLocks};
pub use repositories::JsonLogRepository;

use chat_audit_common::StorageConfig;

/// Build the repository described by the storage configuration
pub fn create_repository(config: &StorageConfig) -> JsonLogRepository {
    JsonLogRepository::new(LogLayout::new(&config.log_dir))
}
