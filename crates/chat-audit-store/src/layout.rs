//! On-disk layout of log files

use chat_audit_core::LogIdentity;
use std::path::{Path, PathBuf};

/// Maps identities to file locations under a root directory
#[derive(Debug, Clone)]
pub struct LogLayout {
    root: PathBuf,
}

impl LogLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every log of one partition
    pub fn partition_dir(&self, identity: LogIdentity) -> PathBuf {
        self.root.join(identity.partition())
    }

    /// File a given identity is persisted to
    pub fn path_for(&self, identity: LogIdentity) -> PathBuf {
        self.partition_dir(identity)
            .join(format!("{}.json", identity.id()))
    }
}

/// Sibling path used while a new version of `path` is being written
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}
