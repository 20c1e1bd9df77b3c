//! JSON file implementation of LogRepository

use async_trait::async_trait;
use chat_audit_core::{Conversation, EventRecord, LogFile, LogRepository, StoreError, StoreResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::layout::{staging_path, LogLayout};
use crate::locks::IdentityLocks;

/// Log repository writing one JSON document per identity
#[derive(Debug)]
pub struct JsonLogRepository {
    layout: LogLayout,
    locks: IdentityLocks,
}

impl JsonLogRepository {
    pub fn new(layout: LogLayout) -> Self {
        Self {
            layout,
            locks: IdentityLocks::new(),
        }
    }

    pub fn layout(&self) -> &LogLayout {
        &self.layout
    }

    /// Load and validate an existing file
    fn decode(raw: &str, conversation: &Conversation, path: &Path) -> StoreResult<LogFile> {
        let log = LogFile::from_json(raw).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let expected = conversation.identity();
        let found = log.identity();
        if found != expected {
            return Err(StoreError::IdentityMismatch {
                path: path.to_path_buf(),
                expected,
                found,
            });
        }

        if !log.header().is_consistent() {
            return Err(StoreError::InconsistentHeader {
                path: path.to_path_buf(),
            });
        }

        Ok(log)
    }
}

#[async_trait]
impl LogRepository for JsonLogRepository {
    async fn resolve(&self, conversation: &Conversation) -> StoreResult<(LogFile, PathBuf)> {
        let identity = conversation.identity();
        let path = self.layout.path_for(identity);

        match fs::read_to_string(&path).await {
            Ok(raw) => {
                let log = Self::decode(&raw, conversation, &path)?;
                tracing::trace!(%identity, events = log.len(), "Log file loaded");
                Ok((log, path))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(%identity, path = %path.display(), "Creating new log file");
                Ok((LogFile::new(conversation), path))
            }
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    async fn persist(&self, log: &LogFile, location: &Path) -> StoreResult<()> {
        let json = log.to_json().map_err(StoreError::Encode)?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: location.to_path_buf(),
            source,
        };

        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Stage the full document, then swap it in so readers never observe
        // a truncated file
        let staged = staging_path(location);
        if let Err(source) = fs::write(&staged, json.as_bytes()).await {
            let _ = fs::remove_file(&staged).await;
            return Err(write_err(source));
        }
        fs::rename(&staged, location).await.map_err(write_err)?;

        Ok(())
    }

    async fn record(&self, conversation: &Conversation, record: EventRecord) -> StoreResult<usize> {
        let identity = conversation.identity();
        let record_type = record.record_type();

        let _guard = self.locks.acquire(identity).await;

        let (mut log, location) = self.resolve(conversation).await?;
        log.append(record);
        self.persist(&log, &location).await?;

        tracing::debug!(
            %identity,
            record_type = %record_type,
            events = log.len(),
            "Record appended"
        );

        Ok(log.len())
    }
}
