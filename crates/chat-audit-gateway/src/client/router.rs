//! Per-log event queues
//!
//! Events for the same log are written by one worker in arrival order.
//! Different logs are written concurrently.

use chat_audit_core::LogIdentity;
use chat_audit_service::{AuditEvent, EventAdapter};
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

/// Routes audit events to one worker per log identity
///
/// Workers live for the rest of the session, so there is at most one per
/// conversation seen.
pub(crate) struct EventRouter {
    adapter: EventAdapter,
    queues: HashMap<LogIdentity, UnboundedSender<AuditEvent>>,
    workers: JoinSet<()>,
}

impl EventRouter {
    pub(crate) fn new(adapter: EventAdapter) -> Self {
        Self {
            adapter,
            queues: HashMap::new(),
            workers: JoinSet::new(),
        }
    }

    /// Queue an event behind everything already queued for its log
    pub(crate) fn route(&mut self, event: AuditEvent) {
        let name = event.name();
        let parts = event.split_by_log();
        if parts.is_empty() {
            debug!(event = name, "Event has no log to write");
            return;
        }

        for (identity, part) in parts {
            let queue = self
                .queues
                .entry(identity)
                .or_insert_with(|| spawn_worker(&mut self.workers, &self.adapter, identity));

            // A closed queue means its worker panicked; start over with a fresh one
            if let Err(mpsc::error::SendError(part)) = queue.send(part) {
                warn!(%identity, "Log worker gone, starting a new one");
                let fresh = spawn_worker(&mut self.workers, &self.adapter, identity);
                if fresh.send(part).is_err() {
                    error!(%identity, event = name, "Event not queued");
                }
                *queue = fresh;
            }
        }
    }

    pub(crate) fn has_workers(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Wait for a worker to stop; only happens when one panics mid-session
    pub(crate) async fn join_next(&mut self) -> Option<Result<(), JoinError>> {
        self.workers.join_next().await
    }

    /// Close every queue and wait for the workers to write what is queued
    pub(crate) async fn finish(mut self) {
        self.queues.clear();
        if !self.workers.is_empty() {
            debug!(workers = self.workers.len(), "Waiting for queued events");
        }
        while let Some(joined) = self.workers.join_next().await {
            log_join(joined);
        }
    }
}

fn spawn_worker(
    workers: &mut JoinSet<()>,
    adapter: &EventAdapter,
    identity: LogIdentity,
) -> UnboundedSender<AuditEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    workers.spawn(drain(adapter.clone(), identity, rx));
    tx
}

async fn drain(adapter: EventAdapter, identity: LogIdentity, mut queue: UnboundedReceiver<AuditEvent>) {
    while let Some(event) = queue.recv().await {
        let name = event.name();
        match adapter.handle(event).await {
            Ok(records) => debug!(%identity, event = name, records, "Event recorded"),
            Err(e) if e.is_fault() => {
                warn!(%identity, event = name, code = e.code(), error = %e, "Event skipped");
            }
            Err(e) => error!(%identity, event = name, code = e.code(), error = %e, "Event not recorded"),
        }
    }
}

pub(crate) fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Log worker failed");
    }
}
