//! # chat-audit-gateway
//!
//! Binding layer between the chat gateway and the audit pipeline: a
//! receive-only session client, a snapshot cache that supplies before/after
//! state, and the translation of dispatches into `AuditEvent`s.

pub mod cache;
pub mod client;
pub mod error;
pub mod events;
pub mod handlers;
pub mod protocol;

pub use cache::SnapshotCache;
pub use client::{GatewayClient, SessionEnd};
pub use error::{GatewayError, GatewayResult};
pub use handlers::DispatchHandler;

use chat_audit_common::{AppConfig, AppError, AppResult};
use chat_audit_service::EventAdapter;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the audit logger until the gateway session ends or Ctrl+C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let repository = chat_audit_store::create_repository(&config.storage);
    info!(log_dir = %repository.layout().root().display(), "Record store ready");

    let adapter = EventAdapter::new(Arc::new(repository));
    let cache = Arc::new(SnapshotCache::new(config.cache.max_messages));
    let client = GatewayClient::new(config.gateway, cache, adapter);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    let end = client.run_until(shutdown).await.map_err(AppError::gateway)?;
    if end.is_fatal() {
        return Err(AppError::gateway(end));
    }

    info!(reason = %end, "Gateway session ended");
    Ok(())
}
