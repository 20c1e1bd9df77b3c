//! Audit logger entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-audit-gateway --bin chat-audit
//! ```
//!
//! Configuration is loaded from environment variables, `.env`, and the
//! legacy `settings.json`.

use chat_audit_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Tracing format follows APP_ENV when the configuration loads
    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        gateway = %config.gateway.url,
        log_dir = %config.storage.log_dir.display(),
        "Configuration loaded"
    );

    if let Err(e) = chat_audit_gateway::run(config).await {
        error!(code = e.error_code(), error = %e, "Audit logger stopped");
        std::process::exit(1);
    }
}
