//! HTTP surface for the telemetry service.
//!
//! Two routes: `GET /` runs a collection pass and returns the snapshot as
//! JSON, `GET /healthcheck` returns `true`.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{Result, SystemError};
use crate::metrics::MetricsProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Start the web server with the provided configuration and metrics provider.
pub async fn start_web_server<P: MetricsProvider>(config: WebConfig, provider: P) -> Result<()> {
    let app = create_app(&config, Arc::new(provider));

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SystemError::config_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SystemError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Server running on http://{}", addr);
    info!("Snapshot endpoint: http://{}/", addr);
    info!("Health check: http://{}/healthcheck", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| SystemError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
