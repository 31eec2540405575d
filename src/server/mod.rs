//! Booking form server
//!
//! Serves the HTML booking form, sample test cases, the reference dataset
//! preview and a JSON prediction API. Artifacts are loaded once at start;
//! if they fail to load the server still runs with prediction disabled.

mod api;
mod error;
mod form;
mod handlers;
mod state;
mod views;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;
pub use views::escape_html;

use crate::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Start the server with the given configuration
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    let start_time = chrono::Utc::now();
    info!(
        model = %config.model_path.display(),
        encoder = %config.encoder_path.display(),
        started_at = %start_time.to_rfc3339(),
        "Loading artifacts"
    );

    let state = Arc::new(AppState::new(config.clone()));
    if let Some(reason) = state.service.disabled_reason() {
        warn!(reason = %reason, "Serving with prediction disabled");
    }

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!(
        host = %config.host,
        port = config.port,
        address = %addr,
        "Booking cancellation server starting"
    );
    info!(url = %format!("http://{}", addr), "Booking form available");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    // Graceful shutdown on ctrl+c
    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
