//! Pod Tracker - A node-scoped cache of Kubernetes pod metadata
//!
//! Runs the tracker against the configured cluster and serves lookups over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pod_tracker::api::{create_router, AppState};
use pod_tracker::{Config, KubeClusterClient, Tracker};

/// Main entry point for the pod tracker.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the Kubernetes client (refuses to start on failure)
/// 4. Build the tracker (refuses to start on an invalid capacity)
/// 5. Start the background event subscriber
/// 6. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pod_tracker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pod Tracker");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, node={}, resync_interval={}s, untrack_policy={}, port={}",
        config.max_entries,
        config.node_name.as_deref().unwrap_or("<all>"),
        config.resync_interval,
        config.untrack_policy,
        config.server_port
    );

    let client = KubeClusterClient::from_kubeconfig(config.kubeconfig_path.as_deref())
        .await
        .context("failed to build Kubernetes client")?;

    let tracker = Tracker::with_options(Arc::new(client), config.tracker_options())
        .context("failed to build pod tracker")?;
    let tracker = Arc::new(tracker);

    // Runs until the process exits
    tracker.start_watching();

    let app = create_router(AppState::new(tracker));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
