//! # Bookstore API Server
//!
//! Binary entry point: logging, configuration, stores, background report,
//! HTTP server with graceful shutdown.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookstore_api::services::ReportScheduler;
use bookstore_api::{router, ApiConfig, AppState};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,bookstore_api=debug,bookstore_store=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Bookstore API server...");

    // Load configuration
    let config = ApiConfig::load().context("failed to load configuration")?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        request_timeout_secs = config.request_timeout_secs,
        report_window_hours = config.report_window_hours,
        "Configuration loaded"
    );

    // Create shared state
    let state = AppState::new(config.clone());

    // Background sales report
    let scheduler = ReportScheduler::new(
        state.sales.clone(),
        config.report_interval(),
        config.request_timeout(),
    )
    .start();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    scheduler.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
