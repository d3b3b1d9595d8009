//! Server startup and graceful shutdown

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tally_core::Config;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Interrupt,
    Terminate,
}

/// Bind, serve until Ctrl+C or SIGTERM, then report what is being dropped.
///
/// Receipts live in process memory, so the shutdown line records how many
/// extractions are lost with this process.
pub async fn start_server(config: &Config, state: Arc<AppState>, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_file_mb = config.max_file_size_bytes() / 1024 / 1024,
        uploads_url_prefix = %config.uploads_url_prefix(),
        samples_dir = %config.samples_dir().display(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let reason = first_signal(interrupt(), terminate()).await;
            tracing::info!(reason = ?reason, "Shutting down gracefully");
        })
        .await?;

    match state.extraction.list_all().await {
        Ok(receipts) => {
            tracing::info!(receipts_discarded = receipts.len(), "Server stopped");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Server stopped; receipt count unavailable");
        }
    }

    Ok(())
}

async fn first_signal<I, T>(interrupt: I, terminate: T) -> ShutdownReason
where
    I: Future<Output = ()>,
    T: Future<Output = ()>,
{
    tokio::select! {
        _ = interrupt => ShutdownReason::Interrupt,
        _ = terminate => ShutdownReason::Terminate,
    }
}

// A handler that cannot be installed never fires; the other signal still stops the server.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
