//! HTTP server facade: router plumbing, error responses, and a listener
//! with graceful shutdown.

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::sync::oneshot;

use bookshelf_kernel::ServerSettings;

pub mod error;
pub mod router;

pub use error::HttpError;
pub use router::RouterBuilder;

/// Bind the listen address and serve the router until SIGINT/SIGTERM.
///
/// After the signal, in-flight requests are allowed to drain, bounded by
/// the configured grace period.
pub async fn serve(app: Router, settings: &ServerSettings) -> anyhow::Result<()> {
    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(addr = %addr, "server has started");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .into_future(),
    );

    wait_for_termination().await;
    tracing::info!("shutdown signal received, draining in-flight requests");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(
        Duration::from_millis(settings.shutdown_grace_ms),
        server,
    )
    .await
    {
        Ok(joined) => joined
            .context("server task panicked")?
            .context("http server failed")?,
        Err(_) => {
            tracing::warn!("shutdown grace period expired with requests still in flight");
        }
    }

    Ok(())
}

/// Block until the process receives SIGINT or SIGTERM.
async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::error!(error = %error, "failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
