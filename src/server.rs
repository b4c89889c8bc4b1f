use std::net::SocketAddr;

use axum::Router;
use tokio::signal;
use tracing::info;

use crate::error::ServerError;

/// Serves `app` on `bind_addr` until SIGINT or SIGTERM arrives.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve(app: Router, bind_addr: SocketAddr) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: bind_addr.to_string(),
            source,
        })?;
    info!("listening on {}", listener.local_addr()?);
    info!("  - POST /articles      (submit article)");
    info!("  - GET  /articles      (list articles)");
    info!("  - GET  /health/ready  (readiness)");
    info!("  - GET  /metrics       (prometheus)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("received SIGTERM, initiating graceful shutdown"),
    }
}
