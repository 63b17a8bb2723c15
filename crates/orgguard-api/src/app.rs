//! Application builder: wires router, layers and state into an Axum app.

use std::future::IntoFuture;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use orgguard_core::config::{CorsConfig, ServerConfig};
use orgguard_core::error::AppError;
use orgguard_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Serve until a shutdown signal arrives, then drain for at most the grace period.
pub async fn serve(state: AppState, config: &ServerConfig) -> AppResult<()> {
    let app = build_app(state, &config.cors);
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            orgguard_core::ErrorKind::Internal,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;

    info!(%addr, "OrgGuard listening");

    let grace = Duration::from_secs(config.shutdown_grace_seconds);
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result.map_err(|e| {
            AppError::with_source(orgguard_core::ErrorKind::Internal, "Server error", e)
        })?,
        () = deadline => warn!(
            grace_seconds = config.shutdown_grace_seconds,
            "Shutdown grace period elapsed; closing remaining connections"
        ),
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
