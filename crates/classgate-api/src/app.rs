//! Application builder and server runner.

use std::future::{Future, IntoFuture};

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Serves the app until `shutdown` resolves, then drains in-flight requests
/// for at most the configured grace period.
pub async fn run_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    let server = &state.config.server;
    let addr = server.bind_addr();
    let grace = server.shutdown_grace();

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
    })?;
    info!(addr = %addr, web_root = %server.web_root, "ClassGate listening");

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let app = build_app(state);
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        let _ = drain_tx.send(());
    })
    .into_future();

    let drain_deadline = async move {
        if drain_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = serve => result.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "HTTP server error", e)
        }),
        _ = drain_deadline => {
            info!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed");
            Ok(())
        }
    }
}
