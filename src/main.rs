//! ClassGate Server: session lifecycle and route access control
//!
//! Main entry point that wires configuration, logging, the auth service
//! client and the HTTP app together.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use classgate_api::{AppState, run_server};
use classgate_auth::HttpAuthProvider;
use classgate_core::config::{AppConfig, LogFormat};
use classgate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file, or from `config/default` plus
/// the `CLASSGATE_ENV` overlay.
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("CLASSGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => {
            let env = std::env::var("CLASSGATE_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout_secs = config.session.timeout_seconds,
        warning_lead_secs = config.session.warning_lead_seconds,
        "Starting ClassGate"
    );

    let provider = Arc::new(HttpAuthProvider::new(&config.auth_service)?);
    tracing::info!(base_url = %config.auth_service.base_url, "Auth service client ready");

    let state = AppState::new(config, provider);
    run_server(state, shutdown_signal()).await?;

    tracing::info!("ClassGate shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
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
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
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
    tracing::info!("Shutdown signal received, draining connections");
}
