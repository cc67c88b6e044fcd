//! Start the gated web server.

use std::sync::Arc;

use clap::Args;
use tracing::info;

use classgate_api::{AppState, run_server};
use classgate_auth::HttpAuthProvider;
use classgate_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the directory of built pages
    #[arg(long)]
    pub web_root: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(web_root) = &args.web_root {
        config.server.web_root = web_root.clone();
    }

    println!("Starting ClassGate server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Auth service: {}", config.auth_service.base_url);

    let provider = Arc::new(HttpAuthProvider::new(&config.auth_service)?);
    let state = AppState::new(config, provider);

    run_server(state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    })
    .await
}
