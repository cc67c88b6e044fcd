//! CLI command definitions and dispatch.

pub mod config;
pub mod route;
pub mod serve;
pub mod session;

use clap::{Parser, Subcommand};

use classgate_core::config::AppConfig;
use classgate_core::error::AppError;

use crate::output::OutputFormat;

/// ClassGate: session lifecycle and route access control
#[derive(Debug, Parser)]
#[command(name = "classgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the gated web server
    Serve(serve::ServeArgs),
    /// Classify paths and evaluate gate decisions
    Route(route::RouteArgs),
    /// Inspect the client-side expiry countdown
    Session(session::SessionArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Route(args) => route::execute(args, &self.config, self.format),
            Commands::Session(args) => session::execute(args, &self.config, self.format),
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::from_file(config_path)
}
