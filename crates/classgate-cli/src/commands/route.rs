//! Route classification and gate decision commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use classgate_auth::gate::decide;
use classgate_auth::{Decision, Redirects, RouteTable};
use classgate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Classify request paths against the configured route tables
    Classify {
        /// Paths to classify (query strings allowed)
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show what the gate does with a path for a given session state
    Decide {
        /// Requested path and query
        path: String,
        /// Session state reported by the auth service
        #[arg(short, long, value_enum, default_value = "absent")]
        session: SessionCase,
    },
}

/// Session state to evaluate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionCase {
    /// A live session
    Present,
    /// No session, or the auth service rejected the token
    Absent,
    /// The auth service errored or timed out
    Failing,
}

#[derive(Debug, Serialize, Tabled)]
struct ClassifyRow {
    path: String,
    class: String,
}

#[derive(Debug, Serialize, Tabled)]
struct DecisionRow {
    path: String,
    class: String,
    session: String,
    action: String,
    location: String,
}

/// Execute route commands
pub fn execute(args: &RouteArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let table = RouteTable::from_config(&config.routes);

    match &args.command {
        RouteCommand::Classify { paths } => {
            let rows: Vec<ClassifyRow> = paths
                .iter()
                .map(|path| ClassifyRow {
                    path: path.clone(),
                    class: describe_class(&table, path),
                })
                .collect();
            output::print_list(&rows, format);
        }
        RouteCommand::Decide { path, session } => {
            let redirects = Redirects::from_config(&config.routes);
            let decision = match (table.resolve(path), session) {
                (None, _) => Decision::Continue,
                (Some(_), SessionCase::Failing) => Decision::SIGN_IN,
                (Some(class), SessionCase::Present) => decide(class, true),
                (Some(class), SessionCase::Absent) => decide(class, false),
            };
            let row = DecisionRow {
                path: path.clone(),
                class: describe_class(&table, path),
                session: format!("{session:?}").to_lowercase(),
                action: if decision.is_continue() {
                    "continue".to_string()
                } else {
                    "redirect".to_string()
                },
                location: redirects.location(decision, path).unwrap_or_default(),
            };
            output::print_list(&[row], format);
        }
    }

    Ok(())
}

fn describe_class(table: &RouteTable, path: &str) -> String {
    table
        .resolve(path)
        .map(|class| class.to_string())
        .unwrap_or_else(|| "excluded".to_string())
}
