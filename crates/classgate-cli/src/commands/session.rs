//! Client-side countdown inspection.

use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use classgate_client::watchdog::{WatchdogState, evaluate};
use classgate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show the watchdog state after given periods of inactivity
    Timeline {
        /// Inactive seconds to evaluate; defaults to the state boundaries
        #[arg(long = "at", value_name = "SECONDS")]
        at: Vec<u64>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct TimelineRow {
    inactive_seconds: u64,
    state: String,
    seconds_remaining: String,
}

/// Execute session commands
pub fn execute(args: &SessionArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let timeout = config.session.timeout();
    let lead = config.session.warning_lead();

    match &args.command {
        SessionCommand::Timeline { at } => {
            let points = if at.is_empty() {
                let t = timeout.as_secs();
                let w = lead.as_secs();
                vec![0, t - w - 1, t - w, t - 1, t]
            } else {
                at.clone()
            };

            let rows: Vec<TimelineRow> = points
                .into_iter()
                .map(|secs| {
                    let state = evaluate(Duration::from_secs(secs), timeout, lead);
                    let (name, remaining) = match state {
                        WatchdogState::Active => ("active", String::new()),
                        WatchdogState::Warning { seconds_remaining } => {
                            ("warning", seconds_remaining.to_string())
                        }
                        WatchdogState::Expired => ("expired", String::new()),
                    };
                    TimelineRow {
                        inactive_seconds: secs,
                        state: name.to_string(),
                        seconds_remaining: remaining,
                    }
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
