//! Expiry Watchdog: derives Active / Warning / Expired from the durable
//! activity timestamp.
//!
//! Nothing about the countdown is persisted. Each tick re-reads
//! `lastActivityAt`, so a reload or another tab's activity is reflected on
//! the next tick.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use classgate_core::config::SessionConfig;
use classgate_core::result::AppResult;

use crate::store::SessionStore;

/// Client-visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WatchdogState {
    Active,
    /// Expiry is near; the UI shows a countdown.
    Warning { seconds_remaining: u64 },
    /// Terminal.
    Expired,
}

impl WatchdogState {
    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        matches!(self, WatchdogState::Expired)
    }
}

/// Result of one watchdog tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    Changed(WatchdogState),
}

impl TickOutcome {
    /// Whether this tick is the one that expired the session.
    pub fn is_expiry(&self) -> bool {
        matches!(self, TickOutcome::Changed(WatchdogState::Expired))
    }
}

/// State for an elapsed inactivity period.
///
/// `elapsed >= timeout` is expired; within `warning_lead` of the timeout is a
/// warning whose remaining seconds are rounded up; anything earlier is active.
pub fn evaluate(elapsed: Duration, timeout: Duration, warning_lead: Duration) -> WatchdogState {
    if elapsed >= timeout {
        return WatchdogState::Expired;
    }
    let remaining = timeout - elapsed;
    if remaining <= warning_lead {
        let millis = remaining.as_millis();
        let seconds_remaining = millis.div_ceil(1000) as u64;
        WatchdogState::Warning { seconds_remaining }
    } else {
        WatchdogState::Active
    }
}

/// The countdown state machine for one signed-in client context.
#[derive(Debug)]
pub struct ExpiryWatchdog {
    store: Arc<SessionStore>,
    timeout: Duration,
    warning_lead: Duration,
    state: WatchdogState,
}

impl ExpiryWatchdog {
    /// Creates a watchdog in the `Active` state.
    pub fn new(store: Arc<SessionStore>, timeout: Duration, warning_lead: Duration) -> Self {
        Self {
            store,
            timeout,
            warning_lead,
            state: WatchdogState::Active,
        }
    }

    /// Creates a watchdog with the configured timeout and warning lead.
    pub fn from_config(store: Arc<SessionStore>, config: &SessionConfig) -> Self {
        Self::new(store, config.timeout(), config.warning_lead())
    }

    /// Current state.
    pub fn state(&self) -> WatchdogState {
        self.state
    }

    /// Ensures an activity timestamp exists so the countdown has a start.
    pub fn start(&mut self) -> AppResult<()> {
        let since = self.store.ensure_started()?;
        info!(
            last_activity = %since,
            timeout_secs = self.timeout.as_secs(),
            warning_lead_secs = self.warning_lead.as_secs(),
            "Expiry watchdog started"
        );
        Ok(())
    }

    /// Re-reads the durable timestamp and updates the state.
    ///
    /// A missing timestamp means the session was ended elsewhere and counts
    /// as expired. So does an unreadable one: inactivity can no longer be
    /// measured and the countdown must not stall. Once expired, ticks do
    /// nothing.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_expired() {
            return TickOutcome::Unchanged;
        }

        let next = match self.store.last_activity() {
            Ok(Some(at)) => {
                let elapsed = (self.store.now() - at).to_std().unwrap_or(Duration::ZERO);
                evaluate(elapsed, self.timeout, self.warning_lead)
            }
            Ok(None) => {
                info!("Activity timestamp cleared; treating session as ended");
                WatchdogState::Expired
            }
            Err(e) => {
                warn!(error = %e, "Activity timestamp unreadable; treating session as ended");
                WatchdogState::Expired
            }
        };

        self.transition(next)
    }

    /// Activity observed in this context while warning: re-evaluates from
    /// the store at once, so the warning clears only if the activity was
    /// actually recorded.
    pub fn on_activity(&mut self) -> TickOutcome {
        match self.state {
            WatchdogState::Warning { .. } => self.tick(),
            _ => TickOutcome::Unchanged,
        }
    }

    /// The session was extended: back to `Active` unless already expired.
    pub fn reset(&mut self) -> TickOutcome {
        if self.state.is_expired() {
            return TickOutcome::Unchanged;
        }
        self.transition(WatchdogState::Active)
    }

    fn transition(&mut self, next: WatchdogState) -> TickOutcome {
        if next == self.state {
            return TickOutcome::Unchanged;
        }
        debug!(from = ?self.state, to = ?next, "Watchdog transition");
        self.state = next;
        TickOutcome::Changed(next)
    }
}
