//! User-activity signals and the monitor that records them.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::SessionStore;

/// Input events that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySignal {
    PointerDown,
    PointerMove,
    KeyDown,
    Scroll,
    TouchStart,
}

impl ActivitySignal {
    /// Every signal the monitor listens for.
    pub const ALL: [ActivitySignal; 5] = [
        ActivitySignal::PointerDown,
        ActivitySignal::PointerMove,
        ActivitySignal::KeyDown,
        ActivitySignal::Scroll,
        ActivitySignal::TouchStart,
    ];

    /// DOM event name for the signal.
    pub fn event_name(&self) -> &'static str {
        match self {
            ActivitySignal::PointerDown => "mousedown",
            ActivitySignal::PointerMove => "mousemove",
            ActivitySignal::KeyDown => "keydown",
            ActivitySignal::Scroll => "scroll",
            ActivitySignal::TouchStart => "touchstart",
        }
    }
}

impl fmt::Display for ActivitySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Writes "now" to `lastActivityAt` for every activity signal.
///
/// Never fails outward: store errors are logged and dropped. Only a live
/// record is advanced; once the session ended nothing is written. The
/// minimum write interval must stay below the warning threshold so a signal
/// during a warning always lands.
#[derive(Debug)]
pub struct ActivityMonitor {
    store: Arc<SessionStore>,
    min_write_interval: Duration,
    last_write: Mutex<Option<DateTime<Utc>>>,
}

impl ActivityMonitor {
    /// Creates a monitor. A zero `min_write_interval` writes on every signal.
    pub fn new(store: Arc<SessionStore>, min_write_interval: Duration) -> Self {
        Self {
            store,
            min_write_interval,
            last_write: Mutex::new(None),
        }
    }

    /// Records a signal. Returns whether the timestamp was written.
    pub fn record(&self, signal: ActivitySignal) -> bool {
        let now = self.store.now();
        let mut last_write = self.last_write.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(prev) = *last_write {
            let since = (now - prev).to_std().unwrap_or(Duration::ZERO);
            if !self.min_write_interval.is_zero() && since < self.min_write_interval {
                return false;
            }
        }

        match self.store.touch_at(now) {
            Ok(Some(_)) => {
                *last_write = Some(now);
                true
            }
            Ok(None) => {
                debug!(signal = %signal, "No live session record; activity ignored");
                false
            }
            Err(e) => {
                warn!(signal = %signal, error = %e, "Failed to record activity");
                false
            }
        }
    }
}
