//! Clock driven by the tokio runtime.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use classgate_core::types::clock::Clock;

/// Wall-clock time anchored when created and advanced by the runtime's
/// monotonic clock.
///
/// Follows paused and advanced time under `tokio::time::pause`, so the
/// watchdog's timestamps and its ticker share one timeline.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    wall: DateTime<Utc>,
    origin: Instant,
}

impl RuntimeClock {
    /// Anchors the clock at the current system time.
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Anchors the clock at `wall`.
    pub fn anchored_at(wall: DateTime<Utc>) -> Self {
        Self {
            wall,
            origin: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.origin.elapsed();
        self.wall + chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_follows_paused_time() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = RuntimeClock::anchored_at(start);
        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
    }
}
