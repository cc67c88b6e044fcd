//! Session Store: the client's token pair and the durable activity timestamp.
//!
//! `lastActivityAt` lives in the shared [`KeyValueStore`] as epoch
//! milliseconds so every tab of the same client context reads the same
//! value. Writes only ever move it forward.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use classgate_core::config::SessionConfig;
use classgate_core::error::{AppError, ErrorKind};
use classgate_core::result::AppResult;
use classgate_core::traits::kv_store::KeyValueStore;
use classgate_core::types::clock::Clock;
use classgate_core::types::session::SessionToken;

/// Single owner of `lastActivityAt` writes and of the in-memory token pair.
#[derive(Debug)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    activity_key: String,
    token: Mutex<Option<SessionToken>>,
    /// Serializes read-max-write cycles on `lastActivityAt`.
    touch_lock: Mutex<()>,
}

impl SessionStore {
    /// Creates a store over `kv`, keeping the timestamp under `activity_key`.
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        activity_key: impl Into<String>,
    ) -> Self {
        Self {
            kv,
            clock,
            activity_key: activity_key.into(),
            token: Mutex::new(None),
            touch_lock: Mutex::new(()),
        }
    }

    /// Creates a store using the configured activity key.
    pub fn from_config(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &SessionConfig,
    ) -> Self {
        Self::new(kv, clock, config.activity_key.clone())
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Starts a session after sign-in: keeps the token and stamps activity.
    pub fn begin(&self, token: SessionToken) -> AppResult<DateTime<Utc>> {
        self.replace_token(token);
        self.stamp(self.clock.now())
    }

    /// Swaps in an extended token pair and restarts the countdown from now.
    pub fn extend(&self, token: SessionToken) -> AppResult<DateTime<Utc>> {
        self.replace_token(token);
        self.stamp(self.clock.now())
    }

    /// Replaces the token pair, e.g. after the auth service extended it.
    pub fn replace_token(&self, token: SessionToken) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// The current token pair, if signed in.
    pub fn token(&self) -> Option<SessionToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the token pair. A second call returns `None`.
    pub fn take_token(&self) -> Option<SessionToken> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Whether this client holds a session token.
    pub fn is_present(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Reads `lastActivityAt` from the durable store.
    pub fn last_activity(&self) -> AppResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.kv.get(&self.activity_key)? else {
            return Ok(None);
        };
        let millis: i64 = raw.trim().parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid '{}' value: {raw:?}", self.activity_key),
                e,
            )
        })?;
        DateTime::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| {
                AppError::new(
                    ErrorKind::Serialization,
                    format!("'{}' out of range: {millis}", self.activity_key),
                )
            })
    }

    /// Records activity now. See [`SessionStore::touch_at`].
    pub fn touch(&self) -> AppResult<Option<DateTime<Utc>>> {
        self.touch_at(self.clock.now())
    }

    /// Records activity at `at`, never moving the stored value backward.
    ///
    /// Only advances an existing record: with no token held, or once the
    /// timestamp was cleared (sign-out here or in another tab), nothing is
    /// written and `None` is returned. An unreadable value is left for the
    /// watchdog to act on. Otherwise returns the value stored afterwards,
    /// which is `at` or a later time already written by another tab.
    pub fn touch_at(&self, at: DateTime<Utc>) -> AppResult<Option<DateTime<Utc>>> {
        if !self.is_present() {
            return Ok(None);
        }

        let _guard = self.touch_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(existing) = self.last_activity()? else {
            return Ok(None);
        };
        if existing >= at {
            return Ok(Some(existing));
        }

        self.write(at)?;
        Ok(Some(at))
    }

    /// Stamps activity only if none is recorded yet. Requires a token.
    pub fn ensure_started(&self) -> AppResult<DateTime<Utc>> {
        if let Some(at) = self.last_activity()? {
            return Ok(at);
        }
        if !self.is_present() {
            return Err(AppError::session("No session to start a countdown for"));
        }
        self.stamp(self.clock.now())
    }

    /// Deletes `lastActivityAt`.
    pub fn clear_activity(&self) -> AppResult<()> {
        let _guard = self.touch_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.kv.remove(&self.activity_key)
    }

    /// Creates the record, or advances it to `at`. Only session start and
    /// extension may create it. An unreadable value is replaced.
    fn stamp(&self, at: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        let _guard = self.touch_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(Some(existing)) = self.last_activity() {
            if existing >= at {
                return Ok(existing);
            }
        }
        self.write(at)?;
        Ok(at)
    }

    fn write(&self, at: DateTime<Utc>) -> AppResult<()> {
        self.kv
            .set(&self.activity_key, &at.timestamp_millis().to_string())?;
        debug!(at = %at, "Recorded activity");
        Ok(())
    }
}
