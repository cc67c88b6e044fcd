//! Navigator that records locations instead of driving a browser.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use classgate_core::traits::navigator::Navigator;

/// Records every navigation in order. Clones share the history.
///
/// Headless clients and the CLI read the history to learn where the
/// session lifecycle sent them.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// All locations visited so far.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent location.
    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, location: &str) {
        info!(location, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location.to_string());
    }
}
