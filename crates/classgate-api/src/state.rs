//! Application state shared across handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use classgate_auth::AccessGate;
use classgate_core::config::AppConfig;
use classgate_core::traits::auth_provider::AuthProvider;

/// Shared dependencies, cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Per-request access gate.
    pub gate: Arc<AccessGate>,
    /// Auth service client, for sign-out.
    pub provider: Arc<dyn AuthProvider>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Builds the state around an auth service client.
    pub fn new(config: AppConfig, provider: Arc<dyn AuthProvider>) -> Self {
        let gate = AccessGate::from_config(&config, provider.clone());
        Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            provider,
            started_at: Instant::now(),
        }
    }
}
