//! Route tables and redirect targets.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Ordered prefix lists for each route class, plus the fixed redirect targets.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Pages for signed-out visitors; signed-in users are sent to the dashboard.
    #[serde(default = "default_public")]
    pub public: Vec<String>,
    /// Routes that establish sessions themselves (OAuth callback, email confirm).
    #[serde(default = "default_auth_callback")]
    pub auth_callback: Vec<String>,
    /// Onboarding flow, signed-in users only.
    #[serde(default = "default_onboarding")]
    pub onboarding: Vec<String>,
    /// Application pages, signed-in users only.
    #[serde(default = "default_protected")]
    pub protected: Vec<String>,
    /// Infrastructure prefixes that bypass the gate entirely.
    #[serde(default = "default_excluded")]
    pub excluded_prefixes: Vec<String>,
    /// Sign-in page.
    #[serde(default = "default_sign_in")]
    pub sign_in_path: String,
    /// Landing page for signed-in users.
    #[serde(default = "default_dashboard")]
    pub dashboard_path: String,
    /// Query parameter carrying the originally requested path.
    #[serde(default = "default_return_param")]
    pub return_param: String,
}

impl RoutesConfig {
    /// Validates that every configured path is absolute.
    pub fn validate(&self) -> Result<(), AppError> {
        let tables = [
            ("routes.public", &self.public),
            ("routes.auth_callback", &self.auth_callback),
            ("routes.onboarding", &self.onboarding),
            ("routes.protected", &self.protected),
            ("routes.excluded_prefixes", &self.excluded_prefixes),
        ];

        for (name, table) in tables {
            if let Some(bad) = table.iter().find(|p| !p.starts_with('/')) {
                return Err(AppError::configuration(format!(
                    "{name} entry '{bad}' must start with '/'"
                )));
            }
        }

        for (name, path) in [
            ("routes.sign_in_path", &self.sign_in_path),
            ("routes.dashboard_path", &self.dashboard_path),
        ] {
            if !path.starts_with('/') || path.starts_with("//") {
                return Err(AppError::configuration(format!(
                    "{name} '{path}' must be an absolute path"
                )));
            }
        }

        if self.return_param.trim().is_empty() {
            return Err(AppError::configuration("routes.return_param must not be empty"));
        }

        Ok(())
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            public: default_public(),
            auth_callback: default_auth_callback(),
            onboarding: default_onboarding(),
            protected: default_protected(),
            excluded_prefixes: default_excluded(),
            sign_in_path: default_sign_in(),
            dashboard_path: default_dashboard(),
            return_param: default_return_param(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_public() -> Vec<String> {
    strings(&["/", "/sign-in", "/sign-up", "/forgot-password", "/about"])
}

fn default_auth_callback() -> Vec<String> {
    strings(&["/auth/callback", "/auth/confirm", "/auth/reset-password"])
}

fn default_onboarding() -> Vec<String> {
    strings(&["/onboarding"])
}

fn default_protected() -> Vec<String> {
    strings(&[
        "/dashboard",
        "/courses",
        "/lessons",
        "/quizzes",
        "/progress",
        "/profile",
        "/settings",
    ])
}

fn default_excluded() -> Vec<String> {
    strings(&["/_next", "/static", "/assets", "/images", "/favicon.ico"])
}

fn default_sign_in() -> String {
    "/sign-in".to_string()
}

fn default_dashboard() -> String {
    "/dashboard".to_string()
}

fn default_return_param() -> String {
    "redirectTo".to_string()
}
