//! Immutable prefix tables and the classifier built on them.

use classgate_core::config::RoutesConfig;

use super::class::RouteClass;

/// Ordered prefix lists for each [`RouteClass`].
///
/// Built once from configuration; classification is pure and allocation-free.
#[derive(Debug, Clone)]
pub struct RouteTable {
    public: Vec<String>,
    auth_callback: Vec<String>,
    onboarding: Vec<String>,
    protected: Vec<String>,
    excluded: Vec<String>,
}

impl RouteTable {
    /// Builds the table from configuration, normalizing trailing slashes.
    pub fn from_config(config: &RoutesConfig) -> Self {
        let norm = |list: &[String]| -> Vec<String> {
            list.iter().map(|p| normalize(p).to_string()).collect()
        };

        Self {
            public: norm(&config.public),
            auth_callback: norm(&config.auth_callback),
            onboarding: norm(&config.onboarding),
            protected: norm(&config.protected),
            excluded: norm(&config.excluded_prefixes),
        }
    }

    /// Whether the path bypasses the gate: infrastructure prefixes and any
    /// path whose last segment carries a file extension.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = normalize(path);
        has_file_extension(path) || matches_any(&self.excluded, path)
    }

    /// Classifies a path. First match wins in the order
    /// Public, AuthCallback, Onboarding, Protected; otherwise Unclassified.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize(path);

        if matches_any(&self.public, path) {
            RouteClass::Public
        } else if matches_any(&self.auth_callback, path) {
            RouteClass::AuthCallback
        } else if matches_any(&self.onboarding, path) {
            RouteClass::Onboarding
        } else if matches_any(&self.protected, path) {
            RouteClass::Protected
        } else {
            RouteClass::Unclassified
        }
    }

    /// Classifies a path, or `None` if it is excluded from classification.
    pub fn resolve(&self, path: &str) -> Option<RouteClass> {
        if self.is_excluded(path) {
            None
        } else {
            Some(self.classify(path))
        }
    }
}

/// Drops query/fragment and trailing slashes; the empty path becomes `/`.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `/` only matches itself; any other prefix matches itself and its subtree.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn matches_any(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|p| prefix_matches(p, path))
}

fn has_file_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or_default();
    matches!(last.rsplit_once('.'), Some((_, ext)) if !ext.is_empty())
}
