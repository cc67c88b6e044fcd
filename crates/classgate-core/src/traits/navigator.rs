//! Client navigation trait.

/// Moves the client to another location (a full page navigation in a browser).
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Navigate to `location`, an absolute path optionally carrying a query.
    fn navigate(&self, location: &str);
}
