//! Route classes governing access policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorization of a URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Pages meant for signed-out visitors.
    Public,
    /// Routes that establish a session themselves.
    AuthCallback,
    /// Post-sign-up onboarding flow.
    Onboarding,
    /// Pages requiring a session.
    Protected,
    /// Anything not listed; allowed by default.
    Unclassified,
}

impl RouteClass {
    /// All classes in matching priority order.
    pub const ALL: [RouteClass; 5] = [
        RouteClass::Public,
        RouteClass::AuthCallback,
        RouteClass::Onboarding,
        RouteClass::Protected,
        RouteClass::Unclassified,
    ];
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteClass::Public => write!(f, "public"),
            RouteClass::AuthCallback => write!(f, "auth_callback"),
            RouteClass::Onboarding => write!(f, "onboarding"),
            RouteClass::Protected => write!(f, "protected"),
            RouteClass::Unclassified => write!(f, "unclassified"),
        }
    }
}
