//! The pure access policy over (route class, session presence).

use serde::{Deserialize, Serialize};

use crate::route::RouteClass;

/// Fixed redirect destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// The sign-in page.
    SignIn,
    /// The signed-in landing page.
    Dashboard,
}

/// What the gate does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Let the request through.
    Continue,
    /// Send the client elsewhere.
    RedirectTo {
        /// Destination.
        target: RedirectTarget,
        /// Whether the originally requested path rides along as a return path.
        preserve_return_path: bool,
    },
}

impl Decision {
    /// Redirect to sign-in, remembering where the user was going.
    pub const SIGN_IN_WITH_RETURN: Decision = Decision::RedirectTo {
        target: RedirectTarget::SignIn,
        preserve_return_path: true,
    };

    /// Redirect to sign-in with no return path (fail-closed and sign-out).
    pub const SIGN_IN: Decision = Decision::RedirectTo {
        target: RedirectTarget::SignIn,
        preserve_return_path: false,
    };

    /// Redirect to the dashboard.
    pub const DASHBOARD: Decision = Decision::RedirectTo {
        target: RedirectTarget::Dashboard,
        preserve_return_path: false,
    };

    /// Whether the request is allowed through.
    pub fn is_continue(&self) -> bool {
        matches!(self, Decision::Continue)
    }
}

/// Access policy for a classified route.
pub fn decide(class: RouteClass, session_present: bool) -> Decision {
    match (class, session_present) {
        (RouteClass::AuthCallback, _) => Decision::Continue,
        (RouteClass::Public, true) => Decision::DASHBOARD,
        (RouteClass::Public, false) => Decision::Continue,
        (RouteClass::Onboarding | RouteClass::Protected, false) => Decision::SIGN_IN_WITH_RETURN,
        (RouteClass::Onboarding | RouteClass::Protected, true) => Decision::Continue,
        (RouteClass::Unclassified, _) => Decision::Continue,
    }
}
