//! Turns a [`Decision`] into a concrete `Location`.

use classgate_core::config::RoutesConfig;

use super::decision::{Decision, RedirectTarget};

/// Redirect paths resolved from configuration.
#[derive(Debug, Clone)]
pub struct Redirects {
    sign_in_path: String,
    dashboard_path: String,
    return_param: String,
}

impl Redirects {
    /// Reads the redirect targets from configuration.
    pub fn from_config(config: &RoutesConfig) -> Self {
        Self {
            sign_in_path: config.sign_in_path.clone(),
            dashboard_path: config.dashboard_path.clone(),
            return_param: config.return_param.clone(),
        }
    }

    /// Path of a redirect target.
    pub fn path_of(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::SignIn => &self.sign_in_path,
            RedirectTarget::Dashboard => &self.dashboard_path,
        }
    }

    /// Sign-in location with no return path.
    pub fn sign_in(&self) -> String {
        self.sign_in_path.clone()
    }

    /// Location for `decision`, given the originally requested path and query.
    ///
    /// Returns `None` for [`Decision::Continue`]. The return path is dropped
    /// when it is not a same-origin absolute path.
    pub fn location(&self, decision: Decision, requested: &str) -> Option<String> {
        let Decision::RedirectTo {
            target,
            preserve_return_path,
        } = decision
        else {
            return None;
        };

        let base = self.path_of(target);
        let return_path = preserve_return_path
            .then(|| sanitize_return_path(requested))
            .flatten();

        Some(match return_path {
            Some(path) => format!(
                "{base}?{}={}",
                self.return_param,
                urlencoding::encode(path)
            ),
            None => base.to_string(),
        })
    }
}

/// Accepts only same-origin absolute paths: `/…`, never `//…` or `/\…`,
/// and nothing with control characters.
pub fn sanitize_return_path(candidate: &str) -> Option<&str> {
    let ok = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control);
    ok.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirects() -> Redirects {
        Redirects::from_config(&RoutesConfig::default())
    }

    #[test]
    fn test_continue_has_no_location() {
        assert_eq!(redirects().location(Decision::Continue, "/courses"), None);
    }

    #[test]
    fn test_sign_in_carries_encoded_return_path() {
        let loc = redirects()
            .location(Decision::SIGN_IN_WITH_RETURN, "/courses/rust?unit=2&x=a b")
            .unwrap();
        assert_eq!(loc, "/sign-in?redirectTo=%2Fcourses%2Frust%3Funit%3D2%26x%3Da%20b");
    }

    #[test]
    fn test_fail_closed_drops_return_path() {
        assert_eq!(
            redirects().location(Decision::SIGN_IN, "/courses").unwrap(),
            "/sign-in"
        );
    }

    #[test]
    fn test_dashboard_location() {
        assert_eq!(
            redirects().location(Decision::DASHBOARD, "/sign-in").unwrap(),
            "/dashboard"
        );
    }

    #[test]
    fn test_unsafe_return_paths_dropped() {
        let r = redirects();
        for bad in ["//evil.example/x", "https://evil.example", "/\\evil", "/a\nb", ""] {
            assert_eq!(
                r.location(Decision::SIGN_IN_WITH_RETURN, bad).unwrap(),
                "/sign-in",
                "{bad:?}"
            );
        }
    }
}
