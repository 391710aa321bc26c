use super::super::cache::*;

use serde::*;

//
// AuthFailurePolicy
//

/// What to do with a request when no valid credential can be attached.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthFailurePolicy {
    /// Send the request anyway, without credentials.
    #[default]
    Continue,

    /// Fail the request.
    Abort,
}

//
// AuthConfiguration
//

/// Auth stage configuration.
#[derive(Clone, Debug)]
pub struct AuthConfiguration {
    /// Scopes for silent token acquisition.
    pub scopes: Vec<String>,

    /// Routes that do not require authentication.
    pub public_routes: Vec<ResourcePath>,

    /// Failure policy.
    pub failure_policy: AuthFailurePolicy,
}

impl AuthConfiguration {
    /// Whether a path is a public route.
    pub fn is_public(&self, path: &str) -> bool {
        let path = ResourcePath::parse(path);
        self.public_routes.iter().any(|route| path.contains(route))
    }
}

impl Default for AuthConfiguration {
    fn default() -> Self {
        Self {
            scopes: Default::default(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|route| ResourcePath::parse(route)).collect(),
            failure_policy: Default::default(),
        }
    }
}

/// Routes that do not require authentication by default.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["/login", "/register"];
