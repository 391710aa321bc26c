use super::{
    super::{cache::*, navigation::*},
    configuration::*,
    identity::*,
    provider::*,
    service::*,
};

use {std::sync::*, tower::*};

//
// AuthLayer
//

/// Authentication layer.
///
/// This layer configures and installs an [AuthService], which attaches credentials to every
/// outgoing request.
///
/// Request handling
/// ================
///
/// 1. If the [IdentityProvider] has a session, or the request URL mentions "msal", try to
///    acquire a token silently. This is awaited. On success the token replaces the one held
///    by the [AuthTokenProvider] and the request is marked with an `Auth-Method: msal` header.
///    On failure the error is logged.
///
/// 2. If the [AuthTokenProvider] holds an unexpired token then attach it as an
///    `Authorization: Bearer` header and send the request on. END.
///
/// 3. If either the request path or the navigator's current location is a
///    [public route](Self::public_routes) then send the request on as is. END.
///
/// 4. Otherwise navigate to the login page (returning to the current location afterwards)
///    and apply the [failure policy](Self::failure_policy): either send the request on without
///    credentials (the default) or fail it.
pub struct AuthLayer<IdentityT = NoIdentityProvider> {
    tokens: AuthTokenProvider,
    identity: Arc<IdentityT>,
    navigator: NavigatorRef,
    configuration: AuthConfiguration,
}

impl AuthLayer {
    /// Constructor.
    pub fn new(tokens: AuthTokenProvider, navigator: NavigatorRef) -> Self {
        Self { tokens, identity: Default::default(), navigator, configuration: Default::default() }
    }
}

impl<IdentityT> AuthLayer<IdentityT>
where
    IdentityT: IdentityProvider,
{
    /// Use an identity provider.
    pub fn identity<NewIdentityT>(self, identity: Arc<NewIdentityT>) -> AuthLayer<NewIdentityT> {
        AuthLayer { tokens: self.tokens, identity, navigator: self.navigator, configuration: self.configuration }
    }

    /// Scopes for silent token acquisition.
    ///
    /// None by default.
    pub fn scopes<ScopeT>(mut self, scopes: impl IntoIterator<Item = ScopeT>) -> Self
    where
        ScopeT: Into<String>,
    {
        self.configuration.scopes = scopes.into_iter().map(|scope| scope.into()).collect();
        self
    }

    /// Routes that do not require authentication.
    ///
    /// The default is [DEFAULT_PUBLIC_ROUTES].
    pub fn public_routes<RouteT>(mut self, routes: impl IntoIterator<Item = RouteT>) -> Self
    where
        RouteT: AsRef<str>,
    {
        self.configuration.public_routes = routes.into_iter().map(|route| ResourcePath::parse(route.as_ref())).collect();
        self
    }

    /// What to do when no valid credential can be attached.
    ///
    /// The default is [AuthFailurePolicy::Continue].
    pub fn failure_policy(mut self, failure_policy: AuthFailurePolicy) -> Self {
        self.configuration.failure_policy = failure_policy;
        self
    }
}

impl<IdentityT> Clone for AuthLayer<IdentityT> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            identity: self.identity.clone(),
            navigator: self.navigator.clone(),
            configuration: self.configuration.clone(),
        }
    }
}

impl<InnerServiceT, IdentityT> Layer<InnerServiceT> for AuthLayer<IdentityT>
where
    IdentityT: IdentityProvider,
{
    type Service = AuthService<InnerServiceT, IdentityT>;

    fn layer(&self, inner_service: InnerServiceT) -> Self::Service {
        AuthService::new(
            inner_service,
            self.tokens.clone(),
            self.identity.clone(),
            self.navigator.clone(),
            Arc::new(self.configuration.clone()),
        )
    }
}
