use super::{
    super::navigation::*,
    configuration::*,
    identity::*,
    provider::*,
};

use std::sync::*;

//
// AuthGuard
//

/// Route guard.
///
/// Decides whether the host application may show a route that requires authentication.
#[derive(Debug)]
pub struct AuthGuard<IdentityT = NoIdentityProvider> {
    tokens: AuthTokenProvider,
    identity: Arc<IdentityT>,
    navigator: NavigatorRef,
    configuration: Arc<AuthConfiguration>,
}

impl<IdentityT> AuthGuard<IdentityT>
where
    IdentityT: IdentityProvider,
{
    /// Constructor.
    pub fn new(
        tokens: AuthTokenProvider,
        identity: Arc<IdentityT>,
        navigator: NavigatorRef,
        configuration: Arc<AuthConfiguration>,
    ) -> Self {
        Self { tokens, identity, navigator, configuration }
    }

    /// Whether `target` may be shown.
    ///
    /// When not authenticated but the identity provider has a session, a silent acquisition is
    /// tried first. When the answer is no, navigates to the login page, returning to `target`
    /// afterwards.
    pub async fn can_activate(&self, target: &str) -> bool {
        if !self.tokens.is_authenticated() && self.identity.has_session() {
            match self.identity.acquire_token_silent(&self.configuration.scopes).await {
                Ok(token) => self.tokens.set_token(token),
                Err(error) => tracing::error!("silent token acquisition: {}", error),
            }
        }

        if self.tokens.is_authenticated() {
            return true;
        }

        self.navigator.navigate(Redirect::Login { return_to: Some(target.into()) });
        false
    }
}

impl<IdentityT> Clone for AuthGuard<IdentityT> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            identity: self.identity.clone(),
            navigator: self.navigator.clone(),
            configuration: self.configuration.clone(),
        }
    }
}
