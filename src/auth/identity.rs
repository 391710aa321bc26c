use super::super::error::*;

use std::fmt;

//
// IdentityProvider
//

/// External identity provider that can issue access tokens without user interaction.
///
/// Implement this for whatever OAuth/OIDC client the host application uses.
pub trait IdentityProvider
where
    Self: 'static + fmt::Debug + Send + Sync,
{
    /// Whether there is an account session to acquire tokens for.
    fn has_session(&self) -> bool;

    /// Acquire an access token silently for the given scopes.
    fn acquire_token_silent(
        &self,
        scopes: &[String],
    ) -> impl Future<Output = Result<String, IdentityError>> + Send;
}

//
// NoIdentityProvider
//

/// [IdentityProvider] that never has a session.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIdentityProvider;

impl IdentityProvider for NoIdentityProvider {
    fn has_session(&self) -> bool {
        false
    }

    async fn acquire_token_silent(&self, _scopes: &[String]) -> Result<String, IdentityError> {
        Err(IdentityError::NoSession)
    }
}
