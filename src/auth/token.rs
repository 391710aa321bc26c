use super::super::{clock::*, error::*};

use {
    base64::{engine::general_purpose::*, *},
    serde::*,
};

//
// TokenClaims
//

/// The claims we care about in a bearer token (a JWT).
///
/// The signature is *not* verified. That is the server's job; we only need to know when the
/// token stops being worth sending.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct TokenClaims {
    /// Expiration time (seconds since the Unix epoch).
    #[serde(default)]
    pub exp: Option<u64>,

    /// Subject.
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// Decode the claims segment of a token.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        let claims = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_header), Some(claims), Some(_signature), None) => claims,
            _ => return Err(TokenError::Malformed),
        };

        // Padding is optional in JWTs, but some issuers add it anyway
        let claims = claims.trim_end_matches('=');
        let claims = URL_SAFE_NO_PAD.decode(claims).or_else(|_| STANDARD_NO_PAD.decode(claims))?;

        Ok(serde_json::from_slice(&claims)?)
    }

    /// Whether the token is expired at `now`.
    ///
    /// A token without an expiration time counts as expired.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        match self.exp {
            Some(exp) => now / 1000 >= exp,
            None => true,
        }
    }
}

/// Whether a token is expired at `now`.
///
/// Fails closed: a token that cannot be decoded counts as expired.
pub fn is_token_expired(token: &str, now: Timestamp) -> bool {
    match TokenClaims::decode(token) {
        Ok(claims) => claims.is_expired_at(now),
        Err(error) => {
            tracing::debug!("treating undecodable token as expired: {}", error);
            true
        }
    }
}
