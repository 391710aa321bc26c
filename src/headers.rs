use {
    duration_str::*,
    http::header::*,
    std::{result::Result, time::*},
};

/// Response header to skip caching when "false".
pub const XX_CACHE: HeaderName = HeaderName::from_static("xx-cache");

/// Response header with a cache duration in duration-str syntax (e.g. "30s", "5m").
pub const XX_CACHE_DURATION: HeaderName = HeaderName::from_static("xx-cache-duration");

/// Request header marking that the identity provider path was used.
pub const AUTH_METHOD: HeaderName = HeaderName::from_static("auth-method");

/// [AUTH_METHOD] value for the identity provider path.
pub const AUTH_METHOD_MSAL: &str = "msal";

//
// PipelineHeaders
//

/// Access to the headers used by the pipeline.
pub trait PipelineHeaders {
    /// Value of `XX-Cache`, or `default` if absent or unparsable.
    fn xx_cache(&self, default: bool) -> bool;

    /// Value of `XX-Cache-Duration`, if present and parsable.
    fn xx_cache_duration(&self) -> Option<Duration>;

    /// Set the `Authorization` header to a bearer token.
    fn set_bearer(&mut self, token: &str) -> Result<(), InvalidHeaderValue>;

    /// The bearer token from the `Authorization` header, if any.
    fn bearer(&self) -> Option<&str>;
}

impl PipelineHeaders for HeaderMap {
    fn xx_cache(&self, default: bool) -> bool {
        match self.get(XX_CACHE).and_then(|value| value.to_str().ok()) {
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    fn xx_cache_duration(&self) -> Option<Duration> {
        let value = self.get(XX_CACHE_DURATION)?.to_str().ok()?;
        match parse(value) {
            Ok(duration) => Some(duration),
            Err(error) => {
                tracing::warn!("invalid {}: {}", XX_CACHE_DURATION, error);
                None
            }
        }
    }

    fn set_bearer(&mut self, token: &str) -> Result<(), InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        value.set_sensitive(true);
        self.insert(AUTHORIZATION, value);
        Ok(())
    }

    fn bearer(&self) -> Option<&str> {
        self.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
    }
}
