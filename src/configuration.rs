use super::{
    auth::*,
    cache::{middleware::*, *},
    error::*,
};

use {
    serde::{de, *},
    std::{env, fmt, time::*},
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

//
// ClientConfiguration
//

/// Client configuration.
///
/// [Default] takes the API URL and identity settings from the environment at build time
/// (`KDI_API_URL`, `KDI_CLIENT_ID`, `KDI_AUTHORITY`, `KDI_REDIRECT_URI`, `KDI_SCOPES`), and
/// [from_env](Self::from_env) overrides them from the environment at run time.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfiguration {
    /// API base URL.
    pub api_url: String,

    /// Default cache duration.
    ///
    /// In configuration files this is either a duration-str string (e.g. "5m") or a number of
    /// seconds.
    #[serde(deserialize_with = "deserialize_duration")]
    pub cache_duration: Duration,

    /// Routes that are never cached.
    pub uncacheable: Vec<String>,

    /// Routes that do not require authentication.
    pub public_routes: Vec<String>,

    /// Identity provider.
    pub identity: IdentityConfiguration,

    /// What to do when no valid credential can be attached.
    pub auth_failure_policy: AuthFailurePolicy,

    /// Whether concurrent identical requests share one upstream call.
    pub coalesce_in_flight: bool,

    /// Storage key for the cache snapshot.
    pub cache_storage_key: String,

    /// Storage key for the bearer token.
    pub token_storage_key: String,
}

impl ClientConfiguration {
    /// Default configuration overridden from the environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let mut configuration = Self::default();

        if let Some(api_url) = var("KDI_API_URL") {
            configuration.api_url = api_url;
        }

        if let Some(cache_duration) = var("KDI_CACHE_DURATION") {
            configuration.cache_duration =
                duration_str::parse(&cache_duration).map_err(|message| ConfigurationError::Duration {
                    name: "KDI_CACHE_DURATION".into(),
                    value: cache_duration.clone(),
                    message: message.to_string(),
                })?;
        }

        if let Some(client_id) = var("KDI_CLIENT_ID") {
            configuration.identity.client_id = Some(client_id);
        }

        if let Some(authority) = var("KDI_AUTHORITY") {
            configuration.identity.authority = Some(authority);
        }

        if let Some(redirect_uri) = var("KDI_REDIRECT_URI") {
            configuration.identity.redirect_uri = Some(redirect_uri);
        }

        if let Some(scopes) = var("KDI_SCOPES") {
            configuration.identity.scopes = split_list(&scopes);
        }

        if let Some(policy) = var("KDI_AUTH_FAILURE_POLICY") {
            configuration.auth_failure_policy = parse_policy(&policy)
                .ok_or_else(|| ConfigurationError::Value { name: "KDI_AUTH_FAILURE_POLICY".into(), value: policy })?;
        }

        Ok(configuration)
    }

    /// Auth stage configuration.
    pub fn auth(&self) -> AuthConfiguration {
        AuthConfiguration {
            scopes: self.identity.scopes.clone(),
            public_routes: self.public_routes.iter().map(|route| ResourcePath::parse(route)).collect(),
            failure_policy: self.auth_failure_policy,
        }
    }
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            api_url: option_env!("KDI_API_URL").unwrap_or(DEFAULT_API_URL).into(),
            cache_duration: DEFAULT_CACHE_DURATION,
            uncacheable: DEFAULT_UNCACHEABLE_ROUTES.iter().map(|route| (*route).into()).collect(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|route| (*route).into()).collect(),
            identity: Default::default(),
            auth_failure_policy: Default::default(),
            coalesce_in_flight: true,
            cache_storage_key: DEFAULT_CACHE_STORAGE_KEY.into(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.into(),
        }
    }
}

//
// IdentityConfiguration
//

/// Identity provider configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IdentityConfiguration {
    /// Client (application) ID.
    pub client_id: Option<String>,

    /// Authority URL.
    pub authority: Option<String>,

    /// Redirect URI after interactive login.
    pub redirect_uri: Option<String>,

    /// Scopes requested for the API.
    pub scopes: Vec<String>,
}

impl Default for IdentityConfiguration {
    fn default() -> Self {
        Self {
            client_id: option_env!("KDI_CLIENT_ID").map(|client_id| client_id.into()),
            authority: option_env!("KDI_AUTHORITY").map(|authority| authority.into()),
            redirect_uri: option_env!("KDI_REDIRECT_URI").map(|redirect_uri| redirect_uri.into()),
            scopes: option_env!("KDI_SCOPES").map(split_list).unwrap_or_default(),
        }
    }
}

// Non-empty environment variable.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim()).filter(|item| !item.is_empty()).map(|item| item.into()).collect()
}

fn parse_policy(policy: &str) -> Option<AuthFailurePolicy> {
    match policy.trim().to_ascii_lowercase().as_str() {
        "continue" => Some(AuthFailurePolicy::Continue),
        "abort" => Some(AuthFailurePolicy::Abort),
        _ => None,
    }
}

// Duration-str string or seconds.
fn deserialize_duration<'de, DeserializerT>(deserializer: DeserializerT) -> Result<Duration, DeserializerT::Error>
where
    DeserializerT: Deserializer<'de>,
{
    struct DurationVisitor;

    impl<'de> de::Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string (e.g. \"5m\") or a number of seconds")
        }

        fn visit_u64<ErrorT>(self, seconds: u64) -> Result<Self::Value, ErrorT>
        where
            ErrorT: de::Error,
        {
            Ok(Duration::from_secs(seconds))
        }

        fn visit_str<ErrorT>(self, duration: &str) -> Result<Self::Value, ErrorT>
        where
            ErrorT: de::Error,
        {
            duration_str::parse(duration).map_err(|message| ErrorT::custom(message.to_string()))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}
