use {http::*, std::error::Error, thiserror::*};

/// Boxed error that can cross threads.
pub type BoxError = Box<dyn Error + Send + Sync>;

//
// PipelineError
//

/// Request pipeline error.
///
/// Only transport-level conditions live here. HTTP error statuses are regular responses as far
/// as the pipeline is concerned.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No HTTP status at all: the server could not be reached.
    #[error("transport: {uri}: {source}")]
    Transport {
        /// Request URI.
        uri: String,

        /// Cause.
        #[source]
        source: BoxError,
    },

    /// No valid credential and the auth failure policy is to abort.
    #[error("unauthenticated: {uri}")]
    Unauthenticated {
        /// Request URI.
        uri: String,
    },

    /// Silent token acquisition failed and the auth failure policy is to abort.
    #[error("identity provider: {0}")]
    Identity(#[from] IdentityError),
}

impl PipelineError {
    /// Constructor.
    pub fn transport<ErrorT>(uri: &Uri, source: ErrorT) -> Self
    where
        ErrorT: Into<BoxError>,
    {
        Self::Transport { uri: uri.to_string(), source: source.into() }
    }

    /// Whether this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// HTTP-style status.
    ///
    /// 0 means that no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::Transport { .. } => 0,
            Self::Unauthenticated { .. } | Self::Identity(_) => StatusCode::UNAUTHORIZED.as_u16(),
        }
    }
}

//
// ApiError
//

/// Typed API error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The pipeline failed (e.g. the server is unreachable).
    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    /// Non-success HTTP status.
    #[error("status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// Status.
        status: StatusCode,

        /// Message from the response body, if it had one.
        message: Option<String>,
    },

    /// Response body does not match the expected schema.
    #[error("decode: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be serialized.
    #[error("encode: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request could not be built.
    #[error("request: {0}")]
    Request(#[from] http::Error),
}

impl ApiError {
    /// HTTP-style status.
    ///
    /// 0 means that no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::Pipeline(error) => error.status(),
            Self::Status { status, .. } => status.as_u16(),
            Self::Decode(_) | Self::Encode(_) | Self::Request(_) => 0,
        }
    }

    /// Message for the user, if the server provided one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

//
// IdentityError
//

/// Identity provider error.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No account session to acquire a token for.
    #[error("no session")]
    NoSession,

    /// The provider requires user interaction.
    #[error("interaction required: {0}")]
    InteractionRequired(String),

    /// Other failure.
    #[error("{0}")]
    Other(String),
}

//
// TokenError
//

/// Bearer token decoding error.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Not three dot-separated segments.
    #[error("malformed token")]
    Malformed,

    /// Claims segment is not base64url.
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Claims segment is not a JSON object.
    #[error("claims: {0}")]
    Claims(#[from] serde_json::Error),
}

//
// ConfigurationError
//

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Not a valid duration.
    #[error("{name}: invalid duration {value:?}: {message}")]
    Duration {
        /// Setting name.
        name: String,

        /// Setting value.
        value: String,

        /// Parser message.
        message: String,
    },

    /// Not a valid value.
    #[error("{name}: invalid value {value:?}")]
    Value {
        /// Setting name.
        name: String,

        /// Setting value.
        value: String,
    },
}

//
// StorageError
//

/// Durable storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O.
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Writing would exceed the storage quota.
    #[error("quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,

        /// Quota.
        quota: usize,
    },

    /// Serialization.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
