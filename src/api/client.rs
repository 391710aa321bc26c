use super::super::{auth::*, cache::*, context::*, error::*};

use {
    bytes::*,
    http::{header::*, request::*, response::*, *},
    serde::{de::*, *},
    std::result::Result,
    tower::*,
};

//
// ApiClient
//

/// Typed client for the KDI REST API.
///
/// All requests go through the pipeline service. After a successful mutation the client
/// invalidates every cached read under the related resource roots.
#[derive(Clone, Debug)]
pub struct ApiClient<ServiceT> {
    service: ServiceT,
    api_url: String,
    cache: ResponseCache,
    tokens: AuthTokenProvider,
}

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// Constructor.
    pub fn new<UrlT>(service: ServiceT, api_url: UrlT, cache: ResponseCache, tokens: AuthTokenProvider) -> Self
    where
        UrlT: Into<String>,
    {
        let api_url = api_url.into().trim_end_matches('/').into();
        Self { service, api_url, cache, tokens }
    }

    /// Constructor.
    ///
    /// Uses the context's API URL, cache, and token provider.
    pub fn from_context<IdentityT>(context: &ClientContext<IdentityT>, service: ServiceT) -> Self {
        Self::new(service, context.configuration.api_url.clone(), context.cache.clone(), context.tokens.clone())
    }

    /// API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Full URL for a path relative to the API base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Invalidate all cached reads under the resource roots.
    pub fn invalidate(&self, resources: &[&str]) {
        for resource in resources {
            let count = self.cache.invalidate_resource(resource);
            tracing::debug!("invalidate {}: {} entries", resource, count);
        }
    }

    pub(crate) fn tokens(&self) -> &AuthTokenProvider {
        &self.tokens
    }

    /// GET and decode.
    pub async fn get<ResponseT>(&self, path: &str) -> Result<ResponseT, ApiError>
    where
        ResponseT: DeserializeOwned,
    {
        let body = self.send(Method::GET, path, None).await?;
        decode(&body)
    }

    /// POST and decode.
    pub async fn post<BodyT, ResponseT>(&self, path: &str, body: &BodyT) -> Result<ResponseT, ApiError>
    where
        BodyT: Serialize + ?Sized,
        ResponseT: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, Some(encode(body)?)).await?;
        decode(&body)
    }

    /// PATCH and decode.
    pub async fn patch<BodyT, ResponseT>(&self, path: &str, body: &BodyT) -> Result<ResponseT, ApiError>
    where
        BodyT: Serialize + ?Sized,
        ResponseT: DeserializeOwned,
    {
        let body = self.send(Method::PATCH, path, Some(encode(body)?)).await?;
        decode(&body)
    }

    /// DELETE and decode.
    pub async fn delete<ResponseT>(&self, path: &str) -> Result<ResponseT, ApiError>
    where
        ResponseT: DeserializeOwned,
    {
        let body = self.send(Method::DELETE, path, None).await?;
        decode(&body)
    }

    // Send a request and return the body of a successful response.
    async fn send(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<Bytes, ApiError> {
        let mut request = Request::builder().method(method).uri(self.url(path));

        if body.is_some() {
            request = request.header(CONTENT_TYPE, "application/json");
        }

        let request = request.body(body.unwrap_or_default())?;
        let response = self.service.clone().oneshot(request).await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.into_body())
        } else {
            Err(ApiError::Status { status, message: error_message(response.body()) })
        }
    }
}

fn encode<BodyT>(body: &BodyT) -> Result<Bytes, ApiError>
where
    BodyT: Serialize + ?Sized,
{
    serde_json::to_vec(body).map(Bytes::from).map_err(ApiError::Encode)
}

// An empty body decodes as an empty object.
fn decode<ResponseT>(body: &[u8]) -> Result<ResponseT, ApiError>
where
    ResponseT: DeserializeOwned,
{
    let body = if body.iter().all(u8::is_ascii_whitespace) { b"{}".as_slice() } else { body };
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

// The "message" field of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body).ok()?.message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(error_message(br#"{"message":"Invalid form"}"#).as_deref(), Some("Invalid form"));
        assert_eq!(error_message(br#"{"error":"nope"}"#), None);
        assert_eq!(error_message(b"<html>"), None);
    }

    #[test]
    fn empty_body_decodes() {
        let acknowledgement: super::super::Acknowledgement = decode(b"").unwrap();
        assert_eq!(acknowledgement.message, None);
    }
}
