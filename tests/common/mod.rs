#![allow(dead_code)]

use {
    base64::{engine::general_purpose::*, *},
    bytes::*,
    futures::future::*,
    http::{header::*, request::*, response::*, *},
    kdi_client_pipeline::*,
    parking_lot::Mutex,
    serde_json::{Value, json},
    std::{
        result::Result,
        sync::{Arc, atomic::*},
        task::*,
        time::*,
    },
    tower::Service,
};

pub const API_URL: &str = "http://kdi.test/api";

/// Response for a method and a path relative to [API_URL].
pub type Handler = Arc<dyn Fn(&Method, &str) -> (StatusCode, Value) + Send + Sync>;

//
// Backend
//

/// In-process stand-in for the API server.
#[derive(Clone)]
pub struct Backend {
    handler: Handler,
    requests: Arc<Mutex<Vec<Recorded>>>,
    down: Arc<AtomicBool>,
    delay: Option<Duration>,
}

/// What the backend saw.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub auth_method: Option<String>,
}

impl Backend {
    pub fn new(handler: impl Fn(&Method, &str) -> (StatusCode, Value) + 'static + Send + Sync) -> Self {
        Self { handler: Arc::new(handler), requests: Default::default(), down: Default::default(), delay: None }
    }

    /// Answers every request with its own method and path.
    pub fn echo() -> Self {
        Self::new(|method, path| {
            if path.ends_with("/missing") {
                (StatusCode::NOT_FOUND, json!({ "message": "not found" }))
            } else {
                (StatusCode::OK, json!({ "method": method.as_str(), "path": path }))
            }
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last(&self) -> Option<Recorded> {
        self.requests.lock().last().cloned()
    }
}

impl Service<Request<Bytes>> for Backend {
    type Response = Response<Bytes>;
    type Error = PipelineError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _context: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let backend = self.clone();

        async move {
            let uri = request.uri().clone();

            if backend.down.load(Ordering::SeqCst) {
                return Err(PipelineError::transport(&uri, "connection refused"));
            }

            let header = |name: &HeaderName| {
                request.headers().get(name).and_then(|value| value.to_str().ok()).map(|value| value.to_string())
            };

            let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
            let path_and_query = match uri.query() {
                Some(query) => format!("{}?{}", path, query),
                None => path,
            };

            backend.requests.lock().push(Recorded {
                method: request.method().clone(),
                path: path_and_query.clone(),
                authorization: header(&AUTHORIZATION),
                auth_method: header(&AUTH_METHOD),
            });

            if let Some(delay) = backend.delay {
                tokio::time::sleep(delay).await;
            }

            let (status, body) = (backend.handler)(request.method(), &path_and_query);
            let body = serde_json::to_vec(&body).map_err(|error| PipelineError::transport(&uri, error))?;

            Response::builder()
                .status(status)
                .header(CONTENT_TYPE, "application/json")
                .body(Bytes::from(body))
                .map_err(|error| PipelineError::transport(&uri, error))
        }
        .boxed()
    }
}

/// Request to a path relative to [API_URL].
pub fn request(method: Method, path: &str) -> Request<Bytes> {
    Request::builder().method(method).uri(format!("{}{}", API_URL, path)).body(Bytes::new()).unwrap()
}

/// Unsigned bearer token expiring at `exp` (seconds since the epoch).
pub fn token(exp: u64) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"user-1"}}"#, exp))
    )
}

/// JSON body.
pub fn json_body(response: &Response<Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}
