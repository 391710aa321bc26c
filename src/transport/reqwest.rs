use super::super::error::*;

use {
    bytes::*,
    http::{request::*, response::*},
    kutil::std::future::*,
    std::{result::Result, task::*},
    tower::*,
};

//
// ReqwestTransport
//

/// Transport over [reqwest](::reqwest).
///
/// Every failure to send the request or to read the response is a
/// [PipelineError::Transport]. HTTP error statuses are regular responses.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: ::reqwest::Client,
}

impl ReqwestTransport {
    /// Constructor.
    pub fn new(client: ::reqwest::Client) -> Self {
        Self { client }
    }

    // Handle request.
    async fn handle(self, request: Request<Bytes>) -> Result<Response<Bytes>, PipelineError> {
        let uri = request.uri().clone();

        let request = ::reqwest::Request::try_from(request).map_err(|error| PipelineError::transport(&uri, error))?;
        let response = self.client.execute(request).await.map_err(|error| PipelineError::transport(&uri, error))?;

        let mut builder = Response::builder().status(response.status()).version(response.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(response.headers().iter().map(|(name, value)| (name.clone(), value.clone())));
        }

        let body = response.bytes().await.map_err(|error| PipelineError::transport(&uri, error))?;
        builder.body(body).map_err(|error| PipelineError::transport(&uri, error))
    }
}

impl Service<Request<Bytes>> for ReqwestTransport {
    type Response = Response<Bytes>;
    type Error = PipelineError;
    type Future = CapturedFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _context: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let cloned_self = self.clone();
        capture_async! { cloned_self.handle(request).await }
    }
}
