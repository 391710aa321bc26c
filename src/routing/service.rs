use super::super::{error::*, navigation::*};

use {
    bytes::*,
    http::{request::*, response::*, *},
    kutil::std::future::*,
    std::{mem, result::Result, task::*},
    tower::*,
};

//
// ErrorRoutingService
//

/// Error routing service.
///
/// You will often be using [ErrorRoutingLayer](super::ErrorRoutingLayer) rather than this
/// service directly, thus this service's functionality is documented there.
#[derive(Clone)]
pub struct ErrorRoutingService<InnerServiceT> {
    inner_service: InnerServiceT,
    navigator: NavigatorRef,
}

impl<InnerServiceT> ErrorRoutingService<InnerServiceT> {
    /// Constructor.
    pub fn new(inner_service: InnerServiceT, navigator: NavigatorRef) -> Self {
        Self { inner_service, navigator }
    }

    // Clone while keeping `inner_service`.
    //
    // See: https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
    fn clone_and_keep_inner_service(&mut self) -> Self
    where
        InnerServiceT: Clone,
    {
        let mut clone = self.clone();
        clone.inner_service = mem::replace(&mut self.inner_service, clone.inner_service);
        clone
    }

    // Handle request.
    async fn handle(mut self, request: Request<Bytes>) -> Result<Response<Bytes>, PipelineError>
    where
        InnerServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError>,
    {
        // Where the user was when the request was made
        let location = self.navigator.current_location();

        match self.inner_service.call(request).await {
            Ok(response) => {
                if response.status() == StatusCode::NOT_FOUND {
                    self.navigator.navigate(Redirect::NotFound);
                }
                Ok(response)
            }

            Err(error) => {
                if error.is_transport() {
                    tracing::warn!("{}", error);
                    self.navigator.navigate(Redirect::ServiceUnavailable { return_to: location });
                }
                Err(error)
            }
        }
    }
}

impl<InnerServiceT> Service<Request<Bytes>> for ErrorRoutingService<InnerServiceT>
where
    InnerServiceT:
        'static + Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone + Send,
    InnerServiceT::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = PipelineError;
    type Future = CapturedFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, context: &mut Context) -> Poll<Result<(), Self::Error>> {
        self.inner_service.poll_ready(context)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let cloned_self = self.clone_and_keep_inner_service();
        capture_async! { cloned_self.handle(request).await }
    }
}
