use super::{super::navigation::*, service::*};

use tower::*;

//
// ErrorRoutingLayer
//

/// Error routing layer.
///
/// Turns transport-level failures into navigation so that feature code never has to:
///
/// * A transport failure (no HTTP status at all, e.g. the server is down) navigates to the
///   service unavailable page, returning to where the user was when the request was made. The
///   error is still delivered to the caller.
/// * A 404 response navigates to the not found page. The response is still delivered.
///
/// Everything else passes through untouched. Domain errors (4xx other than 404, 5xx) are left
/// to the caller.
#[derive(Clone, Debug)]
pub struct ErrorRoutingLayer {
    navigator: NavigatorRef,
}

impl ErrorRoutingLayer {
    /// Constructor.
    pub fn new(navigator: NavigatorRef) -> Self {
        Self { navigator }
    }
}

impl<InnerServiceT> Layer<InnerServiceT> for ErrorRoutingLayer {
    type Service = ErrorRoutingService<InnerServiceT>;

    fn layer(&self, inner_service: InnerServiceT) -> Self::Service {
        ErrorRoutingService::new(inner_service, self.navigator.clone())
    }
}
