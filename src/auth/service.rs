use super::{
    super::{error::*, headers::*, navigation::*},
    configuration::*,
    identity::*,
    provider::*,
};

use {
    bytes::*,
    http::{header::*, request::*, response::*},
    kutil::std::future::*,
    std::{mem, result::Result, sync::*, task::*},
    tower::*,
};

//
// AuthService
//

/// Authentication service.
///
/// You will often be using [AuthLayer](super::AuthLayer) rather than this service directly,
/// thus this service's functionality is documented there.
pub struct AuthService<InnerServiceT, IdentityT = NoIdentityProvider> {
    inner_service: InnerServiceT,
    tokens: AuthTokenProvider,
    identity: Arc<IdentityT>,
    navigator: NavigatorRef,
    configuration: Arc<AuthConfiguration>,
}

impl<InnerServiceT, IdentityT> AuthService<InnerServiceT, IdentityT>
where
    IdentityT: IdentityProvider,
{
    /// Constructor.
    pub fn new(
        inner_service: InnerServiceT,
        tokens: AuthTokenProvider,
        identity: Arc<IdentityT>,
        navigator: NavigatorRef,
        configuration: Arc<AuthConfiguration>,
    ) -> Self {
        Self { inner_service, tokens, identity, navigator, configuration }
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
    async fn handle(mut self, mut request: Request<Bytes>) -> Result<Response<Bytes>, PipelineError>
    where
        InnerServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError>,
    {
        let uri = request.uri().clone();
        let mut identity_error = None;

        if self.identity.has_session() || uri.to_string().contains(AUTH_METHOD_MSAL) {
            match self.identity.acquire_token_silent(&self.configuration.scopes).await {
                Ok(token) => {
                    tracing::debug!("identity token acquired: {}", uri);
                    self.tokens.set_token(token);
                    request.headers_mut().insert(AUTH_METHOD, HeaderValue::from_static(AUTH_METHOD_MSAL));
                }

                Err(error) => {
                    tracing::error!("silent token acquisition: {}", error);
                    identity_error = Some(error);
                }
            }
        }

        if let Some(token) = self.tokens.valid_token() {
            match request.headers_mut().set_bearer(&token) {
                Ok(()) => return self.inner_service.call(request).await,
                Err(error) => tracing::warn!("token is not a valid header value: {}", error),
            }
        }

        let location = self.navigator.current_location();
        if self.configuration.is_public(uri.path()) || self.configuration.is_public(&location) {
            tracing::debug!("public: {}", uri);
            return self.inner_service.call(request).await;
        }

        tracing::debug!("unauthenticated: {}", uri);
        self.navigator.navigate(Redirect::Login { return_to: Some(location) });

        match self.configuration.failure_policy {
            AuthFailurePolicy::Continue => self.inner_service.call(request).await,

            AuthFailurePolicy::Abort => Err(match identity_error {
                Some(error) => error.into(),
                None => PipelineError::Unauthenticated { uri: uri.to_string() },
            }),
        }
    }
}

impl<InnerServiceT, IdentityT> Clone for AuthService<InnerServiceT, IdentityT>
where
    InnerServiceT: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner_service: self.inner_service.clone(),
            tokens: self.tokens.clone(),
            identity: self.identity.clone(),
            navigator: self.navigator.clone(),
            configuration: self.configuration.clone(),
        }
    }
}

impl<InnerServiceT, IdentityT> Service<Request<Bytes>> for AuthService<InnerServiceT, IdentityT>
where
    InnerServiceT:
        'static + Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone + Send,
    InnerServiceT::Future: Send,
    IdentityT: IdentityProvider,
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
