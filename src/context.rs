use super::{
    auth::*,
    cache::{middleware::*, *},
    clock::*,
    configuration::*,
    layer::*,
    navigation::*,
    routing::*,
    service::*,
    storage::*,
};

use {std::sync::*, tower::*};

/// The full request pipeline: auth, then caching, then error routing, then the transport.
pub type Pipeline<TransportT, IdentityT = NoIdentityProvider> =
    AuthService<CachingService<ErrorRoutingService<TransportT>, ResponseCache>, IdentityT>;

//
// ClientContext
//

/// Everything the request pipeline shares across requests.
///
/// Owns the response cache, the token provider, the navigator, and the identity provider.
/// Logging out clears the cache: the context registers it as a logout hook.
///
/// Clones share the same state.
#[derive(Debug)]
pub struct ClientContext<IdentityT = NoIdentityProvider> {
    /// Configuration.
    pub configuration: Arc<ClientConfiguration>,

    /// Durable storage.
    pub storage: StorageRef,

    /// Clock.
    pub clock: ClockRef,

    /// Response cache.
    pub cache: ResponseCache,

    /// Requests waiting on the transport, shared by all pipelines.
    pub in_flight: InFlightRequests,

    /// Token provider.
    pub tokens: AuthTokenProvider,

    /// Navigator.
    pub navigator: NavigatorRef,

    /// Identity provider.
    pub identity: Arc<IdentityT>,
}

impl ClientContext {
    /// Builder.
    pub fn builder(configuration: ClientConfiguration) -> ClientContextBuilder {
        ClientContextBuilder::new(configuration)
    }
}

impl<IdentityT> ClientContext<IdentityT>
where
    IdentityT: IdentityProvider,
{
    /// Wrap a transport in the pipeline.
    pub fn pipeline<TransportT>(&self, transport: TransportT) -> Pipeline<TransportT, IdentityT> {
        ServiceBuilder::new()
            .layer(self.auth_layer())
            .layer(self.caching_layer())
            .layer(self.error_routing_layer())
            .service(transport)
    }

    /// Auth stage.
    pub fn auth_layer(&self) -> AuthLayer<IdentityT> {
        let auth = self.configuration.auth();
        AuthLayer::new(self.tokens.clone(), self.navigator.clone())
            .identity(self.identity.clone())
            .scopes(auth.scopes)
            .public_routes(&self.configuration.public_routes)
            .failure_policy(auth.failure_policy)
    }

    /// Caching stage.
    pub fn caching_layer(&self) -> CachingLayer {
        CachingLayer::default()
            .cache(self.cache.clone())
            .in_flight(self.in_flight.clone())
            .uncacheable(&self.configuration.uncacheable)
            .default_duration(self.configuration.cache_duration)
            .coalesce_in_flight(self.configuration.coalesce_in_flight)
    }

    /// Error routing stage.
    pub fn error_routing_layer(&self) -> ErrorRoutingLayer {
        ErrorRoutingLayer::new(self.navigator.clone())
    }

    /// Route guard.
    pub fn guard(&self) -> AuthGuard<IdentityT> {
        AuthGuard::new(
            self.tokens.clone(),
            self.identity.clone(),
            self.navigator.clone(),
            Arc::new(self.configuration.auth()),
        )
    }

    /// Log out.
    ///
    /// Forgets the token, clears the response cache, and clears storage.
    pub fn logout(&self) {
        self.tokens.logout();
    }
}

impl<IdentityT> Clone for ClientContext<IdentityT> {
    fn clone(&self) -> Self {
        Self {
            configuration: self.configuration.clone(),
            storage: self.storage.clone(),
            clock: self.clock.clone(),
            cache: self.cache.clone(),
            in_flight: self.in_flight.clone(),
            tokens: self.tokens.clone(),
            navigator: self.navigator.clone(),
            identity: self.identity.clone(),
        }
    }
}

//
// ClientContextBuilder
//

/// [ClientContext] builder.
#[derive(Debug)]
pub struct ClientContextBuilder<IdentityT = NoIdentityProvider> {
    configuration: ClientConfiguration,
    storage: Option<StorageRef>,
    clock: Option<ClockRef>,
    navigator: Option<NavigatorRef>,
    identity: Arc<IdentityT>,
}

impl ClientContextBuilder {
    /// Constructor.
    pub fn new(configuration: ClientConfiguration) -> Self {
        Self { configuration, storage: None, clock: None, navigator: None, identity: Default::default() }
    }
}

impl<IdentityT> ClientContextBuilder<IdentityT>
where
    IdentityT: IdentityProvider,
{
    /// Durable storage.
    ///
    /// The default is a fresh [MemoryStorage].
    pub fn storage(mut self, storage: StorageRef) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Clock.
    ///
    /// The default is [SystemClock].
    pub fn clock(mut self, clock: ClockRef) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Navigator.
    ///
    /// The default is a [RecordingNavigator] at "/".
    pub fn navigator(mut self, navigator: NavigatorRef) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Identity provider.
    ///
    /// The default is [NoIdentityProvider].
    pub fn identity<NewIdentityT>(self, identity: Arc<NewIdentityT>) -> ClientContextBuilder<NewIdentityT> {
        ClientContextBuilder {
            configuration: self.configuration,
            storage: self.storage,
            clock: self.clock,
            navigator: self.navigator,
            identity,
        }
    }

    /// Build.
    ///
    /// Restores the response cache and the token from storage.
    pub fn build(self) -> ClientContext<IdentityT> {
        let storage = self.storage.unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(RecordingNavigator::default()));

        let cache = ResponseCache::builder(storage.clone())
            .storage_key(self.configuration.cache_storage_key.clone())
            .clock(clock.clone())
            .default_duration(self.configuration.cache_duration)
            .restore();

        let tokens =
            AuthTokenProvider::with_storage_key(storage.clone(), self.configuration.token_storage_key.clone(), clock.clone());

        let cache_to_clear = cache.clone();
        tokens.on_logout(move || cache_to_clear.clear());

        ClientContext {
            configuration: Arc::new(self.configuration),
            storage,
            clock,
            cache,
            in_flight: Default::default(),
            tokens,
            navigator,
            identity: self.identity,
        }
    }
}
