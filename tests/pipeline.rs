mod common;

use {
    common::*,
    http::{header::*, *},
    kdi_client_pipeline::{auth::*, cache::*, storage::*, *},
    std::{result::Result, sync::*, time::*},
    tower::ServiceExt,
};

const NOW: Timestamp = 1_700_000_000_000;

struct Harness {
    backend: Backend,
    clock: ManualClock,
    navigator: Arc<RecordingNavigator>,
    context: ClientContext,
}

impl Harness {
    fn new(configuration: ClientConfiguration, backend: Backend) -> Self {
        Self::with_storage(configuration, backend, Arc::new(MemoryStorage::new()))
    }

    fn with_storage(configuration: ClientConfiguration, backend: Backend, storage: StorageRef) -> Self {
        init_tracing();
        let clock = ManualClock::new(NOW);
        let navigator = Arc::new(RecordingNavigator::new("/clusters"));
        let context = ClientContext::builder(configuration)
            .storage(storage)
            .clock(Arc::new(clock.clone()))
            .navigator(navigator.clone())
            .build();
        Self { backend, clock, navigator, context }
    }

    fn authenticated(self) -> Self {
        self.context.tokens.set_token(token(NOW / 1000 + 3600));
        self
    }

    fn pipeline(&self) -> Pipeline<Backend> {
        self.context.pipeline(self.backend.clone())
    }

    async fn get(&self, path: &str) -> Result<Response<bytes::Bytes>, PipelineError> {
        self.pipeline().oneshot(request(Method::GET, path)).await
    }
}

#[tokio::test]
async fn cache_hit_avoids_network() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    let first = harness.get("/dashboard/clusters/owned").await.unwrap();
    assert_eq!(first.extensions().get::<CacheStatus>(), Some(&CacheStatus::Miss));

    let second = harness.get("/dashboard/clusters/owned").await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.extensions().get::<CacheStatus>(), Some(&CacheStatus::Hit));
    assert_eq!(second.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(json_body(&second), json_body(&first));

    assert_eq!(harness.backend.calls(), 1);
}

#[tokio::test]
async fn query_is_part_of_the_key() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    harness.get("/dashboard/clusters/owned?page=1").await.unwrap();
    harness.get("/dashboard/clusters/owned?page=2").await.unwrap();
    harness.get("/dashboard/clusters/owned?page=1").await.unwrap();

    assert_eq!(harness.backend.calls(), 2);
}

#[tokio::test]
async fn expiry_is_inclusive() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    harness.get("/dashboard/projects/owned").await.unwrap();

    harness.clock.advance(Duration::from_secs(299));
    harness.get("/dashboard/projects/owned").await.unwrap();
    assert_eq!(harness.backend.calls(), 1);

    // Exactly at expiresAt
    harness.clock.advance(Duration::from_secs(1));
    let response = harness.get("/dashboard/projects/owned").await.unwrap();
    assert_eq!(response.extensions().get::<CacheStatus>(), Some(&CacheStatus::Miss));
    assert_eq!(harness.backend.calls(), 2);
}

#[tokio::test]
async fn configured_duration() {
    let configuration = ClientConfiguration { cache_duration: Duration::from_secs(10), ..Default::default() };
    let harness = Harness::new(configuration, Backend::echo()).authenticated();

    harness.get("/dashboard/profiles").await.unwrap();
    harness.clock.advance(Duration::from_secs(10));
    harness.get("/dashboard/profiles").await.unwrap();

    assert_eq!(harness.backend.calls(), 2);
}

#[tokio::test]
async fn only_successful_gets_are_cached() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    harness.pipeline().oneshot(request(Method::POST, "/dashboard/clusters")).await.unwrap();
    harness.get("/dashboard/clusters/missing").await.unwrap();
    harness.get("/dashboard/clusters/missing").await.unwrap();
    harness.get("/health").await.unwrap();
    harness.get("/health").await.unwrap();

    assert_eq!(harness.backend.calls(), 5);
    assert!(harness.context.cache.is_empty());
}

#[tokio::test]
async fn mutation_invalidates_related_reads() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    harness.get("/dashboard/clusters/owned").await.unwrap();
    harness.get("/dashboard/clusters/c1").await.unwrap();
    harness.get("/dashboard/clustersets").await.unwrap();
    assert_eq!(harness.context.cache.len(), 3);

    assert_eq!(harness.context.cache.invalidate_resource("/dashboard/clusters"), 2);

    harness.get("/dashboard/clusters/owned").await.unwrap();
    harness.get("/dashboard/clustersets").await.unwrap();
    assert_eq!(harness.backend.calls(), 4);

    // The coarse form also catches the lookalike
    assert_eq!(harness.context.cache.delete_all_related("/dashboard/clusters"), 2);
}

#[tokio::test]
async fn unreachable_server_routes_to_service_unavailable() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();
    harness.backend.set_down(true);

    let error = harness.get("/dashboard/teamspaces/owned").await.unwrap_err();
    assert!(error.is_transport());
    assert_eq!(error.status(), 0);

    assert_eq!(
        harness.navigator.last_redirect(),
        Some(Redirect::ServiceUnavailable { return_to: "/clusters".into() })
    );
    assert_eq!(harness.navigator.current_location(), "/500");
}

#[tokio::test]
async fn not_found_routes_to_not_found() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    let response = harness.get("/dashboard/projects/missing").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.navigator.last_redirect(), Some(Redirect::NotFound));
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo()).authenticated();

    harness.get("/dashboard/users/current").await.unwrap();

    let recorded = harness.backend.last().unwrap();
    assert_eq!(recorded.authorization, Some(format!("Bearer {}", token(NOW / 1000 + 3600))));
    assert_eq!(recorded.auth_method, None);
    assert!(harness.navigator.redirects().is_empty());
}

#[tokio::test]
async fn expired_token_continues_unauthenticated() {
    let harness = Harness::new(ClientConfiguration::default(), Backend::echo());
    harness.context.tokens.set_token(token(NOW / 1000));

    harness.get("/dashboard/users/current").await.unwrap();

    let recorded = harness.backend.last().unwrap();
    assert_eq!(recorded.authorization, None);
    assert_eq!(
        harness.navigator.last_redirect(),
        Some(Redirect::Login { return_to: Some("/clusters".into()) })
    );
}

#[tokio::test]
async fn abort_policy_fails_without_network() {
    let configuration = ClientConfiguration { auth_failure_policy: AuthFailurePolicy::Abort, ..Default::default() };
    let harness = Harness::new(configuration, Backend::echo());

    let error = harness.get("/dashboard/clusters/owned").await.unwrap_err();
    assert!(matches!(error, PipelineError::Unauthenticated { .. }));
    assert_eq!(harness.backend.calls(), 0);
    assert_eq!(harness.navigator.current_location(), "/login");
}

#[tokio::test]
async fn public_routes_are_never_redirected() {
    let configuration = ClientConfiguration { auth_failure_policy: AuthFailurePolicy::Abort, ..Default::default() };
    let harness = Harness::new(configuration, Backend::echo());

    harness.pipeline().oneshot(request(Method::POST, "/login")).await.unwrap();
    harness.pipeline().oneshot(request(Method::POST, "/register")).await.unwrap();

    // The user is on the login page, so anything goes
    harness.navigator.go("/login");
    harness.get("/dashboard/profiles").await.unwrap();

    assert_eq!(harness.backend.calls(), 3);
    assert!(harness.navigator.redirects().is_empty());
}

#[tokio::test]
async fn concurrent_identical_gets_share_one_call() {
    let harness =
        Harness::new(ClientConfiguration::default(), Backend::echo().with_delay(Duration::from_millis(50))).authenticated();

    // Separate pipelines from the same context
    let (first, second) = tokio::join!(
        harness.get("/dashboard/environments/ByCluster"),
        harness.get("/dashboard/environments/ByCluster"),
    );

    assert_eq!(json_body(&first.unwrap()), json_body(&second.unwrap()));
    assert_eq!(harness.backend.calls(), 1);
}

#[tokio::test]
async fn concurrent_gets_without_coalescing() {
    let configuration = ClientConfiguration { coalesce_in_flight: false, ..Default::default() };
    let harness = Harness::new(configuration, Backend::echo().with_delay(Duration::from_millis(20))).authenticated();

    let (first, second) = tokio::join!(
        harness.get("/dashboard/environments/ByCluster"),
        harness.get("/dashboard/environments/ByCluster"),
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(harness.backend.calls(), 2);
}

#[tokio::test]
async fn logout_clears_token_cache_and_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let harness =
        Harness::with_storage(ClientConfiguration::default(), Backend::echo(), storage.clone()).authenticated();

    harness.get("/dashboard/teamspaces/joined").await.unwrap();
    assert!(!harness.context.cache.is_empty());
    assert!(storage.get_item("httpCache").unwrap().is_some());
    assert!(storage.get_item("api.accessToken").unwrap().is_some());

    harness.context.logout();

    assert!(!harness.context.tokens.has_token());
    assert!(harness.context.cache.is_empty());
    assert!(storage.is_empty());

    harness.get("/dashboard/teamspaces/joined").await.unwrap();
    assert_eq!(harness.backend.calls(), 2);
}

#[tokio::test]
async fn cache_and_token_survive_restart() {
    let directory = tempfile::tempdir().unwrap();

    let storage: StorageRef = Arc::new(FileStorage::new(directory.path()).unwrap());
    let harness = Harness::with_storage(ClientConfiguration::default(), Backend::echo(), storage).authenticated();
    harness.get("/dashboard/clusters/owned").await.unwrap();

    // "Reload"
    let storage: StorageRef = Arc::new(FileStorage::new(directory.path()).unwrap());
    let reloaded = Harness::with_storage(ClientConfiguration::default(), Backend::echo(), storage);

    assert!(reloaded.context.tokens.is_authenticated());
    let response = reloaded.get("/dashboard/clusters/owned").await.unwrap();
    assert_eq!(response.extensions().get::<CacheStatus>(), Some(&CacheStatus::Hit));
    assert_eq!(reloaded.backend.calls(), 0);
}

#[tokio::test]
async fn storage_failure_keeps_serving_from_memory() {
    let storage = Arc::new(MemoryStorage::with_quota(64));
    let harness = Harness::with_storage(ClientConfiguration::default(), Backend::echo(), storage);

    harness.navigator.go("/login");

    harness.get("/dashboard/profiles").await.unwrap();
    assert!(harness.context.cache.is_memory_only());

    let response = harness.get("/dashboard/profiles").await.unwrap();
    assert_eq!(response.extensions().get::<CacheStatus>(), Some(&CacheStatus::Hit));
    assert_eq!(harness.backend.calls(), 1);
}

#[derive(Debug)]
struct SessionIdentity {
    session: bool,
    result: Result<String, String>,
}

impl IdentityProvider for SessionIdentity {
    fn has_session(&self) -> bool {
        self.session
    }

    async fn acquire_token_silent(&self, scopes: &[String]) -> Result<String, IdentityError> {
        assert_eq!(scopes, ["api://kdi/access"]);
        self.result.clone().map_err(IdentityError::InteractionRequired)
    }
}

fn identity_context(
    result: Result<String, String>,
    policy: AuthFailurePolicy,
) -> (ClientContext<SessionIdentity>, Arc<RecordingNavigator>) {
    identity_context_with_session(true, result, policy)
}

fn identity_context_with_session(
    session: bool,
    result: Result<String, String>,
    policy: AuthFailurePolicy,
) -> (ClientContext<SessionIdentity>, Arc<RecordingNavigator>) {
    let mut configuration = ClientConfiguration { auth_failure_policy: policy, ..Default::default() };
    configuration.identity.scopes = vec!["api://kdi/access".into()];

    let navigator = Arc::new(RecordingNavigator::new("/projects"));
    let context = ClientContext::builder(configuration)
        .clock(Arc::new(ManualClock::new(NOW)))
        .navigator(navigator.clone())
        .identity(Arc::new(SessionIdentity { session, result }))
        .build();
    (context, navigator)
}

#[tokio::test]
async fn identity_session_marks_request() {
    let backend = Backend::echo();
    let (context, navigator) = identity_context(Ok(token(NOW / 1000 + 60)), AuthFailurePolicy::Continue);

    context.pipeline(backend.clone()).oneshot(request(Method::GET, "/dashboard/users/current")).await.unwrap();

    let recorded = backend.last().unwrap();
    assert_eq!(recorded.auth_method.as_deref(), Some(AUTH_METHOD_MSAL));
    assert_eq!(recorded.authorization, Some(format!("Bearer {}", token(NOW / 1000 + 60))));
    assert!(context.tokens.is_authenticated());
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn identity_failure_under_abort() {
    let backend = Backend::echo();
    let (context, navigator) =
        identity_context(Err("consent required".into()), AuthFailurePolicy::Abort);

    let error =
        context.pipeline(backend.clone()).oneshot(request(Method::GET, "/dashboard/projects/owned")).await.unwrap_err();

    assert!(matches!(error, PipelineError::Identity(IdentityError::InteractionRequired(_))));
    assert_eq!(backend.calls(), 0);
    assert_eq!(navigator.last_redirect(), Some(Redirect::Login { return_to: Some("/projects".into()) }));
}

#[tokio::test]
async fn guard_activates_with_session() {
    let (context, navigator) = identity_context(Ok(token(NOW / 1000 + 60)), AuthFailurePolicy::Continue);
    assert!(context.guard().can_activate("/teamspaces").await);
    assert!(navigator.redirects().is_empty());

    let (context, navigator) = identity_context(Err("no account".into()), AuthFailurePolicy::Continue);
    assert!(!context.guard().can_activate("/teamspaces").await);
    assert_eq!(navigator.last_redirect(), Some(Redirect::Login { return_to: Some("/teamspaces".into()) }));
}

#[tokio::test]
async fn msal_route_takes_identity_path_without_session() {
    let backend = Backend::echo();
    let (context, navigator) =
        identity_context_with_session(false, Ok(token(NOW / 1000 + 60)), AuthFailurePolicy::Abort);

    context.pipeline(backend.clone()).oneshot(request(Method::POST, "/register/msal")).await.unwrap();

    let recorded = backend.last().unwrap();
    assert_eq!(recorded.path, "/register/msal");
    assert_eq!(recorded.auth_method.as_deref(), Some(AUTH_METHOD_MSAL));
    assert!(context.tokens.is_authenticated());
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn msal_route_is_public_without_identity_provider() {
    let configuration = ClientConfiguration { auth_failure_policy: AuthFailurePolicy::Abort, ..Default::default() };
    let harness = Harness::new(configuration, Backend::echo());

    let response = harness.pipeline().oneshot(request(Method::POST, "/register/msal")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recorded = harness.backend.last().unwrap();
    assert_eq!(recorded.auth_method, None);
    assert_eq!(recorded.authorization, None);
    assert!(harness.navigator.redirects().is_empty());
}
