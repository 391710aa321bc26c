mod common;

use {
    common::*,
    http::*,
    kdi_client_pipeline::{api::*, storage::*, *},
    serde_json::json,
    std::sync::*,
};

const NOW: Timestamp = 1_700_000_000_000;

fn backend() -> Backend {
    Backend::new(|method, path| match (method.as_str(), path) {
        ("GET", "/dashboard/clusters/owned") => (
            StatusCode::OK,
            json!({
                "clusters": [{ "ID": "c1", "Name": "dev", "Type": "openshift", "Address": "https://api.dev", "Token": "t" }],
                "size": 1,
            }),
        ),

        ("GET", "/dashboard/clustersets") => (StatusCode::OK, json!({ "sets": [] })),

        ("POST", "/dashboard/clusters") => (StatusCode::OK, json!({ "message": "Cluster added successfully" })),

        ("POST", "/dashboard/teamspaces") => {
            (StatusCode::CONFLICT, json!({ "message": "Teamspace with the same name already exists" }))
        }

        ("GET", "/dashboard/teamspaces/t1/projects") => (
            StatusCode::OK,
            json!({
                "teamspace": { "ID": "t1", "Name": "team", "CreatorID": "u1", "Members": null },
                "projects": [{ "ID": "p1", "Name": "shop", "Description": "", "TeamspaceID": "t1" }],
                "size": 1,
            }),
        ),

        ("GET", "/dashboard/projects/joinedTeamspaces") => (StatusCode::OK, json!({ "projects": [], "size": 0 })),

        ("PATCH", "/dashboard/teamspaces/t1/members") => (StatusCode::OK, json!({ "message": "Member added" })),

        ("GET", "/dashboard/environments/e1/microservices/m1") => (
            StatusCode::OK,
            json!({ "microservice": { "ID": "m1", "Name": "api", "namespace": "n1", "Replicas": 3 } }),
        ),

        ("GET", "/dashboard/namespaces/n1") => (StatusCode::OK, json!({ "namespace": "team-a" })),

        ("POST", "/login") => (StatusCode::OK, json!({ "message": "User logged successfully", "token": token(NOW / 1000 + 60) })),

        ("GET", "/health") => (StatusCode::OK, json!({ "status": "ok" })),

        _ => (StatusCode::NOT_FOUND, json!({ "message": "not found" })),
    })
}

fn client(backend: &Backend) -> (ApiClient<Pipeline<Backend>>, ClientContext, Arc<RecordingNavigator>) {
    init_tracing();
    let navigator = Arc::new(RecordingNavigator::new("/login"));
    let configuration = ClientConfiguration { api_url: API_URL.into(), ..Default::default() };
    let context = ClientContext::builder(configuration)
        .storage(Arc::new(MemoryStorage::new()))
        .clock(Arc::new(ManualClock::new(NOW)))
        .navigator(navigator.clone())
        .build();
    let client = ApiClient::from_context(&context, context.pipeline(backend.clone()));
    (client, context, navigator)
}

#[tokio::test]
async fn login_stores_token() {
    let backend = backend();
    let (client, context, _) = client(&backend);

    let user = User { email: "me@example.com".into(), password: "secret".into(), ..Default::default() };
    let response = client.login(&user).await.unwrap();

    assert_eq!(response.message.as_deref(), Some("User logged successfully"));
    assert!(context.tokens.is_authenticated());
    assert_eq!(context.tokens.token(), Some(token(NOW / 1000 + 60)));
}

#[tokio::test]
async fn mutation_invalidates_structurally() {
    let backend = backend();
    let (client, context, _) = client(&backend);
    context.tokens.set_token(token(NOW / 1000 + 60));

    let clusters = client.owned_clusters().await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind.as_deref(), Some("openshift"));

    let _: serde_json::Value = client.get("/dashboard/clustersets").await.unwrap();
    client.owned_clusters().await.unwrap();
    assert_eq!(backend.calls(), 2);

    let cluster = Cluster { name: "prod".into(), address: "https://api.prod".into(), ..Default::default() };
    let acknowledgement = client.add_cluster(&cluster).await.unwrap();
    assert_eq!(acknowledgement.message.as_deref(), Some("Cluster added successfully"));

    client.owned_clusters().await.unwrap();
    let _: serde_json::Value = client.get("/dashboard/clustersets").await.unwrap();

    let paths: Vec<_> = backend.requests().into_iter().map(|recorded| recorded.path).collect();
    assert_eq!(
        paths,
        ["/dashboard/clusters/owned", "/dashboard/clustersets", "/dashboard/clusters", "/dashboard/clusters/owned"]
    );
}

#[tokio::test]
async fn membership_change_invalidates_projects() {
    let backend = backend();
    let (client, context, _) = client(&backend);
    context.tokens.set_token(token(NOW / 1000 + 60));

    let projects = client.teamspace_projects("t1").await.unwrap();
    assert_eq!(projects[0].id, "p1");
    client.joined_teamspace_projects().await.unwrap();
    assert_eq!(context.cache.len(), 2);

    client.add_member("t1", "new@example.com", "developer").await.unwrap();
    assert!(context.cache.is_empty());
}

#[tokio::test]
async fn failed_mutation_keeps_cache() {
    let backend = backend();
    let (client, context, _) = client(&backend);
    context.tokens.set_token(token(NOW / 1000 + 60));

    client.teamspace_projects("t1").await.unwrap();

    let error = client.create_teamspace(&Teamspace { name: "team".into(), ..Default::default() }).await.unwrap_err();
    assert_eq!(error.status(), 409);
    assert_eq!(error.message(), Some("Teamspace with the same name already exists"));
    assert_eq!(context.cache.len(), 1);
}

#[tokio::test]
async fn typed_reads() {
    let backend = backend();
    let (client, context, navigator) = client(&backend);
    context.tokens.set_token(token(NOW / 1000 + 60));

    let microservice = client.microservice("e1", "m1").await.unwrap();
    assert_eq!(microservice.namespace_id, "n1");
    assert_eq!(microservice.replicas, 3);

    assert_eq!(client.namespace("n1").await.unwrap(), "team-a");
    assert!(client.health().await.unwrap());

    let error = client.project("nope").await.unwrap_err();
    assert_eq!(error.status(), 404);
    assert_eq!(navigator.last_redirect(), Some(Redirect::NotFound));
}

#[tokio::test]
async fn health_reports_down() {
    let backend = backend();
    let (client, _, navigator) = client(&backend);
    backend.set_down(true);

    assert!(!client.health().await.unwrap());
    assert_eq!(navigator.last_redirect(), Some(Redirect::ServiceUnavailable { return_to: "/login".into() }));
}
