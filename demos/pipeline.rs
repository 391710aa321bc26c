use {
    kdi_client_pipeline::{api::*, transport::*, *},
    std::{sync::*, time::*},
    tokio::*,
    tracing_subscriber::{EnvFilter, fmt::time::LocalTime},
};

// KDI client pipeline against a live API
//
// Pay attention to the tracing log to see what the pipeline stages are doing!
//
// Point it at a server with:
//
//   KDI_API_URL=http://localhost:8080/api cargo run --example pipeline
//
// To log in first:
//
//   KDI_EMAIL=me@example.com KDI_PASSWORD=secret cargo run --example pipeline

#[main]
async fn main() {
    init_tracing();

    let configuration = match ClientConfiguration::from_env() {
        Ok(configuration) => configuration,
        Err(error) => {
            tracing::error!("{}", error);
            return;
        }
    };

    let navigator = Arc::new(RecordingNavigator::new("/clusters"));
    let context = ClientContext::builder(configuration).navigator(navigator.clone()).build();
    let client = ApiClient::from_context(&context, context.pipeline(ReqwestTransport::default()));

    match client.health().await {
        Ok(true) => tracing::info!("server is up: {}", client.api_url()),
        Ok(false) => {
            tracing::error!("server is down: {}", client.api_url());
            return;
        }
        Err(error) => tracing::warn!("health: {}", error),
    }

    if let (Ok(email), Ok(password)) = (std::env::var("KDI_EMAIL"), std::env::var("KDI_PASSWORD")) {
        let user = User { email, password, ..Default::default() };
        if let Err(error) = client.login(&user).await {
            tracing::error!("login: {}", error);
        }
    }

    // The second listing should be served from the cache
    for _ in 0..2 {
        let start = Instant::now();
        match client.owned_clusters().await {
            Ok(clusters) => tracing::info!("{} clusters in {:?}", clusters.len(), start.elapsed()),
            Err(error) => tracing::error!("clusters: {}", error),
        }
    }

    for redirect in navigator.redirects() {
        tracing::info!("navigated: {}", redirect);
    }

    context.logout();
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_timer(LocalTime::rfc_3339())
        .init();
}
