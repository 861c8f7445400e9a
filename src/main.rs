use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

use activity_finder::{
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::catch_panic_layer,
    routes::router,
    services::{ServiceContext, aggregator::ActivityAggregator},
    state::AppState,
    upstream::{BoredClient, UnsplashClient, http_client},
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg);

    let db = connection::connect(&cfg.database).await?;

    let client = http_client(Duration::from_secs(cfg.upstream.timeout_secs))
        .context("failed to build HTTP client")?;
    let activities = BoredClient::new(client.clone(), cfg.upstream.activity_url.clone());
    let images = UnsplashClient::new(
        client,
        cfg.upstream.image_url.clone(),
        cfg.upstream.image_access_key.clone(),
    );
    if cfg.upstream.image_access_key.is_empty() {
        tracing::warn!("no image access key configured; image lookups will fail");
    }
    let aggregator = ActivityAggregator::new(Arc::new(activities), Arc::new(images));

    let services = ServiceContext::new(&db, &cfg.session, aggregator);
    let state = AppState::new(cfg, db, services);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.general.host, state.config.general.port
    )
    .parse()
    .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
