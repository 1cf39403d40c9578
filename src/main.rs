use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_recommender_api::{
    api::{create_router, AppState},
    config::Config,
    services::{load_recommender, JsonArtifacts, PosterUrls},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Load and validate the catalog and similarity table before serving
    let mut artifacts = JsonArtifacts::new(&config.catalog_path, &config.similarity_path);
    if let Some(path) = &config.vectorizer_path {
        artifacts = artifacts.with_vectorizer(path);
    }
    artifacts
        .check_vectorizer()
        .context("Vectorizer artifact unavailable")?;

    let posters = PosterUrls {
        base_url: config.poster_base_url.clone(),
        placeholder_url: config.placeholder_poster_url.clone(),
    };
    let recommender =
        load_recommender(&artifacts, posters).context("Failed to load recommendation data")?;

    let state = AppState::new(recommender, config.default_top_n, config.max_top_n);
    let app = create_router(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
