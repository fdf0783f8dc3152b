use std::sync::Arc;

use anime_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::providers::{AnimeDataSource, JikanProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anime_recommender=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = JikanProvider::new(&config.jikan_api_url, &config.user_agent)?;
    let data_source: Arc<dyn AnimeDataSource> = Arc::new(provider);

    tracing::info!(
        provider = data_source.name(),
        api_url = %config.jikan_api_url,
        threshold_ratio = config.genre_threshold_ratio,
        min_count = config.genre_min_count,
        "Recommendation engine configured"
    );

    let state = AppState::with_data_source(data_source, config.affinity());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
