use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relocate_api::{
    api::{create_router, AppState},
    config::Config,
    services::{
        providers::{
            DistanceProvider, GoogleDistanceProvider, GooglePlacesProvider,
            OpenAiComparisonOracle, PlaceProvider,
        },
        DistanceResolver, RecommendationPipeline, SimilarityScorer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let places: Arc<dyn PlaceProvider> = Arc::new(GooglePlacesProvider::new(
        config.places_api_key.clone(),
        config.places_api_url.clone(),
        config.http_timeout_secs,
    )?);

    let distance_provider: Option<Arc<dyn DistanceProvider>> = match &config.google_maps_api_key {
        Some(key) => Some(Arc::new(GoogleDistanceProvider::new(
            key.clone(),
            config.distance_matrix_api_url.clone(),
            config.http_timeout_secs,
        )?)),
        None => {
            tracing::warn!(
                "GOOGLE_MAPS_API_KEY not set; driving distances degrade to haversine estimates"
            );
            None
        }
    };

    let oracle = Arc::new(OpenAiComparisonOracle::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        config.http_timeout_secs,
    )?);

    let pipeline = Arc::new(RecommendationPipeline::new(
        places,
        DistanceResolver::new(distance_provider),
        SimilarityScorer::new(oracle),
        config.pipeline(),
    ));

    let state = AppState::new(pipeline);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
