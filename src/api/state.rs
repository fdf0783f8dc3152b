use std::sync::Arc;

use crate::services::{
    genre_affinity::AffinityConfig, providers::AnimeDataSource,
    recommendations::RecommendationEngine,
};

/// Shared application state
///
/// The engine holds no per-request data, so one instance serves every request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Builds the engine around `data_source`
    pub fn with_data_source(
        data_source: Arc<dyn AnimeDataSource>,
        affinity: AffinityConfig,
    ) -> Self {
        Self::new(RecommendationEngine::new(data_source, affinity))
    }
}
