use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{middleware::RequestId, models::RecommendationResult};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Missing is treated like blank
    #[serde(default)]
    pub username: String,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommendations for one user
///
/// Always 200: upstream failures come back as a placeholder entry in the body.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> Json<RecommendationResult> {
    tracing::info!(
        request_id = %request_id,
        username = %query.username,
        "Processing recommendation request"
    );

    let result = state.engine.recommend(&query.username).await;

    tracing::info!(
        request_id = %request_id,
        entries = result.animes.len(),
        genres = result.genres.len(),
        "Recommendation request completed"
    );

    Json(result)
}
