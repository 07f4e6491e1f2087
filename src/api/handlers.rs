use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Coordinate, RecommendationResult, SourcePlaceRequest},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRef {
    pub coordinates: Coordinate,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub previous_city: CityRef,
    pub current_city: CityRef,
    pub source_places: Vec<SourcePlaceRequest>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub previous_city: CityRef,
    pub current_city: CityRef,
    pub results: Vec<RecommendationResult>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Recommends places near the current city matching the given source
/// places near the previous city.
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    // Any structural problem (missing fields, non-numeric coordinates,
    // source_places not a list) surfaces as one uniform 400.
    let Json(request) = payload
        .map_err(|_| AppError::InvalidInput("Invalid input structure".to_string()))?;

    if !request.previous_city.coordinates.is_valid() || !request.current_city.coordinates.is_valid()
    {
        return Err(AppError::InvalidInput("Invalid input structure".to_string()));
    }

    let results = state
        .pipeline
        .recommend(
            &request.previous_city.coordinates,
            &request.current_city.coordinates,
            &request.source_places,
        )
        .await?;

    Ok(Json(RecommendResponse {
        success: true,
        previous_city: request.previous_city,
        current_city: request.current_city,
        results,
    }))
}
