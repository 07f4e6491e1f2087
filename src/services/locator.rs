use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Candidate, Coordinate, PlaceCategory},
    services::providers::PlaceProvider,
};

/// Finds candidate places of a category near a location.
///
/// Thin wrapper over the place provider that refuses malformed input with
/// an empty list instead of an upstream call or an error.
#[derive(Clone)]
pub struct CandidateLocator {
    provider: Arc<dyn PlaceProvider>,
}

impl CandidateLocator {
    pub fn new(provider: Arc<dyn PlaceProvider>) -> Self {
        Self { provider }
    }

    pub async fn find_nearby(
        &self,
        location: &Coordinate,
        category: PlaceCategory,
        radius_m: f64,
        limit: usize,
    ) -> AppResult<Vec<Candidate>> {
        if !location.is_valid() || !radius_m.is_finite() || radius_m <= 0.0 {
            tracing::warn!(
                lat = location.lat,
                lng = location.lng,
                radius_m = radius_m,
                "Rejecting malformed nearby search input"
            );
            return Ok(Vec::new());
        }

        self.provider
            .find_nearby(location, category, radius_m, limit)
            .await
    }
}

/// Search radius scaled to how far the source place sits from its city
/// center, so candidates at a comparable relative distance fit inside it.
pub fn search_radius_m(source_distance_km: f64, margin_m: f64, min_radius_m: f64) -> f64 {
    (source_distance_km * 1000.0 + margin_m).max(min_radius_m)
}
