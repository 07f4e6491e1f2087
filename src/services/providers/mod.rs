/// External provider abstractions
///
/// This module provides a pluggable architecture for the three collaborator
/// categories the pipeline depends on: driving distance, place search and
/// details, and AI review comparison. Each category gets its own trait so
/// credentials and failure policies stay independent (distance has a
/// geometric fallback; the other two do not).
use crate::{
    error::AppResult,
    models::{Candidate, Coordinate, DistanceResult, PlaceCategory, ResolvedPlace},
};

pub mod google_maps;
pub mod google_places;
pub mod openai;

pub use google_maps::GoogleDistanceProvider;
pub use google_places::GooglePlacesProvider;
pub use openai::OpenAiComparisonOracle;

/// Traffic-aware driving distance between two coordinates.
///
/// Implementations may fail or time out; callers that need a guaranteed
/// answer wrap this in [`crate::services::distance::DistanceResolver`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn driving_distance(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> AppResult<DistanceResult>;
}

/// Place search and detail lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Resolve a place by name, biased to the given coordinates, into a
    /// full comparable profile.
    async fn resolve_place(
        &self,
        name: &str,
        category: PlaceCategory,
        near: &Coordinate,
    ) -> AppResult<ResolvedPlace>;

    /// Up to `limit` places of `category` within `radius_m` of `location`.
    ///
    /// An empty upstream result set is a valid outcome, returned as an
    /// empty vec rather than an error.
    async fn find_nearby(
        &self,
        location: &Coordinate,
        category: PlaceCategory,
        radius_m: f64,
        limit: usize,
    ) -> AppResult<Vec<Candidate>>;

    /// Full detail profile for a known place id.
    async fn place_details(
        &self,
        place_id: &str,
        category: PlaceCategory,
    ) -> AppResult<ResolvedPlace>;
}

/// Review-grounded similarity judgment produced by the comparison oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewComparison {
    /// In `[0, 10]`; implementations reject anything outside the range
    pub similarity: f64,
    pub reasoning: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Language-model-backed comparison of two places' review text.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ComparisonOracle: Send + Sync {
    /// Compare the review text of two same-category places.
    ///
    /// Malformed or out-of-range output is an error here; the scorer
    /// translates any error into a degraded result.
    async fn compare_reviews(
        &self,
        source: &ResolvedPlace,
        candidate: &ResolvedPlace,
    ) -> AppResult<ReviewComparison>;
}
