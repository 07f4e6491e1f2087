use std::sync::Arc;

use crate::{
    config::PipelineConfig,
    error::AppResult,
    models::{
        Candidate, Coordinate, PlaceCategory, RecommendationResult, RecommendedPlace,
        ResolvedPlace, SourcePlaceRequest, SourcePlaceSummary,
    },
    services::{
        distance::{round2, DistanceResolver},
        locator::{search_radius_m, CandidateLocator},
        providers::PlaceProvider,
        scoring::SimilarityScorer,
    },
};

/// Tolerance around the source distance when banding candidates, in km
const BAND_TOLERANCE_KM: f64 = 1.0;

/// Orchestrates the full matching flow: resolve each source place, derive
/// its distance band, fetch and filter candidates, score survivors, and
/// assemble one result entry per valid source place.
///
/// Source places run sequentially to bound outbound call concurrency;
/// candidates within one source place are evaluated concurrently with
/// per-candidate failure isolation.
#[derive(Clone)]
pub struct RecommendationPipeline {
    places: Arc<dyn PlaceProvider>,
    locator: CandidateLocator,
    distance: DistanceResolver,
    scorer: SimilarityScorer,
    config: PipelineConfig,
}

impl RecommendationPipeline {
    pub fn new(
        places: Arc<dyn PlaceProvider>,
        distance: DistanceResolver,
        scorer: SimilarityScorer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            locator: CandidateLocator::new(Arc::clone(&places)),
            places,
            distance,
            scorer,
            config,
        }
    }

    pub async fn recommend(
        &self,
        previous_city: &Coordinate,
        current_city: &Coordinate,
        source_places: &[SourcePlaceRequest],
    ) -> AppResult<Vec<RecommendationResult>> {
        let mut results = Vec::new();

        for place in source_places {
            let Some(category) = validate_source_place(place) else {
                tracing::warn!(name = %place.name, category = %place.category, "Skipping invalid source place");
                continue;
            };

            let result = self
                .process_source_place(previous_city, current_city, place, category)
                .await?;

            results.push(result);
        }

        Ok(results)
    }

    async fn process_source_place(
        &self,
        previous_city: &Coordinate,
        current_city: &Coordinate,
        place: &SourcePlaceRequest,
        category: PlaceCategory,
    ) -> AppResult<RecommendationResult> {
        let source = self
            .places
            .resolve_place(&place.name, category, &place.coordinates)
            .await?;

        let source_distance_km = self
            .distance
            .resolve(previous_city, &source.coordinates)
            .await
            .distance_km;

        let radius_m = search_radius_m(
            source_distance_km,
            self.config.search_radius_margin_m,
            self.config.min_search_radius_m,
        );

        let candidates = self
            .locator
            .find_nearby(current_city, category, radius_m, self.config.max_candidates)
            .await?;

        // Density reflects everything the search found, not just what
        // survives the band.
        let nearby_count = candidates.len();

        let (lower_km, upper_km) = distance_band(
            source_distance_km,
            self.config.band_floor_km,
            self.config.band_ceiling_km,
        );

        tracing::info!(
            source = %source.name,
            source_distance_km = source_distance_km,
            radius_m = radius_m,
            candidates = nearby_count,
            band = ?(lower_km, upper_km),
            "Evaluating candidates"
        );

        let mut tasks = Vec::new();
        for candidate in candidates {
            let pipeline = self.clone();
            let source = source.clone();
            let current = *current_city;

            tasks.push(tokio::spawn(async move {
                pipeline
                    .evaluate_candidate(current, candidate, source, category, lower_km, upper_km, nearby_count)
                    .await
            }));
        }

        let mut recommended_places = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Ok(Some(place))) => recommended_places.push(place),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Candidate evaluation failed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Candidate task join error");
                }
            }
        }

        Ok(RecommendationResult {
            source_place: SourcePlaceSummary {
                place: source,
                distance_from_previous_city_km: round2(source_distance_km),
            },
            recommended_places,
        })
    }

    /// Evaluates one candidate: distance, band filter, detail fetch,
    /// similarity score. `None` means the candidate fell outside the band.
    #[allow(clippy::too_many_arguments)]
    async fn evaluate_candidate(
        &self,
        current_city: Coordinate,
        candidate: Candidate,
        source: ResolvedPlace,
        category: PlaceCategory,
        lower_km: f64,
        upper_km: f64,
        nearby_count: usize,
    ) -> AppResult<Option<RecommendedPlace>> {
        let driving = self
            .distance
            .resolve(&current_city, &candidate.coordinates)
            .await;
        let candidate_km = driving.distance_km;

        if candidate_km < lower_km || candidate_km > upper_km {
            tracing::debug!(
                candidate = %candidate.name,
                candidate_km = candidate_km,
                "Candidate outside distance band"
            );
            return Ok(None);
        }

        let profile = self.places.place_details(&candidate.place_id, category).await?;

        let similarity = self
            .scorer
            .score(&source, &profile, candidate_km, nearby_count)
            .await;

        Ok(Some(RecommendedPlace {
            place: profile,
            driving_distance_from_current_city_km: round2(candidate_km),
            driving_duration: driving.duration_text,
            driving_duration_in_traffic: driving.duration_in_traffic_text,
            similarity,
        }))
    }
}

/// A good replacement sits at a similar relative distance from the new city
/// center as the original did from the old one, within ±1 km. Floor and
/// ceiling guard against degenerate bands near zero.
pub fn distance_band(source_distance_km: f64, floor_km: f64, ceiling_km: f64) -> (f64, f64) {
    let lower = (source_distance_km - BAND_TOLERANCE_KM).max(floor_km);
    let upper = (source_distance_km + BAND_TOLERANCE_KM).max(ceiling_km);
    (lower, upper)
}

/// Validates a raw source place entry; returns the normalized category for
/// usable ones.
pub fn validate_source_place(place: &SourcePlaceRequest) -> Option<PlaceCategory> {
    if place.name.trim().is_empty() || !place.coordinates.is_valid() {
        return None;
    }
    PlaceCategory::from_raw(&place.category)
}
