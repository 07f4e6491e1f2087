use std::sync::Arc;

use crate::{
    models::{ResolvedPlace, SimilarityResult},
    services::providers::ComparisonOracle,
};

const AI_WEIGHT: f64 = 0.7;
const DISTANCE_WEIGHT: f64 = 0.2;
const DENSITY_WEIGHT: f64 = 0.1;

/// Distance at or under which a candidate scores the full 10, in km
const DISTANCE_FULL_SCORE_KM: f64 = 1.0;
/// Distance at or beyond which a candidate scores 0, in km
const DISTANCE_ZERO_SCORE_KM: f64 = 10.0;
/// Nearby-candidate count at which density saturates at 10
const DENSITY_SATURATION_COUNT: usize = 20;

/// Blends the AI review-similarity rating with distance and density
/// sub-scores into one final score.
///
/// An oracle failure never propagates; the scorer returns a degraded
/// result so every surviving candidate still gets an entry.
#[derive(Clone)]
pub struct SimilarityScorer {
    oracle: Arc<dyn ComparisonOracle>,
}

impl SimilarityScorer {
    pub fn new(oracle: Arc<dyn ComparisonOracle>) -> Self {
        Self { oracle }
    }

    pub async fn score(
        &self,
        source: &ResolvedPlace,
        candidate: &ResolvedPlace,
        distance_km: f64,
        nearby_count: usize,
    ) -> SimilarityResult {
        match self.oracle.compare_reviews(source, candidate).await {
            Ok(comparison) => {
                let distance_score = normalize_distance_score(distance_km);
                let density_score = normalize_density_score(nearby_count);
                let final_score = AI_WEIGHT * comparison.similarity
                    + DISTANCE_WEIGHT * distance_score
                    + DENSITY_WEIGHT * density_score;

                SimilarityResult {
                    similarity_score: Some(round1(final_score)),
                    ai_similarity: comparison.similarity,
                    distance_score,
                    density_score,
                    reasoning: comparison.reasoning,
                    pros: comparison.pros,
                    cons: comparison.cons,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    candidate = %candidate.name,
                    "Review comparison failed, returning degraded similarity"
                );
                SimilarityResult::unavailable()
            }
        }
    }
}

impl SimilarityResult {
    /// Degraded result used when the AI comparison is unavailable:
    /// `None` marks "no signal" as distinct from a confirmed zero.
    pub fn unavailable() -> Self {
        Self {
            similarity_score: None,
            ai_similarity: 0.0,
            distance_score: 0.0,
            density_score: 0.0,
            reasoning: "AI-based comparison unavailable".to_string(),
            pros: Vec::new(),
            cons: Vec::new(),
        }
    }
}

/// 10 at ≤1 km, 0 at ≥10 km, linear in between.
pub fn normalize_distance_score(distance_km: f64) -> f64 {
    if distance_km <= DISTANCE_FULL_SCORE_KM {
        return 10.0;
    }
    if distance_km >= DISTANCE_ZERO_SCORE_KM {
        return 0.0;
    }
    round1(10.0 - distance_km)
}

/// 10 at ≥20 nearby candidates, proportional below.
pub fn normalize_density_score(nearby_count: usize) -> f64 {
    if nearby_count >= DENSITY_SATURATION_COUNT {
        return 10.0;
    }
    round1(nearby_count as f64 / DENSITY_SATURATION_COUNT as f64 * 10.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Coordinate, PlaceCategory};
    use crate::services::providers::{MockComparisonOracle, ReviewComparison};

    fn profile(name: &str) -> ResolvedPlace {
        ResolvedPlace {
            place_id: format!("id-{name}"),
            name: name.to_string(),
            category: PlaceCategory::Gym,
            coordinates: Coordinate { lat: 19.07, lng: 72.87 },
            rating: Some(4.5),
            review_count: Some(120),
            price_level: Some(2),
            reviews: vec!["solid".to_string()],
            service_tags: vec!["gym".to_string()],
        }
    }

    #[test]
    fn test_distance_score_boundaries() {
        assert_eq!(normalize_distance_score(0.0), 10.0);
        assert_eq!(normalize_distance_score(1.0), 10.0);
        assert_eq!(normalize_distance_score(10.0), 0.0);
        assert_eq!(normalize_distance_score(25.0), 0.0);
    }

    #[test]
    fn test_distance_score_linear_interior() {
        assert_eq!(normalize_distance_score(5.5), 4.5);
        assert_eq!(normalize_distance_score(3.0), 7.0);
        assert_eq!(normalize_distance_score(9.95), 0.1);
    }

    #[test]
    fn test_density_score_saturates_at_twenty() {
        assert_eq!(normalize_density_score(20), 10.0);
        assert_eq!(normalize_density_score(50), 10.0);
    }

    #[test]
    fn test_density_score_proportional_below_saturation() {
        assert_eq!(normalize_density_score(0), 0.0);
        assert_eq!(normalize_density_score(10), 5.0);
        assert_eq!(normalize_density_score(7), 3.5);
        assert_eq!(normalize_density_score(1), 0.5);
    }

    #[tokio::test]
    async fn test_score_blends_weighted_components() {
        let mut oracle = MockComparisonOracle::new();
        oracle.expect_compare_reviews().returning(|_, _| {
            Ok(ReviewComparison {
                similarity: 8.0,
                reasoning: "Both praised for equipment".to_string(),
                pros: vec!["similar vibe".to_string()],
                cons: vec![],
            })
        });

        let scorer = SimilarityScorer::new(Arc::new(oracle));
        // distance 3.5 km → 6.5; density 10 → 5.0
        let result = scorer.score(&profile("src"), &profile("cand"), 3.5, 10).await;

        // 0.7*8.0 + 0.2*6.5 + 0.1*5.0 = 7.4
        assert_eq!(result.similarity_score, Some(7.4));
        assert_eq!(result.ai_similarity, 8.0);
        assert_eq!(result.distance_score, 6.5);
        assert_eq!(result.density_score, 5.0);
        assert_eq!(result.reasoning, "Both praised for equipment");
    }

    #[tokio::test]
    async fn test_score_stays_in_range_at_extremes() {
        let mut oracle = MockComparisonOracle::new();
        oracle.expect_compare_reviews().returning(|_, _| {
            Ok(ReviewComparison {
                similarity: 10.0,
                reasoning: "near-identical".to_string(),
                pros: vec![],
                cons: vec![],
            })
        });

        let scorer = SimilarityScorer::new(Arc::new(oracle));
        let result = scorer.score(&profile("src"), &profile("cand"), 0.5, 25).await;

        assert_eq!(result.similarity_score, Some(10.0));
    }

    #[tokio::test]
    async fn test_score_degrades_on_oracle_failure() {
        let mut oracle = MockComparisonOracle::new();
        oracle
            .expect_compare_reviews()
            .returning(|_, _| Err(AppError::ExternalApi("quota".to_string())));

        let scorer = SimilarityScorer::new(Arc::new(oracle));
        let result = scorer.score(&profile("src"), &profile("cand"), 3.5, 10).await;

        assert_eq!(result.similarity_score, None);
        assert_eq!(result.ai_similarity, 0.0);
        assert_eq!(result.distance_score, 0.0);
        assert_eq!(result.density_score, 0.0);
        assert_eq!(result.reasoning, "AI-based comparison unavailable");
        assert!(result.pros.is_empty());
        assert!(result.cons.is_empty());
    }
}
