use serde::{Deserialize, Serialize};

/// Maximum number of review excerpts carried on a resolved place profile.
/// Keeps oracle prompts bounded.
const MAX_REVIEW_EXCERPTS: usize = 5;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Both fields finite and within range (`lat ∈ [-90,90]`, `lng ∈ [-180,180]`)
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Closed set of place categories the service recommends across.
///
/// `as_str` doubles as the provider-side type parameter for nearby search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    Gym,
    Park,
    Supermarket,
    Pharmacy,
    Hospital,
    School,
    Library,
    MovieTheater,
    ShoppingMall,
}

impl PlaceCategory {
    /// Normalizes a raw category string (trim, case-fold, whitespace to
    /// underscore) into the closed enumeration. Anything outside the set is
    /// rejected with `None`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match normalized.as_str() {
            "restaurant" => Some(Self::Restaurant),
            "cafe" => Some(Self::Cafe),
            "bar" => Some(Self::Bar),
            "bakery" => Some(Self::Bakery),
            "gym" => Some(Self::Gym),
            "park" => Some(Self::Park),
            "supermarket" => Some(Self::Supermarket),
            "pharmacy" => Some(Self::Pharmacy),
            "hospital" => Some(Self::Hospital),
            "school" => Some(Self::School),
            "library" => Some(Self::Library),
            "movie_theater" => Some(Self::MovieTheater),
            "shopping_mall" => Some(Self::ShoppingMall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Bakery => "bakery",
            Self::Gym => "gym",
            Self::Park => "park",
            Self::Supermarket => "supermarket",
            Self::Pharmacy => "pharmacy",
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Library => "library",
            Self::MovieTheater => "movie_theater",
            Self::ShoppingMall => "shopping_mall",
        }
    }
}

/// One place near the previous city, as submitted by the client.
///
/// `category` stays a raw string here; it is normalized into
/// [`PlaceCategory`] during pipeline validation. `type` is accepted as an
/// alias for older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePlaceRequest {
    pub name: String,
    #[serde(alias = "type")]
    pub category: String,
    pub coordinates: Coordinate,
}

/// A place enriched with provider-side details, used for similarity
/// comparison. Immutable once resolved; nothing outlives the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub place_id: String,
    pub name: String,
    pub category: PlaceCategory,
    pub coordinates: Coordinate,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub price_level: Option<u8>,
    pub reviews: Vec<String>,
    pub service_tags: Vec<String>,
}

/// A nearby place returned by the locator; exists only for the duration of
/// one source place's processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub place_id: String,
    pub name: String,
    pub coordinates: Coordinate,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}

/// Driving distance between two coordinates.
///
/// A non-null duration pair means live traffic-aware data; null durations
/// mean the distance is a great-circle estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance_km: f64,
    pub duration_text: Option<String>,
    pub duration_in_traffic_text: Option<String>,
}

impl DistanceResult {
    /// Builds an estimated (non-live) result with null duration fields.
    pub fn estimated(distance_km: f64) -> Self {
        Self {
            distance_km,
            duration_text: None,
            duration_in_traffic_text: None,
        }
    }
}

/// Composite similarity verdict for one candidate.
///
/// `similarity_score` is `None` only when the AI comparison failed; the
/// numeric sub-scores are zeroed in that case so the entry still serializes
/// into a complete, comparable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub similarity_score: Option<f64>,
    pub ai_similarity: f64,
    pub distance_score: f64,
    pub density_score: f64,
    pub reasoning: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// One recommended place near the current city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPlace {
    #[serde(flatten)]
    pub place: ResolvedPlace,
    pub driving_distance_from_current_city_km: f64,
    pub driving_duration: Option<String>,
    pub driving_duration_in_traffic: Option<String>,
    pub similarity: SimilarityResult,
}

/// The resolved source place plus its distance from the previous city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePlaceSummary {
    #[serde(flatten)]
    pub place: ResolvedPlace,
    pub distance_from_previous_city_km: f64,
}

/// One result entry per valid source place; assembled once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub source_place: SourcePlaceSummary,
    pub recommended_places: Vec<RecommendedPlace>,
}

// ============================================================================
// Google Places API Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: Coordinate,
}

/// Raw entry from the nearby-search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    pub geometry: Geometry,
}

impl From<NearbyPlace> for Candidate {
    fn from(place: NearbyPlace) -> Self {
        Candidate {
            place_id: place.place_id,
            name: place.name,
            coordinates: place.geometry.location,
            rating: place.rating,
            review_count: place.user_ratings_total,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}

/// Raw entry from the text-search endpoint; only the id is consumed
#[derive(Debug, Deserialize)]
pub struct TextSearchResult {
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<TextSearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceReview {
    pub text: String,
}

/// Raw place-details payload
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Geometry,
}

impl PlaceDetails {
    /// Normalizes the raw details into a comparable profile: review excerpts
    /// capped, generic provider tags dropped from the service tag list.
    pub fn into_profile(self, category: PlaceCategory) -> ResolvedPlace {
        let reviews = self
            .reviews
            .into_iter()
            .take(MAX_REVIEW_EXCERPTS)
            .map(|r| r.text)
            .collect();

        let service_tags = self
            .types
            .into_iter()
            .filter(|t| t != "point_of_interest" && t != "establishment")
            .collect();

        ResolvedPlace {
            place_id: self.place_id,
            name: self.name,
            category,
            coordinates: self.geometry.location,
            rating: self.rating,
            review_count: self.user_ratings_total,
            price_level: self.price_level,
            reviews,
            service_tags,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    pub result: Option<PlaceDetails>,
}

// ============================================================================
// Distance Matrix API Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate { lat: 12.9, lng: 77.6 }.is_valid());
        assert!(Coordinate { lat: -90.0, lng: 180.0 }.is_valid());
        assert!(!Coordinate { lat: 91.0, lng: 0.0 }.is_valid());
        assert!(!Coordinate { lat: 0.0, lng: -180.5 }.is_valid());
        assert!(!Coordinate { lat: f64::NAN, lng: 0.0 }.is_valid());
        assert!(!Coordinate { lat: 0.0, lng: f64::INFINITY }.is_valid());
    }

    #[test]
    fn test_category_from_raw_exact() {
        assert_eq!(PlaceCategory::from_raw("gym"), Some(PlaceCategory::Gym));
        assert_eq!(
            PlaceCategory::from_raw("movie_theater"),
            Some(PlaceCategory::MovieTheater)
        );
    }

    #[test]
    fn test_category_from_raw_normalizes_case_and_whitespace() {
        assert_eq!(
            PlaceCategory::from_raw("  Movie Theater "),
            Some(PlaceCategory::MovieTheater)
        );
        assert_eq!(
            PlaceCategory::from_raw("RESTAURANT"),
            Some(PlaceCategory::Restaurant)
        );
        assert_eq!(
            PlaceCategory::from_raw("Shopping  Mall"),
            Some(PlaceCategory::ShoppingMall)
        );
    }

    #[test]
    fn test_category_from_raw_rejects_unknown() {
        assert_eq!(PlaceCategory::from_raw("casino"), None);
        assert_eq!(PlaceCategory::from_raw(""), None);
        assert_eq!(PlaceCategory::from_raw("   "), None);
    }

    #[test]
    fn test_category_round_trips_through_as_str() {
        for raw in [
            "restaurant",
            "cafe",
            "bar",
            "bakery",
            "gym",
            "park",
            "supermarket",
            "pharmacy",
            "hospital",
            "school",
            "library",
            "movie_theater",
            "shopping_mall",
        ] {
            let category = PlaceCategory::from_raw(raw).unwrap();
            assert_eq!(category.as_str(), raw);
        }
    }

    #[test]
    fn test_source_place_request_accepts_type_alias() {
        let json = r#"{
            "name": "Joe's Gym",
            "type": "gym",
            "coordinates": { "lat": 12.91, "lng": 77.61 }
        }"#;

        let request: SourcePlaceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.category, "gym");
    }

    #[test]
    fn test_nearby_place_to_candidate() {
        let json = r#"{
            "place_id": "ChIJabc123",
            "name": "Iron Works Gym",
            "rating": 4.6,
            "user_ratings_total": 212,
            "geometry": { "location": { "lat": 19.08, "lng": 72.88 } }
        }"#;

        let place: NearbyPlace = serde_json::from_str(json).unwrap();
        let candidate = Candidate::from(place);
        assert_eq!(candidate.place_id, "ChIJabc123");
        assert_eq!(candidate.name, "Iron Works Gym");
        assert_eq!(candidate.rating, Some(4.6));
        assert_eq!(candidate.review_count, Some(212));
        assert_eq!(candidate.coordinates, Coordinate { lat: 19.08, lng: 72.88 });
    }

    #[test]
    fn test_nearby_place_tolerates_missing_rating_fields() {
        let json = r#"{
            "place_id": "ChIJdef456",
            "name": "Unrated Park",
            "geometry": { "location": { "lat": 19.0, "lng": 72.8 } }
        }"#;

        let place: NearbyPlace = serde_json::from_str(json).unwrap();
        let candidate = Candidate::from(place);
        assert_eq!(candidate.rating, None);
        assert_eq!(candidate.review_count, None);
    }

    #[test]
    fn test_place_details_into_profile_caps_reviews_and_filters_tags() {
        let reviews = (0..8)
            .map(|i| PlaceReview {
                text: format!("review {i}"),
            })
            .collect();

        let details = PlaceDetails {
            place_id: "ChIJxyz".to_string(),
            name: "Corner Cafe".to_string(),
            rating: Some(4.2),
            user_ratings_total: Some(87),
            price_level: Some(2),
            reviews,
            types: vec![
                "cafe".to_string(),
                "point_of_interest".to_string(),
                "establishment".to_string(),
                "food".to_string(),
            ],
            geometry: Geometry {
                location: Coordinate { lat: 19.07, lng: 72.87 },
            },
        };

        let profile = details.into_profile(PlaceCategory::Cafe);
        assert_eq!(profile.reviews.len(), 5);
        assert_eq!(profile.reviews[0], "review 0");
        assert_eq!(profile.service_tags, vec!["cafe", "food"]);
        assert_eq!(profile.category, PlaceCategory::Cafe);
        assert_eq!(profile.price_level, Some(2));
    }

    #[test]
    fn test_similarity_result_serializes_null_score() {
        let result = SimilarityResult {
            similarity_score: None,
            ai_similarity: 0.0,
            distance_score: 0.0,
            density_score: 0.0,
            reasoning: "AI-based comparison unavailable".to_string(),
            pros: vec![],
            cons: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["similarity_score"].is_null());
        assert_eq!(json["reasoning"], "AI-based comparison unavailable");
    }

    #[test]
    fn test_distance_matrix_response_deserialization() {
        let json = r#"{
            "status": "OK",
            "rows": [{
                "elements": [{
                    "status": "OK",
                    "distance": { "text": "4.0 km", "value": 4000 },
                    "duration": { "text": "12 mins", "value": 720 },
                    "duration_in_traffic": { "text": "15 mins", "value": 900 }
                }]
            }]
        }"#;

        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        let element = &response.rows[0].elements[0];
        assert_eq!(element.status, "OK");
        assert_eq!(element.distance.as_ref().unwrap().value, 4000.0);
        assert_eq!(
            element.duration_in_traffic.as_ref().unwrap().text,
            "15 mins"
        );
    }
}
