/// Google Places provider
///
/// Three operations against the Places web service: text search (used to
/// resolve a source place by name), nearby search (candidate discovery),
/// and place details (full profile with review excerpts).
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{
        Candidate, Coordinate, NearbySearchResponse, PlaceCategory, PlaceDetailsResponse,
        ResolvedPlace, TextSearchResponse,
    },
    services::providers::PlaceProvider,
};

/// Fields requested from the details endpoint; anything else is dead weight
/// on the wire.
const PLACE_DETAILS_FIELDS: &str =
    "place_id,name,rating,user_ratings_total,price_level,reviews,types,geometry";

/// Bias radius for resolving a source place by name, in meters
const NAME_SEARCH_RADIUS_M: u32 = 1000;

#[derive(Clone)]
pub struct GooglePlacesProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: String, api_url: String, timeout_secs: u64) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Text search by name, biased to the given coordinates; returns the
    /// best match's place id.
    async fn search_place_id(&self, name: &str, near: &Coordinate) -> AppResult<String> {
        let url = format!("{}/textsearch/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", name.to_string()),
                ("location", format!("{},{}", near.lat, near.lng)),
                ("radius", NAME_SEARCH_RADIUS_M.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Places text search returned status {}: {}",
                status, body
            )));
        }

        let search: TextSearchResponse = response.json().await?;

        if search.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Places text search status {}",
                search.status
            )));
        }

        search
            .results
            .into_iter()
            .next()
            .map(|r| r.place_id)
            .ok_or_else(|| AppError::ExternalApi(format!("No place found for \"{}\"", name)))
    }
}

#[async_trait::async_trait]
impl PlaceProvider for GooglePlacesProvider {
    async fn resolve_place(
        &self,
        name: &str,
        category: PlaceCategory,
        near: &Coordinate,
    ) -> AppResult<ResolvedPlace> {
        let place_id = self.search_place_id(name, near).await?;
        self.place_details(&place_id, category).await
    }

    async fn find_nearby(
        &self,
        location: &Coordinate,
        category: PlaceCategory,
        radius_m: f64,
        limit: usize,
    ) -> AppResult<Vec<Candidate>> {
        let url = format!("{}/nearbysearch/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("location", format!("{},{}", location.lat, location.lng)),
                ("radius", format!("{}", radius_m.round() as i64)),
                ("type", category.as_str().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Nearby search returned status {}: {}",
                status, body
            )));
        }

        let search: NearbySearchResponse = response.json().await?;

        // An empty result set is a valid outcome, not a fault.
        if search.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }

        if search.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Nearby search status {}",
                search.status
            )));
        }

        let candidates: Vec<Candidate> = search
            .results
            .into_iter()
            .take(limit)
            .map(Candidate::from)
            .collect();

        tracing::info!(
            category = category.as_str(),
            radius_m = radius_m,
            results = candidates.len(),
            "Nearby search completed"
        );

        Ok(candidates)
    }

    async fn place_details(
        &self,
        place_id: &str,
        category: PlaceCategory,
    ) -> AppResult<ResolvedPlace> {
        let url = format!("{}/details/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", PLACE_DETAILS_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Place details returned status {}: {}",
                status, body
            )));
        }

        let details: PlaceDetailsResponse = response.json().await?;

        if details.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Place details status {}",
                details.status
            )));
        }

        let result = details.result.ok_or_else(|| {
            AppError::ExternalApi("Place details response missing result".to_string())
        })?;

        Ok(result.into_profile(category))
    }
}
