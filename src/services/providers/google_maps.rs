/// Google Distance Matrix provider
///
/// Fetches traffic-aware driving distance between two coordinates. Any
/// non-success status (top-level or per-element) is surfaced as an error so
/// the distance resolver can fall back to a geometric estimate.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{Coordinate, DistanceMatrixResponse, DistanceResult},
    services::providers::DistanceProvider,
};

#[derive(Clone)]
pub struct GoogleDistanceProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GoogleDistanceProvider {
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

    /// Extracts the single origin/destination element from the matrix
    /// response.
    fn parse_response(response: DistanceMatrixResponse) -> AppResult<DistanceResult> {
        if response.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Distance Matrix returned status {}",
                response.status
            )));
        }

        let element = response
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or_else(|| {
                AppError::ExternalApi("Distance Matrix response missing element".to_string())
            })?;

        if element.status != "OK" {
            return Err(AppError::ExternalApi(format!(
                "Distance Matrix element status {}",
                element.status
            )));
        }

        let distance = element.distance.as_ref().ok_or_else(|| {
            AppError::ExternalApi("Distance Matrix element missing distance".to_string())
        })?;

        Ok(DistanceResult {
            distance_km: distance.value / 1000.0,
            duration_text: element.duration.as_ref().map(|d| d.text.clone()),
            duration_in_traffic_text: element.duration_in_traffic.as_ref().map(|d| d.text.clone()),
        })
    }
}

#[async_trait::async_trait]
impl DistanceProvider for GoogleDistanceProvider {
    async fn driving_distance(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> AppResult<DistanceResult> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("origins", format!("{},{}", origin.lat, origin.lng)),
                (
                    "destinations",
                    format!("{},{}", destination.lat, destination.lng),
                ),
                ("mode", "driving".to_string()),
                ("departure_time", "now".to_string()),
                ("traffic_model", "best_guess".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Distance Matrix API returned status {}: {}",
                status, body
            )));
        }

        let matrix: DistanceMatrixResponse = response.json().await?;
        let result = Self::parse_response(matrix)?;

        tracing::debug!(
            distance_km = result.distance_km,
            live = result.duration_text.is_some(),
            "Driving distance fetched"
        );

        Ok(result)
    }
}
