use std::sync::Arc;

use crate::{
    models::{Coordinate, DistanceResult},
    services::providers::DistanceProvider,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Resolves a driving distance between two coordinates; never fails.
///
/// When the live provider is absent, errors, times out, or returns a
/// non-success status, the resolver degrades to a great-circle estimate
/// with null duration fields. Callers read a non-null duration pair as
/// live data.
#[derive(Clone)]
pub struct DistanceResolver {
    provider: Option<Arc<dyn DistanceProvider>>,
}

impl DistanceResolver {
    pub fn new(provider: Option<Arc<dyn DistanceProvider>>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, origin: &Coordinate, destination: &Coordinate) -> DistanceResult {
        if let Some(provider) = &self.provider {
            match provider.driving_distance(origin, destination).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Distance provider failed, using haversine fallback"
                    );
                }
            }
        }

        DistanceResult::estimated(haversine_km(origin, destination))
    }
}

/// Great-circle distance in kilometers, rounded to two decimals.
pub fn haversine_km(origin: &Coordinate, destination: &Coordinate) -> f64 {
    let d_lat = (destination.lat - origin.lat).to_radians();
    let d_lng = (destination.lng - origin.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + origin.lat.to_radians().cos()
            * destination.lat.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);

    let distance = EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    round2(distance)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
