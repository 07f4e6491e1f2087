use std::sync::Arc;

use crate::services::RecommendationPipeline;

/// Shared application state
///
/// The pipeline is the only shared object; every request builds its own
/// entity graph, so there is no mutable state to guard.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecommendationPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RecommendationPipeline>) -> Self {
        Self { pipeline }
    }
}
