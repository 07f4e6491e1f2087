use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Google Places API key (search, nearby, details); required
    pub places_api_key: String,

    /// OpenAI API key for review comparison; required
    pub openai_api_key: String,

    /// OpenAI model used for review comparison
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Distance Matrix API key; optional — without it every distance is a
    /// haversine estimate
    #[serde(default)]
    pub google_maps_api_key: Option<String>,

    /// Google Places API base URL
    #[serde(default = "default_places_api_url")]
    pub places_api_url: String,

    /// Distance Matrix API base URL
    #[serde(default = "default_distance_matrix_api_url")]
    pub distance_matrix_api_url: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to each outbound provider call, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Margin added on top of the source distance when deriving the
    /// candidate search radius, in meters
    #[serde(default = "default_search_radius_margin_m")]
    pub search_radius_margin_m: f64,

    /// Lower bound for the candidate search radius, in meters
    #[serde(default = "default_min_search_radius_m")]
    pub min_search_radius_m: f64,

    /// Lower guard for the distance band, in kilometers
    #[serde(default = "default_band_floor_km")]
    pub band_floor_km: f64,

    /// Upper guard for the distance band, in kilometers
    #[serde(default = "default_band_ceiling_km")]
    pub band_ceiling_km: f64,

    /// Maximum number of candidates fetched per source place
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_places_api_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_distance_matrix_api_url() -> String {
    "https://maps.googleapis.com/maps/api/distancematrix/json".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_http_timeout_secs() -> u64 {
    8
}

fn default_search_radius_margin_m() -> f64 {
    2000.0
}

fn default_min_search_radius_m() -> f64 {
    3000.0
}

fn default_band_floor_km() -> f64 {
    1.0
}

fn default_band_ceiling_km() -> f64 {
    2.0
}

fn default_max_candidates() -> usize {
    10
}

/// The subset of configuration the recommendation pipeline consumes.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub search_radius_margin_m: f64,
    pub min_search_radius_m: f64,
    pub band_floor_km: f64,
    pub band_ceiling_km: f64,
    pub max_candidates: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing required credential surfaces here as an error, never as a
    /// process kill, so startup validation stays testable.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            search_radius_margin_m: self.search_radius_margin_m,
            min_search_radius_m: self.min_search_radius_m,
            band_floor_km: self.band_floor_km,
            band_ceiling_km: self.band_ceiling_km,
            max_candidates: self.max_candidates,
        }
    }
}

#[cfg(test)]
impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_radius_margin_m: default_search_radius_margin_m(),
            min_search_radius_m: default_min_search_radius_m(),
            band_floor_km: default_band_floor_km(),
            band_ceiling_km: default_band_ceiling_km(),
            max_candidates: default_max_candidates(),
        }
    }
}
