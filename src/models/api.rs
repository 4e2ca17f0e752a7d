use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ─── REST API request/response types ─────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IrradianceQuery {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// System losses (%), defaults to the configured value
    pub losses: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub cached_locations: usize,
    pub cached_profiles: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable failure kind, e.g. `LOCATION_NOT_FOUND`
    pub error: String,
    pub message: String,
}
