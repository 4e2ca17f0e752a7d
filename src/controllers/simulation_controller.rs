use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::config::SimulationDefaults;
use crate::errors::SimulationFailure;
use crate::models::api::{ErrorBody, HealthStatus, IrradianceQuery};
use crate::models::profile::{GeoLocation, IrradianceProfile};
use crate::models::simulation::{SimulationReport, SimulationRequest};
use crate::services::pvgis::IrradianceSource;
use crate::services::simulation_service;
use crate::shared_state::AppState;

/// POST /api/simulations
/// Run a full sizing and viability simulation
///
/// Geocodes the place name, fetches the monthly generation profile for a 1 kWp
/// system there, then sizes the installation and projects 25 years of savings.
/// Omitted parameters take the configured defaults.
#[utoipa::path(
    post,
    path = "/api/simulations",
    request_body = SimulationRequest,
    responses(
        (status = 200, description = "Simulation report", body = SimulationReport),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Place name not found", body = ErrorBody),
        (status = 422, description = "Profile cannot size a system", body = ErrorBody),
        (status = 502, description = "Irradiance data unavailable", body = ErrorBody)
    )
)]
pub async fn create_simulation(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> impl IntoResponse {
    let inputs = state.defaults.resolve(&request);
    match simulation_service::run_simulation(&state.geocoder, &state.irradiance, &request.place_name, inputs).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// GET /api/simulations/defaults
/// Default simulation parameters
///
/// Values used for every parameter a simulation request leaves out.
#[utoipa::path(
    get,
    path = "/api/simulations/defaults",
    responses(
        (status = 200, description = "Configured defaults", body = SimulationDefaults)
    )
)]
pub async fn get_defaults(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.defaults.as_ref().clone()).into_response()
}

/// GET /api/irradiance
/// Monthly generation profile for a coordinate
///
/// Returns the normalised 12-month yield of a 1 kWp fixed system together with
/// the optimal tilt and azimuth.
#[utoipa::path(
    get,
    path = "/api/irradiance",
    params(IrradianceQuery),
    responses(
        (status = 200, description = "Monthly profile", body = IrradianceProfile),
        (status = 400, description = "Invalid coordinates", body = ErrorBody),
        (status = 502, description = "Irradiance data unavailable", body = ErrorBody)
    )
)]
pub async fn get_irradiance(
    State(state): State<AppState>,
    Query(query): Query<IrradianceQuery>,
) -> impl IntoResponse {
    let losses = query.losses.unwrap_or(state.defaults.system_losses_pct);

    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return SimulationFailure::InvalidInput("coordinates out of range".to_string()).into_response();
    }
    if !(0.0..=100.0).contains(&losses) {
        return SimulationFailure::InvalidInput("losses must lie within 0..=100".to_string()).into_response();
    }

    let location = GeoLocation { latitude: query.lat, longitude: query.lon };
    match state.irradiance.fetch_profile(location, losses).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => SimulationFailure::IrradianceUnavailable { reason: e.to_string() }.into_response(),
    }
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (cached_locations, cached_profiles) = state.cache.entry_counts();
    Json(HealthStatus {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_locations,
        cached_profiles,
    })
    .into_response()
}
