use axum::{routing::{get, post}, Router};
use crate::controllers::simulation_controller::{
    // Simulation
    create_simulation, get_defaults,
    // Upstream data & status
    get_irradiance, health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/simulations",          post(create_simulation))
        .route("/simulations/defaults", get(get_defaults))
        .route("/irradiance",           get(get_irradiance))
        .route("/health",               get(health))
        .with_state(state)
}
