use utoipa::OpenApi;
use crate::controllers::simulation_controller;
use crate::models::{api, profile, simulation};
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        simulation_controller::create_simulation,
        simulation_controller::get_defaults,
        simulation_controller::get_irradiance,
        simulation_controller::health
    ),
    components(
        schemas(
            simulation::SimulationRequest,
            simulation::SimulationReport,
            simulation::SimulationInputs,
            simulation::ConnectionType,
            profile::IrradianceProfile,
            profile::MonthlyRecord,
            config::SimulationDefaults,
            api::HealthStatus,
            api::ErrorBody
        )
    ),
    tags(
        (name = "solar-viability-sim", description = "Photovoltaic sizing and financial viability API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/simulations", "/api/simulations/defaults", "/api/irradiance", "/api/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
