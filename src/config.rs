use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ConfigError;
use crate::models::simulation::{
    ConnectionType, SimulationInputs, SimulationRequest, PANEL_DEGRADATION_PCT_PER_YEAR,
};

fn default_port() -> u16 { 8080 }
fn default_nominatim_url() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { format!("SolarViabilitySim/{}", env!("CARGO_PKG_VERSION")) }
fn default_geocoding_timeout() -> u64 { 10 }
fn default_pvgis_url() -> String { "https://re.jrc.ec.europa.eu/api/v5_2".to_string() }
fn default_pvgis_timeout() -> u64 { 15 }
fn default_cache_max_entries() -> usize { 1024 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub pvgis: PvgisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub defaults: SimulationDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PvgisConfig {
    #[serde(default = "default_pvgis_url")]
    pub base_url: String,
    #[serde(default = "default_pvgis_timeout")]
    pub timeout_secs: u64,
}

impl Default for PvgisConfig {
    fn default() -> Self {
        Self {
            base_url: default_pvgis_url(),
            timeout_secs: default_pvgis_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Upper bound on entries per cached collaborator
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: default_cache_max_entries() }
    }
}

/// Parameters applied when a request leaves them out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct SimulationDefaults {
    pub monthly_consumption_kwh: f64,
    pub tariff_rate: f64,
    pub module_cost_per_wp: f64,
    pub bos_cost_per_wp: f64,
    pub connection_type: ConnectionType,
    pub system_losses_pct: f64,
    pub safety_margin_pct: f64,
    pub tariff_inflation_pct_per_year: f64,
    pub discount_rate_pct_per_year: f64,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            monthly_consumption_kwh: 350.0,
            tariff_rate: 0.95,
            module_cost_per_wp: 1.20,
            bos_cost_per_wp: 1.60,
            connection_type: ConnectionType::Triphase,
            system_losses_pct: 14.0,
            safety_margin_pct: 15.0,
            tariff_inflation_pct_per_year: 7.0,
            discount_rate_pct_per_year: 10.0,
        }
    }
}

impl SimulationDefaults {
    /// Fills the gaps of `request` with these defaults. Validation happens
    /// later, inside the simulation run.
    pub fn resolve(&self, request: &SimulationRequest) -> SimulationInputs {
        SimulationInputs {
            monthly_consumption_kwh: request.monthly_consumption_kwh.unwrap_or(self.monthly_consumption_kwh),
            tariff_rate: request.tariff_rate.unwrap_or(self.tariff_rate),
            module_cost_per_wp: request.module_cost_per_wp.unwrap_or(self.module_cost_per_wp),
            bos_cost_per_wp: request.bos_cost_per_wp.unwrap_or(self.bos_cost_per_wp),
            connection_type: request.connection_type.unwrap_or(self.connection_type),
            system_losses_pct: request.system_losses_pct.unwrap_or(self.system_losses_pct),
            safety_margin_pct: request.safety_margin_pct.unwrap_or(self.safety_margin_pct),
            tariff_inflation_pct_per_year: request
                .tariff_inflation_pct_per_year
                .unwrap_or(self.tariff_inflation_pct_per_year),
            discount_rate_pct_per_year: request
                .discount_rate_pct_per_year
                .unwrap_or(self.discount_rate_pct_per_year),
            panel_degradation_pct_per_year: PANEL_DEGRADATION_PCT_PER_YEAR,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pvgis.timeout_secs, 15);
        assert_eq!(config.cache.max_entries, 1024);
        assert_eq!(config.defaults, SimulationDefaults::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "server": { "port": 9000 },
                "cache": { "max_entries": 16 },
                "geocoding": { "base_url": "http://localhost:7070" },
                "defaults": { "tariff_rate": 1.1, "connection_type": "MONOPHASE" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cache.max_entries, 16);
        assert_eq!(config.geocoding.base_url, "http://localhost:7070");
        assert_eq!(config.geocoding.timeout_secs, 10);
        assert_eq!(config.defaults.tariff_rate, 1.1);
        assert_eq!(config.defaults.connection_type, ConnectionType::Monophase);
        assert_eq!(config.defaults.monthly_consumption_kwh, 350.0);
    }

    #[test]
    fn test_resolve_prefers_request_values() {
        let request = SimulationRequest {
            place_name: "Recife, PE".to_string(),
            monthly_consumption_kwh: Some(500.0),
            connection_type: Some(ConnectionType::Biphase),
            ..Default::default()
        };
        let inputs = SimulationDefaults::default().resolve(&request);

        assert_eq!(inputs.monthly_consumption_kwh, 500.0);
        assert_eq!(inputs.connection_type, ConnectionType::Biphase);
        assert_eq!(inputs.tariff_rate, 0.95);
        assert_eq!(inputs.panel_degradation_pct_per_year, 0.5);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load("/definitely/not/here/config.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
