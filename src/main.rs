mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod errors;

use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::errors::ConfigError;
use crate::shared_state::AppState;

const CONFIG_ENV: &str = "SOLAR_SIM_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("solar_viability_sim=info,tower_http=info")),
        )
        .init();

    // 1. Load configuration
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match Config::load(&path) {
        Ok(c) => c,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, running with built-in defaults", path);
            Config::default()
        }
        Err(e) => {
            error!("Failed to load {}: {}", path, e);
            return;
        }
    };
    info!(
        "Configuration loaded: geocoding={} pvgis={}",
        config.geocoding.base_url, config.pvgis.base_url
    );

    // 2. Initialize shared state (upstream clients + response cache)
    let state = match AppState::new(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build upstream clients: {}", e);
            return;
        }
    };

    // 3. Start Axum HTTP server
    let app = routes::app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        error!("HTTP server error: {}", e);
    }
}
