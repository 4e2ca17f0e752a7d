pub mod cash_flow;
pub mod cost;
pub mod environment;
pub mod geocoding;
pub mod metrics;
pub mod pvgis;
pub mod savings;
pub mod simulation_service;
pub mod sizing;
