use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::api::ErrorBody;

/// Why a simulation run stopped before producing a report.
///
/// Unfavourable financial outcomes (negative NPV, payback never reached) are
/// not failures; they come back inside a normal report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationFailure {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no coordinates found for '{place}'")]
    LocationNotFound { place: String },
    #[error("solar irradiance data unavailable: {reason}")]
    IrradianceUnavailable { reason: String },
    #[error("worst-month generation factor is {worst_month_factor} kWh/kWp, cannot size a system")]
    DegenerateSizing { worst_month_factor: f64 },
}

impl SimulationFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationFailure::InvalidInput(_) => "INVALID_INPUT",
            SimulationFailure::LocationNotFound { .. } => "LOCATION_NOT_FOUND",
            SimulationFailure::IrradianceUnavailable { .. } => "IRRADIANCE_UNAVAILABLE",
            SimulationFailure::DegenerateSizing { .. } => "DEGENERATE_SIZING",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SimulationFailure::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SimulationFailure::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            SimulationFailure::IrradianceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            SimulationFailure::DegenerateSizing { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for SimulationFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Failure of one of the upstream data collaborators.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl From<ProfileError> for FetchError {
    fn from(e: ProfileError) -> Self {
        FetchError::Malformed(e.to_string())
    }
}

/// Violations of the 12-month profile invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("expected 12 monthly records, got {0}")]
    WrongRecordCount(usize),
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u8),
    #[error("month {0} appears more than once")]
    DuplicateMonth(u8),
    #[error("month {0} carries a non-finite value")]
    NonFiniteValue(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
