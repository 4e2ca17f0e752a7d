use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::SimulationFailure;
use crate::models::profile::{GeoLocation, IrradianceProfile};

/// Annual loss of panel output, in percent.
pub const PANEL_DEGRADATION_PCT_PER_YEAR: f64 = 0.5;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Grid connection of the consumer unit. Determines the minimum energy the
/// utility bills every month regardless of net generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Monophase,
    Biphase,
    Triphase,
}

impl ConnectionType {
    /// Minimum chargeable energy per month (kWh).
    pub const fn availability_kwh(self) -> f64 {
        match self {
            ConnectionType::Monophase => 30.0,
            ConnectionType::Biphase => 50.0,
            ConnectionType::Triphase => 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimulationInputs {
    /// Average monthly consumption (kWh)
    pub monthly_consumption_kwh: f64,
    /// Energy tariff (currency/kWh)
    pub tariff_rate: f64,
    /// PV module cost (currency/Wp)
    pub module_cost_per_wp: f64,
    /// Balance-of-system cost: inverter, cabling, structure, labour (currency/Wp)
    pub bos_cost_per_wp: f64,
    pub connection_type: ConnectionType,
    /// Total system losses handed to the irradiance source (%)
    pub system_losses_pct: f64,
    /// Extra generation on top of the consumption (%)
    pub safety_margin_pct: f64,
    pub tariff_inflation_pct_per_year: f64,
    /// Minimum attractive rate of return used as discount rate (%)
    pub discount_rate_pct_per_year: f64,
    pub panel_degradation_pct_per_year: f64,
}

impl SimulationInputs {
    pub fn validate(&self) -> Result<(), SimulationFailure> {
        let fields = [
            ("monthly_consumption_kwh", self.monthly_consumption_kwh),
            ("tariff_rate", self.tariff_rate),
            ("module_cost_per_wp", self.module_cost_per_wp),
            ("bos_cost_per_wp", self.bos_cost_per_wp),
            ("system_losses_pct", self.system_losses_pct),
            ("safety_margin_pct", self.safety_margin_pct),
            ("tariff_inflation_pct_per_year", self.tariff_inflation_pct_per_year),
            ("discount_rate_pct_per_year", self.discount_rate_pct_per_year),
            ("panel_degradation_pct_per_year", self.panel_degradation_pct_per_year),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be a finite number")));
        }

        if self.monthly_consumption_kwh <= 0.0 {
            return Err(invalid("monthly_consumption_kwh must be positive"));
        }
        if self.tariff_rate <= 0.0 {
            return Err(invalid("tariff_rate must be positive"));
        }
        if self.module_cost_per_wp < 0.0 || self.bos_cost_per_wp < 0.0 {
            return Err(invalid("costs per Wp cannot be negative"));
        }
        if !(0.0..=100.0).contains(&self.system_losses_pct) {
            return Err(invalid("system_losses_pct must lie within 0..=100"));
        }
        if self.safety_margin_pct < 0.0 {
            return Err(invalid("safety_margin_pct cannot be negative"));
        }
        // Rates at or below -100 % make the compounding factors meaningless.
        if self.tariff_inflation_pct_per_year <= -100.0 || self.discount_rate_pct_per_year <= -100.0 {
            return Err(invalid("yearly rates must be greater than -100 %"));
        }
        if !(0.0..100.0).contains(&self.panel_degradation_pct_per_year) {
            return Err(invalid("panel_degradation_pct_per_year must lie within 0..100"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> SimulationFailure {
    SimulationFailure::InvalidInput(msg.into())
}

// ─── Derived values ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SizingResult {
    pub recommended_kwp: f64,
    pub estimated_installation_cost: f64,
    pub estimated_annual_generation_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SavingsBreakdown {
    pub availability_kwh: f64,
    pub monthly_availability_cost: f64,
    /// Generation valued at the tariff, before the availability charge
    pub gross_annual_savings: f64,
    pub net_annual_savings: f64,
    pub unit_cost_per_wp: f64,
}

/// Year 0 holds the (negative) outlay, years 1..=25 the net savings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CashFlowSeries(pub(crate) Vec<f64>);

impl CashFlowSeries {
    pub fn flows(&self) -> &[f64] {
        &self.0
    }

    pub fn initial_outlay(&self) -> f64 {
        -self.0[0]
    }

    pub fn first_year_savings(&self) -> f64 {
        self.0[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialMetrics {
    pub npv: f64,
    /// `None` when no rate zeroes the NPV
    pub irr_pct: Option<f64>,
    /// `None` when net savings never cover the outlay
    pub simple_payback_years: Option<f64>,
    /// `None` when cumulative NPV stays negative over the horizon
    pub discounted_payback_years: Option<u32>,
    /// Running NPV of years 0..=t, one entry per year
    pub cumulative_npv: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Verdict {
    pub npv_viable: bool,
    pub irr_viable: bool,
    /// IRR minus discount rate, percentage points
    pub irr_spread_pp: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct EnvironmentalImpact {
    pub co2_avoided_tons: f64,
    pub tree_equivalent_count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MonthlyGeneration {
    pub month: u8,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub place_name: String,
    pub location: GeoLocation,
    pub inputs: SimulationInputs,
    pub profile: IrradianceProfile,
    pub sizing: SizingResult,
    pub savings: SavingsBreakdown,
    pub monthly_generation: Vec<MonthlyGeneration>,
    pub cash_flow: CashFlowSeries,
    pub financial: FinancialMetrics,
    pub verdict: Verdict,
    pub environmental: EnvironmentalImpact,
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Body of `POST /api/simulations`. Omitted parameters take the configured
/// defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SimulationRequest {
    pub place_name: String,
    pub monthly_consumption_kwh: Option<f64>,
    pub tariff_rate: Option<f64>,
    pub module_cost_per_wp: Option<f64>,
    pub bos_cost_per_wp: Option<f64>,
    pub connection_type: Option<ConnectionType>,
    pub system_losses_pct: Option<f64>,
    pub safety_margin_pct: Option<f64>,
    pub tariff_inflation_pct_per_year: Option<f64>,
    pub discount_rate_pct_per_year: Option<f64>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_table() {
        assert_eq!(ConnectionType::Monophase.availability_kwh(), 30.0);
        assert_eq!(ConnectionType::Biphase.availability_kwh(), 50.0);
        assert_eq!(ConnectionType::Triphase.availability_kwh(), 100.0);
    }

    #[test]
    fn test_connection_type_wire_names() {
        let c: ConnectionType = serde_json::from_str("\"BIPHASE\"").unwrap();
        assert_eq!(c, ConnectionType::Biphase);
    }

    #[test]
    fn test_default_inputs_are_valid() {
        assert_eq!(fixtures::inputs().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_consumption_and_tariff() {
        let mut i = fixtures::inputs();
        i.monthly_consumption_kwh = 0.0;
        assert!(matches!(i.validate(), Err(SimulationFailure::InvalidInput(m)) if m.contains("consumption")));

        let mut i = fixtures::inputs();
        i.tariff_rate = -0.1;
        assert!(matches!(i.validate(), Err(SimulationFailure::InvalidInput(m)) if m.contains("tariff")));
    }

    #[test]
    fn test_rejects_out_of_range_losses_and_nan() {
        let mut i = fixtures::inputs();
        i.system_losses_pct = 120.0;
        assert!(i.validate().is_err());

        let mut i = fixtures::inputs();
        i.safety_margin_pct = f64::NAN;
        assert!(matches!(i.validate(), Err(SimulationFailure::InvalidInput(m)) if m.contains("safety_margin_pct")));
    }

    #[test]
    fn test_zero_costs_and_negative_inflation_are_accepted() {
        let mut i = fixtures::inputs();
        i.module_cost_per_wp = 0.0;
        i.bos_cost_per_wp = 0.0;
        i.tariff_inflation_pct_per_year = -2.0;
        assert_eq!(i.validate(), Ok(()));
    }
}
