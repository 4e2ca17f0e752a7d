use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::SimulationFailure;
use crate::models::profile::{GeoLocation, IrradianceProfile};
use crate::models::simulation::{
    CashFlowSeries, EnvironmentalImpact, FinancialMetrics, MonthlyGeneration, SavingsBreakdown,
    SimulationInputs, SimulationReport, SizingResult, Verdict,
};
use crate::services::geocoding::Geocoder;
use crate::services::pvgis::IrradianceSource;
use crate::services::{cash_flow, cost, environment, metrics, savings, sizing};

/// Everything derived from one profile and one set of inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub sizing: SizingResult,
    pub savings: SavingsBreakdown,
    pub monthly_generation: Vec<MonthlyGeneration>,
    pub cash_flow: CashFlowSeries,
    pub financial: FinancialMetrics,
    pub verdict: Verdict,
    pub environmental: EnvironmentalImpact,
}

/// Geocode → fetch profile → evaluate. Upstream failures stop the run
/// before any figure is computed.
pub async fn run_simulation<G, S>(
    geocoder: &G,
    irradiance: &S,
    place_name: &str,
    inputs: SimulationInputs,
) -> Result<SimulationReport, SimulationFailure>
where
    G: Geocoder + Sync,
    S: IrradianceSource + Sync,
{
    let place_name = place_name.trim();
    if place_name.is_empty() {
        return Err(SimulationFailure::InvalidInput("place_name cannot be empty".to_string()));
    }
    inputs.validate()?;

    let location = match geocoder.geocode(place_name).await {
        Ok(Some(location)) => location,
        Ok(None) => return Err(SimulationFailure::LocationNotFound { place: place_name.to_string() }),
        Err(e) => {
            warn!("[GEOCODE] Lookup of '{}' failed: {}", place_name, e);
            return Err(SimulationFailure::LocationNotFound { place: place_name.to_string() });
        }
    };

    let profile = irradiance
        .fetch_profile(location, inputs.system_losses_pct)
        .await
        .map_err(|e| {
            warn!("[PVGIS] Profile for '{}' unavailable: {}", place_name, e);
            SimulationFailure::IrradianceUnavailable { reason: e.to_string() }
        })?;

    let evaluation = evaluate(&profile, &inputs)?;
    info!(
        "[SIMULATION] {} → {:.2} kWp | cost {:.2} | NPV {:.2} | IRR {}",
        place_name,
        evaluation.sizing.recommended_kwp,
        evaluation.sizing.estimated_installation_cost,
        evaluation.financial.npv,
        evaluation
            .financial
            .irr_pct
            .map_or_else(|| "undefined".to_string(), |irr| format!("{irr:.2}%")),
    );

    Ok(assemble_report(place_name, location, inputs, profile, evaluation))
}

/// The pure engine: sizing, cost, savings, cash flow, metrics, impact.
pub fn evaluate(profile: &IrradianceProfile, inputs: &SimulationInputs) -> Result<Evaluation, SimulationFailure> {
    let worst_month_factor = profile.worst_month_factor();
    if worst_month_factor <= 0.0 {
        return Err(SimulationFailure::DegenerateSizing { worst_month_factor });
    }

    let recommended_kwp = sizing::size_system(profile, inputs.monthly_consumption_kwh, inputs.safety_margin_pct);
    let (installation_cost, annual_generation_kwh) = cost::estimate_cost(
        profile,
        recommended_kwp,
        inputs.module_cost_per_wp,
        inputs.bos_cost_per_wp,
    );
    let sizing = SizingResult {
        recommended_kwp,
        estimated_installation_cost: installation_cost,
        estimated_annual_generation_kwh: annual_generation_kwh,
    };

    let savings = savings::breakdown(
        annual_generation_kwh,
        inputs.tariff_rate,
        inputs.connection_type,
        cost::unit_cost_per_wp(inputs.module_cost_per_wp, inputs.bos_cost_per_wp),
    );

    let cash_flow = cash_flow::project_cash_flow(
        installation_cost,
        savings.net_annual_savings,
        inputs.tariff_inflation_pct_per_year,
        inputs.panel_degradation_pct_per_year,
    );
    let financial = metrics::compute_metrics(&cash_flow, inputs.discount_rate_pct_per_year);
    let verdict = metrics::verdict(&financial, inputs.discount_rate_pct_per_year);

    let monthly_generation = profile
        .months()
        .iter()
        .map(|r| MonthlyGeneration {
            month: r.month,
            generation_kwh: r.generation_per_kwp * recommended_kwp,
            consumption_kwh: inputs.monthly_consumption_kwh,
        })
        .collect();

    Ok(Evaluation {
        sizing,
        savings,
        monthly_generation,
        cash_flow,
        financial,
        verdict,
        environmental: environment::environmental_impact(annual_generation_kwh),
    })
}

fn assemble_report(
    place_name: &str,
    location: GeoLocation,
    inputs: SimulationInputs,
    profile: IrradianceProfile,
    evaluation: Evaluation,
) -> SimulationReport {
    SimulationReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        place_name: place_name.to_string(),
        location,
        inputs,
        profile,
        sizing: evaluation.sizing,
        savings: evaluation.savings,
        monthly_generation: evaluation.monthly_generation,
        cash_flow: evaluation.cash_flow,
        financial: evaluation.financial,
        verdict: evaluation.verdict,
        environmental: evaluation.environmental,
    }
}
