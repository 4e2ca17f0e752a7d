use crate::models::simulation::EnvironmentalImpact;
use crate::services::cash_flow::HORIZON_YEARS;

/// Grid emission factor (kg CO₂ per kWh).
pub const EMISSION_FACTOR_KG_PER_KWH: f64 = 0.475;
/// Trees needed to absorb one ton of CO₂.
pub const TREES_PER_TON_CO2: f64 = 7.14;

pub fn environmental_impact(annual_generation_kwh: f64) -> EnvironmentalImpact {
    let co2_avoided_tons = annual_generation_kwh * HORIZON_YEARS as f64 * EMISSION_FACTOR_KG_PER_KWH / 1000.0;
    EnvironmentalImpact {
        co2_avoided_tons,
        tree_equivalent_count: co2_avoided_tons * TREES_PER_TON_CO2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        let impact = environmental_impact(6_000.0);
        assert_relative_eq!(impact.co2_avoided_tons, 71.25, epsilon = 1e-9);
        assert_relative_eq!(impact.tree_equivalent_count, 508.725, epsilon = 1e-9);
    }

    #[test]
    fn test_pure_function_of_generation() {
        let a = environmental_impact(5_432.1);
        let b = environmental_impact(5_432.1);
        assert_eq!(a.co2_avoided_tons.to_bits(), b.co2_avoided_tons.to_bits());
        assert_eq!(a.tree_equivalent_count.to_bits(), b.tree_equivalent_count.to_bits());
    }

    #[test]
    fn test_no_generation_no_impact() {
        let impact = environmental_impact(0.0);
        assert_eq!(impact.co2_avoided_tons, 0.0);
        assert_eq!(impact.tree_equivalent_count, 0.0);
    }
}
