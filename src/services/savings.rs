use crate::models::simulation::{ConnectionType, SavingsBreakdown};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Yearly value of the generated energy minus the availability charge the
/// utility bills every month. May be negative.
pub fn net_annual_savings(annual_generation_kwh: f64, tariff_rate: f64, connection_type: ConnectionType) -> f64 {
    let monthly_availability_cost = connection_type.availability_kwh() * tariff_rate;
    annual_generation_kwh * tariff_rate - monthly_availability_cost * MONTHS_PER_YEAR
}

pub fn breakdown(
    annual_generation_kwh: f64,
    tariff_rate: f64,
    connection_type: ConnectionType,
    unit_cost_per_wp: f64,
) -> SavingsBreakdown {
    let availability_kwh = connection_type.availability_kwh();

    SavingsBreakdown {
        availability_kwh,
        monthly_availability_cost: availability_kwh * tariff_rate,
        gross_annual_savings: annual_generation_kwh * tariff_rate,
        net_annual_savings: net_annual_savings(annual_generation_kwh, tariff_rate, connection_type),
        unit_cost_per_wp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_availability_charge_per_connection() {
        // 6000 kWh · 1.0 = 6000 gross; minus 12 · availability
        assert_relative_eq!(net_annual_savings(6000.0, 1.0, ConnectionType::Monophase), 5640.0);
        assert_relative_eq!(net_annual_savings(6000.0, 1.0, ConnectionType::Biphase), 5400.0);
        assert_relative_eq!(net_annual_savings(6000.0, 1.0, ConnectionType::Triphase), 4800.0);
    }

    #[test]
    fn test_breakdown_fields() {
        let b = breakdown(5000.0, 0.95, ConnectionType::Triphase, 2.8);
        assert_relative_eq!(b.monthly_availability_cost, 95.0, epsilon = 1e-9);
        assert_relative_eq!(b.gross_annual_savings, 4750.0, epsilon = 1e-9);
        assert_relative_eq!(b.net_annual_savings, 3610.0, epsilon = 1e-9);
        assert_eq!(b.unit_cost_per_wp, 2.8);
    }

    #[test]
    fn test_small_generation_goes_negative() {
        let net = net_annual_savings(500.0, 0.95, ConnectionType::Triphase);
        assert!(net < 0.0, "availability charge must always be subtracted, got {net}");
    }
}
