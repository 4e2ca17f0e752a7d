use crate::models::simulation::CashFlowSeries;

/// Operating years covered by the projection.
pub const HORIZON_YEARS: usize = 25;

/// Nominal cash flow: year 0 is the outlay, years 1..=25 the savings.
///
/// Savings compound every year by tariff inflation (up) and panel
/// degradation (down). There is no ceiling on the growth.
pub fn project_cash_flow(
    installation_cost: f64,
    initial_net_savings: f64,
    inflation_pct: f64,
    degradation_pct: f64,
) -> CashFlowSeries {
    let yearly_factor = (1.0 + inflation_pct / 100.0) * (1.0 - degradation_pct / 100.0);

    let mut flows = Vec::with_capacity(HORIZON_YEARS + 1);
    flows.push(-installation_cost);

    let mut running = initial_net_savings;
    for _year in 1..=HORIZON_YEARS {
        flows.push(running);
        #[cfg(feature = "verbose_log")]
        tracing::trace!("[CASH FLOW] year {} savings {:.2}", _year, running);
        running *= yearly_factor;
    }

    CashFlowSeries(flows)
}
