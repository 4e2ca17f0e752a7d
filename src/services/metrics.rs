/// ============================================================
///  Investment metrics over a yearly cash-flow series
///
///   • NPV                – discrete discounting, year 0 undiscounted
///   • IRR                – scan for sign changes of NPV(r) (linear up to
///                          100 %, geometric beyond), then Brent
///                          refinement of the bracket nearest 0 %
///   • Simple payback     – outlay / first-year savings
///   • Discounted payback – first year the running NPV reaches zero
/// ============================================================

use roots::{find_root_brent, SimpleConvergency};

use crate::models::simulation::{CashFlowSeries, FinancialMetrics, Verdict};

// ─── IRR search window (fractional rates) ────────────────────
const IRR_SCAN_MIN: f64 = -0.99;
const IRR_LINEAR_MAX: f64 = 1.0;
const IRR_SCAN_STEP: f64 = 0.01;
const IRR_SCAN_GROWTH: f64 = 1.02;
const IRR_SCAN_MAX: f64 = 1000.0;
const IRR_TOLERANCE: f64 = 1e-12;
const IRR_MAX_ITER: usize = 200;

pub fn compute_metrics(cash_flow: &CashFlowSeries, discount_rate_pct: f64) -> FinancialMetrics {
    let rate = discount_rate_pct / 100.0;
    let flows = cash_flow.flows();
    let cumulative = cumulative_npv(rate, flows);

    FinancialMetrics {
        npv: npv(rate, flows),
        irr_pct: irr(flows).map(|r| r * 100.0),
        simple_payback_years: simple_payback(cash_flow.initial_outlay(), cash_flow.first_year_savings()),
        discounted_payback_years: discounted_payback(&cumulative),
        cumulative_npv: cumulative,
    }
}

/// NPV > 0 and IRR > discount rate are reported as two separate checks.
pub fn verdict(metrics: &FinancialMetrics, discount_rate_pct: f64) -> Verdict {
    let irr_spread_pp = metrics.irr_pct.map(|irr| irr - discount_rate_pct);
    Verdict {
        npv_viable: metrics.npv > 0.0,
        irr_viable: irr_spread_pp.is_some_and(|spread| spread > 0.0),
        irr_spread_pp,
    }
}

pub fn npv(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / discount_factor(rate, t))
        .sum()
}

/// Running NPV of `flows[0..=t]` for every `t`.
pub fn cumulative_npv(rate: f64, flows: &[f64]) -> Vec<f64> {
    flows
        .iter()
        .enumerate()
        .scan(0.0, |acc, (t, cf)| {
            *acc += cf / discount_factor(rate, t);
            Some(*acc)
        })
        .collect()
}

#[inline]
fn discount_factor(rate: f64, t: usize) -> f64 {
    (1.0 + rate).powi(t as i32)
}

/// Rate (fraction) at which the NPV of `flows` is zero.
///
/// `None` when the series never changes sign or no root lies inside the
/// search window. With several roots the one closest to zero wins.
pub fn irr(flows: &[f64]) -> Option<f64> {
    let has_inflow = flows.iter().any(|&cf| cf > 0.0);
    let has_outflow = flows.iter().any(|&cf| cf < 0.0);
    if !has_inflow || !has_outflow {
        return None;
    }

    let f = |r: f64| npv(r, flows);
    let mut best: Option<(f64, f64)> = None;
    let mut consider = |lo: f64, hi: f64| {
        let mid = 0.5 * (lo + hi);
        if best.is_none_or(|(a, b)| mid.abs() < (0.5 * (a + b)).abs()) {
            best = Some((lo, hi));
        }
    };

    let mut prev_r = IRR_SCAN_MIN;
    let mut prev_v = f(prev_r);
    for r in scan_points().skip(1) {
        let v = f(r);
        if v.is_finite() && prev_v.is_finite() {
            if v == 0.0 {
                consider(r, r);
            } else if prev_v != 0.0 && prev_v.signum() != v.signum() {
                consider(prev_r, r);
            }
        }
        prev_r = r;
        prev_v = v;
    }

    let (lo, hi) = best?;
    if lo == hi {
        return Some(lo);
    }

    let mut convergency = SimpleConvergency {
        eps: IRR_TOLERANCE,
        max_iter: IRR_MAX_ITER,
    };
    find_root_brent::<f64, _>(lo, hi, f, &mut convergency).ok()
}

/// Candidate rates: 1 % steps up to 100 %, then 2 % geometric growth
/// until the upper bound.
fn scan_points() -> impl Iterator<Item = f64> {
    let linear_steps = ((IRR_LINEAR_MAX - IRR_SCAN_MIN) / IRR_SCAN_STEP).round() as usize;
    let linear = (0..=linear_steps).map(|i| IRR_SCAN_MIN + i as f64 * IRR_SCAN_STEP);
    let geometric = std::iter::successors(Some(IRR_LINEAR_MAX * IRR_SCAN_GROWTH), |r| {
        let next = r * IRR_SCAN_GROWTH;
        (next <= IRR_SCAN_MAX).then_some(next)
    });
    linear.chain(geometric)
}

/// Years to recover the outlay from undiscounted first-year savings.
pub fn simple_payback(installation_cost: f64, net_annual_savings: f64) -> Option<f64> {
    if net_annual_savings > 0.0 {
        Some(installation_cost / net_annual_savings)
    } else {
        None
    }
}

pub fn discounted_payback(cumulative_npv: &[f64]) -> Option<u32> {
    cumulative_npv
        .iter()
        .position(|&v| v >= 0.0)
        .map(|year| year as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cash_flow::{project_cash_flow, HORIZON_YEARS};
    use approx::assert_relative_eq;

    #[test]
    fn test_npv_at_zero_rate_is_plain_sum() {
        let cf = project_cash_flow(20_000.0, 2_500.0, 7.0, 0.5);
        let sum: f64 = cf.flows().iter().sum();
        assert_relative_eq!(npv(0.0, cf.flows()), sum, max_relative = 1e-12);
    }

    #[test]
    fn test_npv_hand_computed() {
        // -100 + 60/1.1 + 60/1.21
        let v = npv(0.10, &[-100.0, 60.0, 60.0]);
        assert_relative_eq!(v, 4.132_231_404_958_677, epsilon = 1e-9);
    }

    #[test]
    fn test_irr_zeroes_npv() {
        let cf = project_cash_flow(20_000.0, 2_500.0, 7.0, 0.5);
        let r = irr(cf.flows()).expect("single sign change must give an IRR");
        let residual = npv(r, cf.flows());
        assert!(
            residual.abs() <= 1e-6 * 20_000.0,
            "NPV at IRR {:.6} should vanish, got {residual}",
            r
        );
        assert!(r > 0.10 && r < 0.30, "IRR out of plausible range: {r}");
    }

    #[test]
    fn test_irr_two_period_exact() {
        // -100 then +110 → 10 %
        let r = irr(&[-100.0, 110.0]).unwrap();
        assert_relative_eq!(r, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_irr_negative_rate() {
        // Savings never recover the outlay nominally → IRR below zero.
        let cf = project_cash_flow(30_000.0, 800.0, 0.0, 0.5);
        let r = irr(cf.flows()).unwrap();
        assert!(r < 0.0);
        assert!(npv(r, cf.flows()).abs() < 1e-6 * 30_000.0);
    }

    #[test]
    fn test_irr_far_above_one_hundred_percent() {
        // Savings forty times the outlay: IRR close to 4000 %
        let cf = project_cash_flow(1_000.0, 40_000.0, 0.0, 0.0);
        let r = irr(cf.flows()).expect("IRR above 1000 % must still be found");
        assert!(r > 39.0 && r < 41.0, "IRR = {r}");
        assert!(npv(r, cf.flows()).abs() <= 1e-6 * 1_000.0);

        let metrics = compute_metrics(&cf, 10.0);
        assert!(verdict(&metrics, 10.0).irr_viable);
    }

    #[test]
    fn test_irr_beyond_search_window_is_undefined() {
        // Root at 9 999 999 (fractional), past the 100 000 % upper bound
        assert_eq!(irr(&[-1.0, 10_000_000.0]), None);
    }

    #[test]
    fn test_irr_undefined_without_sign_change() {
        assert_eq!(irr(&[-1000.0, 0.0, 0.0, 0.0]), None);
        assert_eq!(irr(&[-1000.0, -10.0, -10.0]), None);
        assert_eq!(irr(&[0.0; 26]), None);
    }

    #[test]
    fn test_simple_payback_reference() {
        let cf = project_cash_flow(20_000.0, 2_500.0, 7.0, 0.5);
        let m = compute_metrics(&cf, 10.0);
        assert_eq!(m.simple_payback_years, Some(8.0));
    }

    #[test]
    fn test_simple_payback_never() {
        assert_eq!(simple_payback(10_000.0, 0.0), None);
        assert_eq!(simple_payback(10_000.0, -50.0), None);
    }

    #[test]
    fn test_discounted_payback_is_first_non_negative_year() {
        let cf = project_cash_flow(20_000.0, 2_500.0, 7.0, 0.5);
        let m = compute_metrics(&cf, 10.0);
        let t = m.discounted_payback_years.expect("payback should be reached") as usize;
        assert!(m.cumulative_npv[t] >= 0.0);
        assert!(m.cumulative_npv[t - 1] < 0.0);
        assert_eq!(m.cumulative_npv.len(), HORIZON_YEARS + 1);
        assert_relative_eq!(m.cumulative_npv[HORIZON_YEARS], m.npv, max_relative = 1e-12);
    }

    #[test]
    fn test_all_negative_series() {
        let cf = project_cash_flow(12_000.0, 0.0, 7.0, 0.5);
        let m = compute_metrics(&cf, 10.0);
        assert_eq!(m.irr_pct, None);
        assert_eq!(m.npv, -12_000.0);
        assert_eq!(m.discounted_payback_years, None);
        assert_eq!(m.simple_payback_years, None);

        let v = verdict(&m, 10.0);
        assert!(!v.npv_viable);
        assert!(!v.irr_viable);
        assert_eq!(v.irr_spread_pp, None);
    }

    #[test]
    fn test_verdicts_can_disagree() {
        let m = FinancialMetrics {
            npv: -10.0,
            irr_pct: Some(12.0),
            simple_payback_years: Some(9.0),
            discounted_payback_years: None,
            cumulative_npv: vec![],
        };
        let v = verdict(&m, 10.0);
        assert!(!v.npv_viable);
        assert!(v.irr_viable);
        assert_relative_eq!(v.irr_spread_pp.unwrap(), 2.0);
    }
}
