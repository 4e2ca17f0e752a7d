use crate::models::profile::IrradianceProfile;

/// Recommended installed capacity (kWp) so that the worst month of the
/// profile still covers `consumption_kwh` plus the safety margin.
///
/// The profile already carries the system losses, so none are applied here.
/// Returns `0.0` when the worst-month factor is not positive.
pub fn size_system(profile: &IrradianceProfile, consumption_kwh: f64, margin_pct: f64) -> f64 {
    let worst_month_factor = profile.worst_month_factor();
    let target_kwh = target_consumption_kwh(consumption_kwh, margin_pct);

    if worst_month_factor > 0.0 {
        target_kwh / worst_month_factor
    } else {
        0.0
    }
}

pub fn target_consumption_kwh(consumption_kwh: f64, margin_pct: f64) -> f64 {
    consumption_kwh * (1.0 + margin_pct / 100.0)
}
