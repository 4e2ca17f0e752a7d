use crate::models::profile::IrradianceProfile;

const WATTS_PER_KILOWATT: f64 = 1000.0;

pub fn unit_cost_per_wp(module_cost_per_wp: f64, bos_cost_per_wp: f64) -> f64 {
    module_cost_per_wp + bos_cost_per_wp
}

/// Returns `(installation_cost, annual_generation_kwh)` for a system of
/// `recommended_kwp` built on `profile`.
pub fn estimate_cost(
    profile: &IrradianceProfile,
    recommended_kwp: f64,
    module_cost_per_wp: f64,
    bos_cost_per_wp: f64,
) -> (f64, f64) {
    let installation_cost =
        recommended_kwp * unit_cost_per_wp(module_cost_per_wp, bos_cost_per_wp) * WATTS_PER_KILOWATT;
    let annual_generation_kwh = profile.annual_generation_per_kwp() * recommended_kwp;
    (installation_cost, annual_generation_kwh)
}
