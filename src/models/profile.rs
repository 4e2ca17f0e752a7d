use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ProfileError;

// ─── Location ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    /// Latitude in degrees (−90 … +90)
    pub latitude: f64,
    /// Longitude in degrees (−180 … +180)
    pub longitude: f64,
}

// ─── Monthly irradiance profile ──────────────────────────────────────────────

/// Yield of a 1 kWp fixed-mounting system during one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyRecord {
    /// Calendar month, 1 = January
    pub month: u8,
    /// Energy produced per installed kWp (kWh), system losses included
    pub generation_per_kwp: f64,
    /// In-plane irradiation (kWh/m²)
    pub irradiation_per_kwp: f64,
}

/// Twelve monthly records ordered January → December, plus the optimal
/// mounting angles reported by the irradiance source.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IrradianceProfile {
    months: Vec<MonthlyRecord>,
    pub optimal_tilt_deg: f64,
    pub optimal_azimuth_deg: f64,
}

impl IrradianceProfile {
    pub const MONTHS: usize = 12;

    /// Builds a profile from records in any order.
    ///
    /// Requires exactly one record for every month 1..=12 with finite values.
    pub fn new(
        mut records: Vec<MonthlyRecord>,
        optimal_tilt_deg: f64,
        optimal_azimuth_deg: f64,
    ) -> Result<Self, ProfileError> {
        if records.len() != Self::MONTHS {
            return Err(ProfileError::WrongRecordCount(records.len()));
        }

        let mut seen = [false; Self::MONTHS];
        for r in &records {
            if !(1..=12).contains(&r.month) {
                return Err(ProfileError::MonthOutOfRange(r.month));
            }
            let slot = &mut seen[usize::from(r.month - 1)];
            if *slot {
                return Err(ProfileError::DuplicateMonth(r.month));
            }
            *slot = true;
            if !r.generation_per_kwp.is_finite() || !r.irradiation_per_kwp.is_finite() {
                return Err(ProfileError::NonFiniteValue(r.month));
            }
        }

        records.sort_by_key(|r| r.month);
        Ok(Self {
            months: records,
            optimal_tilt_deg,
            optimal_azimuth_deg,
        })
    }

    pub fn months(&self) -> &[MonthlyRecord] {
        &self.months
    }

    /// Lowest monthly yield per kWp; the conservative sizing basis.
    pub fn worst_month_factor(&self) -> f64 {
        self.months
            .iter()
            .map(|r| r.generation_per_kwp)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn annual_generation_per_kwp(&self) -> f64 {
        self.months.iter().map(|r| r.generation_per_kwp).sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Profile where month `m` yields `base + 10·m` kWh/kWp.
    pub fn rising_profile(base: f64) -> IrradianceProfile {
        let records = (1..=12u8)
            .map(|m| MonthlyRecord {
                month: m,
                generation_per_kwp: base + 10.0 * f64::from(m),
                irradiation_per_kwp: 150.0 + f64::from(m),
            })
            .collect();
        IrradianceProfile::new(records, 14.0, 0.0).unwrap()
    }

    pub fn flat_profile(generation_per_kwp: f64) -> IrradianceProfile {
        let records = (1..=12u8)
            .map(|m| MonthlyRecord {
                month: m,
                generation_per_kwp,
                irradiation_per_kwp: 160.0,
            })
            .collect();
        IrradianceProfile::new(records, 20.0, 180.0).unwrap()
    }
}
