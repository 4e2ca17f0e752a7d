use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::PvgisConfig;
use crate::errors::FetchError;
use crate::models::profile::{GeoLocation, IrradianceProfile, MonthlyRecord};
use crate::models::upstream::PvcalcResponse;

/// Monthly yield of a 1 kWp fixed-mounting system at a location.
pub trait IrradianceSource {
    fn fetch_profile(
        &self,
        location: GeoLocation,
        system_losses_pct: f64,
    ) -> impl Future<Output = Result<IrradianceProfile, FetchError>> + Send;
}

/// JRC PVGIS `PVcalc` client.
#[derive(Clone, Debug)]
pub struct PvgisClient {
    base_url: String,
    client: Client,
}

impl PvgisClient {
    pub fn new(config: &PvgisConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl IrradianceSource for PvgisClient {
    async fn fetch_profile(&self, location: GeoLocation, system_losses_pct: f64) -> Result<IrradianceProfile, FetchError> {
        let url = format!("{}/PVcalc", self.base_url);
        debug!(
            "[PVGIS] Fetching profile for {:.4}, {:.4} (losses {}%)",
            location.latitude, location.longitude, system_losses_pct
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("peakpower", "1".to_string()),
                ("loss", system_losses_pct.to_string()),
                ("outputformat", "json".to_string()),
                ("pvcalculation", "1".to_string()),
                ("mounting_system", "fixed".to_string()),
                ("optimalangles", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body: PvcalcResponse = response.json().await?;
        into_profile(body)
    }
}

/// Normalises the PVcalc payload into the 12-month profile.
pub fn into_profile(body: PvcalcResponse) -> Result<IrradianceProfile, FetchError> {
    let records = body
        .outputs
        .monthly
        .fixed
        .iter()
        .map(|m| MonthlyRecord {
            month: m.month,
            generation_per_kwp: m.e_m,
            irradiation_per_kwp: m.h_i_m,
        })
        .collect();

    let mounting = &body.inputs.mounting_system.fixed;
    Ok(IrradianceProfile::new(records, mounting.slope.value, mounting.azimuth.value)?)
}
