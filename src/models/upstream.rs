use serde::Deserialize;

// ─── Nominatim wire types ────────────────────────────────────────────────────

/// One hit of `GET /search?format=json`. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// ─── PVGIS PVcalc wire types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PvcalcResponse {
    pub inputs: PvcalcInputs,
    pub outputs: PvcalcOutputs,
}

#[derive(Debug, Deserialize)]
pub struct PvcalcInputs {
    pub mounting_system: MountingSystem,
}

#[derive(Debug, Deserialize)]
pub struct MountingSystem {
    pub fixed: FixedMounting,
}

#[derive(Debug, Deserialize)]
pub struct FixedMounting {
    pub slope: AngleValue,
    pub azimuth: AngleValue,
}

#[derive(Debug, Deserialize)]
pub struct AngleValue {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct PvcalcOutputs {
    pub monthly: MonthlyOutputs,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyOutputs {
    pub fixed: Vec<PvcalcMonth>,
}

#[derive(Debug, Deserialize)]
pub struct PvcalcMonth {
    pub month: u8,
    /// Average monthly energy production (kWh)
    #[serde(rename = "E_m")]
    pub e_m: f64,
    /// Average monthly in-plane irradiation (kWh/m²)
    #[serde(rename = "H(i)_m")]
    pub h_i_m: f64,
}
