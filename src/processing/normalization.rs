//! Per-factor normalization onto a common [0, 1] suitability scale.
//!
//! Nutrients use trapezoidal curves; pH, moisture, temperature and humidity
//! use tent curves around an ideal center. Every function clamps its output
//! to [0, 1] and accepts any finite input, including physically impossible
//! ones (negative nitrogen, 1e9 humidity): those land on 0 or 1.

use crate::types::thresholds::curves;

/// Nitrogen (mg/kg): ramps 0→1 over [0, 80], plateau to 180, 0 at 240.
pub fn normalize_nitrogen(n: f64) -> f64 {
    curves::NITROGEN.apply(n)
}

/// Phosphorus (mg/kg): ramps 0→1 over [0, 110], plateau to 350, 0 at 400.
pub fn normalize_phosphorus(p: f64) -> f64 {
    curves::PHOSPHORUS.apply(p)
}

/// Potassium (mg/kg): same shape as phosphorus.
pub fn normalize_potassium(k: f64) -> f64 {
    curves::POTASSIUM.apply(k)
}

/// Soil pH: `1 - |pH - 6.75| / 1.75`, clamped.
pub fn normalize_ph(ph: f64) -> f64 {
    curves::SOIL_PH.apply(ph)
}

/// Soil moisture (%): `1 - |m - 30| / 20`, clamped.
pub fn normalize_soil_moisture(m: f64) -> f64 {
    curves::SOIL_MOISTURE.apply(m)
}

/// Temperature (°C): `1 - |t - 25| / 10`, clamped.
pub fn normalize_temperature(t: f64) -> f64 {
    curves::TEMPERATURE.apply(t)
}

/// Relative humidity (%): `1 - |h - 60| / 20`, clamped.
pub fn normalize_humidity(h: f64) -> f64 {
    curves::HUMIDITY.apply(h)
}
