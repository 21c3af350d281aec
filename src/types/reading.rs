//! Raw sensor readings and feed observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete set of soil and environment readings.
///
/// All seven fields are required. The scorer never infers or defaults a
/// value; a caller missing a reading passes a placeholder (`0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Nitrogen (mg/kg)
    pub nitrogen: f64,
    /// Phosphorus (mg/kg)
    pub phosphorus: f64,
    /// Potassium (mg/kg)
    pub potassium: f64,
    /// Soil pH (0-14)
    #[serde(alias = "soilPH")]
    pub soil_ph: f64,
    /// Volumetric soil moisture (%)
    #[serde(alias = "soilMoisture")]
    pub soil_moisture: f64,
    /// Air/soil temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

/// Where an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrigin {
    /// Fetched from the live sensor feed.
    Live,
    /// Demo data substituted because the feed was unavailable.
    Fallback,
}

/// A reading stamped with its capture time and origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub reading: SensorReading,
    pub observed_at: DateTime<Utc>,
    pub origin: ReadingOrigin,
}

impl Observation {
    pub const fn live(reading: SensorReading, observed_at: DateTime<Utc>) -> Self {
        Self {
            reading,
            observed_at,
            origin: ReadingOrigin::Live,
        }
    }

    pub const fn fallback(reading: SensorReading, observed_at: DateTime<Utc>) -> Self {
        Self {
            reading,
            observed_at,
            origin: ReadingOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ReadingOrigin::Fallback
    }
}
