//! The seven scored soil/environment factors

use serde::{Deserialize, Serialize};

use super::thresholds::{curves, weights};
use super::SensorReading;

/// One scored input of the Soil Health Index.
///
/// Variants are declared in canonical order; [`Factor::ALL`] and the composite
/// sum both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Nitrogen,
    Phosphorus,
    Potassium,
    SoilPh,
    SoilMoisture,
    Temperature,
    Humidity,
}

impl Factor {
    /// Every factor in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Nitrogen,
        Self::Phosphorus,
        Self::Potassium,
        Self::SoilPh,
        Self::SoilMoisture,
        Self::Temperature,
        Self::Humidity,
    ];

    /// Composite weight of this factor.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Nitrogen => weights::NITROGEN,
            Self::Phosphorus => weights::PHOSPHORUS,
            Self::Potassium => weights::POTASSIUM,
            Self::SoilPh => weights::SOIL_PH,
            Self::SoilMoisture => weights::SOIL_MOISTURE,
            Self::Temperature => weights::TEMPERATURE,
            Self::Humidity => weights::HUMIDITY,
        }
    }

    /// Map a raw reading of this factor onto [0, 1].
    pub fn normalize(self, raw: f64) -> f64 {
        match self {
            Self::Nitrogen => curves::NITROGEN.apply(raw),
            Self::Phosphorus => curves::PHOSPHORUS.apply(raw),
            Self::Potassium => curves::POTASSIUM.apply(raw),
            Self::SoilPh => curves::SOIL_PH.apply(raw),
            Self::SoilMoisture => curves::SOIL_MOISTURE.apply(raw),
            Self::Temperature => curves::TEMPERATURE.apply(raw),
            Self::Humidity => curves::HUMIDITY.apply(raw),
        }
    }

    /// Pull this factor's raw value out of a reading.
    pub const fn value_in(self, reading: &SensorReading) -> f64 {
        match self {
            Self::Nitrogen => reading.nitrogen,
            Self::Phosphorus => reading.phosphorus,
            Self::Potassium => reading.potassium,
            Self::SoilPh => reading.soil_ph,
            Self::SoilMoisture => reading.soil_moisture,
            Self::Temperature => reading.temperature,
            Self::Humidity => reading.humidity,
        }
    }

    /// Field name as it appears on [`SensorReading`].
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::Potassium => "potassium",
            Self::SoilPh => "soil_ph",
            Self::SoilMoisture => "soil_moisture",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }

    /// Unit label for display.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Nitrogen | Self::Phosphorus | Self::Potassium => "mg/kg",
            Self::SoilPh => "pH",
            Self::SoilMoisture | Self::Humidity => "%",
            Self::Temperature => "°C",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_weight_table_order() {
        for (factor, w) in Factor::ALL.iter().zip(weights::ALL.iter()) {
            assert_eq!(factor.weight(), *w, "weight mismatch for {factor}");
        }
    }

    #[test]
    fn test_value_in_reads_matching_field() {
        let reading = SensorReading {
            nitrogen: 1.0,
            phosphorus: 2.0,
            potassium: 3.0,
            soil_ph: 4.0,
            soil_moisture: 5.0,
            temperature: 6.0,
            humidity: 7.0,
        };
        let values: Vec<f64> = Factor::ALL.iter().map(|f| f.value_in(&reading)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_serializes_snake_case() {
        let v = serde_json::to_value(Factor::SoilPh).unwrap();
        assert_eq!(v, serde_json::json!("soil_ph"));
    }
}
