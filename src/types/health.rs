//! Soil Health Index outputs: result, label, per-factor breakdown, nutrient badges

use serde::{Deserialize, Serialize};

use super::Factor;

/// Qualitative health band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthLabel {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl HealthLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score and its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilHealthResult {
    /// Health score, 0-100.
    pub percent: f64,
    pub label: HealthLabel,
}

impl SoilHealthResult {
    /// Percent rounded to the nearest integer, as shown on badges.
    // percent is clamped to [0, 100]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_percent(&self) -> u8 {
        self.percent.round() as u8
    }
}

/// How one factor contributed to the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: Factor,
    /// Raw reading as supplied
    pub raw: f64,
    /// Suitability on [0, 1]
    pub normalized: f64,
    pub weight: f64,
    /// `weight * normalized`
    pub contribution: f64,
}

/// Badge level for an NPK reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientLevel {
    /// Below the optimal band (deficient).
    Warning,
    Optimal,
    /// Above the optimal band (excess).
    Critical,
}

/// Badge and gauge fill for one macronutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientStatus {
    pub nutrient: Factor,
    pub value: f64,
    pub level: NutrientLevel,
    /// Gauge fill, 0-100.
    pub gauge_percent: f64,
}

/// Full scoring output for display consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilHealthReport {
    pub result: SoilHealthResult,
    /// Weighted composite on [0, 1], before percentage scaling.
    pub composite: f64,
    /// `result.percent` rounded for display.
    pub display_percent: u8,
    pub factors: Vec<FactorScore>,
    pub nutrients: Vec<NutrientStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serializes_as_display_name() {
        let v = serde_json::to_value(HealthLabel::Moderate).unwrap();
        assert_eq!(v, serde_json::json!("Moderate"));
        assert_eq!(HealthLabel::Excellent.to_string(), "Excellent");
    }

    #[test]
    fn test_display_percent_rounds_half_up() {
        let r = SoilHealthResult {
            percent: 55.65,
            label: HealthLabel::Moderate,
        };
        assert_eq!(r.display_percent(), 56);

        let r = SoilHealthResult {
            percent: 79.4,
            label: HealthLabel::Good,
        };
        assert_eq!(r.display_percent(), 79);
    }
}
