//! Soil Health Index scoring constants: normalization curves, factor weights,
//! classification bands, and nutrient badge thresholds.
//!
//! These values are part of the scoring contract. Changing any of them changes
//! every score produced, so they are compile-time constants rather than
//! operator-tunable config.

use serde::Serialize;

// ============================================================================
// Curve shapes
// ============================================================================

/// Ramp up, plateau, ramp down. Used for nutrients, where both deficiency and
/// excess hurt but a broad middle band is fine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trapezoid {
    /// Raw value at which the rising ramp reaches 1.0 (ramp starts at 0).
    pub rise_end: f64,
    /// Last raw value of the plateau.
    pub fall_start: f64,
    /// Raw value at which the falling ramp reaches 0.0.
    pub fall_end: f64,
}

impl Trapezoid {
    /// Map a raw reading onto [0, 1].
    pub fn apply(&self, x: f64) -> f64 {
        if x <= self.rise_end {
            clamp01(x / self.rise_end)
        } else if x <= self.fall_start {
            1.0
        } else {
            clamp01(1.0 - (x - self.fall_start) / (self.fall_end - self.fall_start))
        }
    }
}

/// Single ideal center decaying linearly to zero at `center ± half_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tent {
    pub center: f64,
    pub half_width: f64,
}

impl Tent {
    /// Map a raw reading onto [0, 1].
    pub fn apply(&self, x: f64) -> f64 {
        clamp01(1.0 - (x - self.center).abs() / self.half_width)
    }
}

/// Clamp into [0, 1].
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Clamp into [0, 100].
pub fn clamp_percent(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

// ============================================================================
// Per-factor curves
// ============================================================================

/// Normalization curves, one per scored factor.
pub mod curves {
    use super::{Tent, Trapezoid};

    /// Nitrogen (mg/kg): 0→80 ramp, 80–180 plateau, 180→240 ramp down.
    pub const NITROGEN: Trapezoid = Trapezoid {
        rise_end: 80.0,
        fall_start: 180.0,
        fall_end: 240.0,
    };

    /// Phosphorus (mg/kg): 0→110 ramp, 110–350 plateau, 350→400 ramp down.
    pub const PHOSPHORUS: Trapezoid = Trapezoid {
        rise_end: 110.0,
        fall_start: 350.0,
        fall_end: 400.0,
    };

    /// Potassium (mg/kg): same shape as phosphorus.
    pub const POTASSIUM: Trapezoid = Trapezoid {
        rise_end: 110.0,
        fall_start: 350.0,
        fall_end: 400.0,
    };

    /// Soil pH: ideal 6.75, zero at 5.0 and 8.5.
    pub const SOIL_PH: Tent = Tent {
        center: 6.75,
        half_width: 1.75,
    };

    /// Soil moisture (%): ideal 30, zero at 10 and 50.
    pub const SOIL_MOISTURE: Tent = Tent {
        center: 30.0,
        half_width: 20.0,
    };

    /// Temperature (°C): ideal 25, zero at 15 and 35.
    pub const TEMPERATURE: Tent = Tent {
        center: 25.0,
        half_width: 10.0,
    };

    /// Relative humidity (%): ideal 60, zero at 40 and 80.
    pub const HUMIDITY: Tent = Tent {
        center: 60.0,
        half_width: 20.0,
    };
}

// ============================================================================
// Weights
// ============================================================================

/// Composite weights. Nitrogen carries the most agronomic weight.
pub mod weights {
    /// Nitrogen weight (20%)
    pub const NITROGEN: f64 = 0.20;
    /// Phosphorus weight (15%)
    pub const PHOSPHORUS: f64 = 0.15;
    /// Potassium weight (15%)
    pub const POTASSIUM: f64 = 0.15;
    /// Soil pH weight (15%)
    pub const SOIL_PH: f64 = 0.15;
    /// Soil moisture weight (15%)
    pub const SOIL_MOISTURE: f64 = 0.15;
    /// Temperature weight (10%)
    pub const TEMPERATURE: f64 = 0.10;
    /// Humidity weight (10%)
    pub const HUMIDITY: f64 = 0.10;

    /// All weights in canonical factor order. Must sum to 1.0.
    pub const ALL: [f64; 7] = [
        NITROGEN,
        PHOSPHORUS,
        POTASSIUM,
        SOIL_PH,
        SOIL_MOISTURE,
        TEMPERATURE,
        HUMIDITY,
    ];
}

// ============================================================================
// Classification bands
// ============================================================================

/// Lower bounds (inclusive) of each health band, in percent.
pub mod bands {
    pub const EXCELLENT_MIN: f64 = 80.0;
    pub const GOOD_MIN: f64 = 60.0;
    pub const MODERATE_MIN: f64 = 40.0;
}

// ============================================================================
// Nutrient badges
// ============================================================================

/// Dashboard badge thresholds and gauge scales for the NPK readings (mg/kg).
pub mod nutrient_badges {
    /// Nitrogen at or above this is optimal.
    pub const NITROGEN_OPTIMAL_MIN: f64 = 81.0;
    /// Nitrogen above this is critical (excess).
    pub const NITROGEN_CRITICAL_ABOVE: f64 = 180.0;
    /// Nitrogen gauge full-scale value.
    pub const NITROGEN_GAUGE_MAX: f64 = 240.0;

    /// Phosphorus/potassium at or above this is optimal.
    pub const PK_OPTIMAL_MIN: f64 = 111.0;
    /// Phosphorus/potassium above this is critical (excess).
    pub const PK_CRITICAL_ABOVE: f64 = 350.0;
    /// Phosphorus/potassium gauge full-scale value.
    pub const PK_GAUGE_MAX: f64 = 400.0;
}
