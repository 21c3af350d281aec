//! NPK badge levels and gauge fills
//!
//! Independent of the composite score: these drive the per-nutrient
//! indicators on the dashboard.

use crate::types::thresholds::nutrient_badges as badges;
use crate::types::{Factor, NutrientLevel, NutrientStatus, SensorReading};

/// Badge level for a nutrient reading.
///
/// Returns `None` for factors that are not macronutrients.
pub fn nutrient_level(nutrient: Factor, value: f64) -> Option<NutrientLevel> {
    let (optimal_min, critical_above) = band_for(nutrient)?;
    let level = if value > critical_above {
        NutrientLevel::Critical
    } else if value >= optimal_min {
        NutrientLevel::Optimal
    } else {
        NutrientLevel::Warning
    };
    Some(level)
}

/// Gauge fill (0-100) for a nutrient reading.
pub fn gauge_percent(nutrient: Factor, value: f64) -> Option<f64> {
    let max = match nutrient {
        Factor::Nitrogen => badges::NITROGEN_GAUGE_MAX,
        Factor::Phosphorus | Factor::Potassium => badges::PK_GAUGE_MAX,
        _ => return None,
    };
    Some(crate::types::clamp_percent(value / max * 100.0))
}

/// Badge status for N, P and K, in that order.
pub fn nutrient_statuses(reading: &SensorReading) -> Vec<NutrientStatus> {
    [Factor::Nitrogen, Factor::Phosphorus, Factor::Potassium]
        .iter()
        .filter_map(|&nutrient| {
            let value = nutrient.value_in(reading);
            Some(NutrientStatus {
                nutrient,
                value,
                level: nutrient_level(nutrient, value)?,
                gauge_percent: gauge_percent(nutrient, value)?,
            })
        })
        .collect()
}

const fn band_for(nutrient: Factor) -> Option<(f64, f64)> {
    match nutrient {
        Factor::Nitrogen => Some((badges::NITROGEN_OPTIMAL_MIN, badges::NITROGEN_CRITICAL_ABOVE)),
        Factor::Phosphorus | Factor::Potassium => {
            Some((badges::PK_OPTIMAL_MIN, badges::PK_CRITICAL_ABOVE))
        }
        _ => None,
    }
}
