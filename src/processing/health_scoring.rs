//! Soil Health Index scoring
//!
//! Deterministic, rule-based scoring of one sensor reading. Each factor is
//! normalized onto [0, 1], weighted, and summed into a composite which is
//! then scaled to a 0-100 percentage and banded.
//!
//! # Weights
//!
//! | Factor        | Weight |
//! |---------------|--------|
//! | Nitrogen      | 0.20   |
//! | Phosphorus    | 0.15   |
//! | Potassium     | 0.15   |
//! | Soil pH       | 0.15   |
//! | Soil moisture | 0.15   |
//! | Temperature   | 0.10   |
//! | Humidity      | 0.10   |
//!
//! The composite is summed left to right in that order so the result is
//! reproducible to the last bit.

use crate::processing::nutrient_status::nutrient_statuses;
use crate::processing::InvalidInputError;
use crate::types::thresholds::bands;
use crate::types::{
    clamp_percent, Factor, FactorScore, HealthLabel, SensorReading, SoilHealthReport,
    SoilHealthResult,
};

/// Compute the Soil Health Index for one reading.
///
/// # Errors
///
/// Returns [`InvalidInputError`] naming the first factor (in canonical order)
/// whose value is NaN or infinite. No partial result is produced.
pub fn compute_soil_health(reading: &SensorReading) -> Result<SoilHealthResult, InvalidInputError> {
    validate_reading(reading)?;

    let percent = clamp_percent(weighted_composite(reading) * 100.0);
    Ok(SoilHealthResult {
        percent,
        label: classify(percent),
    })
}

/// Compute the score together with its per-factor breakdown and NPK badges.
///
/// # Errors
///
/// Same as [`compute_soil_health`].
pub fn build_report(reading: &SensorReading) -> Result<SoilHealthReport, InvalidInputError> {
    let result = compute_soil_health(reading)?;
    let factors = factor_scores(reading);
    let composite = factors
        .iter()
        .fold(0.0, |acc, f| acc + f.contribution);

    Ok(SoilHealthReport {
        result,
        composite,
        display_percent: result.display_percent(),
        factors,
        nutrients: nutrient_statuses(reading),
    })
}

/// Map a percentage onto its qualitative band.
///
/// Thresholds:
/// - Excellent: 80-100
/// - Good: 60-79.99
/// - Moderate: 40-59.99
/// - Poor: below 40
pub fn classify(percent: f64) -> HealthLabel {
    if percent >= bands::EXCELLENT_MIN {
        HealthLabel::Excellent
    } else if percent >= bands::GOOD_MIN {
        HealthLabel::Good
    } else if percent >= bands::MODERATE_MIN {
        HealthLabel::Moderate
    } else {
        HealthLabel::Poor
    }
}

/// Per-factor normalized scores and weighted contributions, in canonical order.
///
/// Does not validate; callers scoring untrusted input go through
/// [`compute_soil_health`] or [`build_report`].
pub fn factor_scores(reading: &SensorReading) -> Vec<FactorScore> {
    Factor::ALL
        .iter()
        .map(|&factor| {
            let raw = factor.value_in(reading);
            let normalized = factor.normalize(raw);
            let weight = factor.weight();
            FactorScore {
                factor,
                raw,
                normalized,
                weight,
                contribution: weight * normalized,
            }
        })
        .collect()
}

fn weighted_composite(reading: &SensorReading) -> f64 {
    Factor::ALL.iter().fold(0.0, |acc, &factor| {
        acc + factor.weight() * factor.normalize(factor.value_in(reading))
    })
}

fn validate_reading(reading: &SensorReading) -> Result<(), InvalidInputError> {
    match Factor::ALL
        .iter()
        .find(|f| !f.value_in(reading).is_finite())
    {
        Some(&field) => Err(InvalidInputError {
            field,
            value: field.value_in(reading),
        }),
        None => Ok(()),
    }
}
