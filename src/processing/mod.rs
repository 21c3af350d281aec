//! Scoring module - Soil Health Index computation and nutrient badges

mod health_scoring;
pub mod normalization;
mod nutrient_status;

pub use health_scoring::{build_report, classify, compute_soil_health, factor_scores};
pub use normalization::*;
pub use nutrient_status::{gauge_percent, nutrient_level, nutrient_statuses};

use thiserror::Error;

use crate::types::Factor;

/// A reading field was NaN or infinite.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{field} reading is not a finite number (got {value})")]
pub struct InvalidInputError {
    /// The first offending field, in canonical factor order.
    pub field: Factor,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_field() {
        let err = InvalidInputError {
            field: Factor::SoilPh,
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "soil_ph reading is not a finite number (got NaN)");
    }
}
