//! Shared data structures for soil health scoring
//!
//! - `SensorReading` / `Observation`: raw inputs and feed observations
//! - `Factor`: the seven scored factors with their weights and curves
//! - `SoilHealthResult` / `SoilHealthReport`: scorer outputs
//! - `thresholds`: curve breakpoints, weights, bands, nutrient badges

mod factor;
mod health;
mod reading;
pub mod thresholds;

pub use factor::*;
pub use health::*;
pub use reading::*;
pub use thresholds::{clamp01, clamp_percent, Tent, Trapezoid};
