//! soilwatch: Soil Health Index scoring and sensor-feed service
//!
//! Turns seven soil and environment readings into a single 0-100 health
//! score with a qualitative label.
//!
//! ## Architecture
//!
//! - **Processing**: pure, deterministic scoring (`compute_soil_health`)
//! - **Acquisition**: ThingSpeak channel client with demo-data fallback
//! - **Pipeline**: background poller keeping the latest scored reading
//! - **API**: Axum HTTP endpoints over the pipeline state
//!
//! ```
//! use soilwatch::{compute_soil_health, HealthLabel, SensorReading};
//!
//! let reading = SensorReading {
//!     nitrogen: 45.2,
//!     phosphorus: 23.8,
//!     potassium: 156.4,
//!     soil_ph: 6.5,
//!     soil_moisture: 68.5,
//!     temperature: 24.3,
//!     humidity: 72.1,
//! };
//! let result = compute_soil_health(&reading)?;
//! assert_eq!(result.label, HealthLabel::Moderate);
//! assert_eq!(result.display_percent(), 56);
//! # Ok::<(), soilwatch::InvalidInputError>(())
//! ```

pub mod acquisition;
pub mod api;
pub mod config;
pub mod pipeline;
pub mod processing;
pub mod types;

// Re-export configuration
pub use config::AppConfig;

// Re-export the scorer
pub use processing::{build_report, classify, compute_soil_health, InvalidInputError};

// Re-export commonly used types
pub use types::{
    Factor, FactorScore, HealthLabel, NutrientLevel, NutrientStatus, Observation, ReadingOrigin,
    SensorReading, SoilHealthReport, SoilHealthResult,
};

// Re-export feed sources
pub use acquisition::{DemoSource, FeedError, ReadingSource, StaticSource, ThingSpeakClient};
