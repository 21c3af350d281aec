//! Service Configuration Module
//!
//! Feed, server and farm settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `SOILWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `soilwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! `SOILWATCH_SERVER_ADDR` and `SOILWATCH_THINGSPEAK_KEY` are applied on top.
//!
//! Handlers read the loaded config from `DashboardState`.

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
pub use validation::ValidationWarning;
