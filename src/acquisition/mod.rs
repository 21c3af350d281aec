//! Sensor data acquisition module
//!
//! Handles soil reading ingestion from the ThingSpeak channel, with demo
//! data substituted when the channel cannot be reached.

pub mod fallback;
mod source;
pub mod thingspeak;

pub use fallback::{demo_history, demo_reading, history_or_fallback, latest_or_fallback};
pub use source::{DemoSource, ReadingSource, StaticSource};
pub use thingspeak::ThingSpeakClient;

/// Feed client errors
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Feed returned no entries")]
    EmptyFeed,
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
}
