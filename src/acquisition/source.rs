//! Reading source abstraction for sensor feed ingestion.
//!
//! Provides a unified trait for reading soil observations from different
//! sources: the ThingSpeak channel, in-memory readings, and generated demo
//! data for offline mode.

use async_trait::async_trait;
use chrono::Utc;

use super::fallback::{demo_history, fallback_observation};
use super::FeedError;
use crate::types::Observation;

/// Trait abstracting where soil readings come from.
///
/// Shared across the poller and HTTP handlers behind an `Arc`, so
/// implementations take `&self` and handle their own interior state.
#[async_trait]
pub trait ReadingSource: Send + Sync + 'static {
    /// Most recent observation.
    async fn latest(&self) -> Result<Observation, FeedError>;

    /// Up to `results` most recent observations, oldest first.
    async fn history(&self, results: usize) -> Result<Vec<Observation>, FeedError>;

    /// Human-readable name for logging (e.g. "ThingSpeak", "static").
    fn source_name(&self) -> &str;
}

// ============================================================================
// Static Source (offline / demo)
// ============================================================================

/// Serves a fixed set of observations.
pub struct StaticSource {
    observations: Vec<Observation>,
    name: String,
}

impl StaticSource {
    /// `observations` must be ordered oldest first.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            name: "static".to_string(),
        }
    }
}

#[async_trait]
impl ReadingSource for StaticSource {
    async fn latest(&self) -> Result<Observation, FeedError> {
        self.observations.last().cloned().ok_or(FeedError::EmptyFeed)
    }

    async fn history(&self, results: usize) -> Result<Vec<Observation>, FeedError> {
        if self.observations.is_empty() {
            return Err(FeedError::EmptyFeed);
        }
        let skip = self.observations.len().saturating_sub(results);
        Ok(self.observations[skip..].to_vec())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Demo Source (offline mode)
// ============================================================================

/// Generates demo data on every call, stamped at the time of the call.
///
/// `latest` is always the fixed demo reading; `history` is fresh jittered
/// hourly data of whatever length is asked for.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSource;

#[async_trait]
impl ReadingSource for DemoSource {
    async fn latest(&self) -> Result<Observation, FeedError> {
        Ok(fallback_observation(Utc::now()))
    }

    async fn history(&self, results: usize) -> Result<Vec<Observation>, FeedError> {
        Ok(demo_history(results, Utc::now()))
    }

    fn source_name(&self) -> &str {
        "demo"
    }
}
