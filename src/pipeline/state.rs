//! Application State and Feed Status
//!
//! Shared state for the soil monitoring service, written by the feed poller
//! and read by API handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

use crate::processing::build_report;
use crate::types::{Observation, SoilHealthReport};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state accessible from API handlers and the poller.
///
/// Wrapped in `Arc<RwLock<>>` for access across the async runtime.
#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    /// Farm name from config, for status display
    pub farm_name: String,

    /// Name of the active reading source
    pub source_name: String,

    /// Most recent observation (live or fallback)
    pub latest: Option<Observation>,

    /// Score of `latest`
    pub latest_report: Option<SoilHealthReport>,

    /// True when the last fetch returned live data
    pub connected: bool,

    /// Fetch attempts since startup
    pub total_polls: u64,

    /// Fetch attempts that fell back to demo data
    pub failed_polls: u64,

    /// Failures since the last successful fetch
    pub consecutive_failures: u32,

    /// Error text of the most recent failed fetch
    pub last_error: Option<String>,

    /// When `latest` was stored
    pub last_update: Option<DateTime<Utc>>,

    /// Configured poll interval in seconds
    pub poll_interval_secs: u64,

    /// Service start (serialized as seconds by the status handler)
    #[serde(skip)]
    pub uptime: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            farm_name: String::new(),
            source_name: String::new(),
            latest: None,
            latest_report: None,
            connected: false,
            total_polls: 0,
            failed_polls: 0,
            consecutive_failures: 0,
            last_error: None,
            last_update: None,
            poll_interval_secs: crate::config::defaults::FEED_POLL_INTERVAL_SECS,
            uptime: Instant::now(),
        }
    }
}

impl AppState {
    pub fn new(farm_name: &str, source_name: &str, poll_interval_secs: u64) -> Self {
        Self {
            farm_name: farm_name.to_string(),
            source_name: source_name.to_string(),
            poll_interval_secs,
            ..Self::default()
        }
    }

    /// Store a successfully fetched observation.
    pub fn record_live(&mut self, observation: Observation) {
        self.total_polls += 1;
        self.consecutive_failures = 0;
        self.last_error = None;
        self.connected = !observation.is_fallback();
        self.store(observation);
    }

    /// Store substituted demo data after a failed fetch.
    pub fn record_fallback(&mut self, observation: Observation, error: String) {
        self.total_polls += 1;
        self.failed_polls += 1;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error);
        self.connected = false;
        self.store(observation);
    }

    fn store(&mut self, observation: Observation) {
        self.latest_report = match build_report(&observation.reading) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Observation could not be scored");
                None
            }
        };
        self.latest = Some(observation);
        self.last_update = Some(Utc::now());
    }

    /// Seconds since the service started.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime.elapsed().as_secs()
    }
}
