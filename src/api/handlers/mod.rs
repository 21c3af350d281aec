//! API route handlers
//!
//! Request handling logic for all API endpoints including:
//! - On-demand and latest Soil Health Index scores
//! - Feed history and manual refresh
//! - Service status and configuration

mod config;
mod readings;
mod soil_health;
mod status;

pub use config::*;
pub use readings::*;
pub use soil_health::*;
pub use status::*;

use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use crate::acquisition::ReadingSource;
use crate::config::AppConfig;
use crate::pipeline::AppState;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Application state written by the feed poller
    pub app_state: Arc<RwLock<AppState>>,
    /// Source used for history and manual refresh
    pub source: Arc<dyn ReadingSource>,
    /// Wakes the poller for a background refresh
    pub refresh: Arc<Notify>,
    /// Active configuration
    pub config: Arc<AppConfig>,
}

impl DashboardState {
    pub fn new(
        app_state: Arc<RwLock<AppState>>,
        source: Arc<dyn ReadingSource>,
        refresh: Arc<Notify>,
        config: AppConfig,
    ) -> Self {
        Self {
            app_state,
            source,
            refresh,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::acquisition::{demo_reading, StaticSource};
    use crate::types::Observation;

    /// State backed by a static source holding the demo reading as live data.
    pub fn create_test_state() -> DashboardState {
        let source: Arc<dyn ReadingSource> = Arc::new(StaticSource::new(vec![Observation::live(
            demo_reading(),
            chrono::Utc::now(),
        )]));
        DashboardState::new(
            Arc::new(RwLock::new(AppState::new("Test Farm", "static", 120))),
            source,
            Arc::new(Notify::new()),
            AppConfig::default(),
        )
    }
}
