//! System-wide default constants.
//!
//! Scoring constants live in `types::thresholds`; this module holds the
//! service-side knobs. Grouped by subsystem for easy discovery.

// ============================================================================
// Feed
// ============================================================================

/// ThingSpeak API root.
pub const THINGSPEAK_BASE_URL: &str = "https://api.thingspeak.com";

/// Channel polled when no config file names one.
pub const THINGSPEAK_CHANNEL_ID: &str = "3014718";

/// Interval between feed polls (seconds).
pub const FEED_POLL_INTERVAL_SECS: u64 = 120;

/// Poll intervals below this draw a config warning (seconds).
///
/// Free ThingSpeak channels update at most every 15 s.
pub const FEED_MIN_SENSIBLE_POLL_SECS: u64 = 15;

/// HTTP client timeout for feed requests (seconds).
pub const FEED_HTTP_TIMEOUT_SECS: u64 = 15;

/// Default number of entries returned by the history endpoint.
pub const FEED_HISTORY_RESULTS: usize = 24;

/// ThingSpeak refuses `results` above this.
pub const FEED_MAX_RESULTS: usize = 8_000;

/// Constant pH substituted for every feed reading (the feed has no pH probe).
pub const FEED_DEFAULT_SOIL_PH: f64 = 6.5;

// ============================================================================
// Demo / fallback data
// ============================================================================

/// Spacing between demo history entries (seconds).
pub const DEMO_HISTORY_STEP_SECS: i64 = 3_600;

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Environment variable listing allowed CORS origins (comma separated).
pub const CORS_ORIGINS_ENV: &str = "SOILWATCH_CORS_ORIGINS";

// ============================================================================
// Environment overrides
// ============================================================================

/// Path to a TOML config file.
pub const CONFIG_PATH_ENV: &str = "SOILWATCH_CONFIG";

/// Local config file searched after `SOILWATCH_CONFIG`.
pub const LOCAL_CONFIG_FILE: &str = "soilwatch.toml";

/// Overrides `server.addr`.
pub const SERVER_ADDR_ENV: &str = "SOILWATCH_SERVER_ADDR";

/// Overrides `feed.read_api_key`.
pub const THINGSPEAK_KEY_ENV: &str = "SOILWATCH_THINGSPEAK_KEY";
