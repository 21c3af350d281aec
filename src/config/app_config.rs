//! Service configuration - feed, server and farm settings as TOML values
//!
//! Scoring constants are deliberately absent: they are fixed in
//! `types::thresholds` and changing them would change published scores.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::Factor;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a soilwatch deployment.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$SOILWATCH_CONFIG` env var
/// 2. `./soilwatch.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Farm identification
    #[serde(default)]
    pub farm: FarmInfo,

    /// Sensor feed polling
    #[serde(default)]
    pub feed: FeedConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::search();
        config.apply_env_overrides();
        config
    }

    fn search() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), farm = %config.farm.name, "Loaded config from SOILWATCH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SOILWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SOILWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(farm = %config.farm.name, "Loaded config from ./soilwatch.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./soilwatch.toml, using defaults");
                }
            }
        }

        info!("No soilwatch.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; range errors fail the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(Some(path.to_path_buf()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without touching the filesystem or validating.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(None, e))
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file (used by `check-config --write-defaults`).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate value ranges and feed field mapping.
    ///
    /// Warnings are logged; only errors fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Apply `SOILWATCH_SERVER_ADDR` and `SOILWATCH_THINGSPEAK_KEY`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(defaults::SERVER_ADDR_ENV).ok(),
            std::env::var(defaults::THINGSPEAK_KEY_ENV).ok(),
        );
    }

    /// Override the bind address and feed API key when provided.
    pub fn apply_overrides(&mut self, server_addr: Option<String>, read_api_key: Option<String>) {
        if let Some(addr) = server_addr.filter(|a| !a.trim().is_empty()) {
            info!(addr = %addr, "Server address overridden from environment");
            self.server.addr = addr;
        }
        if let Some(key) = read_api_key.filter(|k| !k.trim().is_empty()) {
            self.feed.read_api_key = key;
        }
    }

    /// Copy safe to expose over HTTP: the feed API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.feed.read_api_key.is_empty() {
            copy.feed.read_api_key = "********".to_string();
        }
        copy
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    /// Parse failure; the path is absent for inline documents.
    Parse(Option<PathBuf>, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(Some(path), e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            Self::Parse(None, e) => write!(f, "Config parse error: {e}"),
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Farm Info
// ============================================================================

/// Identification metadata. Appears in logs and the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmInfo {
    #[serde(default = "default_farm_name")]
    pub name: String,

    /// Free-form location label
    #[serde(default)]
    pub location: String,
}

fn default_farm_name() -> String {
    "Demo Farm".to_string()
}

impl Default for FarmInfo {
    fn default() -> Self {
        Self {
            name: default_farm_name(),
            location: String::new(),
        }
    }
}

// ============================================================================
// Feed Config
// ============================================================================

/// ThingSpeak channel and polling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// When false the service runs on demo data only.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_channel_id")]
    pub channel_id: String,

    /// Read key for private channels. Empty for public channels.
    ///
    /// Can be supplied through `SOILWATCH_THINGSPEAK_KEY` instead.
    #[serde(default)]
    pub read_api_key: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Entries returned by the history endpoint when the caller gives no count.
    #[serde(default = "default_history_results")]
    pub history_results: usize,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// pH reported for every feed reading.
    #[serde(default = "default_soil_ph")]
    pub default_soil_ph: f64,

    /// Which channel field carries which reading.
    #[serde(default)]
    pub fields: FieldMap,
}

fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    defaults::THINGSPEAK_BASE_URL.to_string()
}
fn default_channel_id() -> String {
    defaults::THINGSPEAK_CHANNEL_ID.to_string()
}
fn default_poll_interval_secs() -> u64 {
    defaults::FEED_POLL_INTERVAL_SECS
}
fn default_history_results() -> usize {
    defaults::FEED_HISTORY_RESULTS
}
fn default_http_timeout_secs() -> u64 {
    defaults::FEED_HTTP_TIMEOUT_SECS
}
fn default_soil_ph() -> f64 {
    defaults::FEED_DEFAULT_SOIL_PH
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            channel_id: default_channel_id(),
            read_api_key: String::new(),
            poll_interval_secs: default_poll_interval_secs(),
            history_results: default_history_results(),
            http_timeout_secs: default_http_timeout_secs(),
            default_soil_ph: default_soil_ph(),
            fields: FieldMap::default(),
        }
    }
}

/// Channel field numbers (1-8) for each fed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    #[serde(default = "default_field_nitrogen")]
    pub nitrogen: u8,
    #[serde(default = "default_field_phosphorus")]
    pub phosphorus: u8,
    #[serde(default = "default_field_potassium")]
    pub potassium: u8,
    #[serde(default = "default_field_temperature")]
    pub temperature: u8,
    #[serde(default = "default_field_humidity")]
    pub humidity: u8,
    #[serde(default = "default_field_soil_moisture")]
    pub soil_moisture: u8,
}

fn default_field_nitrogen() -> u8 {
    1
}
fn default_field_phosphorus() -> u8 {
    2
}
fn default_field_potassium() -> u8 {
    3
}
fn default_field_temperature() -> u8 {
    4
}
fn default_field_humidity() -> u8 {
    5
}
fn default_field_soil_moisture() -> u8 {
    6
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            nitrogen: default_field_nitrogen(),
            phosphorus: default_field_phosphorus(),
            potassium: default_field_potassium(),
            temperature: default_field_temperature(),
            humidity: default_field_humidity(),
            soil_moisture: default_field_soil_moisture(),
        }
    }
}

impl FieldMap {
    /// Channel field carrying `factor`, or `None` for soil pH.
    pub const fn field_for(&self, factor: Factor) -> Option<u8> {
        match factor {
            Factor::Nitrogen => Some(self.nitrogen),
            Factor::Phosphorus => Some(self.phosphorus),
            Factor::Potassium => Some(self.potassium),
            Factor::Temperature => Some(self.temperature),
            Factor::Humidity => Some(self.humidity),
            Factor::SoilMoisture => Some(self.soil_moisture),
            Factor::SoilPh => None,
        }
    }

    /// (factor, field number) for every mapped factor.
    pub fn entries(&self) -> Vec<(Factor, u8)> {
        Factor::ALL
            .iter()
            .filter_map(|&f| self.field_for(f).map(|n| (f, n)))
            .collect()
    }
}

// ============================================================================
// Server Config
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SOILWATCH_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
