//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Unknown keys never break a config.

use std::collections::HashSet;
use std::net::SocketAddr;

use super::defaults;
use super::AppConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AppConfig`.
///
/// Maintained by hand to match the struct hierarchy in app_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [farm]
        "farm",
        "farm.name",
        "farm.location",
        // [feed]
        "feed",
        "feed.enabled",
        "feed.base_url",
        "feed.channel_id",
        "feed.read_api_key",
        "feed.poll_interval_secs",
        "feed.history_results",
        "feed.http_timeout_secs",
        "feed.default_soil_ph",
        // [feed.fields]
        "feed.fields",
        "feed.fields.nitrogen",
        "feed.fields.phosphorus",
        "feed.fields.potassium",
        "feed.fields.temperature",
        "feed.fields.humidity",
        "feed.fields.soil_moisture",
        // [server]
        "server",
        "server.addr",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Parse errors yield no warnings; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed `AppConfig`.
///
/// Returns (errors, warnings). Errors are values the service cannot run
/// with; warnings are suspicious but workable.
pub fn validate_ranges(config: &AppConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let feed = &config.feed;

    if feed.poll_interval_secs == 0 {
        errors.push("feed.poll_interval_secs must be > 0".to_string());
    } else if feed.poll_interval_secs < defaults::FEED_MIN_SENSIBLE_POLL_SECS {
        warnings.push(ValidationWarning {
            field: "feed.poll_interval_secs".to_string(),
            message: format!(
                "feed.poll_interval_secs = {} is below the channel update rate ({} s)",
                feed.poll_interval_secs,
                defaults::FEED_MIN_SENSIBLE_POLL_SECS
            ),
            suggestion: None,
        });
    }

    if feed.http_timeout_secs == 0 {
        errors.push("feed.http_timeout_secs must be > 0".to_string());
    }

    if feed.history_results == 0 || feed.history_results > defaults::FEED_MAX_RESULTS {
        errors.push(format!(
            "feed.history_results = {} is outside 1-{}",
            feed.history_results,
            defaults::FEED_MAX_RESULTS
        ));
    }

    // NaN fails both comparisons, so test finiteness explicitly
    if !feed.default_soil_ph.is_finite() || !(0.0..=14.0).contains(&feed.default_soil_ph) {
        errors.push(format!(
            "feed.default_soil_ph = {} is outside the pH scale (0-14)",
            feed.default_soil_ph
        ));
    }

    if !(feed.base_url.starts_with("http://") || feed.base_url.starts_with("https://")) {
        errors.push(format!(
            "feed.base_url = '{}' must start with http:// or https://",
            feed.base_url
        ));
    }

    if feed.enabled && feed.channel_id.trim().is_empty() {
        errors.push("feed.channel_id must be set when the feed is enabled".to_string());
    }

    let mut seen = HashSet::new();
    for (factor, field) in feed.fields.entries() {
        if !(1..=8).contains(&field) {
            errors.push(format!(
                "feed.fields.{factor} = {field} is outside the channel field range (1-8)"
            ));
        } else if !seen.insert(field) {
            errors.push(format!(
                "feed.fields.{factor} = {field} is already mapped to another reading"
            ));
        }
    }

    if config.server.addr.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "server.addr = '{}' is not a valid socket address",
            config.server.addr
        ));
    }

    if config.farm.name.trim().is_empty() {
        warnings.push(ValidationWarning {
            field: "farm.name".to_string(),
            message: "farm.name is empty; logs and status will show a blank farm".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
