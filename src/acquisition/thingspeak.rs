//! ThingSpeak channel client
//!
//! Reads the channel's `feeds.json` and maps numbered fields onto a
//! [`SensorReading`]. The channel carries no pH probe, so every reading gets
//! the configured constant pH.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{FeedError, ReadingSource};
use crate::config::{FeedConfig, FieldMap};
use crate::types::{Factor, Observation, SensorReading};

/// Response body of `GET /channels/{id}/feeds.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelFeed {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// One channel entry. Field values arrive as strings or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub entry_id: Option<u64>,
    #[serde(default)]
    pub field1: Option<serde_json::Value>,
    #[serde(default)]
    pub field2: Option<serde_json::Value>,
    #[serde(default)]
    pub field3: Option<serde_json::Value>,
    #[serde(default)]
    pub field4: Option<serde_json::Value>,
    #[serde(default)]
    pub field5: Option<serde_json::Value>,
    #[serde(default)]
    pub field6: Option<serde_json::Value>,
    #[serde(default)]
    pub field7: Option<serde_json::Value>,
    #[serde(default)]
    pub field8: Option<serde_json::Value>,
}

impl FeedEntry {
    fn field(&self, n: u8) -> Option<&serde_json::Value> {
        match n {
            1 => self.field1.as_ref(),
            2 => self.field2.as_ref(),
            3 => self.field3.as_ref(),
            4 => self.field4.as_ref(),
            5 => self.field5.as_ref(),
            6 => self.field6.as_ref(),
            7 => self.field7.as_ref(),
            8 => self.field8.as_ref(),
            _ => None,
        }
    }

    /// Numeric value of field `n`; missing, blank, garbage or non-finite is 0.
    ///
    /// Strings are read up to the end of their leading number, so a
    /// unit-suffixed upload such as `"45.2 mg/kg"` still yields 45.2.
    pub fn field_value(&self, n: u8) -> f64 {
        let parsed = match self.field(n) {
            Some(serde_json::Value::String(s)) => parse_numeric_prefix(s),
            Some(serde_json::Value::Number(num)) => num.as_f64(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Build a reading using `fields` for the channel layout and a fixed pH.
    pub fn to_reading(&self, fields: &FieldMap, soil_ph: f64) -> SensorReading {
        let value = |factor: Factor| fields.field_for(factor).map_or(0.0, |n| self.field_value(n));
        SensorReading {
            nitrogen: value(Factor::Nitrogen),
            phosphorus: value(Factor::Phosphorus),
            potassium: value(Factor::Potassium),
            soil_ph,
            soil_moisture: value(Factor::SoilMoisture),
            temperature: value(Factor::Temperature),
            humidity: value(Factor::Humidity),
        }
    }

    /// Entry timestamp, or `fallback` when absent or unparseable.
    pub fn observed_at(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(fallback, |t| t.with_timezone(&Utc))
    }
}

/// Leading decimal number of `s` after any leading whitespace, ignoring
/// whatever text follows it. `None` when `s` does not start with a digit
/// (after an optional sign or point).
fn parse_numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_at = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_at(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_at(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // Exponent only counts when digits follow it: "2e" reads as 2
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_at(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Convert a channel response into live observations, oldest first.
///
/// # Errors
///
/// [`FeedError::EmptyFeed`] when the channel returned no entries.
pub fn parse_feed(
    feed: &ChannelFeed,
    fields: &FieldMap,
    soil_ph: f64,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Observation>, FeedError> {
    if feed.feeds.is_empty() {
        return Err(FeedError::EmptyFeed);
    }
    Ok(feed
        .feeds
        .iter()
        .map(|entry| Observation::live(entry.to_reading(fields, soil_ph), entry.observed_at(fetched_at)))
        .collect())
}

/// HTTP client for one ThingSpeak channel.
#[derive(Clone)]
pub struct ThingSpeakClient {
    http: reqwest::Client,
    feeds_url: String,
    read_api_key: String,
    fields: FieldMap,
    soil_ph: f64,
}

impl ThingSpeakClient {
    /// Build a client from the feed section of the config.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            feeds_url: format!(
                "{}/channels/{}/feeds.json",
                config.base_url.trim_end_matches('/'),
                config.channel_id.trim()
            ),
            read_api_key: config.read_api_key.clone(),
            fields: config.fields,
            soil_ph: config.default_soil_ph,
        })
    }

    /// Request URL for `results` entries.
    pub fn feed_url(&self, results: usize) -> Result<reqwest::Url, FeedError> {
        let mut params = vec![("results", results.to_string())];
        if !self.read_api_key.is_empty() {
            params.push(("api_key", self.read_api_key.clone()));
        }
        reqwest::Url::parse_with_params(&self.feeds_url, &params)
            .map_err(|e| FeedError::InvalidUrl(e.to_string()))
    }

    /// Fetch the raw channel response.
    pub async fn fetch(&self, results: usize) -> Result<ChannelFeed, FeedError> {
        let url = self.feed_url(results)?;
        debug!(url = %self.feeds_url, results, "Fetching ThingSpeak feed");

        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status()));
        }
        Ok(resp.json::<ChannelFeed>().await?)
    }
}

#[async_trait]
impl ReadingSource for ThingSpeakClient {
    async fn latest(&self) -> Result<Observation, FeedError> {
        let feed = self.fetch(1).await?;
        parse_feed(&feed, &self.fields, self.soil_ph, Utc::now())?
            .pop()
            .ok_or(FeedError::EmptyFeed)
    }

    async fn history(&self, results: usize) -> Result<Vec<Observation>, FeedError> {
        let feed = self.fetch(results).await?;
        parse_feed(&feed, &self.fields, self.soil_ph, Utc::now())
    }

    fn source_name(&self) -> &str {
        "ThingSpeak"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "channel": {"id": 3014718, "name": "Soil Monitor", "last_entry_id": 812},
        "feeds": [
            {
                "created_at": "2025-06-01T10:00:00Z",
                "entry_id": 811,
                "field1": "52.0", "field2": "30.5", "field3": "160",
                "field4": "26.1", "field5": "61.0", "field6": "33.2"
            },
            {
                "created_at": "2025-06-01T10:02:00Z",
                "entry_id": 812,
                "field1": "45.2", "field2": "23.8", "field3": "156.4",
                "field4": "24.3", "field5": "72.1", "field6": "68.5",
                "field7": null
            }
        ]
    }"#;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_maps_default_fields() {
        let feed: ChannelFeed = serde_json::from_str(SAMPLE).unwrap();
        let obs = parse_feed(&feed, &FieldMap::default(), 6.5, fetched_at()).unwrap();
        assert_eq!(obs.len(), 2);

        let latest = obs.last().unwrap();
        assert_eq!(
            latest.reading,
            SensorReading {
                nitrogen: 45.2,
                phosphorus: 23.8,
                potassium: 156.4,
                soil_ph: 6.5,
                soil_moisture: 68.5,
                temperature: 24.3,
                humidity: 72.1,
            }
        );
        assert!(!latest.is_fallback());
        assert_eq!(latest.observed_at, Utc.with_ymd_and_hms(2025, 6, 1, 10, 2, 0).unwrap());
    }

    #[test]
    fn test_ph_is_the_configured_constant() {
        let feed: ChannelFeed = serde_json::from_str(SAMPLE).unwrap();
        let obs = parse_feed(&feed, &FieldMap::default(), 7.1, fetched_at()).unwrap();
        assert!(obs.iter().all(|o| o.reading.soil_ph == 7.1));
    }

    #[test]
    fn test_garbage_and_missing_fields_become_zero() {
        let json = r#"{"feeds": [{
            "created_at": "not a date",
            "field1": "abc", "field2": null, "field3": "",
            "field4": "NaN", "field5": 55.5
        }]}"#;
        let feed: ChannelFeed = serde_json::from_str(json).unwrap();
        let obs = parse_feed(&feed, &FieldMap::default(), 6.5, fetched_at()).unwrap();
        let r = obs[0].reading;
        assert_eq!(r.nitrogen, 0.0);
        assert_eq!(r.phosphorus, 0.0);
        assert_eq!(r.potassium, 0.0);
        assert_eq!(r.temperature, 0.0);
        assert_eq!(r.humidity, 55.5);
        assert_eq!(r.soil_moisture, 0.0);
        assert_eq!(obs[0].observed_at, fetched_at());
    }

    #[test]
    fn test_infinite_field_becomes_zero() {
        let json = r#"{"feeds": [{"field1": "inf", "field2": "-Infinity", "field3": " 120 "}]}"#;
        let feed: ChannelFeed = serde_json::from_str(json).unwrap();
        let entry = &feed.feeds[0];
        assert_eq!(entry.field_value(1), 0.0);
        assert_eq!(entry.field_value(2), 0.0);
        assert_eq!(entry.field_value(3), 120.0);
        assert_eq!(entry.field_value(9), 0.0);
    }

    #[test]
    fn test_unit_suffixed_values_keep_leading_number() {
        let json = r#"{"feeds": [{
            "field1": "45.2 mg/kg", "field2": "23.8\r\n", "field3": "156.4abc",
            "field4": "  -3.5C", "field5": "abc", "field6": ".5e1%", "field7": "2e", "field8": "+7."
        }]}"#;
        let feed: ChannelFeed = serde_json::from_str(json).unwrap();
        let entry = &feed.feeds[0];
        assert_eq!(entry.field_value(1), 45.2);
        assert_eq!(entry.field_value(2), 23.8);
        assert_eq!(entry.field_value(3), 156.4);
        assert_eq!(entry.field_value(4), -3.5);
        assert_eq!(entry.field_value(5), 0.0);
        assert_eq!(entry.field_value(6), 5.0);
        assert_eq!(entry.field_value(7), 2.0);
        assert_eq!(entry.field_value(8), 7.0);
    }

    #[test]
    fn test_numeric_prefix_edge_cases() {
        assert_eq!(parse_numeric_prefix("1e3kg"), Some(1000.0));
        assert_eq!(parse_numeric_prefix("1.5E-1"), Some(0.15));
        assert_eq!(parse_numeric_prefix("-"), None);
        assert_eq!(parse_numeric_prefix("."), None);
        assert_eq!(parse_numeric_prefix("x12"), None);
        assert_eq!(parse_numeric_prefix(""), None);
        assert_eq!(parse_numeric_prefix("0x1A"), Some(0.0));
    }

    #[test]
    fn test_custom_field_map() {
        let json = r#"{"feeds": [{"field7": "12.5", "field8": "40"}]}"#;
        let feed: ChannelFeed = serde_json::from_str(json).unwrap();
        let fields = FieldMap {
            nitrogen: 7,
            soil_moisture: 8,
            ..FieldMap::default()
        };
        let obs = parse_feed(&feed, &fields, 6.5, fetched_at()).unwrap();
        assert_eq!(obs[0].reading.nitrogen, 12.5);
        assert_eq!(obs[0].reading.soil_moisture, 40.0);
    }

    #[test]
    fn test_empty_feed_is_error() {
        let feed: ChannelFeed = serde_json::from_str(r#"{"channel": {}, "feeds": []}"#).unwrap();
        assert!(matches!(
            parse_feed(&feed, &FieldMap::default(), 6.5, fetched_at()),
            Err(FeedError::EmptyFeed)
        ));

        let feed: ChannelFeed = serde_json::from_str("{}").unwrap();
        assert!(parse_feed(&feed, &FieldMap::default(), 6.5, fetched_at()).is_err());
    }

    #[test]
    fn test_feed_url_includes_key_only_when_set() {
        let mut config = FeedConfig {
            base_url: "https://api.thingspeak.com/".to_string(),
            channel_id: "42".to_string(),
            ..FeedConfig::default()
        };
        let client = ThingSpeakClient::new(&config).unwrap();
        assert_eq!(
            client.feed_url(24).unwrap().as_str(),
            "https://api.thingspeak.com/channels/42/feeds.json?results=24"
        );

        config.read_api_key = "KEY123".to_string();
        let client = ThingSpeakClient::new(&config).unwrap();
        assert_eq!(
            client.feed_url(1).unwrap().as_str(),
            "https://api.thingspeak.com/channels/42/feeds.json?results=1&api_key=KEY123"
        );
    }
}
