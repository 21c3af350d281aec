//! Integration tests for config loading and validation.
//!
//! Writes TOML files to a temp directory and loads them through the public
//! `AppConfig` API.

use soilwatch::config::validation::{validate_ranges, validate_unknown_keys};
use soilwatch::config::{AppConfig, ConfigError};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_loads() {
    let file = write_config(
        r#"
[farm]
name = "North Paddock"
location = "Block 7"

[feed]
enabled = true
channel_id = "1234567"
read_api_key = "ABC"
poll_interval_secs = 60
history_results = 48
default_soil_ph = 6.8

[feed.fields]
nitrogen = 1
phosphorus = 2
potassium = 3
temperature = 4
humidity = 5
soil_moisture = 7

[server]
addr = "127.0.0.1:9090"
"#,
    );

    let config = AppConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.farm.name, "North Paddock");
    assert_eq!(config.feed.channel_id, "1234567");
    assert_eq!(config.feed.poll_interval_secs, 60);
    assert_eq!(config.feed.history_results, 48);
    assert!((config.feed.default_soil_ph - 6.8).abs() < f64::EPSILON);
    assert_eq!(config.feed.fields.soil_moisture, 7);
    assert_eq!(config.server.addr, "127.0.0.1:9090");
}

#[test]
fn test_partial_config_takes_defaults() {
    let file = write_config("[feed]\npoll_interval_secs = 300\n");
    let config = AppConfig::load_from_file(file.path()).unwrap();

    let defaults = AppConfig::default();
    assert_eq!(config.feed.poll_interval_secs, 300);
    assert_eq!(config.feed.channel_id, defaults.feed.channel_id);
    assert_eq!(config.feed.fields, defaults.feed.fields);
    assert_eq!(config.server, defaults.server);
    assert!(config.feed.read_api_key.is_empty());
}

#[test]
fn test_range_errors_fail_the_load() {
    let file = write_config("[feed]\npoll_interval_secs = 0\ndefault_soil_ph = 20.0\n");
    match AppConfig::load_from_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
            assert!(errors[0].contains("poll_interval_secs"));
            assert!(errors[1].contains("default_soil_ph"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_duplicate_field_mapping_is_rejected() {
    let file = write_config("[feed.fields]\nhumidity = 1\n");
    let err = AppConfig::load_from_file(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("feed.fields.humidity"), "{msg}");
    assert!(msg.contains("already mapped"), "{msg}");
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let file = write_config("[feed\nchannel_id = ");
    let err = AppConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(Some(_), _)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_typos_warn_but_load() {
    let raw = "[feed]\npoll_intervall_secs = 60\n\n[sever]\naddr = \"0.0.0.0:8080\"\n";
    let warnings = validate_unknown_keys(raw);

    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert!(fields.contains(&"feed.poll_intervall_secs"));
    assert!(fields.contains(&"sever"));

    let typo = warnings
        .iter()
        .find(|w| w.field == "feed.poll_intervall_secs")
        .unwrap();
    assert_eq!(typo.suggestion.as_deref(), Some("feed.poll_interval_secs"));
    assert!(typo.to_string().contains("did you mean 'feed.poll_interval_secs'?"));

    // The typo is ignored and the rest of the file still applies
    let file = write_config(raw);
    let config = AppConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.feed.poll_interval_secs, AppConfig::default().feed.poll_interval_secs);
}

#[test]
fn test_fast_polling_is_a_warning_not_an_error() {
    let mut config = AppConfig::default();
    config.feed.poll_interval_secs = 5;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "feed.poll_interval_secs");
}

#[test]
fn test_defaults_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("soilwatch.toml");

    AppConfig::default().save_to_file(&path).unwrap();
    let loaded = AppConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, AppConfig::default());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(validate_unknown_keys(&raw).is_empty());
}

#[test]
fn test_overrides_replace_addr_and_key() {
    let mut config = AppConfig::default();
    config.apply_overrides(Some("127.0.0.1:3000".to_string()), Some("KEY123".to_string()));
    assert_eq!(config.server.addr, "127.0.0.1:3000");
    assert_eq!(config.feed.read_api_key, "KEY123");

    let redacted = config.redacted();
    assert_ne!(redacted.feed.read_api_key, "KEY123");
    assert_eq!(redacted.server.addr, "127.0.0.1:3000");
}
