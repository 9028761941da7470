//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use modelgraph::core::logging::{init_logging, LogFormat, LogSettings, FORMAT_ENV, LEVEL_ENV};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("COMPACT").unwrap(), LogFormat::Compact);
    assert!(LogFormat::from_str("invalid").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_settings_prefer_explicit_arguments() {
    let env = |key: &str| match key {
        LEVEL_ENV => Some("warn".to_string()),
        FORMAT_ENV => Some("json".to_string()),
        _ => None,
    };
    let settings = LogSettings::resolve_with(Some("debug"), Some("pretty"), env).unwrap();
    assert_eq!(settings.directive, "debug");
    assert_eq!(settings.format, LogFormat::Pretty);

    let settings = LogSettings::resolve_with(None, None, env).unwrap();
    assert_eq!(settings.directive, "warn");
    assert_eq!(settings.format, LogFormat::Json);
}

#[test]
fn test_settings_fall_back_to_rust_log() {
    let env = |key: &str| (key == "RUST_LOG").then(|| "modelgraph=trace".to_string());
    let settings = LogSettings::resolve_with(None, None, env).unwrap();
    assert_eq!(settings.directive, "modelgraph=trace");
    assert_eq!(settings.format, LogFormat::Compact);
}

#[test]
fn test_settings_defaults() {
    let settings = LogSettings::resolve_with(None, None, |_| None).unwrap();
    assert_eq!(settings.directive, "info");
    assert_eq!(settings.format, LogFormat::Compact);
}

#[test]
fn test_init_logging_with_formats() {
    // Only the first call can install a subscriber; later ones must not panic
    let _ = init_logging(Some("info"), Some("compact"));
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("info"), Some("json"));
    let _ = init_logging(Some("off"), None);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_conversion_emits_events_with_subscriber() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let model = modelgraph::load_model("classes:\n  A:\n").unwrap();
    let conversion = modelgraph::plugins::graph::convert(&model);
    assert_eq!(conversion.schema.node_count(), 1);
}
