// ABOUTME: Tests for environment-based configuration loading and validation
// ABOUTME: Serialized because each case mutates process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use fittrack::config::{ConfigError, FitTrackConfig};
use fittrack::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const CONFIG_VARS: [&str; 13] = [
    "DATABASE_URL",
    "USDA_API_KEY",
    "USDA_BASE_URL",
    "USDA_TIMEOUT_SECS",
    "USDA_CACHE_TTL_SECS",
    "USDA_RATE_LIMIT_PER_MINUTE",
    "OPEN_FOOD_FACTS_BASE_URL",
    "GEMINI_API_KEY",
    "GEMINI_BASE_URL",
    "GEMINI_MODEL",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
];

fn clear_config_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    common::init_test_logging();
    clear_config_env();

    let config = FitTrackConfig::load().unwrap();
    assert_eq!(config.database_url, "sqlite::memory:");
    assert!(config.providers.usda.api_key.is_none());
    assert_eq!(
        config.providers.usda.base_url,
        "https://api.nal.usda.gov/fdc/v1"
    );
    assert_eq!(config.providers.usda.rate_limit_per_minute, 30);
    assert_eq!(config.providers.usda.cache_ttl_secs, 86_400);
    assert_eq!(
        config.providers.open_food_facts.base_url,
        "https://world.openfoodfacts.org"
    );
    assert!(config.providers.gemini.api_key.is_none());
    assert_eq!(config.providers.gemini.model, "gemini-pro");
}

#[test]
#[serial]
fn test_provider_keys_and_overrides() {
    clear_config_env();
    env::set_var("DATABASE_URL", "sqlite:./fittrack-test.db");
    env::set_var("USDA_API_KEY", "usda-key");
    env::set_var("USDA_TIMEOUT_SECS", "25");
    env::set_var("USDA_RATE_LIMIT_PER_MINUTE", " 60 ");
    env::set_var("GEMINI_API_KEY", "gemini-key");
    env::set_var("GEMINI_MODEL", "gemini-1.5-flash");

    let config = FitTrackConfig::load().unwrap();
    assert_eq!(config.database_url, "sqlite:./fittrack-test.db");
    assert_eq!(config.providers.usda.api_key.as_deref(), Some("usda-key"));
    assert_eq!(config.providers.usda.timeout_secs, 25);
    assert_eq!(config.providers.usda.rate_limit_per_minute, 60);
    assert_eq!(config.providers.gemini.api_key.as_deref(), Some("gemini-key"));
    assert_eq!(config.providers.gemini.model, "gemini-1.5-flash");

    clear_config_env();
}

#[test]
#[serial]
fn test_blank_api_key_counts_as_unset() {
    clear_config_env();
    env::set_var("USDA_API_KEY", "   ");

    let config = FitTrackConfig::load().unwrap();
    assert!(config.providers.usda.api_key.is_none());

    clear_config_env();
}

#[test]
#[serial]
fn test_unparseable_number_is_a_parse_error() {
    clear_config_env();
    env::set_var("USDA_CACHE_TTL_SECS", "one day");

    let result = FitTrackConfig::from_env();
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    clear_config_env();
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_config_env();
    env::set_var("USDA_TIMEOUT_SECS", "0");
    assert!(matches!(
        FitTrackConfig::load(),
        Err(ConfigError::ValueOutOfRange(_))
    ));

    clear_config_env();
    env::set_var("GEMINI_BASE_URL", "generativelanguage.googleapis.com");
    assert!(matches!(
        FitTrackConfig::load(),
        Err(ConfigError::InvalidValue(_))
    ));

    clear_config_env();
    env::set_var("DATABASE_URL", "mysql://localhost/fittrack");
    let error: fittrack::AppError = FitTrackConfig::load().unwrap_err().into();
    assert_eq!(error.code, fittrack::ErrorCode::ConfigError);

    clear_config_env();
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_config_env();
    let defaults = LoggingConfig::from_env();
    assert_eq!(defaults.format, LogFormat::Pretty);
    assert!(!defaults.include_location || env::var("LOG_INCLUDE_LOCATION").is_ok());

    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "fittrack-test");
    let production = LoggingConfig::from_env();
    assert_eq!(production.format, LogFormat::Json);
    assert!(production.include_location);
    assert!(production.include_spans);
    assert_eq!(production.service_name, "fittrack-test");

    clear_config_env();
}
