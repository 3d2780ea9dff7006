// ABOUTME: Environment-based configuration for the record store, providers and logging
// ABOUTME: Loads FitTrackConfig from env vars and validates it before use
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Configuration
//!
//! All configuration comes from environment variables. Nothing is global: the loaded
//! [`FitTrackConfig`] is passed to whatever needs it.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite::memory:` |
//! | `USDA_API_KEY` | unset (USDA lookups skipped) |
//! | `USDA_BASE_URL` | `https://api.nal.usda.gov/fdc/v1` |
//! | `USDA_TIMEOUT_SECS` | `10` |
//! | `USDA_CACHE_TTL_SECS` | `86400` |
//! | `USDA_RATE_LIMIT_PER_MINUTE` | `30` |
//! | `OPEN_FOOD_FACTS_BASE_URL` | `https://world.openfoodfacts.org` |
//! | `GEMINI_API_KEY` | unset (fixed fallback estimate) |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` |
//! | `GEMINI_MODEL` | `gemini-pro` |
//! | `LOG_FORMAT` / `RUST_LOG` / `ENVIRONMENT` | see [`crate::logging`] |

/// Nutrition provider configuration
pub mod providers;

pub use providers::{GeminiConfig, OpenFoodFactsConfig, ProvidersConfig, UsdaConfig};

use crate::constants::env_keys;
use crate::errors::AppError;
use crate::logging::LoggingConfig;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required setting absent or empty
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Setting present but not parseable
    #[error("Parse error: {0}")]
    Parse(String),

    /// Setting parsed but malformed
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Numeric setting outside its allowed range
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string())
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct FitTrackConfig {
    /// Record store connection string
    pub database_url: String,
    /// Nutrition providers
    pub providers: ProvidersConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Default for FitTrackConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// In-memory SQLite, used when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

impl FitTrackConfig {
    /// Read every setting from the environment without validating
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: providers::env_var_or(env_keys::DATABASE_URL, DEFAULT_DATABASE_URL),
            providers: ProvidersConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        })
    }

    /// Read and validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is unparseable or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingField(env_keys::DATABASE_URL.to_owned()));
        }
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue(format!(
                "{} must be a sqlite: URL",
                env_keys::DATABASE_URL
            )));
        }
        self.providers.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FitTrackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.providers.usda.api_key.is_none());
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        let config = FitTrackConfig {
            database_url: "postgres://localhost/fittrack".to_owned(),
            ..FitTrackConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_zero_rate_limit() {
        let mut config = FitTrackConfig::default();
        config.providers.usda.rate_limit_per_minute = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_config_error_maps_to_app_error() {
        let error: AppError = ConfigError::MissingField("DATABASE_URL".into()).into();
        assert_eq!(error.code, crate::errors::ErrorCode::ConfigError);
    }
}
