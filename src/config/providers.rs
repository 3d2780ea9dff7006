// ABOUTME: Nutrition data provider configuration (USDA FoodData Central, Open Food Facts, Gemini)
// ABOUTME: Loaded from environment variables with documented defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::ConfigError;
use crate::constants::{env_keys, provider_defaults};
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for every nutrition provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    /// USDA `FoodData` Central
    pub usda: UsdaConfig,
    /// Open Food Facts barcode lookups
    pub open_food_facts: OpenFoodFactsConfig,
    /// Gemini nutrition estimates
    pub gemini: GeminiConfig,
}

impl ProvidersConfig {
    /// Load provider configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            usda: UsdaConfig::from_env()?,
            open_food_facts: OpenFoodFactsConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        })
    }

    /// Check URLs, timeouts and limits
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.usda.validate()?;
        require_url("OPEN_FOOD_FACTS_BASE_URL", &self.open_food_facts.base_url)?;
        require_url("GEMINI_BASE_URL", &self.gemini.base_url)?;
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::MissingField(env_keys::GEMINI_MODEL.to_owned()));
        }
        Ok(())
    }
}

/// USDA `FoodData` Central configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsdaConfig {
    /// API key; lookups are skipped when absent
    pub api_key: Option<String>,
    /// Base URL
    pub base_url: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
    /// Response cache TTL (seconds)
    pub cache_ttl_secs: u64,
    /// Requests allowed per minute
    pub rate_limit_per_minute: u32,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: provider_defaults::USDA_BASE_URL.to_owned(),
            timeout_secs: provider_defaults::TIMEOUT_SECS,
            cache_ttl_secs: provider_defaults::USDA_CACHE_TTL_SECS,
            rate_limit_per_minute: provider_defaults::USDA_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl UsdaConfig {
    /// Load USDA configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: non_empty_var(env_keys::USDA_API_KEY),
            base_url: env_var_or(env_keys::USDA_BASE_URL, provider_defaults::USDA_BASE_URL),
            timeout_secs: parse_var_or(
                env_keys::USDA_TIMEOUT_SECS,
                provider_defaults::TIMEOUT_SECS,
            )?,
            cache_ttl_secs: parse_var_or(
                env_keys::USDA_CACHE_TTL_SECS,
                provider_defaults::USDA_CACHE_TTL_SECS,
            )?,
            rate_limit_per_minute: parse_var_or(
                env_keys::USDA_RATE_LIMIT_PER_MINUTE,
                provider_defaults::USDA_RATE_LIMIT_PER_MINUTE,
            )?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_url(env_keys::USDA_BASE_URL, &self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{} must be greater than zero",
                env_keys::USDA_TIMEOUT_SECS
            )));
        }
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{} must be greater than zero",
                env_keys::USDA_RATE_LIMIT_PER_MINUTE
            )));
        }
        Ok(())
    }
}

/// Open Food Facts configuration (no key required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFoodFactsConfig {
    /// Base URL
    pub base_url: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: provider_defaults::OPEN_FOOD_FACTS_BASE_URL.to_owned(),
            timeout_secs: provider_defaults::TIMEOUT_SECS,
        }
    }
}

impl OpenFoodFactsConfig {
    /// Load Open Food Facts configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env_var_or(
                env_keys::OPEN_FOOD_FACTS_BASE_URL,
                provider_defaults::OPEN_FOOD_FACTS_BASE_URL,
            ),
            timeout_secs: provider_defaults::TIMEOUT_SECS,
        }
    }
}

/// Gemini language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; estimates fall back to fixed values when absent
    pub api_key: Option<String>,
    /// Base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: provider_defaults::GEMINI_BASE_URL.to_owned(),
            model: provider_defaults::GEMINI_MODEL.to_owned(),
            timeout_secs: provider_defaults::TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Load Gemini configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(env_keys::GEMINI_API_KEY),
            base_url: env_var_or(env_keys::GEMINI_BASE_URL, provider_defaults::GEMINI_BASE_URL),
            model: env_var_or(env_keys::GEMINI_MODEL, provider_defaults::GEMINI_MODEL),
            timeout_secs: provider_defaults::TIMEOUT_SECS,
        }
    }
}

fn require_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "{key} must be an http(s) URL, got '{value}'"
        )))
    }
}

/// Get environment variable or default value
pub(super) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Parse(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(default),
    }
}
