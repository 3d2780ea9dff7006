// ABOUTME: Gemini-backed nutrition estimator for foods USDA does not know
// ABOUTME: Prompts for a JSON object and extracts calories and macros from the reply text
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Language model nutrition estimates
//!
//! The model is asked for a bare JSON object with `calories`, `protein`, `carbs` and
//! `fat`. Replies often wrap that object in prose or code fences, so the text between
//! the first `{` and the last `}` is parsed. Missing or non-numeric fields count as 0.

use super::NutritionLookup;
use crate::config::GeminiConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{NutritionFacts, NutritionSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::warn;

const PROVIDER: &str = "Gemini API";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Prompt sent for a food description
#[must_use]
pub fn estimate_prompt(food_description: &str) -> String {
    format!(
        "Estimate the nutritional information for: \"{food_description}\"\n\n\
         Please provide ONLY a JSON response with the following format (no additional text):\n\
         {{\n  \"calories\": number,\n  \"protein\": number,\n  \"carbs\": number,\n  \"fat\": number\n}}\n\n\
         Values should be per typical serving size in grams for macros and total calories."
    )
}

/// Slice from the first `{` to the last `}`, if any
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn number_field(object: &Value, key: &str) -> f64 {
    let value = match object.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0)
}

/// Parse nutrition values out of a model reply
///
/// # Errors
///
/// Returns an error if the reply holds no JSON object
pub fn parse_estimate(text: &str) -> AppResult<NutritionFacts> {
    let json = extract_json_object(text)
        .ok_or_else(|| AppError::external_service(PROVIDER, "No JSON found in model response"))?;
    let object: Value = serde_json::from_str(json)
        .map_err(|e| AppError::external_service(PROVIDER, format!("JSON parse error: {e}")))?;

    Ok(NutritionFacts::new(
        number_field(&object, "calories"),
        number_field(&object, "protein"),
        number_field(&object, "carbs"),
        number_field(&object, "fat"),
    ))
}

/// Gemini `generateContent` client
pub struct GeminiEstimator {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiEstimator {
    /// Create a new estimator
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build Gemini HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Whether an API key is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Ask the model for an estimate
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing, the request fails or the reply has no
    /// usable JSON
    pub async fn estimate(&self, food_description: &str) -> AppResult<NutritionFacts> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("Gemini API key not configured"))?;

        let started = Instant::now();
        let result = self.generate(api_key, &estimate_prompt(food_description)).await;
        AppLogger::log_provider_call(
            PROVIDER,
            "estimate_nutrition",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        parse_estimate(&result?)
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, format!("JSON parse error: {e}")))?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| AppError::external_service(PROVIDER, "No response from model"))
    }
}

#[async_trait]
impl NutritionLookup for GeminiEstimator {
    fn source(&self) -> NutritionSource {
        NutritionSource::LanguageModel
    }

    async fn lookup(&self, description: &str) -> AppResult<Option<NutritionFacts>> {
        if !self.is_configured() {
            warn!("Gemini API key not configured");
            return Ok(None);
        }
        self.estimate(description).await.map(Some)
    }
}
