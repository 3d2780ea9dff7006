// ABOUTME: Open Food Facts barcode lookup client
// ABOUTME: Maps product records to rounded per-100 g nutrition values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::BarcodeLookup;
use crate::config::OpenFoodFactsConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::NutritionFacts;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

const PROVIDER: &str = "Open Food Facts";

/// A packaged product found by barcode, values per 100 g
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarcodeProduct {
    /// Scanned barcode
    pub barcode: String,
    /// Product name, "Unknown Product" when the record has none
    pub name: String,
    /// Brand list as recorded
    pub brand: Option<String>,
    /// Rounded energy and macronutrients
    pub facts: NutritionFacts,
    /// Fiber (g)
    pub fiber_g: f64,
    /// Sugars (g)
    pub sugar_g: f64,
    /// Sodium (g)
    pub sodium_g: f64,
    /// Category list as recorded, "Food" when absent
    pub category: String,
    /// Front image URL
    pub image_url: Option<String>,
    /// Serving size text
    pub serving_size: String,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    status: Option<i64>,
    product: Option<ProductRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductRecord {
    product_name: Option<String>,
    product_name_en: Option<String>,
    brands: Option<String>,
    categories: Option<String>,
    image_front_url: Option<String>,
    image_url: Option<String>,
    serving_size: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    energy_kcal_100g: Option<f64>,
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g_dashed: Option<f64>,
    proteins_100g: Option<f64>,
    carbohydrates_100g: Option<f64>,
    fat_100g: Option<f64>,
    fiber_100g: Option<f64>,
    sugars_100g: Option<f64>,
    sodium_100g: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn rounded(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).round()
}

/// Parse a `/api/v0/product/{barcode}.json` body
///
/// Status 0 or a missing product means the barcode is unknown.
///
/// # Errors
///
/// Returns an error if the body is not JSON of the expected shape
pub fn parse_product(barcode: &str, body: &str) -> AppResult<Option<BarcodeProduct>> {
    let response: ProductResponse = serde_json::from_str(body)
        .map_err(|e| AppError::external_service(PROVIDER, format!("JSON parse error: {e}")))?;

    if response.status == Some(0) {
        return Ok(None);
    }
    let Some(product) = response.product else {
        return Ok(None);
    };

    let n = &product.nutriments;
    let calories = n.energy_kcal_100g.or(n.energy_kcal_100g_dashed);

    Ok(Some(BarcodeProduct {
        barcode: barcode.to_owned(),
        name: non_empty(product.product_name)
            .or_else(|| non_empty(product.product_name_en))
            .unwrap_or_else(|| "Unknown Product".to_owned()),
        brand: non_empty(product.brands),
        facts: NutritionFacts::new(
            rounded(calories),
            rounded(n.proteins_100g),
            rounded(n.carbohydrates_100g),
            rounded(n.fat_100g),
        ),
        fiber_g: rounded(n.fiber_100g),
        sugar_g: rounded(n.sugars_100g),
        sodium_g: rounded(n.sodium_100g),
        category: non_empty(product.categories).unwrap_or_else(|| "Food".to_owned()),
        image_url: non_empty(product.image_front_url).or_else(|| non_empty(product.image_url)),
        serving_size: non_empty(product.serving_size).unwrap_or_else(|| "100g".to_owned()),
    }))
}

/// Open Food Facts HTTP client
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: reqwest::Client,
}

impl OpenFoodFactsClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: OpenFoodFactsConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::internal(format!("Failed to build Open Food Facts HTTP client: {e}"))
            })?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_product(&self, barcode: &str) -> AppResult<Option<BarcodeProduct>> {
        let url = format!("{}/api/v0/product/{barcode}.json", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(
                PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, e.to_string()))?;
        parse_product(barcode, &body)
    }
}

#[async_trait]
impl BarcodeLookup for OpenFoodFactsClient {
    async fn lookup_barcode(&self, barcode: &str) -> AppResult<Option<BarcodeProduct>> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(AppError::missing_field("barcode"));
        }

        let started = Instant::now();
        let result = self.fetch_product(barcode).await;
        AppLogger::log_provider_call(
            PROVIDER,
            "lookup_barcode",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        if matches!(result, Ok(None)) {
            debug!(barcode, "Barcode not found");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_rounds_and_defaults() {
        let body = r#"{
            "status": 1,
            "product": {
                "product_name": "",
                "product_name_en": "Peanut Butter",
                "brands": "Acme",
                "image_url": "https://img.example/pb.jpg",
                "nutriments": {
                    "energy-kcal_100g": 588.4,
                    "proteins_100g": 25.1,
                    "carbohydrates_100g": 19.6,
                    "fat_100g": 50.4,
                    "sodium_100g": 0.4
                }
            }
        }"#;
        let product = parse_product("0123", body).unwrap().unwrap();
        assert_eq!(product.name, "Peanut Butter");
        assert_eq!(product.brand.as_deref(), Some("Acme"));
        assert_eq!(product.facts, NutritionFacts::new(588.0, 25.0, 20.0, 50.0));
        assert!(product.sodium_g.abs() < f64::EPSILON);
        assert_eq!(product.category, "Food");
        assert_eq!(product.image_url.as_deref(), Some("https://img.example/pb.jpg"));
        assert_eq!(product.serving_size, "100g");
    }

    #[test]
    fn test_parse_product_not_found() {
        assert_eq!(parse_product("1", r#"{"status": 0}"#).unwrap(), None);
        assert_eq!(parse_product("1", r#"{"status": 1}"#).unwrap(), None);
        assert!(parse_product("1", "not json").is_err());
    }
}
