// ABOUTME: USDA FoodData Central API client for nutrition lookups and food suggestions
// ABOUTME: Implements food search, detail retrieval, caching, rate limiting and a mock client
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! USDA `FoodData` Central API Client
//!
//! Resolves a free-text food description to per-serving nutrition values (top search
//! hit, then its detail record) and builds cleaned-up suggestion lists for search
//! boxes. Responses are cached for the configured TTL and requests are throttled to
//! the configured per-minute limit.
//!
//! Without an API key the client is inert: lookups report "no match" and suggestion
//! lists are empty.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use super::NutritionLookup;
use crate::config::UsdaConfig;
use crate::constants::{limits, usda_nutrients};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{NutritionFacts, NutritionSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

const PROVIDER: &str = "USDA API";

/// Descriptor words stripped from suggestion names
const NAME_DESCRIPTORS: [&str; 5] = ["raw", "cooked", "fresh", "frozen", "canned"];

/// USDA Food Search Result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchResult {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g., "Survey (FNDDS)", "Foundation", "SR Legacy")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Brand owner (for branded foods)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    /// Food category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_category: Option<String>,
}

/// USDA Food Nutrient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodNutrient {
    /// Nutrient ID
    pub nutrient_id: u32,
    /// Nutrient name (e.g., "Protein", "Energy")
    pub nutrient_name: String,
    /// Nutrient unit (e.g., "g", "kcal", "mg")
    pub unit_name: String,
    /// Amount per serving reported by USDA
    pub amount: f64,
}

/// Detailed USDA Food Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDetails {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type
    pub data_type: Option<String>,
    /// List of nutrients with amounts
    pub food_nutrients: Vec<FoodNutrient>,
}

impl FoodDetails {
    /// Amount of a nutrient, 0 when USDA does not report it
    #[must_use]
    pub fn nutrient_amount(&self, nutrient_id: u32) -> f64 {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_id == nutrient_id)
            .map_or(0.0, |n| n.amount)
    }

    /// Energy and macronutrients as reported
    #[must_use]
    pub fn nutrition_facts(&self) -> NutritionFacts {
        NutritionFacts::new(
            self.nutrient_amount(usda_nutrients::ENERGY),
            self.nutrient_amount(usda_nutrients::PROTEIN),
            self.nutrient_amount(usda_nutrients::CARBOHYDRATE),
            self.nutrient_amount(usda_nutrients::FAT),
        )
    }
}

/// A search-box suggestion with rounded nutrient values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodSuggestion {
    /// `FoodData` Central ID
    pub id: u64,
    /// Cleaned food name
    pub name: String,
    /// Brand owner, for branded foods
    pub brand: Option<String>,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
    /// Food category, "Food" when USDA has none
    pub category: String,
}

impl FoodSuggestion {
    /// Build a suggestion from a search hit and its details
    #[must_use]
    pub fn from_details(hit: &FoodSearchResult, details: &FoodDetails) -> Self {
        let facts = details.nutrition_facts().rounded();
        Self {
            id: hit.fdc_id,
            name: clean_food_name(&hit.description),
            brand: hit.brand_owner.clone(),
            calories: facts.calories,
            protein: facts.protein_g,
            carbs: facts.carbs_g,
            fat: facts.fat_g,
            category: hit
                .food_category
                .clone()
                .unwrap_or_else(|| "Food".to_owned()),
        }
    }
}

/// Shorten a USDA description for display
///
/// Drops everything after the first comma and the words raw, cooked, fresh, frozen
/// and canned (any case), then normalizes whitespace.
#[must_use]
pub fn clean_food_name(description: &str) -> String {
    let head = description.split(',').next().unwrap_or_default();
    head.split_whitespace()
        .filter(|word| {
            let core = word.trim_matches(|c: char| !c.is_alphanumeric());
            !NAME_DESCRIPTORS
                .iter()
                .any(|descriptor| core.eq_ignore_ascii_case(descriptor))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// USDA API search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodSearchResult>,
}

/// USDA API food details response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetailsResponse {
    fdc_id: u64,
    description: String,
    #[serde(default)]
    data_type: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrientResponse>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    unit_name: String,
}

impl From<FoodDetailsResponse> for FoodDetails {
    fn from(response: FoodDetailsResponse) -> Self {
        let food_nutrients = response
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let nutrient = n.nutrient?;
                Some(FoodNutrient {
                    nutrient_id: nutrient.id,
                    nutrient_name: nutrient.name,
                    unit_name: nutrient.unit_name,
                    amount: n.amount.unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            fdc_id: response.fdc_id,
            description: response.description,
            data_type: response.data_type,
            food_nutrients,
        }
    }
}

/// Parse a `/food/{fdcId}` response body
///
/// # Errors
///
/// Returns an error if the body is not a USDA food record
pub fn parse_food_details(body: &str) -> AppResult<FoodDetails> {
    let response: FoodDetailsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::external_service(PROVIDER, format!("JSON parse error: {e}")))?;
    Ok(response.into())
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Sliding-window request limiter
#[derive(Debug)]
struct RateLimiter {
    requests: Vec<Instant>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    const fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: Vec::new(),
            limit,
            window,
        }
    }

    fn can_request(&mut self) -> bool {
        let now = Instant::now();
        self.requests
            .retain(|&t| now.duration_since(t) < self.window);
        self.requests.len() < self.limit as usize
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }

    async fn wait_if_needed(&mut self) {
        while !self.can_request() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<FoodSearchResult>>>>>,
    details_cache: Arc<RwLock<HashMap<u64, CacheEntry<FoodDetails>>>>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl UsdaClient {
    /// Create a new USDA API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: UsdaConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build USDA HTTP client: {e}")))?;
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));

        Ok(Self {
            config,
            http_client,
            search_cache: Arc::new(RwLock::new(HashMap::new())),
            details_cache: Arc::new(RwLock::new(HashMap::new())),
            rate_limiter: Arc::new(RwLock::new(rate_limiter)),
        })
    }

    /// Whether an API key is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("USDA API key not configured"))
    }

    async fn throttle(&self) {
        let mut limiter = self.rate_limiter.write().await;
        limiter.wait_if_needed().await;
        limiter.record_request();
    }

    /// Search for foods by query string
    ///
    /// # Errors
    ///
    /// Returns an error for an empty query, a page size outside 1..=200, a missing
    /// API key or a failed request
    pub async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> AppResult<Vec<FoodSearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        if page_size == 0 || page_size > 200 {
            return Err(AppError::invalid_input(
                "Page size must be between 1 and 200",
            ));
        }

        let api_key = self.api_key()?;

        let cache_key = format!("{}:{page_size}", query.to_lowercase());
        {
            let cache = self.search_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        self.throttle().await;

        let started = Instant::now();
        let url = format!("{}/foods/search", self.config.base_url);
        let result = self
            .fetch_json::<SearchResponse>(
                &url,
                &[
                    ("query", query),
                    ("pageSize", &page_size.to_string()),
                    ("api_key", api_key),
                ],
            )
            .await;
        AppLogger::log_provider_call(
            PROVIDER,
            "search_foods",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        let search_response = result?;

        {
            let mut cache = self.search_cache.write().await;
            cache.insert(
                cache_key,
                CacheEntry {
                    data: search_response.foods.clone(),
                    expires_at: Instant::now() + Duration::from_secs(self.config.cache_ttl_secs),
                },
            );
        }

        Ok(search_response.foods)
    }

    /// Get detailed information for a specific food by FDC ID
    ///
    /// # Errors
    ///
    /// Returns an error for a missing API key or a failed request
    pub async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        let api_key = self.api_key()?;

        {
            let cache = self.details_cache.read().await;
            if let Some(entry) = cache.get(&fdc_id) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        self.throttle().await;

        let started = Instant::now();
        let url = format!("{}/food/{fdc_id}", self.config.base_url);
        let result = self
            .fetch_json::<FoodDetailsResponse>(&url, &[("api_key", api_key)])
            .await;
        AppLogger::log_provider_call(
            PROVIDER,
            "get_food_details",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        let food_details: FoodDetails = result?.into();

        {
            let mut cache = self.details_cache.write().await;
            cache.insert(
                fdc_id,
                CacheEntry {
                    data: food_details.clone(),
                    expires_at: Instant::now() + Duration::from_secs(self.config.cache_ttl_secs),
                },
            );
        }

        Ok(food_details)
    }

    /// Nutrition of the best match for a description
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails
    pub async fn lookup_facts(&self, description: &str) -> AppResult<Option<NutritionFacts>> {
        let hits = self.search_foods(description, 1).await?;
        let Some(best) = hits.first() else {
            debug!(description, "No USDA match");
            return Ok(None);
        };
        let details = self.get_food_details(best.fdc_id).await?;
        Ok(Some(details.nutrition_facts()))
    }

    /// Up to eight cleaned suggestions for a search box
    ///
    /// Short queries and an unconfigured client yield an empty list. Hits whose
    /// details cannot be fetched are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request itself fails
    pub async fn suggest_foods(&self, query: &str) -> AppResult<Vec<FoodSuggestion>> {
        if query.trim().chars().count() < limits::MIN_FOOD_QUERY_LEN || !self.is_configured() {
            return Ok(Vec::new());
        }

        let hits = self
            .search_foods(query, limits::USDA_SUGGESTION_PAGE_SIZE)
            .await?;

        let mut suggestions = Vec::new();
        for hit in hits.iter().take(limits::MAX_FOOD_SUGGESTIONS) {
            match self.get_food_details(hit.fdc_id).await {
                Ok(details) => suggestions.push(FoodSuggestion::from_details(hit, &details)),
                Err(e) => debug!(fdc_id = hit.fdc_id, error = %e, "Skipping suggestion"),
            }
        }
        Ok(suggestions)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                PROVIDER,
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::external_service(PROVIDER, format!("JSON parse error: {e}")))
    }

    /// Cached (search, details) entry counts
    pub async fn cache_stats(&self) -> (usize, usize) {
        let search_count = self.search_cache.read().await.len();
        let details_count = self.details_cache.read().await.len();
        (search_count, details_count)
    }
}

#[async_trait]
impl NutritionLookup for UsdaClient {
    fn source(&self) -> NutritionSource {
        NutritionSource::Usda
    }

    async fn lookup(&self, description: &str) -> AppResult<Option<NutritionFacts>> {
        if !self.is_configured() {
            warn!("USDA API key not configured");
            return Ok(None);
        }
        self.lookup_facts(description).await
    }
}

/// Mock USDA client for testing (no API calls)
pub struct MockUsdaClient {
    mock_foods: HashMap<u64, FoodDetails>,
}

fn mock_nutrient(nutrient_id: u32, nutrient_name: &str, unit_name: &str, amount: f64) -> FoodNutrient {
    FoodNutrient {
        nutrient_id,
        nutrient_name: nutrient_name.to_owned(),
        unit_name: unit_name.to_owned(),
        amount,
    }
}

fn mock_food(fdc_id: u64, description: &str, facts: [f64; 4]) -> FoodDetails {
    let [energy, protein, carbs, fat] = facts;
    FoodDetails {
        fdc_id,
        description: description.to_owned(),
        data_type: Some("SR Legacy".to_owned()),
        food_nutrients: vec![
            mock_nutrient(usda_nutrients::PROTEIN, "Protein", "g", protein),
            mock_nutrient(usda_nutrients::FAT, "Total lipid (fat)", "g", fat),
            mock_nutrient(
                usda_nutrients::CARBOHYDRATE,
                "Carbohydrate, by difference",
                "g",
                carbs,
            ),
            mock_nutrient(usda_nutrients::ENERGY, "Energy", "kcal", energy),
        ],
    }
}

impl MockUsdaClient {
    /// Create a new mock client with chicken breast and apple records
    #[must_use]
    pub fn new() -> Self {
        let mut mock_foods = HashMap::new();
        mock_foods.insert(
            171_477,
            mock_food(
                171_477,
                "Chicken, breast, meat only, cooked, roasted",
                [165.0, 31.02, 0.0, 3.57],
            ),
        );
        mock_foods.insert(
            171_688,
            mock_food(171_688, "Apples, raw, with skin", [52.0, 0.26, 13.81, 0.17]),
        );
        Self { mock_foods }
    }

    /// Mock search implementation
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if query is empty
    pub fn search_foods(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodSearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<FoodSearchResult> = self
            .mock_foods
            .values()
            .filter(|food| food.description.to_lowercase().contains(&query_lower))
            .map(|food| FoodSearchResult {
                fdc_id: food.fdc_id,
                description: food.description.clone(),
                data_type: food.data_type.clone(),
                brand_owner: None,
                food_category: None,
            })
            .collect();
        results.sort_by_key(|r| r.fdc_id);
        results.truncate(page_size as usize);

        Ok(results)
    }

    /// Mock details implementation
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if food with given FDC ID doesn't exist
    pub fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        self.mock_foods
            .get(&fdc_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Food with FDC ID {fdc_id}")))
    }
}

impl Default for MockUsdaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NutritionLookup for MockUsdaClient {
    fn source(&self) -> NutritionSource {
        NutritionSource::Usda
    }

    async fn lookup(&self, description: &str) -> AppResult<Option<NutritionFacts>> {
        let hits = self.search_foods(description, 1)?;
        hits.first()
            .map(|hit| self.get_food_details(hit.fdc_id).map(|d| d.nutrition_facts()))
            .transpose()
    }
}
