// ABOUTME: External nutrition data providers (USDA FoodData Central, Open Food Facts, Gemini)
// ABOUTME: Lookup traits, HTTP clients, the offline food catalog and the fallback resolver
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! External API Clients
//!
//! Services depend on the [`NutritionLookup`] and [`BarcodeLookup`] traits; the HTTP
//! clients here implement them and tests substitute mocks.

/// Offline common-food catalog
pub mod common_foods;
/// Gemini nutrition estimates
pub mod llm_estimator;
/// Provider chain with fallback
pub mod lookup;
/// Open Food Facts barcode lookups
pub mod open_food_facts;
/// USDA `FoodData` Central client
pub mod usda_client;

use crate::config::ProvidersConfig;
use crate::errors::AppResult;
use crate::models::{NutritionFacts, NutritionSource};
use async_trait::async_trait;
use std::sync::Arc;

pub use common_foods::{search_common_foods, CommonFood, COMMON_FOODS};
pub use llm_estimator::{extract_json_object, parse_estimate, GeminiEstimator};
pub use lookup::{fallback_facts, NutritionResolver};
pub use open_food_facts::{parse_product, BarcodeProduct, OpenFoodFactsClient};
pub use usda_client::{
    clean_food_name, FoodDetails, FoodNutrient, FoodSearchResult, FoodSuggestion, MockUsdaClient,
    UsdaClient,
};

/// Resolves a free-text food description to nutrition values
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    /// Tag recorded on meals resolved by this provider
    fn source(&self) -> NutritionSource;

    /// Values for `description`, `None` when the provider has no match
    async fn lookup(&self, description: &str) -> AppResult<Option<NutritionFacts>>;
}

/// Resolves a product barcode
#[async_trait]
pub trait BarcodeLookup: Send + Sync {
    /// Product for `barcode`, `None` when unknown
    async fn lookup_barcode(&self, barcode: &str) -> AppResult<Option<BarcodeProduct>>;
}

/// Configured HTTP providers
pub struct Providers {
    /// USDA client, also used for suggestions
    pub usda: Arc<UsdaClient>,
    /// Description resolver: USDA, then Gemini, then the fallback estimate
    pub resolver: NutritionResolver,
    /// Barcode lookups
    pub barcodes: Arc<OpenFoodFactsClient>,
}

impl Providers {
    /// Build every client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built
    pub fn from_config(config: &ProvidersConfig) -> AppResult<Self> {
        let usda = Arc::new(UsdaClient::new(config.usda.clone())?);
        let gemini = Arc::new(GeminiEstimator::new(config.gemini.clone())?);
        let resolver = NutritionResolver::new()
            .with_provider(usda.clone())
            .with_provider(gemini);
        let barcodes = Arc::new(OpenFoodFactsClient::new(config.open_food_facts.clone())?);

        Ok(Self {
            usda,
            resolver,
            barcodes,
        })
    }
}
