// ABOUTME: Tests for nutrition providers without network access
// ABOUTME: Catalog search, USDA and Open Food Facts parsing, model reply parsing and the resolver chain
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use async_trait::async_trait;
use fittrack::config::{GeminiConfig, ProvidersConfig, UsdaConfig};
use fittrack::errors::{AppError, AppResult, ErrorCode};
use fittrack::external::usda_client::parse_food_details;
use fittrack::external::{
    clean_food_name, extract_json_object, fallback_facts, parse_estimate, parse_product,
    search_common_foods, FoodSearchResult, FoodSuggestion, GeminiEstimator, MockUsdaClient,
    NutritionLookup, NutritionResolver, Providers, UsdaClient, COMMON_FOODS,
};
use fittrack::models::{NutritionFacts, NutritionSource};
use std::sync::Arc;

const CHICKEN_DETAILS: &str = r#"{
    "fdcId": 171477,
    "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
    "dataType": "SR Legacy",
    "foodNutrients": [
        {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}, "amount": 31.02},
        {"nutrient": {"id": 1004, "name": "Total lipid (fat)", "unitName": "g"}, "amount": 3.57},
        {"nutrient": {"id": 1005, "name": "Carbohydrate, by difference", "unitName": "g"}},
        {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 165.0},
        {"amount": 12.0}
    ]
}"#;

/// Provider that always fails
struct UnavailableLookup;

#[async_trait]
impl NutritionLookup for UnavailableLookup {
    fn source(&self) -> NutritionSource {
        NutritionSource::LanguageModel
    }

    async fn lookup(&self, _description: &str) -> AppResult<Option<NutritionFacts>> {
        Err(AppError::external_unavailable("Gemini", "service offline"))
    }
}

// ============================================================================
// Common foods catalog
// ============================================================================

#[test]
fn test_catalog_search_by_name_and_category() {
    common::init_test_logging();

    let chicken: Vec<&str> = search_common_foods("chicken")
        .iter()
        .map(|food| food.name)
        .collect();
    assert_eq!(chicken, ["Chicken Tikka", "Chicken Breast"]);

    assert_eq!(search_common_foods("DAIRY").len(), 3);
    assert_eq!(search_common_foods("grains").len(), 6);
    assert!(search_common_foods("c").is_empty());
    assert!(search_common_foods("zzz").is_empty());
}

#[test]
fn test_catalog_values_are_valid() {
    assert_eq!(COMMON_FOODS.len(), 32);
    for food in &COMMON_FOODS {
        assert!(food.facts().validate().is_ok(), "{}", food.name);
        assert!(!food.category.is_empty());
    }
}

// ============================================================================
// USDA FoodData Central
// ============================================================================

#[test]
fn test_food_details_parsing_and_suggestion() -> Result<()> {
    let details = parse_food_details(CHICKEN_DETAILS)?;
    assert_eq!(details.fdc_id, 171_477);
    assert_eq!(details.food_nutrients.len(), 4);

    let facts = details.nutrition_facts();
    assert!((facts.calories - 165.0).abs() < f64::EPSILON);
    assert!(facts.carbs_g.abs() < f64::EPSILON);

    let hit = FoodSearchResult {
        fdc_id: details.fdc_id,
        description: details.description.clone(),
        data_type: details.data_type.clone(),
        brand_owner: None,
        food_category: None,
    };
    let suggestion = FoodSuggestion::from_details(&hit, &details);
    assert_eq!(suggestion.name, "Chicken");
    assert_eq!(suggestion.category, "Food");
    assert!((suggestion.protein - 31.0).abs() < f64::EPSILON);
    assert!((suggestion.fat - 4.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn test_malformed_food_details_is_an_external_error() {
    let error = parse_food_details("{\"foods\": []}").unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[test]
fn test_clean_food_name_variants() {
    assert_eq!(clean_food_name("Apples, raw, with skin"), "Apples");
    assert_eq!(clean_food_name("Frozen peas"), "peas");
    assert_eq!(clean_food_name("Canned  Tuna (canned)"), "Tuna");
    assert_eq!(clean_food_name("Brown rice cooked"), "Brown rice");
}

#[tokio::test]
async fn test_unconfigured_usda_client_stays_offline() -> Result<()> {
    let client = UsdaClient::new(UsdaConfig::default())?;
    assert!(!client.is_configured());
    assert!(client.suggest_foods("chicken").await?.is_empty());
    assert!(client.lookup("chicken").await?.is_none());
    assert_eq!(client.cache_stats().await, (0, 0));
    Ok(())
}

#[test]
fn test_mock_usda_search() -> Result<()> {
    let mock = MockUsdaClient::new();
    let hits = mock.search_foods("APPLE", 5)?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].fdc_id, 171_688);

    let error = mock.get_food_details(1).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert!(mock.search_foods("  ", 5).is_err());
    Ok(())
}

// ============================================================================
// Open Food Facts
// ============================================================================

#[test]
fn test_product_parsing() -> Result<()> {
    let body = r#"{
        "status": 1,
        "product": {
            "product_name": "",
            "product_name_en": "Hazelnut Spread",
            "brands": "Spreadco",
            "serving_size": "15 g",
            "nutriments": {
                "energy-kcal_100g": 539.4,
                "proteins_100g": 6.3,
                "carbohydrates_100g": 57.5,
                "fat_100g": 30.9,
                "sugars_100g": 56.3
            }
        }
    }"#;
    let product = parse_product("3017620422003", body)?.unwrap();
    assert_eq!(product.name, "Hazelnut Spread");
    assert_eq!(product.brand.as_deref(), Some("Spreadco"));
    assert_eq!(product.facts, NutritionFacts::new(539.0, 6.0, 58.0, 31.0));
    assert!((product.sugar_g - 56.0).abs() < f64::EPSILON);
    assert!(product.fiber_g.abs() < f64::EPSILON);
    assert_eq!(product.category, "Food");
    assert_eq!(product.serving_size, "15 g");
    Ok(())
}

#[test]
fn test_unknown_product() -> Result<()> {
    let missing = r#"{"status": 0, "status_verbose": "product not found"}"#;
    assert!(parse_product("123", missing)?.is_none());

    let bare = r#"{"product": {"nutriments": {}}}"#;
    let product = parse_product("456", bare)?.unwrap();
    assert_eq!(product.name, "Unknown Product");
    assert_eq!(product.serving_size, "100g");
    assert_eq!(product.facts, NutritionFacts::default());

    assert!(parse_product("789", "<html>").is_err());
    Ok(())
}

// ============================================================================
// Model estimates
// ============================================================================

#[test]
fn test_estimate_parsing_from_chatty_reply() -> Result<()> {
    let reply = "Sure! Here you go:\n```json\n{\"calories\": 320, \"protein\": \"18.5\", \"carbs\": 40, \"fat\": -2}\n```";
    assert!(extract_json_object(reply).unwrap().starts_with('{'));

    let facts = parse_estimate(reply)?;
    assert!((facts.calories - 320.0).abs() < f64::EPSILON);
    assert!((facts.protein_g - 18.5).abs() < f64::EPSILON);
    assert!(facts.fat_g.abs() < f64::EPSILON);

    let error = parse_estimate("I cannot help with that").unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert!(extract_json_object("} backwards {").is_none());
    Ok(())
}

#[tokio::test]
async fn test_unconfigured_estimator_is_skipped() -> Result<()> {
    let estimator = GeminiEstimator::new(GeminiConfig::default())?;
    assert!(!estimator.is_configured());
    assert!(estimator.lookup("a bowl of ramen").await?.is_none());
    Ok(())
}

// ============================================================================
// Resolver chain
// ============================================================================

#[tokio::test]
async fn test_resolver_skips_failures_and_falls_back() {
    let resolver = NutritionResolver::new()
        .with_provider(Arc::new(UnavailableLookup))
        .with_provider(Arc::new(MockUsdaClient::new()));
    assert_eq!(resolver.provider_count(), 2);

    let apple = resolver.resolve("apple").await;
    assert_eq!(apple.source, NutritionSource::Usda);
    assert!((apple.facts.calories - 52.0).abs() < f64::EPSILON);

    let unknown = resolver.resolve("dragon fruit smoothie").await;
    assert_eq!(unknown.source, NutritionSource::Fallback);
    assert_eq!(unknown.facts, fallback_facts());
}

#[tokio::test]
async fn test_providers_without_keys_resolve_to_fallback() -> Result<()> {
    let providers = Providers::from_config(&ProvidersConfig::default())?;
    assert_eq!(providers.resolver.provider_count(), 2);

    let resolved = providers.resolver.resolve("homemade lasagna").await;
    assert_eq!(resolved.source, NutritionSource::Fallback);
    assert_eq!(resolved.facts, NutritionFacts::new(200.0, 10.0, 20.0, 8.0));
    Ok(())
}
