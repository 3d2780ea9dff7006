// ABOUTME: Meal logging by manual entry, food description or barcode, plus food suggestions
// ABOUTME: Updates and deletes are restricted to the meal's owner
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::ensure_owner;
use crate::database::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::external::{
    search_common_foods, BarcodeLookup, BarcodeProduct, CommonFood, FoodSuggestion,
    NutritionResolver, UsdaClient,
};
use crate::models::{Meal, MealType, MealUpdate, NewMeal, NutritionSource, UserId};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Meal operations
#[derive(Clone)]
pub struct MealService {
    store: Arc<dyn RecordStore>,
    resolver: NutritionResolver,
    barcodes: Arc<dyn BarcodeLookup>,
    usda: Option<Arc<UsdaClient>>,
}

impl MealService {
    /// Create a meal service
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        resolver: NutritionResolver,
        barcodes: Arc<dyn BarcodeLookup>,
    ) -> Self {
        Self {
            store,
            resolver,
            barcodes,
            usda: None,
        }
    }

    /// Use `usda` for search suggestions
    #[must_use]
    pub fn with_usda(mut self, usda: Arc<UsdaClient>) -> Self {
        self.usda = Some(usda);
        self
    }

    /// Log a meal with user-entered values
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or invalid values
    #[instrument(skip(self, meal), fields(user_id = %user_id))]
    pub async fn log_manual(&self, user_id: &UserId, meal: NewMeal) -> AppResult<Meal> {
        meal.validate()?;
        let meal = meal.into_meal(user_id.clone(), NutritionSource::Manual);
        self.store.create_meal(&meal).await?;
        info!(meal_id = %meal.id, "Meal logged");
        Ok(meal)
    }

    /// Log a meal from a free-text description
    ///
    /// Values come from the first provider that answers, or the fixed fallback
    /// estimate; the meal records which one.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty description, or a store error
    #[instrument(skip(self, serving_size), fields(user_id = %user_id))]
    pub async fn log_by_description(
        &self,
        user_id: &UserId,
        description: &str,
        meal_type: MealType,
        serving_size: Option<String>,
    ) -> AppResult<Meal> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::missing_field("food_description"));
        }

        let resolved = self.resolver.resolve(description).await;
        let meal = NewMeal {
            food_name: description.to_owned(),
            facts: resolved.facts,
            serving_size,
            meal_type,
            logged_at: None,
        }
        .into_meal(user_id.clone(), resolved.source);

        self.store.create_meal(&meal).await?;
        info!(meal_id = %meal.id, source = resolved.source.as_str(), "Meal logged");
        Ok(meal)
    }

    /// Product for a barcode
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown barcode, or the provider's error
    pub async fn lookup_barcode(&self, barcode: &str) -> AppResult<BarcodeProduct> {
        self.barcodes
            .lookup_barcode(barcode)
            .await?
            .ok_or_else(|| AppError::not_found("Product").with_resource_id(barcode.trim()))
    }

    /// Log a packaged product by barcode, using its per-100 g values
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown barcode, or a provider or store error
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn log_by_barcode(
        &self,
        user_id: &UserId,
        barcode: &str,
        meal_type: MealType,
    ) -> AppResult<Meal> {
        let product = self.lookup_barcode(barcode).await?;
        let meal = NewMeal {
            food_name: product.name,
            facts: product.facts,
            serving_size: Some(product.serving_size),
            meal_type,
            logged_at: None,
        }
        .into_meal(user_id.clone(), NutritionSource::OpenFoodFacts);

        self.store.create_meal(&meal).await?;
        info!(meal_id = %meal.id, "Meal logged from barcode");
        Ok(meal)
    }

    /// The user's meals, newest first, optionally for one UTC day
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list_meals(
        &self,
        user_id: &UserId,
        day: Option<NaiveDate>,
    ) -> AppResult<Vec<Meal>> {
        self.store.list_meals(user_id, day).await
    }

    /// Edit a meal
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` (404) for an unknown id, `PermissionDenied` (403)
    /// for another user's meal, or a validation error
    #[instrument(skip(self, update), fields(user_id = %user_id))]
    pub async fn update_meal(
        &self,
        user_id: &UserId,
        meal_id: &str,
        update: MealUpdate,
    ) -> AppResult<Meal> {
        let mut meal = self.owned_meal(user_id, meal_id, "edit").await?;
        meal.apply(update)?;
        self.store.update_meal(&meal).await?;
        Ok(meal)
    }

    /// Delete a meal
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` (404) for an unknown id or `PermissionDenied` (403)
    /// for another user's meal
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_meal(&self, user_id: &UserId, meal_id: &str) -> AppResult<()> {
        self.owned_meal(user_id, meal_id, "delete").await?;
        if !self.store.delete_meal(meal_id).await? {
            warn!(meal_id, "Meal vanished before delete");
            return Err(AppError::not_found("Meal").with_resource_id(meal_id));
        }
        info!(meal_id, "Meal deleted");
        Ok(())
    }

    /// USDA suggestions for a search box; empty without a USDA client
    ///
    /// # Errors
    ///
    /// Returns an error if the USDA search request fails
    pub async fn suggest_foods(&self, query: &str) -> AppResult<Vec<FoodSuggestion>> {
        match &self.usda {
            Some(usda) => usda.suggest_foods(query).await,
            None => Ok(Vec::new()),
        }
    }

    /// Offline catalog matches for a search box
    #[must_use]
    pub fn common_foods(query: &str) -> Vec<&'static CommonFood> {
        search_common_foods(query)
    }

    async fn owned_meal(&self, user_id: &UserId, meal_id: &str, action: &str) -> AppResult<Meal> {
        let meal = self
            .store
            .get_meal(meal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Meal").with_resource_id(meal_id))?;
        ensure_owner(&meal.user_id, user_id, action, "meal")?;
        Ok(meal)
    }
}
