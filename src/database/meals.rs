// ABOUTME: Meal log persistence with per-day listing in UTC
// ABOUTME: Stores nutrition values, meal slot and the provider that produced them
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{day_bounds, format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Meal, NutritionFacts, UserId};
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::time::Instant;

/// Database manager for meals
#[derive(Clone)]
pub struct MealManager {
    pool: SqlitePool,
}

impl MealManager {
    /// Create a new meal manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a meal
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, meal: &Meal) -> AppResult<()> {
        let started = Instant::now();
        let result = sqlx::query(
            r"
            INSERT INTO meals (
                id, user_id, food_name, calories, protein, carbs, fat,
                serving_size, meal_type, source, logged_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(&meal.id)
        .bind(meal.user_id.as_str())
        .bind(&meal.food_name)
        .bind(meal.facts.calories)
        .bind(meal.facts.protein_g)
        .bind(meal.facts.carbs_g)
        .bind(meal.facts.fat_g)
        .bind(meal.serving_size.as_deref())
        .bind(meal.meal_type.as_str())
        .bind(meal.source.as_str())
        .bind(format_timestamp(&meal.logged_at))
        .execute(&self.pool)
        .await;

        AppLogger::log_database_operation(
            "insert",
            "meals",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        result.map_err(|e| AppError::database(format!("Failed to create meal: {e}")))?;
        Ok(())
    }

    /// Get a meal by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<Meal>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, food_name, calories, protein, carbs, fat,
                   serving_size, meal_type, source, logged_at
            FROM meals
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get meal: {e}")))?;

        row.map(|r| row_to_meal(&r)).transpose()
    }

    /// List a user's meals, newest first, optionally for one UTC day
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, user_id: &UserId, day: Option<NaiveDate>) -> AppResult<Vec<Meal>> {
        let rows = match day {
            Some(day) => {
                let (start, end) = day_bounds(day);
                sqlx::query(
                    r"
                    SELECT id, user_id, food_name, calories, protein, carbs, fat,
                           serving_size, meal_type, source, logged_at
                    FROM meals
                    WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
                    ORDER BY logged_at DESC
                    ",
                )
                .bind(user_id.as_str())
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, user_id, food_name, calories, protein, carbs, fat,
                           serving_size, meal_type, source, logged_at
                    FROM meals
                    WHERE user_id = $1
                    ORDER BY logged_at DESC
                    ",
                )
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list meals: {e}")))?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Replace a stored meal
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the meal does not exist, or a database error
    pub async fn update(&self, meal: &Meal) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE meals
            SET food_name = $2, calories = $3, protein = $4, carbs = $5, fat = $6,
                serving_size = $7, meal_type = $8, source = $9, logged_at = $10
            WHERE id = $1
            ",
        )
        .bind(&meal.id)
        .bind(&meal.food_name)
        .bind(meal.facts.calories)
        .bind(meal.facts.protein_g)
        .bind(meal.facts.carbs_g)
        .bind(meal.facts.fat_g)
        .bind(meal.serving_size.as_deref())
        .bind(meal.meal_type.as_str())
        .bind(meal.source.as_str())
        .bind(format_timestamp(&meal.logged_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update meal: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Meal").with_resource_id(meal.id.clone()));
        }
        Ok(())
    }

    /// Delete a meal
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meal: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `Meal`
fn row_to_meal(row: &SqliteRow) -> AppResult<Meal> {
    let user_id: String = row.get("user_id");
    let meal_type: String = row.get("meal_type");
    let source: String = row.get("source");
    let logged_at: String = row.get("logged_at");

    Ok(Meal {
        id: row.get("id"),
        user_id: UserId(user_id),
        food_name: row.get("food_name"),
        facts: NutritionFacts::new(
            row.get("calories"),
            row.get("protein"),
            row.get("carbs"),
            row.get("fat"),
        ),
        serving_size: row.get("serving_size"),
        meal_type: meal_type.parse()?,
        source: source.parse()?,
        logged_at: parse_timestamp(&logged_at)?,
    })
}
