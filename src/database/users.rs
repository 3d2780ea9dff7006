// ABOUTME: User profile persistence including stored nutrition targets and active adjustment
// ABOUTME: Profiles are keyed by the session user id and upserted as a whole row
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{format_timestamp, parse_timestamp};
use crate::calculator::CalorieAdjustment;
use crate::errors::{AppError, AppResult};
use crate::models::{NutritionTargets, UserId, UserProfile};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::warn;

/// Database manager for user profiles
#[derive(Clone)]
pub struct ProfileManager {
    pool: SqlitePool,
}

impl ProfileManager {
    /// Create a new profile manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a profile by user id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, user_id: &UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT user_id, name, age, gender, height_cm, current_weight_kg, target_weight_kg,
                   activity_level, fitness_goal, target_calories, target_protein, target_carbs,
                   target_fat, current_adjustment, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    /// Insert or replace a profile
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn upsert(&self, profile: &UserProfile) -> AppResult<()> {
        let targets = profile.targets;
        sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, name, age, gender, height_cm, current_weight_kg, target_weight_kg,
                activity_level, fitness_goal, target_calories, target_protein, target_carbs,
                target_fat, current_adjustment, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                current_weight_kg = excluded.current_weight_kg,
                target_weight_kg = excluded.target_weight_kg,
                activity_level = excluded.activity_level,
                fitness_goal = excluded.fitness_goal,
                target_calories = excluded.target_calories,
                target_protein = excluded.target_protein,
                target_carbs = excluded.target_carbs,
                target_fat = excluded.target_fat,
                current_adjustment = excluded.current_adjustment,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.user_id.as_str())
        .bind(profile.name.as_deref())
        .bind(profile.age.map(i64::from))
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.height_cm)
        .bind(profile.current_weight_kg)
        .bind(profile.target_weight_kg)
        .bind(profile.activity_level.as_deref())
        .bind(profile.fitness_goal.map(crate::calculator::FitnessGoal::as_str))
        .bind(targets.map(|t| i64::from(t.calories)))
        .bind(targets.map(|t| i64::from(t.protein_g)))
        .bind(targets.map(|t| i64::from(t.carbs_g)))
        .bind(targets.map(|t| i64::from(t.fat_g)))
        .bind(profile.current_adjustment.as_str())
        .bind(format_timestamp(&profile.created_at))
        .bind(format_timestamp(&profile.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save profile: {e}")))?;

        Ok(())
    }
}

/// Convert a database row to a `UserProfile`
fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let user_id: String = row.get("user_id");
    let age: Option<i64> = row.get("age");
    let gender: Option<String> = row.get("gender");
    let fitness_goal: Option<String> = row.get("fitness_goal");
    let adjustment: String = row.get("current_adjustment");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    let target_calories: Option<i64> = row.get("target_calories");
    let target_protein: Option<i64> = row.get("target_protein");
    let target_carbs: Option<i64> = row.get("target_carbs");
    let target_fat: Option<i64> = row.get("target_fat");
    let targets = match (target_calories, target_protein, target_carbs, target_fat) {
        (Some(calories), Some(protein), Some(carbs), Some(fat)) => Some(NutritionTargets {
            calories: calories as u32,
            protein_g: protein as u32,
            carbs_g: carbs as u32,
            fat_g: fat as u32,
        }),
        _ => None,
    };

    let current_adjustment = adjustment.parse().unwrap_or_else(|_| {
        warn!(
            user_id = %user_id,
            adjustment = %adjustment,
            "Unknown stored adjustment, treating as none"
        );
        CalorieAdjustment::None
    });

    Ok(UserProfile {
        name: row.get("name"),
        age: age.map(|a| a as u32),
        gender: gender.as_deref().map(str::parse).transpose()?,
        height_cm: row.get("height_cm"),
        current_weight_kg: row.get("current_weight_kg"),
        target_weight_kg: row.get("target_weight_kg"),
        activity_level: row.get("activity_level"),
        fitness_goal: fitness_goal.as_deref().map(str::parse).transpose()?,
        targets,
        current_adjustment,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        user_id: UserId(user_id),
    })
}
