// ABOUTME: Workout session persistence with exercises stored as JSON text
// ABOUTME: Supports name filtering, limits and whole-session updates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{UserId, WorkoutExercise, WorkoutSession};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::time::Instant;

/// Database manager for workout sessions
#[derive(Clone)]
pub struct WorkoutManager {
    pool: SqlitePool,
}

impl WorkoutManager {
    /// Create a new workout manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a workout session
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails
    pub async fn create(&self, session: &WorkoutSession) -> AppResult<()> {
        let exercises = serde_json::to_string(&session.exercises)?;
        let started = Instant::now();
        let result = sqlx::query(
            r"
            INSERT INTO workout_sessions (
                id, user_id, workout_name, exercises, notes, duration_minutes,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&session.id)
        .bind(session.user_id.as_str())
        .bind(&session.workout_name)
        .bind(exercises)
        .bind(session.notes.as_deref())
        .bind(session.duration_minutes.map(i64::from))
        .bind(format_timestamp(&session.created_at))
        .bind(format_timestamp(&session.updated_at))
        .execute(&self.pool)
        .await;

        AppLogger::log_database_operation(
            "insert",
            "workout_sessions",
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );
        result.map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;
        Ok(())
    }

    /// Get a workout session by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: &str) -> AppResult<Option<WorkoutSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, workout_name, exercises, notes, duration_minutes,
                   created_at, updated_at
            FROM workout_sessions
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        row.map(|r| row_to_workout(&r)).transpose()
    }

    /// List a user's sessions, newest first, optionally filtered by name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        user_id: &UserId,
        workout_name: Option<&str>,
        limit: u32,
    ) -> AppResult<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_name, exercises, notes, duration_minutes,
                   created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1 AND ($2 IS NULL OR workout_name = $2)
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(user_id.as_str())
        .bind(workout_name)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Replace a stored session
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the session does not exist, or a database error
    pub async fn update(&self, session: &WorkoutSession) -> AppResult<()> {
        let exercises = serde_json::to_string(&session.exercises)?;
        let result = sqlx::query(
            r"
            UPDATE workout_sessions
            SET workout_name = $2, exercises = $3, notes = $4, duration_minutes = $5,
                updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(&session.id)
        .bind(&session.workout_name)
        .bind(exercises)
        .bind(session.notes.as_deref())
        .bind(session.duration_minutes.map(i64::from))
        .bind(format_timestamp(&session.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Workout").with_resource_id(session.id.clone()));
        }
        Ok(())
    }

    /// Delete a session
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a `WorkoutSession`
fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutSession> {
    let user_id: String = row.get("user_id");
    let exercises_json: String = row.get("exercises");
    let duration_minutes: Option<i64> = row.get("duration_minutes");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    let exercises: Vec<WorkoutExercise> = serde_json::from_str(&exercises_json)?;

    Ok(WorkoutSession {
        id: row.get("id"),
        user_id: UserId(user_id),
        workout_name: row.get("workout_name"),
        exercises,
        notes: row.get("notes"),
        duration_minutes: duration_minutes.map(|d| d as u32),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
