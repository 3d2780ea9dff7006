// ABOUTME: Body weight log persistence
// ABOUTME: Append-only measurements listed newest first
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{format_timestamp, parse_timestamp};
use crate::errors::{AppError, AppResult};
use crate::models::{UserId, WeightLog};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Database manager for weight logs
#[derive(Clone)]
pub struct WeightLogManager {
    pool: SqlitePool,
}

impl WeightLogManager {
    /// Create a new weight log manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a weight log
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, log: &WeightLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO weight_logs (id, user_id, weight_kg, notes, logged_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&log.id)
        .bind(log.user_id.as_str())
        .bind(log.weight_kg)
        .bind(log.notes.as_deref())
        .bind(format_timestamp(&log.logged_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create weight log: {e}")))?;
        Ok(())
    }

    /// List a user's weight logs, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, user_id: &UserId, limit: u32) -> AppResult<Vec<WeightLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, weight_kg, notes, logged_at
            FROM weight_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list weight logs: {e}")))?;

        rows.iter().map(row_to_weight_log).collect()
    }
}

/// Convert a database row to a `WeightLog`
fn row_to_weight_log(row: &SqliteRow) -> AppResult<WeightLog> {
    let user_id: String = row.get("user_id");
    let logged_at: String = row.get("logged_at");

    Ok(WeightLog {
        id: row.get("id"),
        user_id: UserId(user_id),
        weight_kg: row.get("weight_kg"),
        notes: row.get("notes"),
        logged_at: parse_timestamp(&logged_at)?,
    })
}
