// ABOUTME: Record store abstraction and its SQLite implementation
// ABOUTME: Async CRUD for profiles, meals, weight logs and workout sessions keyed by id and user
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Record Store
//!
//! Services talk to persistence through the [`RecordStore`] trait. [`Database`] is
//! the `sqlx` SQLite implementation; each table has its own manager holding a
//! clone of the pool. Ownership checks belong to the services: the store reads and
//! writes by record id and filters lists by user.

/// Meal records
pub mod meals;
/// User profiles
pub mod users;
/// Weight logs
pub mod weight_logs;
/// Workout sessions
pub mod workouts;

pub use meals::MealManager;
pub use users::ProfileManager;
pub use weight_logs::WeightLogManager;
pub use workouts::WorkoutManager;

use crate::errors::{AppError, AppResult};
use crate::models::{Meal, UserId, UserProfile, WeightLog, WorkoutSession};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Persistence operations used by the services
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Profile for a user, if one exists
    async fn get_profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>>;

    /// Insert or replace a profile
    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()>;

    /// Insert a meal
    async fn create_meal(&self, meal: &Meal) -> AppResult<()>;

    /// Meal by id, regardless of owner
    async fn get_meal(&self, id: &str) -> AppResult<Option<Meal>>;

    /// A user's meals, newest first, optionally limited to one UTC day
    async fn list_meals(&self, user_id: &UserId, day: Option<NaiveDate>) -> AppResult<Vec<Meal>>;

    /// Replace a stored meal
    async fn update_meal(&self, meal: &Meal) -> AppResult<()>;

    /// Delete a meal; false when nothing was deleted
    async fn delete_meal(&self, id: &str) -> AppResult<bool>;

    /// Insert a weight log
    async fn create_weight_log(&self, log: &WeightLog) -> AppResult<()>;

    /// A user's weight logs, newest first
    async fn list_weight_logs(&self, user_id: &UserId, limit: u32) -> AppResult<Vec<WeightLog>>;

    /// Insert a workout session
    async fn create_workout(&self, session: &WorkoutSession) -> AppResult<()>;

    /// Workout session by id, regardless of owner
    async fn get_workout(&self, id: &str) -> AppResult<Option<WorkoutSession>>;

    /// A user's workout sessions, newest first, optionally filtered by name
    async fn list_workouts(
        &self,
        user_id: &UserId,
        workout_name: Option<&str>,
        limit: u32,
    ) -> AppResult<Vec<WorkoutSession>>;

    /// Replace a stored workout session
    async fn update_workout(&self, session: &WorkoutSession) -> AppResult<()>;

    /// Delete a workout session; false when nothing was deleted
    async fn delete_workout(&self, id: &str) -> AppResult<bool>;
}

/// SQLite-backed record store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    profiles: ProfileManager,
    meals: MealManager,
    weight_logs: WeightLogManager,
    workouts: WorkoutManager,
}

impl Database {
    /// Connect to `database_url` and create the schema
    ///
    /// In-memory databases use a single connection so every query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or migration fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true);
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let database = Self::from_pool(pool);
        database.migrate().await?;
        info!(max_connections, "Record store ready");
        Ok(database)
    }

    /// Wrap an existing pool without migrating
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            profiles: ProfileManager::new(pool.clone()),
            meals: MealManager::new(pool.clone()),
            weight_logs: WeightLogManager::new(pool.clone()),
            workouts: WorkoutManager::new(pool.clone()),
            pool,
        }
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and index if missing
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }
}

const SCHEMA: [&str; 7] = [
    r"
    CREATE TABLE IF NOT EXISTS user_profiles (
        user_id TEXT PRIMARY KEY,
        name TEXT,
        age INTEGER,
        gender TEXT,
        height_cm REAL,
        current_weight_kg REAL,
        target_weight_kg REAL,
        activity_level TEXT,
        fitness_goal TEXT,
        target_calories INTEGER,
        target_protein INTEGER,
        target_carbs INTEGER,
        target_fat INTEGER,
        current_adjustment TEXT NOT NULL DEFAULT 'none',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS meals (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        food_name TEXT NOT NULL,
        calories REAL NOT NULL,
        protein REAL NOT NULL,
        carbs REAL NOT NULL,
        fat REAL NOT NULL,
        serving_size TEXT,
        meal_type TEXT NOT NULL,
        source TEXT NOT NULL,
        logged_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_meals_user_logged ON meals(user_id, logged_at)",
    r"
    CREATE TABLE IF NOT EXISTS weight_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        weight_kg REAL NOT NULL,
        notes TEXT,
        logged_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_weight_logs_user_logged ON weight_logs(user_id, logged_at)",
    r"
    CREATE TABLE IF NOT EXISTS workout_sessions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        workout_name TEXT NOT NULL,
        exercises TEXT NOT NULL,
        notes TEXT,
        duration_minutes INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_workouts_user_created ON workout_sessions(user_id, created_at)",
];

/// Fixed-width RFC3339 so stored timestamps sort lexicographically
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

/// `[start, end)` bounds of a UTC day as stored timestamps
pub(crate) fn day_bounds(day: NaiveDate) -> (String, String) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + chrono::Duration::days(1);
    (format_timestamp(&start), format_timestamp(&end))
}

#[async_trait]
impl RecordStore for Database {
    async fn get_profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>> {
        self.profiles.get(user_id).await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.profiles.upsert(profile).await
    }

    async fn create_meal(&self, meal: &Meal) -> AppResult<()> {
        self.meals.create(meal).await
    }

    async fn get_meal(&self, id: &str) -> AppResult<Option<Meal>> {
        self.meals.get(id).await
    }

    async fn list_meals(&self, user_id: &UserId, day: Option<NaiveDate>) -> AppResult<Vec<Meal>> {
        self.meals.list(user_id, day).await
    }

    async fn update_meal(&self, meal: &Meal) -> AppResult<()> {
        self.meals.update(meal).await
    }

    async fn delete_meal(&self, id: &str) -> AppResult<bool> {
        self.meals.delete(id).await
    }

    async fn create_weight_log(&self, log: &WeightLog) -> AppResult<()> {
        self.weight_logs.create(log).await
    }

    async fn list_weight_logs(&self, user_id: &UserId, limit: u32) -> AppResult<Vec<WeightLog>> {
        self.weight_logs.list(user_id, limit).await
    }

    async fn create_workout(&self, session: &WorkoutSession) -> AppResult<()> {
        self.workouts.create(session).await
    }

    async fn get_workout(&self, id: &str) -> AppResult<Option<WorkoutSession>> {
        self.workouts.get(id).await
    }

    async fn list_workouts(
        &self,
        user_id: &UserId,
        workout_name: Option<&str>,
        limit: u32,
    ) -> AppResult<Vec<WorkoutSession>> {
        self.workouts.list(user_id, workout_name, limit).await
    }

    async fn update_workout(&self, session: &WorkoutSession) -> AppResult<()> {
        self.workouts.update(session).await
    }

    async fn delete_workout(&self, id: &str) -> AppResult<bool> {
        self.workouts.delete(id).await
    }
}
