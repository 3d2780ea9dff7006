// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, in-memory record store, session and profile helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `fittrack`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use fittrack::{
    auth::StaticTokenVerifier,
    calculator::{BiologicalSex, FitnessGoal},
    database::{Database, RecordStore},
    models::{
        MealType, NewMeal, NewWorkout, NutritionFacts, ProfileUpdate, UserId, WorkoutExercise,
        WorkoutSet,
    },
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::connect("sqlite::memory:").await?;
    Ok(Arc::new(database))
}

/// Record store as the services see it
pub async fn create_test_store() -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = create_test_database().await?;
    Ok(store)
}

/// Verifier knowing one session token per given user
pub fn create_test_verifier(sessions: &[(&str, &UserId)]) -> StaticTokenVerifier {
    sessions
        .iter()
        .fold(StaticTokenVerifier::new(), |verifier, (token, user)| {
            verifier.with_session(*token, (*user).clone())
        })
}

/// Fresh user id
pub fn test_user() -> UserId {
    UserId::new(uuid::Uuid::new_v4().to_string())
}

/// 70 kg, 175 cm, 30 year old male, moderately active, losing weight
pub fn complete_profile_update() -> ProfileUpdate {
    ProfileUpdate {
        name: Some("Test User".into()),
        age: Some(30),
        gender: Some(BiologicalSex::Male),
        height_cm: Some(175.0),
        current_weight_kg: Some(70.0),
        target_weight_kg: Some(65.0),
        activity_level: Some("moderately_active".into()),
        fitness_goal: Some(FitnessGoal::Lose),
    }
}

/// Given hour UTC on a day in March 2025
pub fn march(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

/// Manual meal input
pub fn new_meal(name: &str, facts: NutritionFacts, logged_at: Option<DateTime<Utc>>) -> NewMeal {
    NewMeal {
        food_name: name.into(),
        facts,
        serving_size: Some("1 serving".into()),
        meal_type: MealType::Lunch,
        logged_at,
    }
}

/// Single-exercise workout input
pub fn new_workout(workout_name: &str, exercise: &str, sets: &[(f64, u32)]) -> NewWorkout {
    NewWorkout {
        workout_name: workout_name.into(),
        exercises: vec![WorkoutExercise {
            name: exercise.into(),
            sets: sets
                .iter()
                .map(|&(weight_kg, reps)| WorkoutSet {
                    weight_kg,
                    reps,
                    rest_seconds: Some(90),
                })
                .collect(),
        }],
        notes: None,
        duration_minutes: Some(45),
    }
}
