// ABOUTME: Integration tests for the SQLite record store
// ABOUTME: Profile upserts, meal day filtering, weight history limits and workout queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{create_test_database, march, new_meal, new_workout, test_user};
use fittrack::calculator::{BiologicalSex, CalorieAdjustment, FitnessGoal};
use fittrack::database::{Database, RecordStore};
use fittrack::errors::ErrorCode;
use fittrack::models::{
    NutritionFacts, NutritionSource, NutritionTargets, UserId, UserProfile, WeightLog,
};

fn weight_log(user_id: &UserId, day: u32, weight_kg: f64) -> WeightLog {
    WeightLog {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.clone(),
        weight_kg,
        notes: None,
        logged_at: march(day, 7),
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_profile_upsert_and_get() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    assert!(db.get_profile(&user).await?.is_none());

    let mut profile = UserProfile::new(user.clone());
    profile.age = Some(41);
    profile.gender = Some(BiologicalSex::Other);
    profile.height_cm = Some(168.5);
    profile.current_weight_kg = Some(77.2);
    profile.activity_level = Some("very_active".into());
    profile.fitness_goal = Some(FitnessGoal::Recomposition);
    profile.targets = Some(NutritionTargets {
        calories: 2300,
        protein_g: 154,
        carbs_g: 240,
        fat_g: 64,
    });
    profile.current_adjustment = CalorieAdjustment::Deficit200;
    db.upsert_profile(&profile).await?;

    let stored = db.get_profile(&user).await?.unwrap();
    assert_eq!(stored.user_id, user);
    assert_eq!(stored.age, Some(41));
    assert_eq!(stored.gender, Some(BiologicalSex::Other));
    assert_eq!(stored.height_cm, Some(168.5));
    assert_eq!(stored.activity_level.as_deref(), Some("very_active"));
    assert_eq!(stored.fitness_goal, Some(FitnessGoal::Recomposition));
    assert_eq!(stored.targets, profile.targets);
    assert_eq!(stored.current_adjustment, CalorieAdjustment::Deficit200);
    assert!(stored.target_weight_kg.is_none());

    profile.targets = None;
    profile.current_adjustment = CalorieAdjustment::None;
    profile.current_weight_kg = Some(75.0);
    db.upsert_profile(&profile).await?;

    let updated = db.get_profile(&user).await?.unwrap();
    assert!(updated.targets.is_none());
    assert_eq!(updated.current_adjustment, CalorieAdjustment::None);
    assert_eq!(updated.current_weight_kg, Some(75.0));
    Ok(())
}

#[tokio::test]
async fn test_file_database_persists_across_connections() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}", dir.path().join("fittrack.db").display());
    let user = test_user();

    {
        let db = Database::connect(&url).await?;
        let mut profile = UserProfile::new(user.clone());
        profile.current_weight_kg = Some(81.5);
        profile.current_adjustment = CalorieAdjustment::Surplus200;
        db.upsert_profile(&profile).await?;
        db.create_weight_log(&weight_log(&user, 4, 81.5)).await?;
        db.pool().close().await;
    }

    let reopened = Database::connect(&url).await?;
    let stored = reopened.get_profile(&user).await?.unwrap();
    assert_eq!(stored.current_weight_kg, Some(81.5));
    assert_eq!(stored.current_adjustment, CalorieAdjustment::Surplus200);
    assert_eq!(reopened.list_weight_logs(&user, 30).await?.len(), 1);
    Ok(())
}

// ============================================================================
// Meals
// ============================================================================

#[tokio::test]
async fn test_meals_filtered_by_utc_day_newest_first() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();
    let other = test_user();

    for (owner, name, at, source) in [
        (&user, "Oats", march(10, 8), NutritionSource::Manual),
        (&user, "Salmon", march(10, 19), NutritionSource::Usda),
        (&user, "Toast", march(11, 0), NutritionSource::Manual),
        (&other, "Pizza", march(10, 12), NutritionSource::Manual),
    ] {
        let facts = NutritionFacts::new(400.0, 30.0, 40.0, 12.0);
        let meal = new_meal(name, facts, Some(at)).into_meal(owner.clone(), source);
        db.create_meal(&meal).await?;
    }

    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let meals = db.list_meals(&user, Some(day)).await?;
    let names: Vec<&str> = meals.iter().map(|m| m.food_name.as_str()).collect();
    assert_eq!(names, ["Salmon", "Oats"]);
    assert_eq!(meals[0].source, NutritionSource::Usda);

    let all = db.list_meals(&user, None).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].food_name, "Toast");
    Ok(())
}

#[tokio::test]
async fn test_meal_update_and_delete() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    let facts = NutritionFacts::new(200.0, 4.0, 44.0, 0.5);
    let mut meal = new_meal("Rice", facts, Some(march(12, 13)))
        .into_meal(user.clone(), NutritionSource::Manual);
    db.create_meal(&meal).await?;

    meal.food_name = "Brown Rice".into();
    meal.facts = NutritionFacts::new(220.0, 5.0, 45.0, 1.8);
    db.update_meal(&meal).await?;

    let stored = db.get_meal(&meal.id).await?.unwrap();
    assert_eq!(stored.food_name, "Brown Rice");
    assert_eq!(stored.facts, meal.facts);
    assert_eq!(stored.logged_at, meal.logged_at);

    assert!(db.delete_meal(&meal.id).await?);
    assert!(!db.delete_meal(&meal.id).await?);
    assert!(db.get_meal(&meal.id).await?.is_none());

    let error = db.update_meal(&meal).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    Ok(())
}

// ============================================================================
// Weight logs
// ============================================================================

#[tokio::test]
async fn test_weight_history_is_newest_first_and_limited() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    for (day, weight) in [(1, 82.0), (8, 81.4), (15, 80.9), (22, 80.1)] {
        db.create_weight_log(&weight_log(&user, day, weight)).await?;
    }
    db.create_weight_log(&weight_log(&test_user(), 23, 60.0)).await?;

    let recent = db.list_weight_logs(&user, 2).await?;
    assert_eq!(recent.len(), 2);
    assert!((recent[0].weight_kg - 80.1).abs() < f64::EPSILON);
    assert!((recent[1].weight_kg - 80.9).abs() < f64::EPSILON);

    let all = db.list_weight_logs(&user, 30).await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

// ============================================================================
// Workouts
// ============================================================================

#[tokio::test]
async fn test_workout_exercises_persist_as_json() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    let session = new_workout("Push Day", "Bench Press", &[(60.0, 8), (62.5, 6)])
        .into_session(user.clone());
    db.create_workout(&session).await?;

    let stored = db.get_workout(&session.id).await?.unwrap();
    assert_eq!(stored.workout_name, "Push Day");
    assert_eq!(stored.exercises, session.exercises);
    assert_eq!(stored.exercises[0].sets[1].rest_seconds, Some(90));
    assert_eq!(stored.duration_minutes, Some(45));
    Ok(())
}

#[tokio::test]
async fn test_workout_name_filter_and_limit() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    for name in ["Push Day", "Pull Day", "Push Day", "Legs"] {
        let session = new_workout(name, "Row", &[(50.0, 10)]).into_session(user.clone());
        db.create_workout(&session).await?;
    }

    assert_eq!(db.list_workouts(&user, None, 50).await?.len(), 4);
    assert_eq!(db.list_workouts(&user, None, 3).await?.len(), 3);

    let push = db.list_workouts(&user, Some("Push Day"), 50).await?;
    assert_eq!(push.len(), 2);
    assert!(push.iter().all(|s| s.workout_name == "Push Day"));

    assert!(db.list_workouts(&test_user(), None, 50).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_workout_update_and_delete() -> Result<()> {
    let db = create_test_database().await?;
    let user = test_user();

    let mut session = new_workout("Legs", "Squat", &[(100.0, 5)]).into_session(user.clone());
    db.create_workout(&session).await?;

    session.exercises[0].sets[0].weight_kg = 105.0;
    session.notes = Some("New top set".into());
    db.update_workout(&session).await?;

    let stored = db.get_workout(&session.id).await?.unwrap();
    assert!((stored.exercises[0].sets[0].weight_kg - 105.0).abs() < f64::EPSILON);
    assert_eq!(stored.notes.as_deref(), Some("New top set"));

    assert!(db.delete_workout(&session.id).await?);
    let error = db.update_workout(&session).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    Ok(())
}
