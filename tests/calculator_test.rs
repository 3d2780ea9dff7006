// ABOUTME: Integration tests for the nutrition calculator pipeline
// ABOUTME: BMR through active plan for reference profiles, adjustments and weight progress
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use fittrack::calculator::{
    apply_adjustment, build_active_plan, build_base_plan, compute_base_macros, compute_bmr,
    compute_goal_calories, compute_tdee, compute_weight_progress, ActivityLevel, BiologicalSex,
    BodyMetrics, CalorieAdjustment, FitnessGoal, TimeToGoal, CALORIE_ADJUSTMENTS,
};
use fittrack::errors::ErrorCode;

fn reference_male() -> BodyMetrics {
    BodyMetrics::new(70.0, 175.0, 30, BiologicalSex::Male).unwrap()
}

fn reference_female() -> BodyMetrics {
    BodyMetrics::new(60.0, 165.0, 25, BiologicalSex::Female).unwrap()
}

// ============================================================================
// Energy expenditure
// ============================================================================

#[test]
fn test_reference_bmr_and_tdee() -> Result<()> {
    common::init_test_logging();

    let male = compute_bmr(&reference_male())?;
    assert!((male - 1648.75).abs() < 1e-9);

    let female = compute_bmr(&reference_female())?;
    assert!((female - 1345.25).abs() < 1e-9);

    let tdee = compute_tdee(1673.75, ActivityLevel::Sedentary)?;
    assert!((tdee - 2008.5).abs() < 1e-9);
    assert_eq!(compute_goal_calories(tdee, FitnessGoal::Lose)?, 1509);
    Ok(())
}

#[test]
fn test_activity_multipliers_are_ordered() -> Result<()> {
    let bmr = compute_bmr(&reference_female())?;
    let mut previous = 0.0;
    for level in ActivityLevel::ALL {
        let tdee = compute_tdee(bmr, level)?;
        assert!(tdee > previous, "{} should exceed the level below", level.as_str());
        previous = tdee;
    }
    Ok(())
}

// ============================================================================
// Base plan
// ============================================================================

#[test]
fn test_moderately_active_male_losing_weight() -> Result<()> {
    let plan = build_base_plan(
        &reference_male(),
        ActivityLevel::ModeratelyActive,
        FitnessGoal::Lose,
    )?;

    assert_eq!(plan.maintenance_calories, 2556);
    assert_eq!(plan.goal_calories, 2056);
    assert_eq!(plan.macros.protein.grams, 140);
    assert_eq!(plan.macros.fat.grams, 57);
    assert_eq!(plan.macros.carbs.grams, 246);
    assert_eq!(plan.macros.protein.percentage, 27);
    assert_eq!(plan.macros.carbs.percentage, 48);
    assert_eq!(plan.macros.fat.percentage, 25);
    assert!((plan.macros.total_kcal() - 2056.0).abs() <= 4.0);
    Ok(())
}

#[test]
fn test_reference_macro_split() -> Result<()> {
    let macros = compute_base_macros(1509, 70.0)?;
    assert_eq!(macros.protein.grams, 140);
    assert_eq!(macros.fat.grams, 42);
    assert_eq!(macros.carbs.grams, 143);
    Ok(())
}

#[test]
fn test_lightly_active_female_gaining() -> Result<()> {
    let plan = build_base_plan(
        &reference_female(),
        ActivityLevel::LightlyActive,
        FitnessGoal::Gain,
    )?;

    assert_eq!(plan.maintenance_calories, 1850);
    assert_eq!(plan.goal_calories, 2150);
    assert_eq!(plan.goal_name, FitnessGoal::Gain.label());
    assert_eq!(plan.macros.protein.grams, 120);
    assert_eq!(plan.macros.fat.grams, 60);
    assert_eq!(plan.macros.carbs.grams, 283);
    assert!((plan.macros.total_kcal() - 2150.0).abs() <= 4.0);
    Ok(())
}

#[test]
fn test_invalid_metrics_are_rejected_before_any_math() {
    let error = BodyMetrics::new(70.0, 0.0, 30, BiologicalSex::Male).unwrap_err();
    assert!(error.is_validation());
    assert_eq!(error.http_status(), 400);

    let error = "hyperactive".parse::<ActivityLevel>().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

// ============================================================================
// Adjustments
// ============================================================================

#[test]
fn test_reference_deficit() -> Result<()> {
    let adjusted = apply_adjustment(1509, -400, 70.0)?;
    assert_eq!(adjusted.adjusted_calories, 1109);
    assert!((adjusted.expected_weekly_change_kg + 400.0 * 7.0 / 7700.0).abs() < 1e-9);
    assert!(adjusted.expected_weekly_change.contains("0.36"));
    Ok(())
}

#[test]
fn test_every_preset_shifts_the_base_target() -> Result<()> {
    let metrics = reference_male();
    let base = build_base_plan(&metrics, ActivityLevel::Sedentary, FitnessGoal::Maintain)?;

    for info in &CALORIE_ADJUSTMENTS {
        let plan = build_active_plan(
            &metrics,
            ActivityLevel::Sedentary,
            FitnessGoal::Maintain,
            info.adjustment,
        )?;
        let expected = i64::from(base.goal_calories) + i64::from(info.kcal);
        assert_eq!(i64::from(plan.target_calories()), expected, "{}", info.key);
        assert_eq!(plan.base, base);
    }
    Ok(())
}

#[test]
fn test_revert_is_the_base_plan() -> Result<()> {
    let metrics = reference_female();
    let adjusted = build_active_plan(
        &metrics,
        ActivityLevel::LightlyActive,
        FitnessGoal::Gain,
        CalorieAdjustment::Surplus200,
    )?;
    assert_eq!(adjusted.target_calories(), 2350);

    let reverted = build_active_plan(
        &metrics,
        ActivityLevel::LightlyActive,
        FitnessGoal::Gain,
        CalorieAdjustment::None,
    )?;
    assert!(reverted.adjusted.is_none());
    assert_eq!(reverted.target_calories(), adjusted.base.goal_calories);
    assert_eq!(reverted.target_macros(), adjusted.base.macros);
    Ok(())
}

#[test]
fn test_active_plan_json_shape() -> Result<()> {
    let plan = build_active_plan(
        &reference_male(),
        ActivityLevel::ModeratelyActive,
        FitnessGoal::Lose,
        CalorieAdjustment::Deficit200,
    )?;
    let json = serde_json::to_value(&plan)?;

    assert_eq!(json["adjustment"], "deficit_200");
    assert_eq!(json["base"]["goal"], "lose");
    assert_eq!(json["base"]["goal_calories"], 2056);
    assert_eq!(json["adjusted"]["adjusted_calories"], 1856);
    assert_eq!(json["adjusted"]["adjustment_kcal"], -200);
    Ok(())
}

// ============================================================================
// Weight progress
// ============================================================================

#[test]
fn test_weight_progress_reference() -> Result<()> {
    let progress = compute_weight_progress(80.0, 70.0)?;
    assert!((progress.weight_difference + 10.0).abs() < f64::EPSILON);
    assert!(progress.progress_percentage.abs() < f64::EPSILON);
    assert!(progress.is_on_track);
    assert_eq!(progress.time_to_goal, TimeToGoal::Weeks(20));
    Ok(())
}

#[test]
fn test_weight_progress_at_goal_and_far_away() -> Result<()> {
    let at_goal = compute_weight_progress(72.5, 72.5)?;
    assert!((at_goal.progress_percentage - 100.0).abs() < f64::EPSILON);
    assert_eq!(at_goal.time_to_goal, TimeToGoal::Weeks(0));

    let far = compute_weight_progress(110.0, 70.0)?;
    assert!(!far.is_on_track);
    assert_eq!(far.weeks_to_goal, 80);
    assert_eq!(far.time_to_goal.to_string(), "2 years");
    Ok(())
}
