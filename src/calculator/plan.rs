// ABOUTME: Goal calorie targets and protein-first macronutrient breakdowns
// ABOUTME: Builds the base plan from body metrics, activity level and fitness goal
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::energy::{compute_bmr, compute_tdee};
use super::types::{
    require_finite, require_positive, ActivityLevel, BasePlan, BodyMetrics, FitnessGoal,
    MacroBreakdown, MacroTarget,
};
use crate::constants::nutrition::{
    CARBS_KCAL_PER_G, FAT_CALORIE_SHARE, FAT_KCAL_PER_G, FAT_PERCENTAGE, PROTEIN_G_PER_KG,
    PROTEIN_KCAL_PER_G,
};
use crate::errors::AppResult;
use tracing::debug;

/// Round a kcal value to a non-negative whole number
fn round_kcal(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Daily calorie target for a goal: TDEE plus the goal's fixed delta, rounded
///
/// | goal | delta |
/// |------|-------|
/// | lose | -500 |
/// | maintain | 0 |
/// | gain | +300 |
/// | recomposition | -200 |
///
/// Results below zero are clamped to 0.
///
/// # Errors
///
/// Returns a validation error if `tdee` is NaN or infinite
pub fn compute_goal_calories(tdee: f64, goal: FitnessGoal) -> AppResult<u32> {
    require_finite("tdee", tdee)?;
    let raw = tdee + f64::from(goal.calorie_delta());
    if raw < 0.0 {
        debug!(tdee, goal = goal.as_str(), "Goal calories below zero, clamping");
    }
    Ok(round_kcal(raw))
}

/// Protein-first macro split
///
/// 1. Protein = body weight × 2.0 g/kg, rounded
/// 2. Fat = 25% of calories, converted at 9 kcal/g and rounded
/// 3. Carbs = remaining calories / 4, rounded, never negative
///
/// Percentages are whole numbers of `goal_calories`. When protein plus fat already
/// exceed the calorie target, carbs and their percentage clamp to zero and the
/// protein percentage can exceed 75. A zero calorie target yields zero protein and
/// carb percentages while fat stays at its fixed 25.
///
/// # Errors
///
/// Returns a validation error if `body_weight_kg` is not a finite positive number
pub fn compute_base_macros(goal_calories: u32, body_weight_kg: f64) -> AppResult<MacroBreakdown> {
    require_positive("body_weight_kg", body_weight_kg)?;

    let calories = f64::from(goal_calories);
    let protein_g = (body_weight_kg * PROTEIN_G_PER_KG).round();
    let protein_kcal = protein_g * PROTEIN_KCAL_PER_G;

    let fat_kcal = (calories * FAT_CALORIE_SHARE).round();
    let fat_g = (fat_kcal / FAT_KCAL_PER_G).round();

    let remaining_kcal = calories - protein_kcal - fat_kcal;
    let carbs_g = (remaining_kcal / CARBS_KCAL_PER_G).round().max(0.0);

    let (protein_pct, carbs_pct) = if goal_calories == 0 {
        (0, 0)
    } else {
        (
            round_kcal(protein_kcal / calories * 100.0),
            round_kcal(remaining_kcal / calories * 100.0),
        )
    };

    Ok(MacroBreakdown {
        protein: MacroTarget {
            grams: protein_g as u32,
            percentage: protein_pct,
        },
        carbs: MacroTarget {
            grams: carbs_g as u32,
            percentage: carbs_pct,
        },
        fat: MacroTarget {
            grams: fat_g as u32,
            percentage: FAT_PERCENTAGE,
        },
    })
}

/// Compose BMR, TDEE, goal calories and macros into the base plan
///
/// # Errors
///
/// Returns a validation error if the body metrics are invalid
pub fn build_base_plan(
    metrics: &BodyMetrics,
    activity_level: ActivityLevel,
    goal: FitnessGoal,
) -> AppResult<BasePlan> {
    let bmr = compute_bmr(metrics)?;
    let tdee = compute_tdee(bmr, activity_level)?;
    let goal_calories = compute_goal_calories(tdee, goal)?;
    let macros = compute_base_macros(goal_calories, metrics.weight_kg)?;

    debug!(
        bmr,
        tdee,
        goal_calories,
        activity_level = activity_level.as_str(),
        goal = goal.as_str(),
        "Built base plan"
    );

    Ok(BasePlan {
        maintenance_calories: round_kcal(tdee),
        goal_calories,
        goal,
        goal_name: goal.label().to_owned(),
        macros,
    })
}
