// ABOUTME: Optional fixed-delta calorie adjustments layered over the base plan
// ABOUTME: Expected weekly weight change from the 7700 kcal per kg energy balance
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::plan::{build_base_plan, compute_base_macros};
use super::types::{
    ActivityLevel, AdjustedPlan, BasePlan, BodyMetrics, CalorieAdjustment, FitnessGoal,
    MacroBreakdown,
};
use crate::constants::nutrition::{DAYS_PER_WEEK, KCAL_PER_KG_BODY_FAT};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Shift a base calorie target by a fixed delta and rebuild its macros
///
/// The adjusted target is `base_goal_calories + adjustment_kcal`, clamped at zero.
/// The expected weekly change is `|adjustment_kcal × 7| / 7700` kg. Applying the
/// same adjustment twice to the same base yields the same plan; adjustments never
/// stack.
///
/// # Errors
///
/// Returns a validation error if `body_weight_kg` is not a finite positive number
pub fn apply_adjustment(
    base_goal_calories: u32,
    adjustment_kcal: i32,
    body_weight_kg: f64,
) -> AppResult<AdjustedPlan> {
    let adjusted = (i64::from(base_goal_calories) + i64::from(adjustment_kcal)).max(0);
    let adjusted_calories = u32::try_from(adjusted).unwrap_or(u32::MAX);

    let weekly_kg = (f64::from(adjustment_kcal) * DAYS_PER_WEEK).abs() / KCAL_PER_KG_BODY_FAT;
    let (expected_weekly_change_kg, expected_weekly_change) = match adjustment_kcal.cmp(&0) {
        Ordering::Equal => (0.0, "No change expected".to_owned()),
        Ordering::Less => (-weekly_kg, format!("Lose ~{weekly_kg:.2} kg per week")),
        Ordering::Greater => (weekly_kg, format!("Gain ~{weekly_kg:.2} kg per week")),
    };

    let macros = compute_base_macros(adjusted_calories, body_weight_kg)?;

    Ok(AdjustedPlan {
        adjusted_calories,
        adjustment_kcal,
        expected_weekly_change_kg,
        expected_weekly_change,
        macros,
    })
}

/// Apply one of the named presets to a base plan
///
/// # Errors
///
/// Returns a validation error if `body_weight_kg` is not a finite positive number
pub fn apply_preset(
    base: &BasePlan,
    preset: CalorieAdjustment,
    body_weight_kg: f64,
) -> AppResult<AdjustedPlan> {
    apply_adjustment(base.goal_calories, preset.kcal(), body_weight_kg)
}

/// Base plan plus whichever adjustment is currently in effect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivePlan {
    /// Base plan computed from the profile
    pub base: BasePlan,
    /// Adjustment in effect (`none` when reverted)
    pub adjustment: CalorieAdjustment,
    /// Adjusted plan, absent for `none`
    pub adjusted: Option<AdjustedPlan>,
}

impl ActivePlan {
    /// Calorie target in effect
    #[must_use]
    pub fn target_calories(&self) -> u32 {
        self.adjusted
            .as_ref()
            .map_or(self.base.goal_calories, |plan| plan.adjusted_calories)
    }

    /// Macro targets in effect
    #[must_use]
    pub fn target_macros(&self) -> MacroBreakdown {
        self.adjusted
            .as_ref()
            .map_or(self.base.macros, |plan| plan.macros)
    }
}

/// Build the base plan and layer the selected adjustment over it
///
/// `CalorieAdjustment::None` yields the base plan unchanged, so reverting an
/// adjustment is the same computation with `none`.
///
/// # Errors
///
/// Returns a validation error if the body metrics are invalid
pub fn build_active_plan(
    metrics: &BodyMetrics,
    activity_level: ActivityLevel,
    goal: FitnessGoal,
    adjustment: CalorieAdjustment,
) -> AppResult<ActivePlan> {
    let base = build_base_plan(metrics, activity_level, goal)?;
    let adjusted = match adjustment {
        CalorieAdjustment::None => None,
        preset => Some(apply_preset(&base, preset, metrics.weight_kg)?),
    };
    Ok(ActivePlan {
        base,
        adjustment,
        adjusted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::types::BiologicalSex;

    #[test]
    fn test_deficit_reference_case() {
        let plan = apply_adjustment(1509, -400, 70.0).unwrap();
        assert_eq!(plan.adjusted_calories, 1109);
        assert!((plan.expected_weekly_change_kg + 0.3636).abs() < 1e-3);
        assert_eq!(plan.expected_weekly_change, "Lose ~0.36 kg per week");
        assert_eq!(plan.macros.protein.grams, 140);
    }

    #[test]
    fn test_surplus_phrasing() {
        let plan = apply_adjustment(2000, 600, 80.0).unwrap();
        assert_eq!(plan.adjusted_calories, 2600);
        assert_eq!(plan.expected_weekly_change, "Gain ~0.55 kg per week");
    }

    #[test]
    fn test_zero_adjustment_matches_base_macros() {
        let plan = apply_adjustment(1509, 0, 70.0).unwrap();
        assert_eq!(plan.adjusted_calories, 1509);
        assert_eq!(plan.expected_weekly_change, "No change expected");
        assert_eq!(plan.macros, compute_base_macros(1509, 70.0).unwrap());
    }

    #[test]
    fn test_adjustment_is_idempotent() {
        let first = apply_adjustment(2100, -200, 75.0).unwrap();
        let second = apply_adjustment(2100, -200, 75.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_adjustment_clamps_at_zero() {
        let plan = apply_adjustment(300, -600, 60.0).unwrap();
        assert_eq!(plan.adjusted_calories, 0);
    }

    #[test]
    fn test_active_plan_none_is_base() {
        let metrics = BodyMetrics::new(70.0, 175.0, 30, BiologicalSex::Male).unwrap();
        let plan = build_active_plan(
            &metrics,
            ActivityLevel::Sedentary,
            FitnessGoal::Lose,
            CalorieAdjustment::None,
        )
        .unwrap();
        assert!(plan.adjusted.is_none());
        assert_eq!(plan.target_calories(), 1479);
        assert_eq!(plan.target_macros(), plan.base.macros);
    }

    #[test]
    fn test_active_plan_with_preset() {
        let metrics = BodyMetrics::new(70.0, 175.0, 30, BiologicalSex::Male).unwrap();
        let plan = build_active_plan(
            &metrics,
            ActivityLevel::Sedentary,
            FitnessGoal::Lose,
            CalorieAdjustment::Deficit400,
        )
        .unwrap();
        assert_eq!(plan.base.goal_calories, 1479);
        assert_eq!(plan.target_calories(), 1079);
    }
}
