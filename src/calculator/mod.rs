// ABOUTME: Pure nutrition and progress calculator (BMR, TDEE, goal calories, macros, adjustments)
// ABOUTME: Deterministic functions over validated inputs with no I/O and no shared state
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Nutrition Calculator
//!
//! Derives daily energy and macronutrient targets from body metrics:
//!
//! 1. [`compute_bmr`]: Mifflin-St Jeor basal metabolic rate
//! 2. [`compute_tdee`]: BMR × activity multiplier
//! 3. [`compute_goal_calories`]: TDEE plus the goal's fixed delta
//! 4. [`compute_base_macros`]: protein-first split (2.0 g/kg protein, 25% fat, carbs remainder)
//! 5. [`apply_adjustment`]: optional fixed kcal shift with an expected weekly change
//! 6. [`compute_weight_progress`]: distance-to-goal summary
//!
//! Every function is pure. Invalid inputs are rejected with a validation
//! [`AppError`](crate::errors::AppError) instead of being clamped, with one
//! exception: a missing or unknown activity level resolves to sedentary.

/// Adjustment presets and the active plan
pub mod adjustment;
/// BMR and TDEE
pub mod energy;
/// Goal calories, macros and the base plan
pub mod plan;
/// Weight progress
pub mod progress;
/// Value types and lookup tables
pub mod types;

pub use adjustment::{apply_adjustment, apply_preset, build_active_plan, ActivePlan};
pub use energy::{compute_bmr, compute_tdee, compute_tdee_for_key};
pub use plan::{build_base_plan, compute_base_macros, compute_goal_calories};
pub use progress::{compute_weight_progress, time_to_goal};
pub use types::{
    ActivityLevel, ActivityLevelInfo, AdjustedPlan, BasePlan, BiologicalSex, BodyMetrics,
    CalorieAdjustment, CalorieAdjustmentInfo, FitnessGoal, FitnessGoalInfo, MacroBreakdown,
    MacroTarget, TimeToGoal, WeightProgress, ACTIVITY_LEVELS, CALORIE_ADJUSTMENTS, FITNESS_GOALS,
};
