// ABOUTME: Domain service layer orchestrating the calculator, providers and record store
// ABOUTME: Every operation takes the authenticated user and enforces record ownership
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Domain service layer
//!
//! Services are thin: they load records through [`RecordStore`](crate::database::RecordStore),
//! call the pure calculator and tracking functions, and persist the result. Callers
//! resolve the session to a [`UserId`] first (see [`crate::auth::require_user`]).

/// Dashboard summary
pub mod dashboard;
/// Meal logging and food search
pub mod meals;
/// Profile targets and calorie adjustments
pub mod planner;
/// Weight logging
pub mod weight;
/// Workout sessions and progress
pub mod workouts;

pub use dashboard::{Dashboard, DashboardService};
pub use meals::MealService;
pub use planner::PlannerService;
pub use weight::{NewWeightLog, WeightService};
pub use workouts::{SetUpdate, WorkoutService};

use crate::errors::{AppError, AppResult};
use crate::models::UserId;

/// Fail with 403 unless `owner` is the acting user
pub(crate) fn ensure_owner(
    owner: &UserId,
    user_id: &UserId,
    action: &str,
    resource: &str,
) -> AppResult<()> {
    if owner == user_id {
        Ok(())
    } else {
        Err(AppError::permission_denied(format!(
            "Unauthorized to {action} this {resource}"
        )))
    }
}
