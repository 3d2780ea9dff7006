// ABOUTME: Profile maintenance and nutrition target persistence
// ABOUTME: Recomputes targets on profile changes and implements or reverts calorie adjustments
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::calculator::{build_active_plan, ActivePlan, ActivityLevel, CalorieAdjustment};
use crate::database::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NutritionTargets, ProfileUpdate, UserId, UserProfile};
use std::sync::Arc;
use tracing::{info, instrument};

/// Active plan for a profile, `None` while metrics or goal are missing
///
/// # Errors
///
/// Returns a validation error if stored metrics are out of domain
pub fn plan_for_profile(
    profile: &UserProfile,
    adjustment: CalorieAdjustment,
) -> AppResult<Option<ActivePlan>> {
    let (Some(metrics), Some(goal)) = (profile.body_metrics()?, profile.fitness_goal) else {
        return Ok(None);
    };
    let activity = ActivityLevel::resolve(profile.activity_level.as_deref());
    build_active_plan(&metrics, activity, goal, adjustment).map(Some)
}

/// Store the targets of `adjustment` on the profile, or clear them if incomplete
fn refresh_targets(
    profile: &mut UserProfile,
    adjustment: CalorieAdjustment,
) -> AppResult<Option<ActivePlan>> {
    let plan = plan_for_profile(profile, adjustment)?;
    match &plan {
        Some(plan) => {
            profile.targets = Some(NutritionTargets::from_plan(
                plan.target_calories(),
                &plan.target_macros(),
            ));
            profile.current_adjustment = adjustment;
        }
        None => {
            profile.targets = None;
            profile.current_adjustment = CalorieAdjustment::None;
        }
    }
    Ok(plan)
}

/// Profile and plan operations
#[derive(Clone)]
pub struct PlannerService {
    store: Arc<dyn RecordStore>,
}

impl PlannerService {
    /// Create a new planner
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The user's profile, or an empty unsaved one
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn get_profile(&self, user_id: &UserId) -> AppResult<UserProfile> {
        Ok(self
            .store
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id.clone())))
    }

    /// Apply a profile update and store base-plan targets
    ///
    /// Resets any implemented adjustment to none. Incomplete profiles are stored
    /// without targets.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-domain values, or a store error
    #[instrument(skip(self, update), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let mut profile = self.get_profile(user_id).await?;
        profile.apply(update)?;
        refresh_targets(&mut profile, CalorieAdjustment::None)?;
        self.store.upsert_profile(&profile).await?;

        info!(has_targets = profile.targets.is_some(), "Profile updated");
        Ok(profile)
    }

    /// Plan currently in effect
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the profile lacks metrics or a goal
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn current_plan(&self, user_id: &UserId) -> AppResult<ActivePlan> {
        let profile = self.get_profile(user_id).await?;
        plan_for_profile(&profile, profile.current_adjustment)?.ok_or_else(incomplete_profile)
    }

    /// Make `adjustment` the active plan and store its targets
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the profile lacks metrics or a goal
    #[instrument(skip(self), fields(user_id = %user_id, adjustment = adjustment.as_str()))]
    pub async fn implement_adjustment(
        &self,
        user_id: &UserId,
        adjustment: CalorieAdjustment,
    ) -> AppResult<ActivePlan> {
        let mut profile = self.get_profile(user_id).await?;
        let plan = refresh_targets(&mut profile, adjustment)?.ok_or_else(incomplete_profile)?;
        profile.updated_at = chrono::Utc::now();
        self.store.upsert_profile(&profile).await?;

        info!(target_calories = plan.target_calories(), "Adjustment implemented");
        Ok(plan)
    }

    /// Return to the base plan
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the profile lacks metrics or a goal
    pub async fn revert_adjustment(&self, user_id: &UserId) -> AppResult<ActivePlan> {
        self.implement_adjustment(user_id, CalorieAdjustment::None).await
    }

    /// Record a new current weight and refresh targets, keeping the adjustment
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive weight, or a store error
    pub(crate) async fn record_weight(
        &self,
        user_id: &UserId,
        weight_kg: f64,
    ) -> AppResult<UserProfile> {
        let mut profile = self.get_profile(user_id).await?;
        profile.apply(ProfileUpdate {
            current_weight_kg: Some(weight_kg),
            ..ProfileUpdate::default()
        })?;
        let adjustment = profile.current_adjustment;
        refresh_targets(&mut profile, adjustment)?;
        self.store.upsert_profile(&profile).await?;
        Ok(profile)
    }
}

fn incomplete_profile() -> AppError {
    AppError::invalid_input(
        "Profile needs weight, height, age, sex and fitness goal to compute a plan",
    )
}
