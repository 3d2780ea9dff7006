// ABOUTME: One-call dashboard summary of a day's intake, the active plan and weight progress
// ABOUTME: Sections that need an incomplete profile are omitted rather than failing the call
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::planner::plan_for_profile;
use crate::calculator::{compute_weight_progress, ActivePlan, WeightProgress};
use crate::database::RecordStore;
use crate::errors::AppResult;
use crate::models::{UserId, UserProfile};
use crate::tracking::{compute_daily_stats, DailyStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Profile the summary was computed from
    pub profile: UserProfile,
    /// The day's intake against stored targets
    pub daily: DailyStats,
    /// Plan in effect, absent while the profile is incomplete
    pub plan: Option<ActivePlan>,
    /// Progress toward the target weight, absent unless both weights are known
    pub weight_progress: Option<WeightProgress>,
}

impl Dashboard {
    /// Summary line for the macro cards, e.g. "2 of 3 targets nearly complete"
    #[must_use]
    pub fn macro_summary(&self) -> String {
        format!(
            "{} of 3 targets nearly complete",
            self.daily.macros_on_target()
        )
    }
}

/// Dashboard assembly
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
}

impl DashboardService {
    /// Create a dashboard service
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Summary for `date` (UTC)
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or stored metrics are out of domain
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn dashboard(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Dashboard> {
        let profile = self
            .store
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id.clone()));
        let meals = self.store.list_meals(user_id, Some(date)).await?;

        let daily = compute_daily_stats(date, &meals, profile.targets.as_ref());
        let plan = plan_for_profile(&profile, profile.current_adjustment)?;
        let weight_progress = match (profile.current_weight_kg, profile.target_weight_kg) {
            (Some(current), Some(target)) => Some(compute_weight_progress(current, target)?),
            _ => None,
        };

        Ok(Dashboard {
            profile,
            daily,
            plan,
            weight_progress,
        })
    }
}
