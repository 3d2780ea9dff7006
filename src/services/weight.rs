// ABOUTME: Body weight logging and history
// ABOUTME: Each log also becomes the profile's current weight
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::PlannerService;
use crate::calculator::types::require_positive;
use crate::constants::limits::DEFAULT_WEIGHT_LOG_LIMIT;
use crate::database::RecordStore;
use crate::errors::AppResult;
use crate::models::{UserId, WeightLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input for a weight measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWeightLog {
    /// Weight (kg)
    pub weight_kg: f64,
    /// Optional note
    pub notes: Option<String>,
    /// Measurement time, defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

/// Weight log operations
#[derive(Clone)]
pub struct WeightService {
    store: Arc<dyn RecordStore>,
    planner: PlannerService,
}

impl WeightService {
    /// Create a weight service
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            planner: PlannerService::new(store.clone()),
            store,
        }
    }

    /// Record a measurement and update the profile's current weight
    ///
    /// Stored targets are recomputed for the new weight with the same adjustment.
    /// The profile is refreshed first, so a failed refresh stores no log.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the weight is finite and positive, or if
    /// the stored profile metrics are out of domain
    #[instrument(skip(self, entry), fields(user_id = %user_id))]
    pub async fn log_weight(
        &self,
        user_id: &UserId,
        entry: NewWeightLog,
    ) -> AppResult<WeightLog> {
        let weight_kg = require_positive("weight_kg", entry.weight_kg)?;
        let log = WeightLog {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            weight_kg,
            notes: entry.notes.filter(|n| !n.trim().is_empty()),
            logged_at: entry.logged_at.unwrap_or_else(Utc::now),
        };

        self.planner.record_weight(user_id, weight_kg).await?;
        self.store.create_weight_log(&log).await?;

        info!(weight_kg, "Weight logged");
        Ok(log)
    }

    /// Measurements, newest first; `limit` defaults to 30
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn history(
        &self,
        user_id: &UserId,
        limit: Option<u32>,
    ) -> AppResult<Vec<WeightLog>> {
        self.store
            .list_weight_logs(user_id, limit.unwrap_or(DEFAULT_WEIGHT_LOG_LIMIT))
            .await
    }
}
