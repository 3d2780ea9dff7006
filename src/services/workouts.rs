// ABOUTME: Workout session logging, editing and per-exercise progress
// ABOUTME: Set edits and deletes are restricted to the session's owner
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::ensure_owner;
use crate::constants::limits::DEFAULT_WORKOUT_LIMIT;
use crate::database::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NewWorkout, UserId, WorkoutSession, WorkoutSet};
use crate::tracking::{compute_exercise_progress, ExerciseProgress};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Replacement values for one set of a stored session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetUpdate {
    /// Index into the session's exercises
    pub exercise_index: usize,
    /// Index into that exercise's sets
    pub set_index: usize,
    /// New load (kg)
    pub weight_kg: f64,
    /// New repetitions
    pub reps: u32,
    /// Session note; `None` leaves it unchanged
    pub notes: Option<String>,
}

/// Workout operations
#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn RecordStore>,
}

impl WorkoutService {
    /// Create a workout service
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Record a session
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name, exercises or any set is invalid
    #[instrument(skip(self, workout), fields(user_id = %user_id))]
    pub async fn create_workout(
        &self,
        user_id: &UserId,
        workout: NewWorkout,
    ) -> AppResult<WorkoutSession> {
        workout.validate()?;
        let session = workout.into_session(user_id.clone());
        self.store.create_workout(&session).await?;
        info!(
            workout_id = %session.id,
            exercises = session.exercises.len(),
            "Workout logged"
        );
        Ok(session)
    }

    /// Sessions, newest first, optionally with an exact name; `limit` defaults to 50
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list_workouts(
        &self,
        user_id: &UserId,
        workout_name: Option<&str>,
        limit: Option<u32>,
    ) -> AppResult<Vec<WorkoutSession>> {
        let workout_name = workout_name.map(str::trim).filter(|n| !n.is_empty());
        self.store
            .list_workouts(user_id, workout_name, limit.unwrap_or(DEFAULT_WORKOUT_LIMIT))
            .await
    }

    /// Replace the weight and reps of one set
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive weight or reps, `ResourceNotFound`
    /// (404) for an unknown session or set, or `PermissionDenied` (403) for another
    /// user's session
    #[instrument(skip(self, update), fields(user_id = %user_id))]
    pub async fn update_set(
        &self,
        user_id: &UserId,
        workout_id: &str,
        update: SetUpdate,
    ) -> AppResult<WorkoutSession> {
        let replacement = WorkoutSet {
            weight_kg: update.weight_kg,
            reps: update.reps,
            rest_seconds: None,
        };
        if replacement.validate().is_err() {
            return Err(AppError::invalid_input("Valid weight and reps are required"));
        }

        let mut session = self.owned_workout(user_id, workout_id, "edit").await?;
        let set = session
            .exercises
            .get_mut(update.exercise_index)
            .and_then(|exercise| exercise.sets.get_mut(update.set_index))
            .ok_or_else(|| {
                AppError::not_found("Set").with_resource_id(format!(
                    "{workout_id}/{}/{}",
                    update.exercise_index, update.set_index
                ))
            })?;
        set.weight_kg = replacement.weight_kg;
        set.reps = replacement.reps;

        if let Some(notes) = update.notes {
            session.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        session.updated_at = Utc::now();
        self.store.update_workout(&session).await?;
        Ok(session)
    }

    /// Delete a session
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` (404) for an unknown id or `PermissionDenied` (403)
    /// for another user's session
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_workout(&self, user_id: &UserId, workout_id: &str) -> AppResult<()> {
        self.owned_workout(user_id, workout_id, "delete").await?;
        if !self.store.delete_workout(workout_id).await? {
            return Err(AppError::not_found("Workout").with_resource_id(workout_id));
        }
        info!(workout_id, "Workout deleted");
        Ok(())
    }

    /// Day-by-day history of one exercise across every session
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty exercise name, or a store error
    pub async fn exercise_progress(
        &self,
        user_id: &UserId,
        exercise_name: &str,
    ) -> AppResult<ExerciseProgress> {
        if exercise_name.trim().is_empty() {
            return Err(AppError::missing_field("exercise_name"));
        }
        let sessions = self.store.list_workouts(user_id, None, u32::MAX).await?;
        Ok(compute_exercise_progress(exercise_name, &sessions))
    }

    async fn owned_workout(
        &self,
        user_id: &UserId,
        workout_id: &str,
        action: &str,
    ) -> AppResult<WorkoutSession> {
        let session = self
            .store
            .get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout").with_resource_id(workout_id))?;
        ensure_owner(&session.user_id, user_id, action, "workout")?;
        Ok(session)
    }
}
