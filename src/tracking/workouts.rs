// ABOUTME: Per-exercise strength progress aggregated by calendar day
// ABOUTME: Max weight, total volume and total reps from workout session history
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::models::{WorkoutSession, WorkoutSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day's work on an exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDay {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Heaviest set (kg)
    pub max_weight_kg: f64,
    /// Σ weight × reps
    pub total_volume: f64,
    /// Σ reps
    pub total_reps: u64,
    /// Sets in the order performed
    pub sets: Vec<WorkoutSet>,
}

/// Progress history for one exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseProgress {
    /// Exercise name as requested
    pub exercise_name: String,
    /// Days ascending
    pub progress: Vec<ExerciseDay>,
    /// Number of distinct days
    pub total_sessions: usize,
}

/// Group every set of `exercise_name` across `sessions` by day
///
/// Exercise names match case-insensitively after trimming.
#[must_use]
pub fn compute_exercise_progress(
    exercise_name: &str,
    sessions: &[WorkoutSession],
) -> ExerciseProgress {
    let wanted = exercise_name.trim().to_lowercase();
    let mut ordered: Vec<&WorkoutSession> = sessions.iter().collect();
    ordered.sort_by_key(|session| session.created_at);

    let mut days: BTreeMap<NaiveDate, ExerciseDay> = BTreeMap::new();
    for session in ordered {
        let date = session.created_at.date_naive();
        for exercise in session
            .exercises
            .iter()
            .filter(|exercise| exercise.name.trim().to_lowercase() == wanted)
        {
            let day = days.entry(date).or_insert_with(|| ExerciseDay {
                date,
                max_weight_kg: 0.0,
                total_volume: 0.0,
                total_reps: 0,
                sets: Vec::new(),
            });
            for set in &exercise.sets {
                day.max_weight_kg = day.max_weight_kg.max(set.weight_kg);
                day.total_volume += set.volume();
                day.total_reps += u64::from(set.reps);
                day.sets.push(*set);
            }
        }
    }

    let progress: Vec<ExerciseDay> = days.into_values().collect();
    ExerciseProgress {
        exercise_name: exercise_name.trim().to_owned(),
        total_sessions: progress.len(),
        progress,
    }
}
