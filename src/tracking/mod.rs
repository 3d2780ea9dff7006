// ABOUTME: Pure aggregations over logged records (daily intake, exercise progress)
// ABOUTME: No I/O; services fetch records and hand them to these functions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Daily intake against targets
pub mod daily;
/// Exercise progress by day
pub mod workouts;

pub use daily::{compute_daily_stats, sum_meals, DailyStats, IntakeProgress, IntakeStatus};
pub use workouts::{compute_exercise_progress, ExerciseDay, ExerciseProgress};
