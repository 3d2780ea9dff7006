// ABOUTME: Distance-to-goal summary for body weight
// ABOUTME: Proximity score, on-track flag and time-to-goal at a healthy 0.5 kg/week rate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::types::{require_positive, TimeToGoal, WeightProgress};
use crate::constants::weight_progress::{
    HEALTHY_RATE_KG_PER_WEEK, MAX_WEEKS_DISPLAYED, ON_TRACK_THRESHOLD_KG,
    PROXIMITY_NORMALIZATION_KG, WEEKS_PER_YEAR,
};
use crate::errors::AppResult;

/// Express a week count as weeks up to one year, otherwise whole years rounded up
#[must_use]
pub fn time_to_goal(weeks: u32) -> TimeToGoal {
    if weeks <= MAX_WEEKS_DISPLAYED {
        TimeToGoal::Weeks(weeks)
    } else {
        TimeToGoal::Years(weeks.div_ceil(WEEKS_PER_YEAR))
    }
}

/// Summarise how far current weight is from target weight
///
/// - `weight_difference = target - current` (negative means weight to lose)
/// - `progress_percentage = max(0, 1 - |diff| / 10) × 100`, a proximity score that
///   is 100 at the goal and 0 from 10 kg away
/// - `is_on_track = |diff| <= 20`
/// - `weeks_to_goal = ceil(|diff| / 0.5)`
///
/// # Errors
///
/// Returns a validation error if either weight is not a finite positive number
pub fn compute_weight_progress(
    current_weight_kg: f64,
    target_weight_kg: f64,
) -> AppResult<WeightProgress> {
    require_positive("current_weight_kg", current_weight_kg)?;
    require_positive("target_weight_kg", target_weight_kg)?;

    let weight_difference = target_weight_kg - current_weight_kg;
    let distance = weight_difference.abs();

    let progress_percentage = (1.0 - distance / PROXIMITY_NORMALIZATION_KG).max(0.0) * 100.0;
    let is_on_track = distance <= ON_TRACK_THRESHOLD_KG;
    let weeks_to_goal = (distance / HEALTHY_RATE_KG_PER_WEEK).ceil() as u32;

    Ok(WeightProgress {
        current_weight_kg,
        target_weight_kg,
        weight_difference,
        progress_percentage,
        is_on_track,
        weeks_to_goal,
        time_to_goal: time_to_goal(weeks_to_goal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_kg_to_lose() {
        let progress = compute_weight_progress(80.0, 70.0).unwrap();
        assert!((progress.weight_difference + 10.0).abs() < f64::EPSILON);
        assert!(progress.progress_percentage.abs() < f64::EPSILON);
        assert!(progress.is_on_track);
        assert_eq!(progress.weeks_to_goal, 20);
        assert_eq!(progress.time_to_goal.to_string(), "20 weeks");
    }

    #[test]
    fn test_at_goal() {
        let progress = compute_weight_progress(70.0, 70.0).unwrap();
        assert!((progress.progress_percentage - 100.0).abs() < f64::EPSILON);
        assert_eq!(progress.weeks_to_goal, 0);
        assert_eq!(progress.time_to_goal, TimeToGoal::Weeks(0));
    }

    #[test]
    fn test_partial_proximity_for_gain() {
        let progress = compute_weight_progress(60.0, 63.0).unwrap();
        assert!((progress.weight_difference - 3.0).abs() < 1e-9);
        assert!((progress.progress_percentage - 70.0).abs() < 1e-9);
        assert_eq!(progress.weeks_to_goal, 6);
    }

    #[test]
    fn test_far_from_goal_switches_to_years() {
        let progress = compute_weight_progress(130.0, 70.0).unwrap();
        assert!(!progress.is_on_track);
        assert_eq!(progress.weeks_to_goal, 120);
        assert_eq!(progress.time_to_goal, TimeToGoal::Years(3));
        assert_eq!(progress.time_to_goal.to_string(), "3 years");
    }

    #[test]
    fn test_on_track_boundary() {
        assert!(compute_weight_progress(90.0, 70.0).unwrap().is_on_track);
        assert!(!compute_weight_progress(90.5, 70.0).unwrap().is_on_track);
    }

    #[test]
    fn test_time_to_goal_thresholds() {
        assert_eq!(time_to_goal(52), TimeToGoal::Weeks(52));
        assert_eq!(time_to_goal(53), TimeToGoal::Years(2));
        assert_eq!(time_to_goal(104), TimeToGoal::Years(2));
        assert_eq!(time_to_goal(105), TimeToGoal::Years(3));
    }

    #[test]
    fn test_rejects_invalid_weights() {
        assert!(compute_weight_progress(0.0, 70.0).is_err());
        assert!(compute_weight_progress(80.0, f64::NAN).is_err());
    }
}
