// ABOUTME: Daily intake totals compared against stored nutrition targets
// ABOUTME: Capped completion percentages, remaining amounts and status bands per macro
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::constants::daily_progress::{ON_TARGET_PERCENT, PARTWAY_PERCENT};
use crate::models::{Meal, NutritionFacts, NutritionTargets};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How close a day's intake is to its target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStatus {
    /// At least 90% of target
    OnTarget,
    /// At least 50% of target
    Partway,
    /// Below 50% of target
    Low,
}

impl IntakeStatus {
    /// Band for a completion percentage
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= ON_TARGET_PERCENT {
            Self::OnTarget
        } else if percentage >= PARTWAY_PERCENT {
            Self::Partway
        } else {
            Self::Low
        }
    }
}

/// Consumption of one quantity against its target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IntakeProgress {
    /// Amount consumed
    pub consumed: f64,
    /// Daily target
    pub target: f64,
    /// `min(consumed / target × 100, 100)`, 0 when there is no target
    pub percentage: f64,
    /// `max(target - consumed, 0)`
    pub remaining: f64,
    /// Band of `percentage`
    pub status: IntakeStatus,
}

impl IntakeProgress {
    /// Compare consumption with a target
    #[must_use]
    pub fn new(consumed: f64, target: f64) -> Self {
        let percentage = if target > 0.0 {
            (consumed / target * 100.0).min(100.0)
        } else {
            0.0
        };
        Self {
            consumed,
            target,
            percentage,
            remaining: (target - consumed).max(0.0),
            status: IntakeStatus::from_percentage(percentage),
        }
    }
}

/// A day's intake against targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyStats {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Number of meals counted
    pub meal_count: usize,
    /// Summed nutrition values
    pub totals: NutritionFacts,
    /// Calories
    pub calories: IntakeProgress,
    /// Protein
    pub protein: IntakeProgress,
    /// Carbohydrates
    pub carbs: IntakeProgress,
    /// Fat
    pub fat: IntakeProgress,
}

impl DailyStats {
    /// How many of protein, carbs and fat are on target
    #[must_use]
    pub fn macros_on_target(&self) -> usize {
        [self.protein, self.carbs, self.fat]
            .iter()
            .filter(|progress| progress.status == IntakeStatus::OnTarget)
            .count()
    }
}

/// Sum the nutrition values of a set of meals
#[must_use]
pub fn sum_meals(meals: &[Meal]) -> NutritionFacts {
    meals.iter().fold(NutritionFacts::default(), |acc, meal| {
        NutritionFacts::new(
            acc.calories + meal.facts.calories,
            acc.protein_g + meal.facts.protein_g,
            acc.carbs_g + meal.facts.carbs_g,
            acc.fat_g + meal.facts.fat_g,
        )
    })
}

/// Aggregate the meals of `date` against `targets`
///
/// Meals outside the day are ignored. Missing targets count as zero, which yields
/// zero percentages.
#[must_use]
pub fn compute_daily_stats(
    date: NaiveDate,
    meals: &[Meal],
    targets: Option<&NutritionTargets>,
) -> DailyStats {
    let todays: Vec<Meal> = meals
        .iter()
        .filter(|meal| meal.logged_at.date_naive() == date)
        .cloned()
        .collect();
    let totals = sum_meals(&todays);

    let (calorie_target, protein_target, carbs_target, fat_target) =
        targets.map_or((0.0, 0.0, 0.0, 0.0), |t| {
            (
                f64::from(t.calories),
                f64::from(t.protein_g),
                f64::from(t.carbs_g),
                f64::from(t.fat_g),
            )
        });

    DailyStats {
        date,
        meal_count: todays.len(),
        totals,
        calories: IntakeProgress::new(totals.calories, calorie_target),
        protein: IntakeProgress::new(totals.protein_g, protein_target),
        carbs: IntakeProgress::new(totals.carbs_g, carbs_target),
        fat: IntakeProgress::new(totals.fat_g, fat_target),
    }
}
