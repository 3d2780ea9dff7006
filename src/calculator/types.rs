// ABOUTME: Value types and immutable lookup tables for the nutrition and progress calculator
// ABOUTME: Body metrics, activity levels, fitness goals, adjustment presets and plan outputs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Reject NaN/infinite values and anything not strictly positive
pub(crate) fn require_positive(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::invalid_input(format!(
            "{field} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(AppError::value_out_of_range(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    Ok(value)
}

/// Reject NaN/infinite values
pub(crate) fn require_finite(field: &str, value: f64) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::invalid_input(format!(
            "{field} must be a finite number"
        )))
    }
}

/// Biological sex used to pick the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    /// Male constant (+5)
    Male,
    /// Female constant (-161)
    Female,
    /// No dedicated formula; uses the female constant
    Other,
}

impl BiologicalSex {
    /// Storage/wire key
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for BiologicalSex {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(AppError::invalid_input(format!(
                "Unknown biological sex '{other}' (expected male, female or other)"
            ))),
        }
    }
}

/// Static description of an activity level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityLevelInfo {
    /// The level this row describes
    pub level: ActivityLevel,
    /// Storage/wire key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// TDEE multiplier applied to BMR
    pub multiplier: f64,
}

/// Activity multipliers, ordered from least to most active
pub static ACTIVITY_LEVELS: [ActivityLevelInfo; 5] = [
    ActivityLevelInfo {
        level: ActivityLevel::Sedentary,
        key: "sedentary",
        label: "Sedentary (little/no exercise)",
        multiplier: 1.2,
    },
    ActivityLevelInfo {
        level: ActivityLevel::LightlyActive,
        key: "lightly_active",
        label: "Lightly active (light exercise 1-3 days/week)",
        multiplier: 1.375,
    },
    ActivityLevelInfo {
        level: ActivityLevel::ModeratelyActive,
        key: "moderately_active",
        label: "Moderately active (moderate exercise 3-5 days/week)",
        multiplier: 1.55,
    },
    ActivityLevelInfo {
        level: ActivityLevel::VeryActive,
        key: "very_active",
        label: "Very active (hard exercise 6-7 days/week)",
        multiplier: 1.725,
    },
    ActivityLevelInfo {
        level: ActivityLevel::ExtremelyActive,
        key: "extremely_active",
        label: "Extremely active (very hard exercise, physical job)",
        multiplier: 1.9,
    },
];

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or physical job
    ExtremelyActive,
}

impl ActivityLevel {
    /// All levels, least to most active
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtremelyActive,
    ];

    /// Lookup table row for this level
    #[must_use]
    pub fn info(self) -> &'static ActivityLevelInfo {
        &ACTIVITY_LEVELS[self as usize]
    }

    /// TDEE multiplier
    #[must_use]
    pub fn multiplier(self) -> f64 {
        self.info().multiplier
    }

    /// Storage/wire key
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.info().key
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Resolve a stored activity key, falling back to sedentary
    ///
    /// This is the one lenient path in the calculator: a missing or unrecognised
    /// activity level is treated as sedentary (1.2) instead of failing. Use
    /// [`str::parse`] when an unknown key must be rejected.
    #[must_use]
    pub fn resolve(key: Option<&str>) -> Self {
        match key {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    activity_level = raw,
                    "Unknown activity level, using sedentary multiplier"
                );
                Self::Sedentary
            }),
            None => {
                warn!("Missing activity level, using sedentary multiplier");
                Self::Sedentary
            }
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        ACTIVITY_LEVELS
            .iter()
            .find(|info| info.key == key)
            .map(|info| info.level)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown activity level '{key}'")))
    }
}

/// Static description of a fitness goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessGoalInfo {
    /// The goal this row describes
    pub goal: FitnessGoal,
    /// Storage/wire key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Fixed daily calorie delta applied to TDEE
    pub calorie_delta: i32,
}

/// Fixed calorie policy per goal
pub static FITNESS_GOALS: [FitnessGoalInfo; 4] = [
    FitnessGoalInfo {
        goal: FitnessGoal::Lose,
        key: "lose",
        label: "Lose weight",
        calorie_delta: -500,
    },
    FitnessGoalInfo {
        goal: FitnessGoal::Maintain,
        key: "maintain",
        label: "Maintain weight",
        calorie_delta: 0,
    },
    FitnessGoalInfo {
        goal: FitnessGoal::Gain,
        key: "gain",
        label: "Gain weight",
        calorie_delta: 300,
    },
    FitnessGoalInfo {
        goal: FitnessGoal::Recomposition,
        key: "recomposition",
        label: "Body recomposition",
        calorie_delta: -200,
    },
];

/// Fitness goal selecting the base calorie delta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// Caloric deficit
    Lose,
    /// Caloric balance
    Maintain,
    /// Caloric surplus
    Gain,
    /// Small deficit while building muscle
    Recomposition,
}

impl FitnessGoal {
    /// Lookup table row for this goal
    #[must_use]
    pub fn info(self) -> &'static FitnessGoalInfo {
        &FITNESS_GOALS[self as usize]
    }

    /// Daily calorie delta relative to TDEE
    #[must_use]
    pub fn calorie_delta(self) -> i32 {
        self.info().calorie_delta
    }

    /// Storage/wire key
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.info().key
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }
}

impl FromStr for FitnessGoal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        FITNESS_GOALS
            .iter()
            .find(|info| info.key == key)
            .map(|info| info.goal)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown fitness goal '{key}'")))
    }
}

/// Static description of a calorie adjustment preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieAdjustmentInfo {
    /// The preset this row describes
    pub adjustment: CalorieAdjustment,
    /// Storage/wire key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Daily kcal delta applied on top of the base plan
    pub kcal: i32,
}

/// The seven adjustment presets
pub static CALORIE_ADJUSTMENTS: [CalorieAdjustmentInfo; 7] = [
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::None,
        key: "none",
        label: "No adjustment",
        kcal: 0,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Deficit200,
        key: "deficit_200",
        label: "-200 kcal/day",
        kcal: -200,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Deficit400,
        key: "deficit_400",
        label: "-400 kcal/day",
        kcal: -400,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Deficit600,
        key: "deficit_600",
        label: "-600 kcal/day",
        kcal: -600,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Surplus200,
        key: "surplus_200",
        label: "+200 kcal/day",
        kcal: 200,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Surplus400,
        key: "surplus_400",
        label: "+400 kcal/day",
        kcal: 400,
    },
    CalorieAdjustmentInfo {
        adjustment: CalorieAdjustment::Surplus600,
        key: "surplus_600",
        label: "+600 kcal/day",
        kcal: 600,
    },
];

/// Temporary calorie shift layered on top of the base plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CalorieAdjustment {
    /// Base plan as-is
    #[default]
    #[serde(rename = "none")]
    None,
    /// -200 kcal/day
    #[serde(rename = "deficit_200")]
    Deficit200,
    /// -400 kcal/day
    #[serde(rename = "deficit_400")]
    Deficit400,
    /// -600 kcal/day
    #[serde(rename = "deficit_600")]
    Deficit600,
    /// +200 kcal/day
    #[serde(rename = "surplus_200")]
    Surplus200,
    /// +400 kcal/day
    #[serde(rename = "surplus_400")]
    Surplus400,
    /// +600 kcal/day
    #[serde(rename = "surplus_600")]
    Surplus600,
}

impl CalorieAdjustment {
    /// Lookup table row for this preset
    #[must_use]
    pub fn info(self) -> &'static CalorieAdjustmentInfo {
        &CALORIE_ADJUSTMENTS[self as usize]
    }

    /// Daily kcal delta
    #[must_use]
    pub fn kcal(self) -> i32 {
        self.info().kcal
    }

    /// Storage/wire key
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.info().key
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }
}

impl FromStr for CalorieAdjustment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        CALORIE_ADJUSTMENTS
            .iter()
            .find(|info| info.key == key)
            .map(|info| info.adjustment)
            .ok_or_else(|| {
                AppError::invalid_input(format!("Unknown calorie adjustment '{key}'"))
            })
    }
}

/// Body metrics required for BMR
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BodyMetrics {
    /// Current body weight (kg)
    pub weight_kg: f64,
    /// Height (cm)
    pub height_cm: f64,
    /// Age in whole years
    pub age_years: u32,
    /// Biological sex
    pub biological_sex: BiologicalSex,
}

impl BodyMetrics {
    /// Build validated body metrics
    ///
    /// # Errors
    ///
    /// Returns a validation error if weight or height is not a finite positive
    /// number, or age is zero
    pub fn new(
        weight_kg: f64,
        height_cm: f64,
        age_years: u32,
        biological_sex: BiologicalSex,
    ) -> AppResult<Self> {
        let metrics = Self {
            weight_kg,
            height_cm,
            age_years,
            biological_sex,
        };
        metrics.validate()?;
        Ok(metrics)
    }

    /// Check the metric domain
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first invalid field
    pub fn validate(&self) -> AppResult<()> {
        require_positive("weight_kg", self.weight_kg)?;
        require_positive("height_cm", self.height_cm)?;
        if self.age_years == 0 {
            return Err(AppError::value_out_of_range(
                "age_years must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Grams and share of calories for one macronutrient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTarget {
    /// Daily grams
    pub grams: u32,
    /// Whole percentage of plan calories
    pub percentage: u32,
}

/// Protein/carbs/fat split of a plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroBreakdown {
    /// Protein target
    pub protein: MacroTarget,
    /// Carbohydrate target
    pub carbs: MacroTarget,
    /// Fat target
    pub fat: MacroTarget,
}

impl MacroBreakdown {
    /// Energy represented by the gram targets (kcal)
    #[must_use]
    pub fn total_kcal(&self) -> f64 {
        use crate::constants::nutrition::{CARBS_KCAL_PER_G, FAT_KCAL_PER_G, PROTEIN_KCAL_PER_G};

        f64::from(self.fat.grams).mul_add(
            FAT_KCAL_PER_G,
            f64::from(self.protein.grams)
                .mul_add(PROTEIN_KCAL_PER_G, f64::from(self.carbs.grams) * CARBS_KCAL_PER_G),
        )
    }

    /// Sum of the three percentages
    #[must_use]
    pub const fn percentage_sum(&self) -> u32 {
        self.protein.percentage + self.carbs.percentage + self.fat.percentage
    }
}

/// Primary calorie and macro target derived from body metrics, activity and goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasePlan {
    /// TDEE rounded to whole kcal
    pub maintenance_calories: u32,
    /// TDEE plus the goal's fixed delta, rounded
    pub goal_calories: u32,
    /// Goal used
    pub goal: FitnessGoal,
    /// Goal display label
    pub goal_name: String,
    /// Macro split of `goal_calories`
    pub macros: MacroBreakdown,
}

/// Base plan shifted by a fixed calorie delta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustedPlan {
    /// Base goal calories plus the delta
    pub adjusted_calories: u32,
    /// Delta applied (kcal/day)
    pub adjustment_kcal: i32,
    /// Signed expected weekly weight change (kg, negative = loss)
    pub expected_weekly_change_kg: f64,
    /// Human-readable weekly change
    pub expected_weekly_change: String,
    /// Macro split of `adjusted_calories`
    pub macros: MacroBreakdown,
}

/// Estimated time to close the weight gap at the healthy rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum TimeToGoal {
    /// Whole weeks (up to one year)
    Weeks(u32),
    /// Whole years, rounded up
    Years(u32),
}

impl fmt::Display for TimeToGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Weeks(1) => write!(f, "1 week"),
            Self::Weeks(weeks) => write!(f, "{weeks} weeks"),
            Self::Years(1) => write!(f, "1 year"),
            Self::Years(years) => write!(f, "{years} years"),
        }
    }
}

/// Distance-to-goal summary for body weight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightProgress {
    /// Current weight (kg)
    pub current_weight_kg: f64,
    /// Target weight (kg)
    pub target_weight_kg: f64,
    /// Target minus current (negative = needs to lose)
    pub weight_difference: f64,
    /// Proximity score in [0, 100]
    pub progress_percentage: f64,
    /// Within the on-track distance threshold
    pub is_on_track: bool,
    /// Weeks needed at the healthy rate
    pub weeks_to_goal: u32,
    /// Display form of `weeks_to_goal`
    pub time_to_goal: TimeToGoal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tables_are_indexed_by_variant() {
        for info in &ACTIVITY_LEVELS {
            assert_eq!(info.level.info(), info);
        }
        for info in &FITNESS_GOALS {
            assert_eq!(info.goal.info(), info);
        }
        for info in &CALORIE_ADJUSTMENTS {
            assert_eq!(info.adjustment.info(), info);
        }
    }

    #[test]
    fn test_keys_round_trip_through_from_str() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.as_str().parse::<ActivityLevel>().unwrap(), level);
        }
        assert_eq!("deficit_400".parse::<CalorieAdjustment>().unwrap().kcal(), -400);
        assert_eq!("recomposition".parse::<FitnessGoal>().unwrap().calorie_delta(), -200);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!("couch_potato".parse::<ActivityLevel>().unwrap_err().is_validation());
        assert!("bulk".parse::<FitnessGoal>().is_err());
        assert!("deficit_300".parse::<CalorieAdjustment>().is_err());
        assert!("unknown".parse::<BiologicalSex>().is_err());
    }

    #[test]
    fn test_resolve_activity_defaults_to_sedentary() {
        assert_eq!(ActivityLevel::resolve(None), ActivityLevel::Sedentary);
        assert_eq!(
            ActivityLevel::resolve(Some("couch_potato")),
            ActivityLevel::Sedentary
        );
        assert_eq!(
            ActivityLevel::resolve(Some("very_active")),
            ActivityLevel::VeryActive
        );
    }

    #[test]
    fn test_adjustment_serde_keys() {
        let json = serde_json::to_string(&CalorieAdjustment::Surplus600).unwrap();
        assert_eq!(json, "\"surplus_600\"");
        let parsed: CalorieAdjustment = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, CalorieAdjustment::None);
    }

    #[test]
    fn test_body_metrics_validation() {
        assert!(BodyMetrics::new(70.0, 175.0, 30, BiologicalSex::Male).is_ok());
        assert!(BodyMetrics::new(0.0, 175.0, 30, BiologicalSex::Male).is_err());
        assert!(BodyMetrics::new(70.0, -1.0, 30, BiologicalSex::Male).is_err());
        assert!(BodyMetrics::new(70.0, 175.0, 0, BiologicalSex::Male).is_err());
        let nan = BodyMetrics::new(f64::NAN, 175.0, 30, BiologicalSex::Female).unwrap_err();
        assert_eq!(nan.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_time_to_goal_display() {
        assert_eq!(TimeToGoal::Weeks(0).to_string(), "0 weeks");
        assert_eq!(TimeToGoal::Weeks(1).to_string(), "1 week");
        assert_eq!(TimeToGoal::Weeks(20).to_string(), "20 weeks");
        assert_eq!(TimeToGoal::Years(1).to_string(), "1 year");
        assert_eq!(TimeToGoal::Years(3).to_string(), "3 years");
    }
}
