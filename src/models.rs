// ABOUTME: Record types for user profiles, meals, weight logs and workout sessions
// ABOUTME: Input structs carry their own validation so services stay thin
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Data Models
//!
//! Records persisted by the [`RecordStore`](crate::database::RecordStore). Every
//! record carries the owning `user_id`; ids are UUID v4 strings and timestamps are
//! UTC.

use crate::calculator::{BiologicalSex, BodyMetrics, CalorieAdjustment, FitnessGoal, MacroBreakdown};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque user identifier issued by the session verifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn require_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::invalid_input(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::value_out_of_range(format!(
            "{field} cannot be negative, got {value}"
        )));
    }
    Ok(())
}

fn require_name(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::missing_field(field))
    } else {
        Ok(())
    }
}

/// Stored daily nutrition targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionTargets {
    /// Calories (kcal)
    pub calories: u32,
    /// Protein (g)
    pub protein_g: u32,
    /// Carbohydrates (g)
    pub carbs_g: u32,
    /// Fat (g)
    pub fat_g: u32,
}

impl NutritionTargets {
    /// Targets from a plan's calories and macro grams
    #[must_use]
    pub const fn from_plan(calories: u32, macros: &MacroBreakdown) -> Self {
        Self {
            calories,
            protein_g: macros.protein.grams,
            carbs_g: macros.carbs.grams,
            fat_g: macros.fat.grams,
        }
    }
}

/// User profile with body metrics, goal and stored targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Owning user
    pub user_id: UserId,
    /// Display name
    pub name: Option<String>,
    /// Age (years)
    pub age: Option<u32>,
    /// Biological sex
    pub gender: Option<BiologicalSex>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Latest known weight (kg)
    pub current_weight_kg: Option<f64>,
    /// Desired weight (kg)
    pub target_weight_kg: Option<f64>,
    /// Raw activity key; unknown values resolve to sedentary at calculation time
    pub activity_level: Option<String>,
    /// Fitness goal
    pub fitness_goal: Option<FitnessGoal>,
    /// Targets in effect, absent until the profile is complete
    pub targets: Option<NutritionTargets>,
    /// Adjustment behind the stored targets
    pub current_adjustment: CalorieAdjustment,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Empty profile for a new user
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            name: None,
            age: None,
            gender: None,
            height_cm: None,
            current_weight_kg: None,
            target_weight_kg: None,
            activity_level: None,
            fitness_goal: None,
            targets: None,
            current_adjustment: CalorieAdjustment::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Body metrics, when weight, height, age and sex are all present
    ///
    /// # Errors
    ///
    /// Returns a validation error if the stored values are present but invalid
    pub fn body_metrics(&self) -> AppResult<Option<BodyMetrics>> {
        match (self.current_weight_kg, self.height_cm, self.age, self.gender) {
            (Some(weight), Some(height), Some(age), Some(sex)) => {
                BodyMetrics::new(weight, height, age, sex).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns a validation error if a provided numeric field is out of domain
    pub fn apply(&mut self, update: ProfileUpdate) -> AppResult<()> {
        update.validate()?;
        let ProfileUpdate {
            name,
            age,
            gender,
            height_cm,
            current_weight_kg,
            target_weight_kg,
            activity_level,
            fitness_goal,
        } = update;

        if name.is_some() {
            self.name = name;
        }
        if age.is_some() {
            self.age = age;
        }
        if gender.is_some() {
            self.gender = gender;
        }
        if height_cm.is_some() {
            self.height_cm = height_cm;
        }
        if current_weight_kg.is_some() {
            self.current_weight_kg = current_weight_kg;
        }
        if target_weight_kg.is_some() {
            self.target_weight_kg = target_weight_kg;
        }
        if activity_level.is_some() {
            self.activity_level = activity_level;
        }
        if fitness_goal.is_some() {
            self.fitness_goal = fitness_goal;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Display name
    pub name: Option<String>,
    /// Age (years)
    pub age: Option<u32>,
    /// Biological sex
    pub gender: Option<BiologicalSex>,
    /// Height (cm)
    pub height_cm: Option<f64>,
    /// Current weight (kg)
    pub current_weight_kg: Option<f64>,
    /// Target weight (kg)
    pub target_weight_kg: Option<f64>,
    /// Activity key
    pub activity_level: Option<String>,
    /// Fitness goal
    pub fitness_goal: Option<FitnessGoal>,
}

impl ProfileUpdate {
    fn validate(&self) -> AppResult<()> {
        if self.age == Some(0) {
            return Err(AppError::value_out_of_range("age must be greater than zero"));
        }
        for (field, value) in [
            ("height_cm", self.height_cm),
            ("current_weight_kg", self.current_weight_kg),
            ("target_weight_kg", self.target_weight_kg),
        ] {
            if let Some(value) = value {
                crate::calculator::types::require_positive(field, value)?;
            }
        }
        Ok(())
    }
}

/// Meal slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Dinner
    Dinner,
    /// Snack
    Snack,
    /// Anything else
    #[default]
    Other,
}

impl MealType {
    /// Storage key
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Other => "other",
        }
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            "other" => Ok(Self::Other),
            other => Err(AppError::invalid_input(format!("Unknown meal type '{other}'"))),
        }
    }
}

/// Where a meal's nutrition values came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NutritionSource {
    /// Entered by the user
    Manual,
    /// USDA `FoodData` Central
    Usda,
    /// Open Food Facts barcode lookup
    OpenFoodFacts,
    /// Built-in common food catalog
    CommonFoods,
    /// Language model estimate
    LanguageModel,
    /// Fixed estimate used when every provider failed
    Fallback,
}

impl NutritionSource {
    /// Storage key
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Usda => "usda",
            Self::OpenFoodFacts => "open_food_facts",
            Self::CommonFoods => "common_foods",
            Self::LanguageModel => "language_model",
            Self::Fallback => "fallback",
        }
    }
}

impl FromStr for NutritionSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "usda" => Ok(Self::Usda),
            "open_food_facts" => Ok(Self::OpenFoodFacts),
            "common_foods" => Ok(Self::CommonFoods),
            "language_model" => Ok(Self::LanguageModel),
            "fallback" => Ok(Self::Fallback),
            other => Err(AppError::invalid_input(format!(
                "Unknown nutrition source '{other}'"
            ))),
        }
    }
}

/// Energy and macronutrients of one portion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct NutritionFacts {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

impl NutritionFacts {
    /// Build facts from the four values
    #[must_use]
    pub const fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Every value finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first bad value
    pub fn validate(&self) -> AppResult<()> {
        require_non_negative("calories", self.calories)?;
        require_non_negative("protein", self.protein_g)?;
        require_non_negative("carbs", self.carbs_g)?;
        require_non_negative("fat", self.fat_g)
    }

    /// Each value rounded to a whole number
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein_g: self.protein_g.round(),
            carbs_g: self.carbs_g.round(),
            fat_g: self.fat_g.round(),
        }
    }
}

/// Nutrition facts resolved by a provider, tagged with their source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResolvedNutrition {
    /// Values
    pub facts: NutritionFacts,
    /// Provider that produced them
    pub source: NutritionSource,
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    /// Record id
    pub id: String,
    /// Owning user
    pub user_id: UserId,
    /// Food name
    pub food_name: String,
    /// Nutrition values
    pub facts: NutritionFacts,
    /// Free-text serving size
    pub serving_size: Option<String>,
    /// Meal slot
    pub meal_type: MealType,
    /// Where the values came from
    pub source: NutritionSource,
    /// When the meal was eaten
    pub logged_at: DateTime<Utc>,
}

/// Input for a new meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeal {
    /// Food name
    pub food_name: String,
    /// Nutrition values
    pub facts: NutritionFacts,
    /// Free-text serving size
    pub serving_size: Option<String>,
    /// Meal slot
    #[serde(default)]
    pub meal_type: MealType,
    /// When the meal was eaten, defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

impl NewMeal {
    /// Check name and nutrition values
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or invalid values
    pub fn validate(&self) -> AppResult<()> {
        require_name("food_name", &self.food_name)?;
        self.facts.validate()
    }

    /// Materialise the record
    #[must_use]
    pub fn into_meal(self, user_id: UserId, source: NutritionSource) -> Meal {
        Meal {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            food_name: self.food_name.trim().to_owned(),
            facts: self.facts,
            serving_size: self.serving_size,
            meal_type: self.meal_type,
            source,
            logged_at: self.logged_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Partial meal update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealUpdate {
    /// Food name
    pub food_name: Option<String>,
    /// Replacement nutrition values
    pub facts: Option<NutritionFacts>,
    /// Serving size
    pub serving_size: Option<String>,
    /// Meal slot
    pub meal_type: Option<MealType>,
}

impl Meal {
    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or invalid values
    pub fn apply(&mut self, update: MealUpdate) -> AppResult<()> {
        if let Some(name) = &update.food_name {
            require_name("food_name", name)?;
        }
        if let Some(facts) = &update.facts {
            facts.validate()?;
        }
        if let Some(name) = update.food_name {
            self.food_name = name.trim().to_owned();
        }
        if let Some(facts) = update.facts {
            self.facts = facts;
        }
        if update.serving_size.is_some() {
            self.serving_size = update.serving_size;
        }
        if let Some(meal_type) = update.meal_type {
            self.meal_type = meal_type;
        }
        Ok(())
    }
}

/// A body weight measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightLog {
    /// Record id
    pub id: String,
    /// Owning user
    pub user_id: UserId,
    /// Weight (kg)
    pub weight_kg: f64,
    /// Optional note
    pub notes: Option<String>,
    /// Measurement time
    pub logged_at: DateTime<Utc>,
}

/// One set of an exercise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    /// Load (kg)
    pub weight_kg: f64,
    /// Repetitions
    pub reps: u32,
    /// Rest after the set (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

impl WorkoutSet {
    /// Weight and reps must both be positive
    ///
    /// # Errors
    ///
    /// Returns a validation error otherwise
    pub fn validate(&self) -> AppResult<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 || self.reps == 0 {
            return Err(AppError::invalid_input(
                "All sets must have valid weight and reps",
            ));
        }
        Ok(())
    }

    /// Weight × reps
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight_kg * f64::from(self.reps)
    }
}

/// An exercise and its sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    /// Exercise name
    pub name: String,
    /// Sets performed
    pub sets: Vec<WorkoutSet>,
}

/// A workout session with its exercises
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    /// Record id
    pub id: String,
    /// Owning user
    pub user_id: UserId,
    /// Session name
    pub workout_name: String,
    /// Exercises performed
    pub exercises: Vec<WorkoutExercise>,
    /// Optional note
    pub notes: Option<String>,
    /// Duration (minutes)
    pub duration_minutes: Option<u32>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Input for a new workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
    /// Session name
    pub workout_name: String,
    /// Exercises performed
    pub exercises: Vec<WorkoutExercise>,
    /// Optional note
    pub notes: Option<String>,
    /// Duration (minutes)
    pub duration_minutes: Option<u32>,
}

impl NewWorkout {
    /// A name, at least one exercise, each with a name and at least one valid set
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem
    pub fn validate(&self) -> AppResult<()> {
        if self.workout_name.trim().is_empty() || self.exercises.is_empty() {
            return Err(AppError::invalid_input(
                "Workout name and exercises are required",
            ));
        }
        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() || exercise.sets.is_empty() {
                return Err(AppError::invalid_input(
                    "Each exercise must have a name and at least one set",
                ));
            }
            exercise.sets.iter().try_for_each(WorkoutSet::validate)?;
        }
        Ok(())
    }

    /// Materialise the record
    #[must_use]
    pub fn into_session(self, user_id: UserId) -> WorkoutSession {
        let now = Utc::now();
        WorkoutSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            workout_name: self.workout_name.trim().to_owned(),
            exercises: self.exercises,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            duration_minutes: self.duration_minutes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_press() -> WorkoutExercise {
        WorkoutExercise {
            name: "Bench Press".into(),
            sets: vec![WorkoutSet {
                weight_kg: 60.0,
                reps: 8,
                rest_seconds: None,
            }],
        }
    }

    #[test]
    fn test_profile_metrics_require_all_fields() {
        let mut profile = UserProfile::new(UserId::new("user-1"));
        assert!(profile.body_metrics().unwrap().is_none());

        profile
            .apply(ProfileUpdate {
                age: Some(30),
                gender: Some(BiologicalSex::Male),
                height_cm: Some(175.0),
                current_weight_kg: Some(70.0),
                ..ProfileUpdate::default()
            })
            .unwrap();
        let metrics = profile.body_metrics().unwrap().unwrap();
        assert!((metrics.weight_kg - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_profile_update_rejects_bad_values() {
        let mut profile = UserProfile::new(UserId::new("user-1"));
        let result = profile.apply(ProfileUpdate {
            height_cm: Some(-5.0),
            ..ProfileUpdate::default()
        });
        assert!(result.is_err());
        assert!(profile.height_cm.is_none());
    }

    #[test]
    fn test_new_meal_validation() {
        let mut meal = NewMeal {
            food_name: "Oats".into(),
            facts: NutritionFacts::new(150.0, 5.0, 27.0, 3.0),
            serving_size: None,
            meal_type: MealType::Breakfast,
            logged_at: None,
        };
        assert!(meal.validate().is_ok());

        meal.facts.protein_g = -1.0;
        assert!(meal.validate().is_err());

        meal.facts.protein_g = 5.0;
        meal.food_name = "   ".into();
        assert!(meal.validate().is_err());
    }

    #[test]
    fn test_workout_validation() {
        let mut workout = NewWorkout {
            workout_name: "Push".into(),
            exercises: vec![bench_press()],
            notes: None,
            duration_minutes: Some(45),
        };
        assert!(workout.validate().is_ok());

        workout.exercises[0].sets[0].reps = 0;
        assert!(workout.validate().is_err());

        workout.exercises[0].sets.clear();
        assert!(workout.validate().is_err());

        workout.exercises.clear();
        assert!(workout.validate().is_err());
    }

    #[test]
    fn test_enum_keys_parse() {
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert_eq!(
            "open_food_facts".parse::<NutritionSource>().unwrap(),
            NutritionSource::OpenFoodFacts
        );
        assert!("brunch".parse::<MealType>().is_err());
    }
}
