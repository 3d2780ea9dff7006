// ABOUTME: Basal metabolic rate and total daily energy expenditure calculations
// ABOUTME: Mifflin-St Jeor (1990) BMR scaled by a fixed activity multiplier
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::types::{require_finite, ActivityLevel, BiologicalSex, BodyMetrics};
use crate::errors::AppResult;

/// Mifflin-St Jeor weight coefficient (kcal per kg)
const WEIGHT_COEF: f64 = 10.0;
/// Mifflin-St Jeor height coefficient (kcal per cm)
const HEIGHT_COEF: f64 = 6.25;
/// Mifflin-St Jeor age coefficient (kcal per year)
const AGE_COEF: f64 = 5.0;
/// Sex constant for males
const MALE_CONSTANT: f64 = 5.0;
/// Sex constant for females (and `other`)
const FEMALE_CONSTANT: f64 = -161.0;

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor formula
///
/// Formula:
/// - Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(years) + 5
/// - Women (and `other`): BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(years) - 161
///
/// The result is unrounded and not clamped; extreme but valid metrics can produce
/// a very small or even negative BMR.
///
/// # Reference
/// Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure
/// in healthy individuals. *American Journal of Clinical Nutrition*, 51(2), 241-247.
/// DOI: 10.1093/ajcn/51.2.241
///
/// # Errors
///
/// Returns a validation error if the metrics are not finite positive values
pub fn compute_bmr(metrics: &BodyMetrics) -> AppResult<f64> {
    metrics.validate()?;

    let sex_constant = match metrics.biological_sex {
        BiologicalSex::Male => MALE_CONSTANT,
        BiologicalSex::Female | BiologicalSex::Other => FEMALE_CONSTANT,
    };

    let bmr = AGE_COEF.mul_add(
        -f64::from(metrics.age_years),
        WEIGHT_COEF.mul_add(metrics.weight_kg, HEIGHT_COEF * metrics.height_cm),
    ) + sex_constant;

    Ok(bmr)
}

/// Calculate Total Daily Energy Expenditure from BMR and activity level
///
/// TDEE = BMR × activity multiplier (1.2 / 1.375 / 1.55 / 1.725 / 1.9). Unrounded.
///
/// # Errors
///
/// Returns a validation error if `bmr` is NaN or infinite
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> AppResult<f64> {
    require_finite("bmr", bmr)?;
    Ok(bmr * activity_level.multiplier())
}

/// TDEE for a stored activity key, treating missing or unknown keys as sedentary
///
/// # Errors
///
/// Returns a validation error if `bmr` is NaN or infinite
pub fn compute_tdee_for_key(bmr: f64, activity_key: Option<&str>) -> AppResult<f64> {
    compute_tdee(bmr, ActivityLevel::resolve(activity_key))
}
