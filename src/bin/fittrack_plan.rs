// ABOUTME: Command-line nutrition planner printing the daily plan as JSON
// ABOUTME: Computes BMR-based targets, an optional calorie adjustment and weight progress
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Nutrition plan calculator.
//!
//! Usage:
//! ```bash
//! fittrack-plan --weight-kg 70 --height-cm 175 --age 30 --sex male \
//!     --activity moderately_active --goal lose
//!
//! # With a deficit preset and a target weight
//! fittrack-plan --weight-kg 70 --height-cm 175 --age 30 --sex male \
//!     --activity lightly_active --goal lose --adjustment deficit_400 --target-weight-kg 65
//! ```
//!
//! Logs go to stderr; stdout carries only the JSON plan.

use anyhow::Result;
use clap::Parser;
use fittrack::calculator::{
    build_active_plan, compute_weight_progress, ActivePlan, ActivityLevel, BiologicalSex,
    BodyMetrics, CalorieAdjustment, FitnessGoal, WeightProgress,
};
use fittrack::logging::LoggingConfig;
use serde::Serialize;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "fittrack-plan",
    about = "FitTrack nutrition planner",
    long_about = "Compute maintenance and goal calories, macro targets and an optional calorie adjustment from body metrics"
)]
struct PlanArgs {
    /// Body weight in kilograms
    #[arg(long)]
    weight_kg: f64,

    /// Height in centimetres
    #[arg(long)]
    height_cm: f64,

    /// Age in whole years
    #[arg(long)]
    age: u32,

    /// Biological sex: male, female or other
    #[arg(long)]
    sex: String,

    /// Activity level key; unknown keys fall back to sedentary
    #[arg(long, default_value = "sedentary")]
    activity: String,

    /// Fitness goal: lose, maintain, gain or recomposition
    #[arg(long)]
    goal: String,

    /// Calorie adjustment preset (none, deficit_200 .. surplus_600)
    #[arg(long, default_value = "none")]
    adjustment: String,

    /// Target weight in kilograms, adds a progress summary
    #[arg(long)]
    target_weight_kg: Option<f64>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct PlanOutput {
    plan: ActivePlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_progress: Option<WeightProgress>,
}

fn main() -> Result<()> {
    let args = PlanArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let sex: BiologicalSex = args.sex.parse()?;
    let goal: FitnessGoal = args.goal.parse()?;
    let adjustment: CalorieAdjustment = args.adjustment.parse()?;
    let activity = ActivityLevel::resolve(Some(&args.activity));
    let metrics = BodyMetrics::new(args.weight_kg, args.height_cm, args.age, sex)?;

    let plan = build_active_plan(&metrics, activity, goal, adjustment)?;
    let weight_progress = args
        .target_weight_kg
        .map(|target| compute_weight_progress(metrics.weight_kg, target))
        .transpose()?;

    debug!(
        target_calories = plan.target_calories(),
        activity = activity.as_str(),
        "Plan computed"
    );

    let output = PlanOutput {
        plan,
        weight_progress,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
