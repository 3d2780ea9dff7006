// ABOUTME: Main library entry point for the FitTrack nutrition and training tracker
// ABOUTME: Calculator, tracking aggregates, record store, nutrition providers and services
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # FitTrack
//!
//! Core of a personal fitness and nutrition tracker: users log meals, body weight
//! and strength workouts, and receive daily calorie and macronutrient targets
//! derived from their body metrics.
//!
//! ## Architecture
//!
//! - **Calculator**: pure BMR, TDEE, goal calorie, macro, adjustment and weight
//!   progress functions
//! - **Tracking**: daily intake and per-exercise progress aggregates
//! - **Database**: the [`RecordStore`](database::RecordStore) trait and its SQLite
//!   implementation
//! - **External**: USDA `FoodData` Central, Open Food Facts and Gemini clients
//!   behind lookup traits
//! - **Services**: orchestration with ownership checks
//! - **Auth**: the session verification seam
//!
//! ## Example Usage
//!
//! ```rust
//! use fittrack::calculator::{
//!     build_active_plan, ActivityLevel, BiologicalSex, BodyMetrics, CalorieAdjustment,
//!     FitnessGoal,
//! };
//! use fittrack::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let metrics = BodyMetrics::new(70.0, 175.0, 30, BiologicalSex::Male)?;
//!     let plan = build_active_plan(
//!         &metrics,
//!         ActivityLevel::ModeratelyActive,
//!         FitnessGoal::Lose,
//!         CalorieAdjustment::None,
//!     )?;
//!     assert_eq!(plan.base.maintenance_calories, 2556);
//!     assert_eq!(plan.target_calories(), 2056);
//!     Ok(())
//! }
//! ```

/// Session verification seam
pub mod auth;

/// Pure nutrition and progress calculations
pub mod calculator;

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// Record store trait and SQLite implementation
pub mod database;

/// Unified error handling
pub mod errors;

/// Nutrition data providers
pub mod external;

/// Structured logging
pub mod logging;

/// Domain records
pub mod models;

/// Service layer
pub mod services;

/// Daily and workout aggregates
pub mod tracking;

pub use errors::{AppError, AppResult, ErrorCode};
