// ABOUTME: System-wide constants for nutrition math, provider defaults and environment keys
// ABOUTME: Energy densities, weight-change constants and default limits live here
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Constants Module
//!
//! Hardcoded constants shared by the calculator, the tracking aggregations and the
//! provider clients. Tunable deployment values are read from the environment in
//! [`crate::config`]; the nutrition constants below are fixed.

/// Energy density and planning constants used by the calculator
pub mod nutrition {
    /// Protein energy density (kcal per gram)
    pub const PROTEIN_KCAL_PER_G: f64 = 4.0;

    /// Carbohydrate energy density (kcal per gram)
    pub const CARBS_KCAL_PER_G: f64 = 4.0;

    /// Fat energy density (kcal per gram)
    pub const FAT_KCAL_PER_G: f64 = 9.0;

    /// Fat share of plan calories (fixed at 25%)
    pub const FAT_CALORIE_SHARE: f64 = 0.25;

    /// Fat share expressed as a whole percentage
    pub const FAT_PERCENTAGE: u32 = 25;

    /// Protein target per kilogram of body weight, independent of goal
    pub const PROTEIN_G_PER_KG: f64 = 2.0;

    /// Energy stored in one kilogram of body fat (kcal)
    pub const KCAL_PER_KG_BODY_FAT: f64 = 7700.0;

    /// Days per week, for weekly energy balance
    pub const DAYS_PER_WEEK: f64 = 7.0;
}

/// Weight progress heuristics
pub mod weight_progress {
    /// Healthy weight change rate used for time-to-goal estimates (kg/week)
    pub const HEALTHY_RATE_KG_PER_WEEK: f64 = 0.5;

    /// Distance (kg) at which the proximity score reaches zero
    pub const PROXIMITY_NORMALIZATION_KG: f64 = 10.0;

    /// Maximum distance (kg) still considered on track
    pub const ON_TRACK_THRESHOLD_KG: f64 = 20.0;

    /// Estimates longer than this many weeks are reported in years
    pub const MAX_WEEKS_DISPLAYED: u32 = 52;

    /// Weeks per year for time-to-goal display
    pub const WEEKS_PER_YEAR: u32 = 52;
}

/// Daily intake progress bands
pub mod daily_progress {
    /// Percentage of target at or above which a macro counts as on target
    pub const ON_TARGET_PERCENT: f64 = 90.0;

    /// Percentage of target at or above which a macro counts as partway
    pub const PARTWAY_PERCENT: f64 = 50.0;
}

/// Default list sizes for record queries
pub mod limits {
    /// Default number of weight logs returned
    pub const DEFAULT_WEIGHT_LOG_LIMIT: u32 = 30;

    /// Default number of workout sessions returned
    pub const DEFAULT_WORKOUT_LIMIT: u32 = 50;

    /// Minimum query length for food searches
    pub const MIN_FOOD_QUERY_LEN: usize = 2;

    /// Maximum USDA suggestions returned to the caller
    pub const MAX_FOOD_SUGGESTIONS: usize = 8;

    /// USDA search page size used to build suggestions
    pub const USDA_SUGGESTION_PAGE_SIZE: u32 = 10;

    /// Maximum common-food catalog matches
    pub const MAX_COMMON_FOOD_MATCHES: usize = 6;
}

/// USDA `FoodData` Central nutrient identifiers
pub mod usda_nutrients {
    /// Protein (g)
    pub const PROTEIN: u32 = 1003;
    /// Total lipid (fat) (g)
    pub const FAT: u32 = 1004;
    /// Carbohydrate, by difference (g)
    pub const CARBOHYDRATE: u32 = 1005;
    /// Energy (kcal)
    pub const ENERGY: u32 = 1008;
}

/// Estimate used when neither USDA nor the language model produce a result
pub mod fallback_estimate {
    /// Calories (kcal)
    pub const CALORIES: f64 = 200.0;
    /// Protein (g)
    pub const PROTEIN_G: f64 = 10.0;
    /// Carbohydrates (g)
    pub const CARBS_G: f64 = 20.0;
    /// Fat (g)
    pub const FAT_G: f64 = 8.0;
}

/// Service identity for structured logging
pub mod service_names {
    /// Service name reported in startup logs
    pub const FITTRACK: &str = "fittrack";
}

/// Default provider endpoints
pub mod provider_defaults {
    /// USDA `FoodData` Central base URL
    pub const USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Open Food Facts base URL
    pub const OPEN_FOOD_FACTS_BASE_URL: &str = "https://world.openfoodfacts.org";
    /// Gemini generative language API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Gemini model used for nutrition estimates
    pub const GEMINI_MODEL: &str = "gemini-pro";
    /// HTTP timeout for provider calls (seconds)
    pub const TIMEOUT_SECS: u64 = 10;
    /// USDA response cache TTL (seconds)
    pub const USDA_CACHE_TTL_SECS: u64 = 86_400;
    /// USDA requests allowed per minute
    pub const USDA_RATE_LIMIT_PER_MINUTE: u32 = 30;
}

/// Environment variable names
pub mod env_keys {
    /// Record store connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// USDA API key
    pub const USDA_API_KEY: &str = "USDA_API_KEY";
    /// USDA base URL override
    pub const USDA_BASE_URL: &str = "USDA_BASE_URL";
    /// USDA timeout override
    pub const USDA_TIMEOUT_SECS: &str = "USDA_TIMEOUT_SECS";
    /// USDA cache TTL override
    pub const USDA_CACHE_TTL_SECS: &str = "USDA_CACHE_TTL_SECS";
    /// USDA rate limit override
    pub const USDA_RATE_LIMIT_PER_MINUTE: &str = "USDA_RATE_LIMIT_PER_MINUTE";
    /// Open Food Facts base URL override
    pub const OPEN_FOOD_FACTS_BASE_URL: &str = "OPEN_FOOD_FACTS_BASE_URL";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini base URL override
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Gemini model override
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
}
