// ABOUTME: Nutrition resolver chaining USDA, the language model and a fixed fallback estimate
// ABOUTME: Always produces values for a description, tagged with the provider that answered
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::NutritionLookup;
use crate::constants::fallback_estimate;
use crate::models::{NutritionFacts, NutritionSource, ResolvedNutrition};
use std::sync::Arc;
use tracing::{info, warn};

/// Estimate returned when every provider misses
#[must_use]
pub const fn fallback_facts() -> NutritionFacts {
    NutritionFacts::new(
        fallback_estimate::CALORIES,
        fallback_estimate::PROTEIN_G,
        fallback_estimate::CARBS_G,
        fallback_estimate::FAT_G,
    )
}

/// Tries each provider in order and falls back to a fixed estimate
#[derive(Clone, Default)]
pub struct NutritionResolver {
    providers: Vec<Arc<dyn NutritionLookup>>,
}

impl NutritionResolver {
    /// Resolver with no providers; every lookup yields the fallback
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; earlier providers win
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn NutritionLookup>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Number of configured providers
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolve a food description
    ///
    /// Provider errors and invalid provider values are logged and treated as a miss.
    pub async fn resolve(&self, description: &str) -> ResolvedNutrition {
        for provider in &self.providers {
            let source = provider.source();
            match provider.lookup(description).await {
                Ok(Some(facts)) if facts.validate().is_ok() => {
                    info!(description, source = source.as_str(), "Nutrition resolved");
                    return ResolvedNutrition { facts, source };
                }
                Ok(Some(facts)) => {
                    warn!(
                        description,
                        source = source.as_str(),
                        ?facts,
                        "Provider returned invalid nutrition values"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(description, source = source.as_str(), error = %e, "Nutrition lookup failed");
                }
            }
        }

        warn!(description, "No provider matched, using fallback estimate");
        ResolvedNutrition {
            facts: fallback_facts(),
            source: NutritionSource::Fallback,
        }
    }
}
