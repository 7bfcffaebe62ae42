// ABOUTME: Intelligence module configuration for recipe scoring and nutrition evaluation
// ABOUTME: Orchestrates domain-specific configs and provides unified validation and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Intelligence Configuration Module
//!
//! Configuration for every scoring component, organized per domain:
//! - `recommendation` - ranker weights, minimum score, limits, highlights
//! - `similarity` - ingredient similarity component weights
//! - `suitability` - pet suitability credits and special-need matches
//! - `nutrition` - requirement evaluation and draft adequacy thresholds
//!
//! The configuration is an immutable value built once at startup and
//! handed to the engine; nothing reads it through a process-wide global.

pub mod error;
pub mod nutrition;
pub mod recommendation;
pub mod similarity;
pub mod suitability;

pub use error::ConfigError;
pub use nutrition::{AdequacyThresholds, EvaluationBasis, NutritionConfig};
pub use recommendation::{
    HighlightThresholds, RecommendationConfig, RecommendationLimits, ScoreWeights,
};
pub use similarity::SimilarityConfig;
pub use suitability::{SpecialNeedsConfig, SuitabilityConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Allowed deviation of a weight set from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Main intelligence configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Recommendation ranker configuration
    pub recommendation: RecommendationConfig,
    /// Ingredient similarity configuration
    pub similarity: SimilarityConfig,
    /// Pet suitability configuration
    pub suitability: SuitabilityConfig,
    /// Requirement evaluation configuration
    pub nutrition: NutritionConfig,
}

impl IntelligenceConfig {
    /// Load configuration from defaults plus `PAWPLATE_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        debug!(
            basis = %config.nutrition.basis,
            pool_limit = config.recommendation.limits.candidate_pool_limit,
            "Loaded intelligence configuration"
        );
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error when weights do not sum to 1.0, a score lies outside
    /// `[0, 1]`, a range is inverted, or a limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_recommendation()?;
        self.validate_similarity()?;
        self.validate_suitability()?;
        self.validate_nutrition()
    }

    fn validate_recommendation(&self) -> Result<(), ConfigError> {
        let rec = &self.recommendation;
        let weights = [
            rec.weights.similarity,
            rec.weights.nutrition,
            rec.weights.suitability,
        ];
        if !weights.iter().all(|w| is_unit(*w)) {
            return Err(ConfigError::ValueOutOfRange(
                "Recommendation weights must be between 0.0 and 1.0",
            ));
        }
        if !sums_to_one(&weights) {
            return Err(ConfigError::InvalidWeights(
                "Recommendation weights must sum to 1.0",
            ));
        }
        if !is_unit(rec.limits.min_total_score) {
            return Err(ConfigError::ValueOutOfRange(
                "min_total_score must be between 0.0 and 1.0",
            ));
        }
        if rec.limits.candidate_pool_limit == 0
            || rec.limits.default_limit == 0
            || rec.limits.max_limit == 0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Recommendation limits must be greater than zero",
            ));
        }
        if rec.limits.default_limit > rec.limits.max_limit {
            return Err(ConfigError::InvalidRange(
                "default_limit must be <= max_limit",
            ));
        }

        let hl = &rec.highlights;
        let thresholds = [
            hl.similarity_strong,
            hl.similarity_weak,
            hl.nutrition_strong,
            hl.nutrition_weak,
            hl.suitability_strong,
            hl.suitability_weak,
        ];
        if !thresholds.iter().all(|t| is_unit(*t)) {
            return Err(ConfigError::ValueOutOfRange(
                "Highlight thresholds must be between 0.0 and 1.0",
            ));
        }
        if hl.similarity_weak > hl.similarity_strong
            || hl.nutrition_weak > hl.nutrition_strong
            || hl.suitability_weak > hl.suitability_strong
        {
            return Err(ConfigError::InvalidRange(
                "Weak highlight thresholds must be <= strong thresholds",
            ));
        }
        Ok(())
    }

    fn validate_similarity(&self) -> Result<(), ConfigError> {
        let sim = &self.similarity;
        let weights = [
            sim.direct_match_weight,
            sim.category_weight,
            sim.nutrient_feature_weight,
        ];
        if !weights.iter().all(|w| is_unit(*w)) {
            return Err(ConfigError::ValueOutOfRange(
                "Similarity weights must be between 0.0 and 1.0",
            ));
        }
        if !sums_to_one(&weights) {
            return Err(ConfigError::InvalidWeights(
                "Similarity weights must sum to 1.0",
            ));
        }
        Ok(())
    }

    fn validate_suitability(&self) -> Result<(), ConfigError> {
        let suit = &self.suitability;
        let credits = [
            suit.species_credit,
            suit.life_stage_credit,
            suit.special_needs_credit,
        ];
        if !credits.iter().all(|c| is_unit(*c)) {
            return Err(ConfigError::ValueOutOfRange(
                "Suitability credits must be between 0.0 and 1.0",
            ));
        }
        if !sums_to_one(&credits) {
            return Err(ConfigError::InvalidWeights(
                "Suitability credits must sum to 1.0",
            ));
        }
        if !is_unit(suit.neutral_score) {
            return Err(ConfigError::ValueOutOfRange(
                "Neutral suitability must be between 0.0 and 1.0",
            ));
        }
        if suit.juvenile_max_age_years < 0.0
            || suit.juvenile_max_age_years >= suit.senior_min_age_years
        {
            return Err(ConfigError::InvalidRange(
                "juvenile_max_age_years must be >= 0 and < senior_min_age_years",
            ));
        }

        let needs = &suit.special_needs;
        let matches = [
            needs.unmatched_score,
            needs.weight_loss_match,
            needs.kidney_support_match,
            needs.coat_health_match,
            needs.allergy_friendly_match,
        ];
        if !matches.iter().all(|m| is_unit(*m)) {
            return Err(ConfigError::ValueOutOfRange(
                "Special-need match scores must be between 0.0 and 1.0",
            ));
        }
        if needs.weight_loss_max_kcal_per_100g <= 0.0
            || needs.weight_loss_min_protein_percent < 0.0
            || needs.kidney_max_protein_percent <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Special-need thresholds must be positive",
            ));
        }
        Ok(())
    }

    fn validate_nutrition(&self) -> Result<(), ConfigError> {
        let nutr = &self.nutrition;
        let scores = [
            nutr.neutral_match,
            nutr.carb_over_ceiling_score,
            nutr.over_max_falloff,
            nutr.zero_max_exceeded_score,
        ];
        if !scores.iter().all(|s| is_unit(*s)) {
            return Err(ConfigError::ValueOutOfRange(
                "Nutrition scores must be between 0.0 and 1.0",
            ));
        }

        if !nutr.min_total_weight_grams.is_finite() || nutr.min_total_weight_grams < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_total_weight_grams must be a finite non-negative weight",
            ));
        }

        let adequacy = &nutr.adequacy;
        if adequacy.protein_low_percent >= adequacy.protein_high_percent
            || adequacy.protein_ideal_min_percent > adequacy.protein_ideal_max_percent
        {
            return Err(ConfigError::InvalidRange(
                "Protein adequacy thresholds must be ascending",
            ));
        }
        if adequacy.fat_low_percent >= adequacy.fat_high_percent
            || adequacy.fat_ideal_min_percent > adequacy.fat_ideal_max_percent
        {
            return Err(ConfigError::InvalidRange(
                "Fat adequacy thresholds must be ascending",
            ));
        }
        if adequacy.carb_ideal_max_percent > adequacy.carb_high_percent {
            return Err(ConfigError::InvalidRange(
                "carb_ideal_max_percent must be <= carb_high_percent",
            ));
        }
        if adequacy.ca_p_low_ratio >= adequacy.ca_p_high_ratio
            || adequacy.ca_p_ideal_min_ratio > adequacy.ca_p_ideal_max_ratio
        {
            return Err(ConfigError::InvalidRange(
                "Calcium:phosphorus adequacy thresholds must be ascending",
            ));
        }
        Ok(())
    }

    /// Parse an environment variable into `target` when it is set
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Recommendation ranker overrides
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_SIMILARITY_WEIGHT",
            &mut self.recommendation.weights.similarity,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_NUTRITION_WEIGHT",
            &mut self.recommendation.weights.nutrition,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_SUITABILITY_WEIGHT",
            &mut self.recommendation.weights.suitability,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_MIN_SCORE",
            &mut self.recommendation.limits.min_total_score,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_POOL_LIMIT",
            &mut self.recommendation.limits.candidate_pool_limit,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_DEFAULT_LIMIT",
            &mut self.recommendation.limits.default_limit,
        )?;
        Self::apply_env_var(
            "PAWPLATE_RECOMMENDATION_MAX_LIMIT",
            &mut self.recommendation.limits.max_limit,
        )?;

        // Similarity overrides
        Self::apply_env_var(
            "PAWPLATE_SIMILARITY_DIRECT_WEIGHT",
            &mut self.similarity.direct_match_weight,
        )?;
        Self::apply_env_var(
            "PAWPLATE_SIMILARITY_CATEGORY_WEIGHT",
            &mut self.similarity.category_weight,
        )?;
        Self::apply_env_var(
            "PAWPLATE_SIMILARITY_FEATURE_WEIGHT",
            &mut self.similarity.nutrient_feature_weight,
        )?;

        // Suitability overrides
        Self::apply_env_var(
            "PAWPLATE_SUITABILITY_NEUTRAL_SCORE",
            &mut self.suitability.neutral_score,
        )?;
        Self::apply_env_var(
            "PAWPLATE_SUITABILITY_SENIOR_AGE",
            &mut self.suitability.senior_min_age_years,
        )?;

        // Nutrition overrides
        Self::apply_env_var(
            "PAWPLATE_NUTRITION_NEUTRAL_MATCH",
            &mut self.nutrition.neutral_match,
        )?;
        Self::apply_env_var("PAWPLATE_NUTRITION_BASIS", &mut self.nutrition.basis)?;
        Self::apply_env_var(
            "PAWPLATE_NUTRITION_MIN_TOTAL_WEIGHT",
            &mut self.nutrition.min_total_weight_grams,
        )?;

        Ok(self)
    }
}

fn is_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn sums_to_one(weights: &[f64]) -> bool {
    (weights.iter().sum::<f64>() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
}
