// ABOUTME: Recommendation ranker configuration for recipe suggestions
// ABOUTME: Configures score weights, the minimum score, pool and result limits, and highlight thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Recommendation Ranker Configuration
//!
//! Provides configuration for the recipe recommendation pipeline: how the
//! three sub-scores are weighted, which candidates are discarded, how many
//! recipes are considered and returned, and when highlight messages fire.

use pawplate_core::constants::recommendation;
use serde::{Deserialize, Serialize};

/// Recommendation Ranker Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Weights of the three sub-scores in the total
    pub weights: ScoreWeights,
    /// Pool and result size limits
    pub limits: RecommendationLimits,
    /// Thresholds for highlight messages
    pub highlights: HighlightThresholds,
}

/// Weights of the sub-scores in `total_score`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of ingredient similarity
    pub similarity: f64,
    /// Weight of nutrition match
    pub nutrition: f64,
    /// Weight of pet suitability
    pub suitability: f64,
}

/// Limits on candidate pool and result list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationLimits {
    /// Candidates with a total at or below this are discarded
    pub min_total_score: f64,
    /// Maximum recipes scored per request
    pub candidate_pool_limit: usize,
    /// Results returned when the caller gives no limit
    pub default_limit: usize,
    /// Largest limit a caller may request
    pub max_limit: usize,
    /// Maximum highlight strings per recommendation
    pub max_highlights: usize,
}

/// Strong/weak thresholds per sub-score for highlight messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightThresholds {
    /// Similarity above which "closely matches your ingredients" fires
    pub similarity_strong: f64,
    /// Similarity above which "uses similar ingredient types" fires
    pub similarity_weak: f64,
    /// Nutrition above which "excellent nutrient balance" fires
    pub nutrition_strong: f64,
    /// Nutrition above which "well-balanced nutrition" fires
    pub nutrition_weak: f64,
    /// Suitability above which "great fit for your pet" fires
    pub suitability_strong: f64,
    /// Suitability above which "suitable for your pet" fires
    pub suitability_weak: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            similarity: recommendation::SIMILARITY_WEIGHT,
            nutrition: recommendation::NUTRITION_WEIGHT,
            suitability: recommendation::SUITABILITY_WEIGHT,
        }
    }
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            min_total_score: recommendation::MIN_TOTAL_SCORE,
            candidate_pool_limit: recommendation::CANDIDATE_POOL_LIMIT,
            default_limit: recommendation::DEFAULT_LIMIT,
            max_limit: recommendation::MAX_LIMIT,
            max_highlights: recommendation::MAX_HIGHLIGHTS,
        }
    }
}

impl Default for HighlightThresholds {
    fn default() -> Self {
        Self {
            similarity_strong: 0.7,
            similarity_weak: 0.4,
            nutrition_strong: 0.8,
            nutrition_weak: 0.6,
            suitability_strong: 0.8,
            suitability_weak: 0.6,
        }
    }
}
