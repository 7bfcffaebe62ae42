// ABOUTME: Ingredient similarity configuration
// ABOUTME: Weights of direct overlap, category cosine, and nutrient-feature cosine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use pawplate_core::constants::similarity;
use serde::{Deserialize, Serialize};

/// Weights of the three similarity components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Weight of the shared-ingredient fraction
    pub direct_match_weight: f64,
    /// Weight of the category-count cosine
    pub category_weight: f64,
    /// Weight of the mean nutrient-feature cosine
    pub nutrient_feature_weight: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            direct_match_weight: similarity::DIRECT_MATCH_WEIGHT,
            category_weight: similarity::CATEGORY_WEIGHT,
            nutrient_feature_weight: similarity::NUTRIENT_FEATURE_WEIGHT,
        }
    }
}
