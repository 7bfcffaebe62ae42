// ABOUTME: Pet suitability scoring configuration
// ABOUTME: Component credits, age thresholds, and per-need match scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use pawplate_core::constants::{physiology, suitability};
use serde::{Deserialize, Serialize};

/// Suitability scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityConfig {
    /// Credit for a species flag match
    pub species_credit: f64,
    /// Credit for a life-stage match
    pub life_stage_credit: f64,
    /// Credit scaled by the special-needs match
    pub special_needs_credit: f64,
    /// Score when no pet is given
    pub neutral_score: f64,
    /// Ages below this are juvenile
    pub juvenile_max_age_years: f64,
    /// Ages at or above this are senior
    pub senior_min_age_years: f64,
    /// Per-need thresholds and match scores
    pub special_needs: SpecialNeedsConfig,
}

/// Thresholds and match scores for each special need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialNeedsConfig {
    /// Match when needs exist but none matched
    pub unmatched_score: f64,
    /// Weight loss: calories per 100 g must stay below this
    pub weight_loss_max_kcal_per_100g: f64,
    /// Weight loss: protein percent must reach this
    pub weight_loss_min_protein_percent: f64,
    /// Weight loss match score
    pub weight_loss_match: f64,
    /// Kidney support: protein percent must stay below this
    pub kidney_max_protein_percent: f64,
    /// Kidney support match score
    pub kidney_support_match: f64,
    /// Coat health match score
    pub coat_health_match: f64,
    /// Allergy friendly match score
    pub allergy_friendly_match: f64,
}

impl Default for SuitabilityConfig {
    fn default() -> Self {
        Self {
            species_credit: suitability::SPECIES_CREDIT,
            life_stage_credit: suitability::LIFE_STAGE_CREDIT,
            special_needs_credit: suitability::SPECIAL_NEEDS_CREDIT,
            neutral_score: suitability::NEUTRAL_SCORE,
            juvenile_max_age_years: physiology::JUVENILE_MAX_AGE_YEARS,
            senior_min_age_years: physiology::SENIOR_MIN_AGE_YEARS,
            special_needs: SpecialNeedsConfig::default(),
        }
    }
}

impl Default for SpecialNeedsConfig {
    fn default() -> Self {
        Self {
            unmatched_score: suitability::UNMATCHED_NEEDS_SCORE,
            weight_loss_max_kcal_per_100g: suitability::WEIGHT_LOSS_MAX_KCAL_PER_100G,
            weight_loss_min_protein_percent: suitability::WEIGHT_LOSS_MIN_PROTEIN_PERCENT,
            weight_loss_match: suitability::WEIGHT_LOSS_MATCH,
            kidney_max_protein_percent: suitability::KIDNEY_MAX_PROTEIN_PERCENT,
            kidney_support_match: suitability::KIDNEY_SUPPORT_MATCH,
            coat_health_match: suitability::COAT_HEALTH_MATCH,
            allergy_friendly_match: suitability::ALLERGY_FRIENDLY_MATCH,
        }
    }
}
