// ABOUTME: Nutrition evaluation configuration for requirement matching and draft assessment
// ABOUTME: Neutral scores, over-max falloff, evaluation basis, and adequacy heuristic thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Nutrition Evaluation Configuration
//!
//! Controls how a nutrient vector is scored against a requirement row
//! (`nutrition_match`) and the thresholds of the advisory warnings-count
//! heuristic used while a recipe is still a draft.

use pawplate_core::constants::nutrition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Basis on which concentrations are compared with requirement bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationBasis {
    /// Concentrations of the food as it is served
    #[default]
    AsFed,
    /// Concentrations after removing moisture
    DryMatter,
}

impl fmt::Display for EvaluationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsFed => f.write_str("as_fed"),
            Self::DryMatter => f.write_str("dry_matter"),
        }
    }
}

impl FromStr for EvaluationBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "as_fed" | "asfed" => Ok(Self::AsFed),
            "dry_matter" | "drymatter" | "dm" => Ok(Self::DryMatter),
            other => Err(format!("unknown evaluation basis: {other}")),
        }
    }
}

/// Requirement evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// `nutrition_match` when no requirement row applies
    pub neutral_match: f64,
    /// Carbohydrate check score when over the ceiling
    pub carb_over_ceiling_score: f64,
    /// Fraction lost per multiple of `max` above the band
    pub over_max_falloff: f64,
    /// Score when a value exceeds a non-positive maximum
    pub zero_max_exceeded_score: f64,
    /// Concentration basis
    pub basis: EvaluationBasis,
    /// Lightest recipe accepted at save time, in grams
    #[serde(default = "default_min_total_weight")]
    pub min_total_weight_grams: f64,
    /// Draft-time adequacy thresholds
    pub adequacy: AdequacyThresholds,
}

/// Thresholds of the draft-time adequacy heuristic (percent of weight, ratio)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdequacyThresholds {
    /// Protein below this warns
    pub protein_low_percent: f64,
    /// Protein above this warns
    pub protein_high_percent: f64,
    /// Protein ideal band lower bound
    pub protein_ideal_min_percent: f64,
    /// Protein ideal band upper bound
    pub protein_ideal_max_percent: f64,
    /// Fat below this warns
    pub fat_low_percent: f64,
    /// Fat above this warns
    pub fat_high_percent: f64,
    /// Fat ideal band lower bound
    pub fat_ideal_min_percent: f64,
    /// Fat ideal band upper bound
    pub fat_ideal_max_percent: f64,
    /// Carbohydrate above this warns
    pub carb_high_percent: f64,
    /// Carbohydrate at or below this is ideal
    pub carb_ideal_max_percent: f64,
    /// Ca:P ratio below this warns
    pub ca_p_low_ratio: f64,
    /// Ca:P ratio above this warns
    pub ca_p_high_ratio: f64,
    /// Ca:P ideal band lower bound
    pub ca_p_ideal_min_ratio: f64,
    /// Ca:P ideal band upper bound
    pub ca_p_ideal_max_ratio: f64,
    /// Warnings tolerated for a "good" status
    pub good_max_warnings: usize,
}

const fn default_min_total_weight() -> f64 {
    nutrition::MIN_TOTAL_WEIGHT_GRAMS
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            neutral_match: nutrition::NEUTRAL_MATCH,
            carb_over_ceiling_score: nutrition::CARB_OVER_CEILING_SCORE,
            over_max_falloff: nutrition::OVER_MAX_FALLOFF,
            zero_max_exceeded_score: nutrition::ZERO_MAX_EXCEEDED_SCORE,
            basis: EvaluationBasis::AsFed,
            min_total_weight_grams: nutrition::MIN_TOTAL_WEIGHT_GRAMS,
            adequacy: AdequacyThresholds::default(),
        }
    }
}

impl Default for AdequacyThresholds {
    fn default() -> Self {
        Self {
            protein_low_percent: 15.0,
            protein_high_percent: 40.0,
            protein_ideal_min_percent: 18.0,
            protein_ideal_max_percent: 30.0,
            fat_low_percent: 5.0,
            fat_high_percent: 25.0,
            fat_ideal_min_percent: 8.0,
            fat_ideal_max_percent: 15.0,
            carb_high_percent: 30.0,
            carb_ideal_max_percent: 20.0,
            ca_p_low_ratio: 0.8,
            ca_p_high_ratio: 2.5,
            ca_p_ideal_min_ratio: 1.0,
            ca_p_ideal_max_ratio: 2.0,
            good_max_warnings: 2,
        }
    }
}
