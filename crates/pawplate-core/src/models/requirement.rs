// ABOUTME: AAFCO-style nutrient requirement rows keyed by species, life stage, activity, and weight
// ABOUTME: Bands carry optional min/max bounds; some nutrients only define a minimum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::nutrient::Nutrient;
use super::pet::{ActivityLevel, LifeStage, Species};
use crate::constants::physiology::DRY_MATTER_KCAL_PER_KG;
use crate::errors::{AppError, AppResult};

/// Bounds on one nutrient concentration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientBand {
    /// Minimum concentration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum concentration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NutrientBand {
    /// Band with both bounds
    #[must_use]
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Band with only a minimum
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Band with only a maximum
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Neither bound is set
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn validate(&self, label: &str) -> AppResult<()> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(AppError::out_of_range(label, bound));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(AppError::invalid_input(format!(
                    "{label}: minimum {min} exceeds maximum {max}"
                )));
            }
        }
        Ok(())
    }
}

/// One reference requirement row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRequirement {
    /// Species
    pub species: Species,
    /// Life stage
    pub life_stage: LifeStage,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Smallest body weight covered (kg, inclusive)
    pub min_weight_kg: f64,
    /// Largest body weight covered (kg, inclusive)
    pub max_weight_kg: f64,
    /// Daily energy need per kg body weight
    pub calories_per_kg: f64,
    /// Per-nutrient concentration bands
    #[serde(default)]
    pub bands: BTreeMap<Nutrient, NutrientBand>,
    /// Calcium:phosphorus ratio band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calcium_phosphorus_ratio: Option<NutrientBand>,
    /// Standard the bounds come from
    #[serde(default)]
    pub source: String,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NutritionRequirement {
    /// Band for one nutrient
    #[must_use]
    pub fn band(&self, nutrient: Nutrient) -> Option<&NutrientBand> {
        self.bands.get(&nutrient)
    }

    /// Weight range contains `weight_kg`
    #[must_use]
    pub fn covers_weight(&self, weight_kg: f64) -> bool {
        self.min_weight_kg <= weight_kg && weight_kg <= self.max_weight_kg
    }

    /// Row applies to the key; an absent activity level matches any row
    #[must_use]
    pub fn matches(
        &self,
        species: Species,
        life_stage: LifeStage,
        activity_level: Option<ActivityLevel>,
        weight_kg: f64,
    ) -> bool {
        self.species == species
            && self.life_stage == life_stage
            && activity_level.is_none_or(|level| level == self.activity_level)
            && self.covers_weight(weight_kg)
    }

    /// Daily energy need for a pet of `weight_kg`
    #[must_use]
    pub fn daily_calories(&self, weight_kg: f64) -> f64 {
        self.calories_per_kg * weight_kg
    }

    /// Daily dry-matter intake in kilograms for a pet of `weight_kg`
    #[must_use]
    pub fn daily_dry_matter_kg(&self, weight_kg: f64) -> f64 {
        self.daily_calories(weight_kg) / DRY_MATTER_KCAL_PER_KG
    }

    /// Check bounds and weight range for consistency
    ///
    /// # Errors
    ///
    /// Returns an error when a bound is negative or inverted, or the weight
    /// range is empty
    pub fn validate(&self) -> AppResult<()> {
        if !(self.min_weight_kg.is_finite()
            && self.max_weight_kg.is_finite()
            && self.min_weight_kg <= self.max_weight_kg)
        {
            return Err(AppError::invalid_input(format!(
                "Invalid weight range {}..={} for {} {}",
                self.min_weight_kg, self.max_weight_kg, self.species, self.life_stage
            )));
        }
        if !self.calories_per_kg.is_finite() || self.calories_per_kg < 0.0 {
            return Err(AppError::out_of_range("calories_per_kg", self.calories_per_kg));
        }
        for (nutrient, band) in &self.bands {
            band.validate(nutrient.name())?;
        }
        if let Some(ratio) = &self.calcium_phosphorus_ratio {
            ratio.validate("calcium_phosphorus_ratio")?;
        }
        Ok(())
    }
}
