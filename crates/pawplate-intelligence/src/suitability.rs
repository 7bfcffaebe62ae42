// ABOUTME: Pet suitability scoring from species flags, life-stage flags, and special-needs fit
// ABOUTME: Neutral score when no pet is given; every component floors at zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use crate::config::intelligence::{SpecialNeedsConfig, SuitabilityConfig};
use crate::nutrient_aggregator::DerivedRatios;
use pawplate_core::models::{Ingredient, PetProfile, SpecialNeed, SuitabilityFlags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Age bracket used for flag matching
///
/// Always derived from age; an explicit life-stage override only steers the
/// requirement-row lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeBracket {
    Juvenile,
    Adult,
    Senior,
}

/// Components of a suitability score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SuitabilityBreakdown {
    /// Species credit earned
    pub species: f64,
    /// Life-stage credit earned
    pub life_stage: f64,
    /// Special-needs match in `[0, 1]` before scaling
    pub special_needs_match: f64,
    /// Total in `[0, 1]`
    pub score: f64,
}

/// What the suitability scorer needs to know about a recipe
#[derive(Debug, Clone, Copy)]
pub struct RecipeTraits<'r> {
    /// Audience flags
    pub flags: SuitabilityFlags,
    /// Resolved ingredients
    pub ingredients: &'r [&'r Ingredient],
    /// Derived ratios of the recipe's nutrient vector
    pub ratios: &'r DerivedRatios,
    /// Total omega-3 in grams
    pub omega_3: f64,
    /// Total omega-6 in grams
    pub omega_6: f64,
}

/// Scores how well a recipe fits a pet
#[derive(Debug, Clone, Copy)]
pub struct SuitabilityScorer<'a> {
    config: &'a SuitabilityConfig,
}

impl<'a> SuitabilityScorer<'a> {
    /// Create a scorer over `config`
    #[must_use]
    pub const fn new(config: &'a SuitabilityConfig) -> Self {
        Self { config }
    }

    fn bracket(&self, pet: &PetProfile) -> AgeBracket {
        if pet.age_years < self.config.juvenile_max_age_years {
            AgeBracket::Juvenile
        } else if pet.age_years >= self.config.senior_min_age_years {
            AgeBracket::Senior
        } else {
            AgeBracket::Adult
        }
    }

    /// Suitability of a recipe for `pet`; neutral without a pet
    #[must_use]
    pub fn score(&self, recipe: &RecipeTraits<'_>, pet: Option<&PetProfile>) -> SuitabilityBreakdown {
        let Some(pet) = pet else {
            return SuitabilityBreakdown {
                score: self.config.neutral_score,
                ..SuitabilityBreakdown::default()
            };
        };

        let species = if recipe.flags.suits_species(pet.species) {
            self.config.species_credit
        } else {
            0.0
        };
        let life_stage_match = match self.bracket(pet) {
            AgeBracket::Juvenile => recipe.flags.suits_juvenile(pet.species),
            AgeBracket::Senior => recipe.flags.suits_seniors(),
            AgeBracket::Adult => true,
        };
        let life_stage = if life_stage_match {
            self.config.life_stage_credit
        } else {
            0.0
        };
        let special_needs_match =
            special_needs_match(&self.config.special_needs, &pet.special_needs, recipe);

        let score = self
            .config
            .special_needs_credit
            .mul_add(special_needs_match, species + life_stage);
        SuitabilityBreakdown {
            species: species.max(0.0),
            life_stage: life_stage.max(0.0),
            special_needs_match,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Summed per-need match capped at 1; full when the pet has no needs
fn special_needs_match(
    config: &SpecialNeedsConfig,
    needs: &BTreeSet<SpecialNeed>,
    recipe: &RecipeTraits<'_>,
) -> f64 {
    if needs.is_empty() {
        return 1.0;
    }
    let total: f64 = needs
        .iter()
        .filter_map(|need| match need {
            SpecialNeed::WeightLoss => (recipe.ratios.calories_per_100g
                < config.weight_loss_max_kcal_per_100g
                && recipe.ratios.protein_percent >= config.weight_loss_min_protein_percent)
                .then_some(config.weight_loss_match),
            SpecialNeed::KidneySupport => (recipe.ratios.protein_percent
                < config.kidney_max_protein_percent)
                .then_some(config.kidney_support_match),
            SpecialNeed::CoatHealth => (recipe.omega_3 > 0.0 || recipe.omega_6 > 0.0)
                .then_some(config.coat_health_match),
            SpecialNeed::AllergyFriendly => (!recipe
                .ingredients
                .iter()
                .any(|ingredient| ingredient.common_allergen))
            .then_some(config.allergy_friendly_match),
        })
        .sum();
    if total > 0.0 {
        total.min(1.0)
    } else {
        config.unmatched_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawplate_core::models::{LifeStage, Species};

    fn lean_ratios() -> DerivedRatios {
        DerivedRatios {
            protein_percent: 24.0,
            calories_per_100g: 150.0,
            ..DerivedRatios::default()
        }
    }

    fn traits<'r>(
        flags: SuitabilityFlags,
        ingredients: &'r [&'r Ingredient],
        ratios: &'r DerivedRatios,
    ) -> RecipeTraits<'r> {
        RecipeTraits {
            flags,
            ingredients,
            ratios,
            omega_3: 0.0,
            omega_6: 0.0,
        }
    }

    #[test]
    fn test_no_pet_is_neutral() {
        let config = SuitabilityConfig::default();
        let ratios = lean_ratios();
        let result =
            SuitabilityScorer::new(&config).score(&traits(SuitabilityFlags::DOGS, &[], &ratios), None);
        assert!((result.score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_adult_without_needs_scores_full() {
        let config = SuitabilityConfig::default();
        let ratios = lean_ratios();
        let pet = PetProfile::new("Rex", Species::Dog, 4.0, 20.0).unwrap();
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::DOGS, &[], &ratios), Some(&pet));
        assert!((result.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_species_and_missing_puppy_flag() {
        let config = SuitabilityConfig::default();
        let ratios = lean_ratios();
        let pet = PetProfile::new("Pip", Species::Dog, 0.5, 4.0).unwrap();
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::CATS, &[], &ratios), Some(&pet));
        assert!(result.species.abs() < f64::EPSILON);
        assert!(result.life_stage.abs() < f64::EPSILON);
        assert!((result.score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_life_stage_credit_follows_age_not_override() {
        let config = SuitabilityConfig::default();
        let ratios = lean_ratios();
        let pup = PetProfile::new("Pip", Species::Dog, 0.5, 4.0)
            .unwrap()
            .with_life_stage(LifeStage::Adult);
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::DOGS, &[], &ratios), Some(&pup));
        assert!(result.life_stage.abs() < f64::EPSILON);
        assert!((result.score - 0.7).abs() < 1e-12);

        let elder = PetProfile::new("Gus", Species::Dog, 9.0, 20.0)
            .unwrap()
            .with_life_stage(LifeStage::Adult);
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::DOGS, &[], &ratios), Some(&elder));
        assert!(result.life_stage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_special_needs_matches_sum_and_cap() {
        let config = SuitabilityConfig::default();
        let ratios = lean_ratios();
        let pet = PetProfile::new("Tom", Species::Cat, 3.0, 5.0)
            .unwrap()
            .with_special_need(SpecialNeed::WeightLoss)
            .with_special_need(SpecialNeed::AllergyFriendly);
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::CATS, &[], &ratios), Some(&pet));
        assert!((result.special_needs_match - 1.0).abs() < f64::EPSILON);

        let kidney = PetProfile::new("Old", Species::Cat, 3.0, 5.0)
            .unwrap()
            .with_special_need(SpecialNeed::KidneySupport);
        let result = SuitabilityScorer::new(&config)
            .score(&traits(SuitabilityFlags::CATS, &[], &ratios), Some(&kidney));
        assert!((result.special_needs_match - 0.5).abs() < f64::EPSILON);
    }
}
