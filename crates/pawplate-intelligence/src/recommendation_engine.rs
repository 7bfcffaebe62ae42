// ABOUTME: Recipe recommendation ranker combining similarity, nutrition match, and pet suitability
// ABOUTME: Pure pipeline: pool filtering, weighted scoring, threshold, stable ordering, truncation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Recipe recommendation ranker
//!
//! Scores published recipes against the ingredients a user picked and the
//! pet they cook for. The pipeline never touches storage: callers resolve
//! recipes, ingredients, and targets first and hand them in.

use crate::config::intelligence::{HighlightThresholds, IntelligenceConfig, RecommendationLimits};
use crate::nutrient_aggregator::compute_nutrition;
use crate::nutrition_plans::NutritionPlanCatalog;
use crate::requirement_evaluator::{MacroTargets, RequirementEvaluator};
use crate::safety::is_hazardous;
use crate::similarity::SimilarityScorer;
use crate::suitability::{RecipeTraits, SuitabilityScorer};
use pawplate_core::errors::{AppError, AppResult};
use pawplate_core::models::{
    Ingredient, IngredientCategory, IngredientId, NutritionRequirement, PetProfile, Recipe,
    RecipeId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// One ingredient line of a recommended recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientShare {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Name, when resolvable
    pub name: Option<String>,
    /// Category, when resolvable
    pub category: Option<IngredientCategory>,
    /// Weight in grams
    pub weight_grams: f64,
    /// Share of recipe weight in percent
    pub percentage: f64,
}

/// Recipe facts shown next to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Recipe
    pub recipe_id: RecipeId,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Total weight in grams
    pub total_weight: f64,
    /// Total energy in kcal
    pub total_calories: f64,
    /// Ingredient lines
    pub ingredients: Vec<IngredientShare>,
    /// Protein percent
    pub protein_percent: f64,
    /// Fat percent
    pub fat_percent: f64,
    /// Carbohydrate percent
    pub carbohydrate_percent: f64,
    /// Energy density
    pub calories_per_100g: f64,
}

/// The three sub-scores of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Ingredient similarity
    pub ingredient_similarity: f64,
    /// Nutrition match
    pub nutrition_match: f64,
    /// Pet suitability
    pub pet_suitability: f64,
}

/// A scored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationScore {
    /// Weighted total in `[0, 1]`
    pub total_score: f64,
    /// Sub-scores
    pub breakdown: ScoreBreakdown,
    /// Human-readable reasons
    pub highlights: Vec<String>,
    /// Recipe facts
    pub recipe: RecipeSummary,
}

/// What the ranker needs besides the recipes
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// Resolved reference ingredients
    pub reference: &'a [&'a Ingredient],
    /// Pet, when known
    pub pet: Option<&'a PetProfile>,
    /// Macro targets; `None` scores a neutral nutrition match
    pub targets: Option<MacroTargets>,
    /// Extra ingredient ids the caller wants avoided
    pub exclusions: &'a BTreeSet<IngredientId>,
}

/// Highlight messages for a breakdown, strongest tier per sub-score
#[must_use]
pub fn highlights(breakdown: &ScoreBreakdown, thresholds: &HighlightThresholds, max: usize) -> Vec<String> {
    let tiers = [
        (
            breakdown.ingredient_similarity,
            thresholds.similarity_strong,
            "closely matches your ingredients",
            thresholds.similarity_weak,
            "uses similar ingredient types",
        ),
        (
            breakdown.nutrition_match,
            thresholds.nutrition_strong,
            "excellent nutrient balance",
            thresholds.nutrition_weak,
            "well-balanced nutrition",
        ),
        (
            breakdown.pet_suitability,
            thresholds.suitability_strong,
            "great fit for your pet",
            thresholds.suitability_weak,
            "suitable for your pet",
        ),
    ];
    tiers
        .into_iter()
        .filter_map(|(value, strong, strong_text, weak, weak_text)| {
            if value > strong {
                Some(strong_text.to_owned())
            } else if value > weak {
                Some(weak_text.to_owned())
            } else {
                None
            }
        })
        .take(max)
        .collect()
}

/// Effective result limit: default when absent, zero rejected, capped at the maximum
///
/// # Errors
///
/// Returns an error when `limit` is zero
pub fn resolve_limit(limit: Option<usize>, limits: &RecommendationLimits) -> AppResult<usize> {
    match limit {
        None => Ok(limits.default_limit.min(limits.max_limit)),
        Some(0) => Err(AppError::invalid_input("limit must be at least 1")),
        Some(requested) => Ok(requested.min(limits.max_limit)),
    }
}

/// Targets behind `nutrition_match`: the requirement row, else the pet's first plan
#[must_use]
pub fn resolve_targets(
    requirement: Option<&NutritionRequirement>,
    plans: &NutritionPlanCatalog,
    pet: Option<&PetProfile>,
) -> Option<MacroTargets> {
    let pet = pet?;
    requirement.map(MacroTargets::from_requirement).or_else(|| {
        plans
            .first_suitable(pet.species, pet.age_years, &pet.special_needs)
            .map(|plan| plan.targets.macro_targets())
    })
}

/// Ranks candidate recipes for a request
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRanker<'a> {
    config: &'a IntelligenceConfig,
}

impl<'a> RecommendationRanker<'a> {
    /// Create a ranker over `config`
    #[must_use]
    pub const fn new(config: &'a IntelligenceConfig) -> Self {
        Self { config }
    }

    /// Recommendable recipes free of allergens, exclusions, and hazards, capped at the pool limit
    #[must_use]
    pub fn candidate_pool<'r>(
        &self,
        recipes: &'r [Recipe],
        ingredients: &BTreeMap<IngredientId, Ingredient>,
        pet: Option<&PetProfile>,
        exclusions: &BTreeSet<IngredientId>,
    ) -> Vec<&'r Recipe> {
        let mut avoided = exclusions.clone();
        if let Some(pet) = pet {
            avoided.extend(pet.allergen_ids());
        }
        let species = pet.map(|pet| pet.species);
        recipes
            .iter()
            .filter(|recipe| recipe.is_recommendable())
            .filter(|recipe| recipe.ingredient_ids().is_disjoint(&avoided))
            .filter(|recipe| {
                !recipe
                    .ingredients
                    .iter()
                    .filter_map(|line| ingredients.get(&line.ingredient_id))
                    .any(|ingredient| is_hazardous(ingredient, species))
            })
            .take(self.config.recommendation.limits.candidate_pool_limit)
            .collect()
    }

    /// Score one recipe
    #[must_use]
    pub fn score_recipe(
        &self,
        recipe: &Recipe,
        ingredients: &BTreeMap<IngredientId, Ingredient>,
        context: &RankingContext<'_>,
    ) -> RecommendationScore {
        let entries: Vec<(&Ingredient, f64)> = recipe
            .ingredients
            .iter()
            .filter_map(|line| {
                ingredients
                    .get(&line.ingredient_id)
                    .map(|ingredient| (ingredient, line.weight_grams))
            })
            .collect();
        let resolved: Vec<&Ingredient> = entries.iter().map(|(ingredient, _)| *ingredient).collect();
        let vector = compute_nutrition(&entries);
        let ratios = vector.ratios();

        let similarity = SimilarityScorer::new(&self.config.similarity)
            .score(context.reference, &resolved)
            .score;
        let nutrition = context.targets.map_or(self.config.nutrition.neutral_match, |targets| {
            RequirementEvaluator::new(&self.config.nutrition).nutrition_match(&vector, &targets)
        });
        let suitability = SuitabilityScorer::new(&self.config.suitability)
            .score(
                &RecipeTraits {
                    flags: recipe.suitability,
                    ingredients: &resolved,
                    ratios: &ratios,
                    omega_3: vector.totals.omega_3_fatty_acids,
                    omega_6: vector.totals.omega_6_fatty_acids,
                },
                context.pet,
            )
            .score;

        let weights = &self.config.recommendation.weights;
        let total_score = weights
            .suitability
            .mul_add(
                suitability,
                weights
                    .similarity
                    .mul_add(similarity, weights.nutrition * nutrition),
            )
            .clamp(0.0, 1.0);
        let breakdown = ScoreBreakdown {
            ingredient_similarity: similarity,
            nutrition_match: nutrition,
            pet_suitability: suitability,
        };

        let total_weight = recipe.total_weight();
        let summary = RecipeSummary {
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            total_weight,
            total_calories: vector.totals.calories,
            ingredients: recipe
                .ingredients
                .iter()
                .map(|line| {
                    let ingredient = ingredients.get(&line.ingredient_id);
                    IngredientShare {
                        ingredient_id: line.ingredient_id,
                        name: ingredient.map(|i| i.name.clone()),
                        category: ingredient.map(|i| i.category),
                        weight_grams: line.weight_grams,
                        percentage: if total_weight > 0.0 {
                            line.weight_grams / total_weight * 100.0
                        } else {
                            0.0
                        },
                    }
                })
                .collect(),
            protein_percent: ratios.protein_percent,
            fat_percent: ratios.fat_percent,
            carbohydrate_percent: ratios.carbohydrate_percent,
            calories_per_100g: ratios.calories_per_100g,
        };

        RecommendationScore {
            total_score,
            highlights: highlights(
                &breakdown,
                &self.config.recommendation.highlights,
                self.config.recommendation.limits.max_highlights,
            ),
            breakdown,
            recipe: summary,
        }
    }

    /// Full pipeline: pool, score, threshold, stable sort, truncate
    #[must_use]
    pub fn rank(
        &self,
        recipes: &[Recipe],
        ingredients: &BTreeMap<IngredientId, Ingredient>,
        context: &RankingContext<'_>,
        limit: usize,
    ) -> Vec<RecommendationScore> {
        if context.reference.is_empty() {
            debug!("No resolvable reference ingredients, nothing to recommend");
            return Vec::new();
        }
        let pool = self.candidate_pool(recipes, ingredients, context.pet, context.exclusions);
        let min_total = self.config.recommendation.limits.min_total_score;
        let mut scored: Vec<RecommendationScore> = pool
            .iter()
            .map(|recipe| self.score_recipe(recipe, ingredients, context))
            .filter(|score| score.total_score > min_total)
            .collect();
        scored.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        scored.truncate(limit);

        info!(
            candidates = recipes.len(),
            pool = pool.len(),
            returned = scored.len(),
            "Ranked recipe recommendations"
        );
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawplate_core::models::{NutrientProfile, RecipeLine, Species};

    fn catalog() -> BTreeMap<IngredientId, Ingredient> {
        [
            Ingredient::new(
                1,
                "Chicken",
                IngredientCategory::WhiteMeat,
                NutrientProfile {
                    calories: 165.0,
                    protein: 31.0,
                    fat: 3.6,
                    ..NutrientProfile::default()
                },
            ),
            Ingredient::new(
                2,
                "Carrot",
                IngredientCategory::Vegetables,
                NutrientProfile {
                    calories: 41.0,
                    protein: 0.9,
                    carbohydrate: 9.6,
                    ..NutrientProfile::default()
                },
            ),
            Ingredient::new(3, "Onion", IngredientCategory::Vegetables, NutrientProfile::default())
                .with_safety(false, false),
        ]
        .into_iter()
        .map(|ingredient| (ingredient.id, ingredient))
        .collect()
    }

    #[test]
    fn test_highlights_thresholds() {
        let thresholds = HighlightThresholds::default();
        let breakdown = ScoreBreakdown {
            ingredient_similarity: 0.75,
            nutrition_match: 0.65,
            pet_suitability: 0.5,
        };
        assert_eq!(
            highlights(&breakdown, &thresholds, 3),
            vec!["closely matches your ingredients", "well-balanced nutrition"]
        );
    }

    #[test]
    fn test_resolve_limit() {
        let limits = RecommendationLimits::default();
        assert_eq!(resolve_limit(None, &limits).unwrap(), 2);
        assert_eq!(resolve_limit(Some(500), &limits).unwrap(), 50);
        assert!(resolve_limit(Some(0), &limits).is_err());
    }

    #[test]
    fn test_pool_drops_hazards_drafts_and_exclusions() {
        let config = IntelligenceConfig::default();
        let ingredients = catalog();
        let recipes = vec![
            Recipe::new("Safe", vec![RecipeLine::new(1, 100.0)]).published(),
            Recipe::new("Onion stew", vec![RecipeLine::new(1, 100.0), RecipeLine::new(3, 10.0)])
                .published(),
            Recipe::new("Draft", vec![RecipeLine::new(1, 100.0)]),
            Recipe::new("Carrots", vec![RecipeLine::new(2, 100.0)]).published(),
        ];
        let exclusions: BTreeSet<IngredientId> = [IngredientId(2)].into();
        let pool = RecommendationRanker::new(&config).candidate_pool(
            &recipes,
            &ingredients,
            None,
            &exclusions,
        );
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "Safe");
    }

    #[test]
    fn test_rank_orders_and_limits() {
        let config = IntelligenceConfig::default();
        let ingredients = catalog();
        let recipes = vec![
            Recipe::new("Carrots", vec![RecipeLine::new(2, 100.0)]).published(),
            Recipe::new("Chicken", vec![RecipeLine::new(1, 100.0)]).published(),
            Recipe::new(
                "Both",
                vec![RecipeLine::new(1, 300.0), RecipeLine::new(2, 100.0)],
            )
            .published(),
        ];
        let reference = [&ingredients[&IngredientId(1)], &ingredients[&IngredientId(2)]];
        let pet = PetProfile::new("Rex", Species::Dog, 4.0, 10.0).unwrap();
        let exclusions = BTreeSet::new();
        let context = RankingContext {
            reference: &reference,
            pet: Some(&pet),
            targets: None,
            exclusions: &exclusions,
        };
        let ranked = RecommendationRanker::new(&config).rank(&recipes, &ingredients, &context, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].recipe.name, "Both");
        assert!(ranked[0].total_score >= ranked[1].total_score);
        assert!(ranked.iter().all(|score| score.highlights.len() <= 3));
    }

    #[test]
    fn test_equal_scores_keep_pool_order() {
        let config = IntelligenceConfig::default();
        let ingredients = catalog();
        let lines = || vec![RecipeLine::new(1, 200.0), RecipeLine::new(2, 50.0)];
        let recipes = vec![
            Recipe::new("First stew", lines()).published(),
            Recipe::new("Second stew", lines()).published(),
            Recipe::new("Third stew", lines()).published(),
        ];
        let reference = [&ingredients[&IngredientId(1)]];
        let exclusions = BTreeSet::new();
        let context = RankingContext {
            reference: &reference,
            pet: None,
            targets: None,
            exclusions: &exclusions,
        };
        let ranked = RecommendationRanker::new(&config).rank(&recipes, &ingredients, &context, 3);
        let names: Vec<&str> = ranked.iter().map(|score| score.recipe.name.as_str()).collect();
        assert_eq!(names, vec!["First stew", "Second stew", "Third stew"]);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].total_score.total_cmp(&pair[1].total_score).is_eq()));
    }

    #[test]
    fn test_empty_reference_returns_nothing() {
        let config = IntelligenceConfig::default();
        let ingredients = catalog();
        let recipes = vec![Recipe::new("Chicken", vec![RecipeLine::new(1, 100.0)]).published()];
        let exclusions = BTreeSet::new();
        let context = RankingContext {
            reference: &[],
            pet: None,
            targets: None,
            exclusions: &exclusions,
        };
        assert!(RecommendationRanker::new(&config)
            .rank(&recipes, &ingredients, &context, 2)
            .is_empty());
    }
}
