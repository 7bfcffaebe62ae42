// ABOUTME: Nutrition intelligence crate: aggregation, requirement evaluation, scoring, and ranking
// ABOUTME: Pure, synchronous algorithms over core models with injected configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

#![deny(unsafe_code)]

//! # `PawPlate` Intelligence
//!
//! Algorithms behind recipe nutrition analysis and recommendations. Every
//! function here is side-effect free apart from logging; configuration and
//! reference data are passed in by the caller.

/// Intelligence configuration
pub mod config;
/// Weighted nutrient aggregation
pub mod nutrient_aggregator;
/// Preset nutrition plans and feeding amounts
pub mod nutrition_plans;
/// Draft-time recipe quality heuristics
pub mod recipe_quality;
/// Recipe recommendation ranker
pub mod recommendation_engine;
/// Requirement evaluation and range matching
pub mod requirement_evaluator;
/// Allergen and hazard screening
pub mod safety;
/// Ingredient-set similarity
pub mod similarity;
/// Pet suitability scoring
pub mod suitability;

pub use config::{ConfigError, EvaluationBasis, IntelligenceConfig};
pub use nutrient_aggregator::{
    compute_nutrition, summarize, DataGap, DerivedRatios, IngredientContribution,
    NutrientVector, NutritionSummary,
};
pub use nutrition_plans::{
    daily_food_amount, daily_needs, suggest_ingredient_weights, suitable_plans, DailyFoodAmount,
    DailyNeeds, NutritionPlan, NutritionPlanCatalog, NutritionProfileKind,
};
pub use recipe_quality::{
    assess_adequacy, balance_score, nutrition_score, AdequacyAssessment, AdequacyStatus,
    QualityScores,
};
pub use recommendation_engine::{
    RankingContext, RecipeSummary, RecommendationRanker, RecommendationScore, ScoreBreakdown,
};
pub use requirement_evaluator::{
    range_match, ComplianceReport, ComplianceStatus, MacroTargets, NutrientStatus,
    RequirementEvaluator, RequirementTable,
};
pub use safety::{
    allergen_statistics, check_safety, common_allergens_by_category, filter_safe_ingredients,
    species_suitability, AllergenConflict, AllergenStatistics, CommonAllergen, SafetyPolicy,
    SafetyReport, SafetyViolation,
};
pub use similarity::{cosine_similarity, SimilarityBreakdown, SimilarityScorer};
pub use suitability::{RecipeTraits, SuitabilityBreakdown, SuitabilityScorer};
