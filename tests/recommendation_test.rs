// ABOUTME: Integration tests for recipe recommendation ranking through the engine facade
// ABOUTME: Verifies limits, ordering, allergen and exclusion filtering, and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    engine_with, test_catalog, test_engine, BISCUIT, BROWN_RICE, CARROT, CHICKEN_BREAST, MISO,
    ONION, PLAIN_YOGURT, SALMON, SPINACH, UNKNOWN_INGREDIENT,
};
use pawplate::engine::{NutritionEngine, RecommendationRequest};
use pawplate::pawplate_core::errors::ErrorCode;
use pawplate::pawplate_core::models::{IngredientId, PetId, Recipe, RecipeLine, SuitabilityFlags};
use pawplate::pawplate_intelligence::{IntelligenceConfig, RecommendationScore};

const APPLE: IngredientId = IngredientId(37);
const PEAR: IngredientId = IngredientId(40);

fn contains(score: &RecommendationScore, id: IngredientId) -> bool {
    score
        .recipe
        .ingredients
        .iter()
        .any(|share| share.ingredient_id == id)
}

fn assert_descending(scores: &[RecommendationScore]) {
    for pair in scores.windows(2) {
        assert!(
            pair[0].total_score >= pair[1].total_score,
            "{} ranked above {}",
            pair[0].total_score,
            pair[1].total_score
        );
    }
}

#[test]
fn test_default_limit_is_two() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT]);
    let scores = engine.recommend(&request).unwrap();
    assert_eq!(scores.len(), 2);
    assert_descending(&scores);
}

#[test]
fn test_zero_limit_is_invalid() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST]).with_limit(0);
    let error = engine.recommend(&request).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_limit_caps_results_and_scores_are_bounded() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT]).with_limit(5);
    let scores = engine.recommend(&request).unwrap();

    assert!(!scores.is_empty());
    assert!(scores.len() <= 5);
    assert_descending(&scores);
    for score in &scores {
        assert!(score.total_score > engine.config().recommendation.limits.min_total_score);
        assert!(score.total_score <= 1.0);
        assert!((0.0..=1.0).contains(&score.breakdown.ingredient_similarity));
        assert!((0.0..=1.0).contains(&score.breakdown.nutrition_match));
        assert!((0.0..=1.0).contains(&score.breakdown.pet_suitability));
    }
}

#[test]
fn test_oversized_limit_is_clamped() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST]).with_limit(10_000);
    let scores = engine.recommend(&request).unwrap();
    assert!(scores.len() <= engine.config().recommendation.limits.max_limit);
    assert!(scores.len() <= test_catalog().recipes().len());
}

#[test]
fn test_top_result_contains_every_reference_ingredient() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT]).with_limit(3);
    let scores = engine.recommend(&request).unwrap();

    let top = &scores[0];
    assert!(contains(top, CHICKEN_BREAST));
    assert!(contains(top, CARROT));
}

#[test]
fn test_without_pet_nutrition_and_suitability_are_neutral() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST]).with_limit(3);
    let neutral_match = engine.config().nutrition.neutral_match;
    let neutral_suitability = engine.config().suitability.neutral_score;

    for score in engine.recommend(&request).unwrap() {
        assert!((score.breakdown.nutrition_match - neutral_match).abs() < 1e-12);
        assert!((score.breakdown.pet_suitability - neutral_suitability).abs() < 1e-12);
    }
}

#[test]
fn test_empty_or_unresolved_reference_returns_nothing() {
    let engine = test_engine();

    let empty = RecommendationRequest::default().with_limit(5);
    assert!(engine.recommend(&empty).unwrap().is_empty());

    let unresolved = RecommendationRequest::new([UNKNOWN_INGREDIENT]).with_limit(5);
    assert!(engine.recommend(&unresolved).unwrap().is_empty());
}

#[test]
fn test_pet_allergens_are_never_recommended() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT])
        .for_pet(BISCUIT)
        .with_limit(50);
    let scores = engine.recommend(&request).unwrap();

    assert!(!scores.is_empty());
    assert!(scores.iter().all(|score| !contains(score, SALMON)));
    assert_descending(&scores);
}

#[test]
fn test_explicit_exclusions_are_respected() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST])
        .for_pet(BISCUIT)
        .excluding([BROWN_RICE])
        .with_limit(50);
    let scores = engine.recommend(&request).unwrap();

    assert!(scores
        .iter()
        .all(|score| !contains(score, BROWN_RICE) && !contains(score, SALMON)));
}

#[test]
fn test_species_hazards_filter_candidates_for_cats() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST])
        .for_pet(MISO)
        .with_limit(50);
    let scores = engine.recommend(&request).unwrap();

    assert!(!scores.is_empty());
    assert!(scores
        .iter()
        .all(|score| !contains(score, SPINACH) && !contains(score, PLAIN_YOGURT)));
}

#[test]
fn test_universally_dangerous_recipes_are_filtered_without_pet() {
    let onion_stew = Recipe::new(
        "Chicken and onion stew",
        vec![
            RecipeLine::new(CHICKEN_BREAST, 300.0),
            RecipeLine::new(CARROT, 100.0),
            RecipeLine::new(ONION, 30.0),
        ],
    )
    .published()
    .with_suitability(SuitabilityFlags::both_species());
    let stew_id = onion_stew.id;
    let engine = engine_with(test_catalog().with_recipe(onion_stew));

    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT, ONION]).with_limit(50);
    let scores = engine.recommend(&request).unwrap();
    assert!(scores.iter().all(|score| score.recipe.recipe_id != stew_id));
}

#[test]
fn test_unpublished_recipes_are_not_candidates() {
    let draft = Recipe::new(
        "Unfinished chicken bowl",
        vec![
            RecipeLine::new(CHICKEN_BREAST, 300.0),
            RecipeLine::new(CARROT, 100.0),
        ],
    );
    let draft_id = draft.id;
    let engine = engine_with(test_catalog().with_recipe(draft));

    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT]).with_limit(50);
    let scores = engine.recommend(&request).unwrap();
    assert!(scores.iter().all(|score| score.recipe.recipe_id != draft_id));
}

#[test]
fn test_low_scoring_candidates_are_dropped_for_a_pet() {
    // Dog-only fruit mash for a senior cat: no shared ingredients or
    // categories, no species or senior flag, and almost no protein
    let fruit_mash = Recipe::new(
        "Orchard fruit mash",
        vec![RecipeLine::new(APPLE, 200.0), RecipeLine::new(PEAR, 100.0)],
    )
    .published()
    .with_suitability(SuitabilityFlags::DOGS);
    let mash_id = fruit_mash.id;
    let catalog = test_catalog().with_recipe(fruit_mash);
    let request = RecommendationRequest::new([CHICKEN_BREAST])
        .for_pet(MISO)
        .with_limit(50);

    let engine = engine_with(catalog.clone());
    let scores = engine.recommend(&request).unwrap();
    assert!(scores.iter().all(|score| score.recipe.recipe_id != mash_id));
    assert!(scores.iter().all(|score| score.total_score > 0.3));

    let mut permissive = IntelligenceConfig::default();
    permissive.recommendation.limits.min_total_score = 0.0;
    let engine = NutritionEngine::new(permissive, catalog).unwrap();
    let mash = engine
        .recommend(&request)
        .unwrap()
        .into_iter()
        .find(|score| score.recipe.recipe_id == mash_id)
        .expect("fruit mash is scored once the threshold is lifted");
    assert!(mash.total_score <= 0.3, "scored {}", mash.total_score);
    assert!(mash.breakdown.pet_suitability < 0.5);
}

#[test]
fn test_recommendations_are_deterministic() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT])
        .for_pet(BISCUIT)
        .with_limit(10);

    let first: Vec<_> = engine
        .recommend(&request)
        .unwrap()
        .into_iter()
        .map(|score| (score.recipe.recipe_id, score.total_score))
        .collect();
    let second: Vec<_> = engine
        .recommend(&request)
        .unwrap()
        .into_iter()
        .map(|score| (score.recipe.recipe_id, score.total_score))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_recommendation_for_unknown_pet_is_not_found() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST]).for_pet(PetId::new());
    let error = engine.recommend(&request).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_summary_shares_sum_to_one_hundred() {
    let engine = test_engine();
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT]).with_limit(3);
    for score in engine.recommend(&request).unwrap() {
        let total: f64 = score
            .recipe
            .ingredients
            .iter()
            .map(|share| share.percentage)
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(score.recipe.total_calories > 0.0);
    }
}

#[test]
fn test_request_round_trips_through_json() {
    let request = RecommendationRequest::new([CHICKEN_BREAST, CARROT])
        .for_pet(BISCUIT)
        .excluding([BROWN_RICE])
        .with_limit(4);
    let json = serde_json::to_string(&request).unwrap();
    let parsed: RecommendationRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, request);

    let minimal: RecommendationRequest =
        serde_json::from_str(r#"{"reference_ids": [4, 23]}"#).unwrap();
    assert_eq!(minimal, RecommendationRequest::new([CHICKEN_BREAST, CARROT]));
}
