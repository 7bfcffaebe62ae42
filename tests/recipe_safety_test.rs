// ABOUTME: Integration tests for allergen and hazard screening, save validation, and draft feedback
// ABOUTME: Covers advisory versus blocking safety behavior through the engine facade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeSet;

use common::{
    assert_close, chicken_and_carrot, test_engine, BISCUIT, CARROT, CHICKEN_BREAST, CHOCOLATE,
    MISO, ONION, PLAIN_YOGURT, SALMON, SPINACH, UNKNOWN_INGREDIENT,
};
use pawplate::pawplate_core::errors::ErrorCode;
use pawplate::pawplate_core::models::{
    AllergySeverity, IngredientCategory, IngredientId, PetId, RecipeLine, SuitabilityFlags,
};
use pawplate::pawplate_intelligence::{ComplianceStatus, DataGap};

fn ids(list: &[IngredientId]) -> BTreeSet<IngredientId> {
    list.iter().copied().collect()
}

// ============================================================================
// Screening
// ============================================================================

#[test]
fn test_plain_ingredients_are_safe() {
    let engine = test_engine();
    let report = engine
        .check_safety(&ids(&[CHICKEN_BREAST, CARROT]), Some(BISCUIT))
        .unwrap();
    assert!(report.is_safe);
    assert!(report.conflicts.is_empty());
    assert!(report.violations.is_empty());
}

#[test]
fn test_onion_is_a_violation_without_a_pet() {
    let engine = test_engine();
    let report = engine
        .check_safety(&ids(&[CHICKEN_BREAST, ONION]), None)
        .unwrap();
    assert!(!report.is_safe);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].ingredient_id, ONION);
}

#[test]
fn test_dangerous_category_names_toxicity() {
    let engine = test_engine();
    let report = engine.check_safety(&ids(&[CHOCOLATE]), Some(BISCUIT)).unwrap();
    assert!(!report.is_safe);
    assert!(report.violations[0].reason.contains("toxic"));
}

#[test]
fn test_species_hazard_depends_on_pet() {
    let engine = test_engine();
    let set = ids(&[CHICKEN_BREAST, SPINACH]);

    // Unsafe only for cats: advisory when the species is unknown
    let anonymous = engine.check_safety(&set, None).unwrap();
    assert!(anonymous.is_safe);
    assert!(anonymous
        .warnings
        .iter()
        .any(|warning| warning == "Spinach is unsafe for cats"));

    let dog = engine.check_safety(&set, Some(BISCUIT)).unwrap();
    assert!(dog.is_safe);

    let cat = engine.check_safety(&set, Some(MISO)).unwrap();
    assert!(!cat.is_safe);
    assert_eq!(cat.violations[0].ingredient_id, SPINACH);
}

#[test]
fn test_allergen_conflict_for_pet() {
    let engine = test_engine();
    let report = engine
        .check_safety(&ids(&[CHICKEN_BREAST, SALMON]), Some(BISCUIT))
        .unwrap();

    assert!(!report.is_safe);
    assert_eq!(report.conflicts.len(), 1);
    let conflict = &report.conflicts[0];
    assert_eq!(conflict.ingredient_id, SALMON);
    assert_eq!(conflict.severity, AllergySeverity::Moderate);
    assert_eq!(conflict.ingredient_name.as_deref(), Some("Salmon"));
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning == "Moderate allergy: Salmon"));
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning == "Salmon is a common allergen"));
}

#[test]
fn test_unknown_ingredient_is_reported_not_fatal() {
    let engine = test_engine();
    let report = engine
        .check_safety(&ids(&[CHICKEN_BREAST, UNKNOWN_INGREDIENT]), None)
        .unwrap();
    assert!(report.is_safe);
    assert_eq!(report.unknown_ingredients, vec![UNKNOWN_INGREDIENT]);
}

#[test]
fn test_safety_for_unknown_pet_is_not_found() {
    let engine = test_engine();
    let error = engine
        .check_safety(&ids(&[CHICKEN_BREAST]), Some(PetId::new()))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_empty_ingredient_set_is_rejected() {
    let engine = test_engine();
    let error = engine.check_safety(&BTreeSet::new(), None).unwrap_err();
    assert_eq!(error.code, ErrorCode::MissingRequiredField);
    assert!(error.message.contains("ingredient_ids"));

    let with_pet = engine.check_safety(&BTreeSet::new(), Some(BISCUIT)).unwrap_err();
    assert_eq!(with_pet.code, ErrorCode::MissingRequiredField);
}

// ============================================================================
// Allergen helpers
// ============================================================================

#[test]
fn test_filter_safe_ingredients_drops_pet_allergens() {
    let engine = test_engine();
    let requested = [SALMON, CHICKEN_BREAST, CARROT];

    let kept = engine.filter_safe_ingredients(&requested, Some(BISCUIT)).unwrap();
    assert_eq!(kept, vec![CHICKEN_BREAST, CARROT]);

    let unfiltered = engine.filter_safe_ingredients(&requested, None).unwrap();
    assert_eq!(unfiltered, requested.to_vec());

    let error = engine
        .filter_safe_ingredients(&requested, Some(PetId::new()))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[test]
fn test_common_allergens_grouped_by_category() {
    let engine = test_engine();
    let grouped = engine.common_allergens_by_category().unwrap();

    let fish: Vec<IngredientId> = grouped[&IngredientCategory::Fish]
        .iter()
        .map(|allergen| allergen.ingredient_id)
        .collect();
    assert_eq!(fish.len(), 8);
    assert_eq!(fish[0], SALMON);
    assert!(grouped[&IngredientCategory::Dairy]
        .iter()
        .any(|allergen| allergen.ingredient_id == PLAIN_YOGURT));
    assert!(!grouped.contains_key(&IngredientCategory::Vegetables));
}

#[test]
fn test_allergen_statistics_for_pet() {
    let engine = test_engine();
    let stats = engine.allergen_statistics(BISCUIT).unwrap();
    assert_eq!(stats.total_count, 1);
    assert_eq!(stats.by_severity[&AllergySeverity::Moderate], 1);
    assert_eq!(stats.by_severity[&AllergySeverity::Mild], 0);
    assert_eq!(stats.by_severity[&AllergySeverity::Severe], 0);
    assert_eq!(stats.by_category[&IngredientCategory::Fish], 1);

    let none = engine.allergen_statistics(MISO).unwrap();
    assert_eq!(none.total_count, 0);
    assert_eq!(none.by_severity.len(), 3);
    assert!(none.by_category.is_empty());

    let missing = engine.allergen_statistics(PetId::new()).unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);
}

// ============================================================================
// Save-time validation
// ============================================================================

#[test]
fn test_save_validation_computes_totals_and_scores() {
    let engine = test_engine();
    let validation = engine
        .validate_recipe_for_save(chicken_and_carrot(), Some(BISCUIT))
        .unwrap();

    assert_close(validation.total_weight, 400.0);
    assert_close(validation.total_calories, 536.0);
    assert!(validation.safety.is_safe);
    assert!((0.0..=100.0).contains(&validation.quality.nutrition_score));
    assert!((0.0..=100.0).contains(&validation.quality.balance_score));
}

#[test]
fn test_save_validation_rejects_underweight_recipes() {
    let engine = test_engine();
    let error = engine
        .validate_recipe_for_save(vec![RecipeLine::new(CHICKEN_BREAST, 1.0)], None)
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert!(error.message.contains("total_weight"));

    let error = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 30.0),
                RecipeLine::new(CARROT, 19.5),
            ],
            None,
        )
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);

    let at_minimum = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 30.0),
                RecipeLine::new(CARROT, 20.0),
            ],
            None,
        )
        .unwrap();
    assert_close(at_minimum.total_weight, 50.0);
}

#[test]
fn test_save_validation_derives_species_flags() {
    let engine = test_engine();
    let both = engine
        .validate_recipe_for_save(chicken_and_carrot(), None)
        .unwrap();
    assert_eq!(both.suitability, SuitabilityFlags::DOGS | SuitabilityFlags::CATS);

    let dogs_only = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 300.0),
                RecipeLine::new(SPINACH, 50.0),
            ],
            None,
        )
        .unwrap();
    assert_eq!(dogs_only.suitability, SuitabilityFlags::DOGS);
    assert!(dogs_only.safety.is_safe);

    let for_dog = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 200.0),
                RecipeLine::new(PLAIN_YOGURT, 50.0),
            ],
            Some(BISCUIT),
        )
        .unwrap();
    assert_eq!(for_dog.suitability, SuitabilityFlags::DOGS);
}

#[test]
fn test_save_validation_blocks_hazards() {
    let engine = test_engine();
    let mut lines = chicken_and_carrot();
    lines.push(RecipeLine::new(ONION, 20.0));

    let error = engine.validate_recipe_for_save(lines, None).unwrap_err();
    assert_eq!(error.code, ErrorCode::SafetyViolation);
    let violations = error.context.details["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
}

#[test]
fn test_save_validation_blocks_pet_allergens() {
    let engine = test_engine();
    let lines = vec![
        RecipeLine::new(CHICKEN_BREAST, 200.0),
        RecipeLine::new(SALMON, 100.0),
    ];

    assert!(engine.validate_recipe_for_save(lines.clone(), None).is_ok());
    let error = engine
        .validate_recipe_for_save(lines, Some(BISCUIT))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::SafetyViolation);
    assert_eq!(error.context.details["conflicts"][0]["severity"], "moderate");
}

#[test]
fn test_save_validation_blocks_cat_hazards_for_cats_only() {
    let engine = test_engine();
    let lines = vec![
        RecipeLine::new(CHICKEN_BREAST, 200.0),
        RecipeLine::new(PLAIN_YOGURT, 50.0),
    ];
    assert!(engine
        .validate_recipe_for_save(lines.clone(), Some(BISCUIT))
        .is_ok());
    let error = engine
        .validate_recipe_for_save(lines, Some(MISO))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::SafetyViolation);
}

#[test]
fn test_save_validation_rejects_malformed_lines() {
    let engine = test_engine();

    let empty = engine.validate_recipe_for_save(Vec::new(), None).unwrap_err();
    assert_eq!(empty.code, ErrorCode::MissingRequiredField);

    let duplicate = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 100.0),
                RecipeLine::new(CHICKEN_BREAST, 50.0),
            ],
            None,
        )
        .unwrap_err();
    assert_eq!(duplicate.code, ErrorCode::InvalidInput);

    let zero = engine
        .validate_recipe_for_save(vec![RecipeLine::new(CARROT, 0.0)], None)
        .unwrap_err();
    assert_eq!(zero.code, ErrorCode::InvalidInput);
}

#[test]
fn test_save_validation_reports_missing_records_as_gaps() {
    let engine = test_engine();
    let validation = engine
        .validate_recipe_for_save(
            vec![
                RecipeLine::new(CHICKEN_BREAST, 100.0),
                RecipeLine::new(UNKNOWN_INGREDIENT, 40.0),
            ],
            None,
        )
        .unwrap();
    assert_close(validation.total_weight, 140.0);
    assert_close(validation.nutrition.vector.total_weight, 100.0);
    assert!(validation.nutrition.gaps.contains(&DataGap::MissingIngredient {
        ingredient_id: UNKNOWN_INGREDIENT
    }));
    assert_eq!(validation.safety.unknown_ingredients, vec![UNKNOWN_INGREDIENT]);
}

// ============================================================================
// Draft feedback
// ============================================================================

#[test]
fn test_draft_assessment_never_blocks() {
    let engine = test_engine();
    let mut lines = chicken_and_carrot();
    lines.push(RecipeLine::new(ONION, 20.0));

    let draft = engine.assess_draft(&lines, None).unwrap();
    assert!(!draft.safety.is_safe);
    assert!(draft.compliance.is_none());
    assert!(!draft.adequacy.warnings.is_empty() || !draft.adequacy.recommendations.is_empty());
}

#[test]
fn test_draft_assessment_with_pet_includes_compliance() {
    let engine = test_engine();
    let draft = engine
        .assess_draft(&chicken_and_carrot(), Some(BISCUIT))
        .unwrap();
    let compliance = draft.compliance.unwrap();
    assert_eq!(compliance.status, ComplianceStatus::Evaluated);
    assert!(draft.safety.is_safe);
}

#[test]
fn test_draft_assessment_of_empty_recipe() {
    let engine = test_engine();
    let draft = engine.assess_draft(&[], Some(MISO)).unwrap();
    assert!(draft.nutrition.vector.is_empty());
    assert_eq!(
        draft.compliance.unwrap().status,
        ComplianceStatus::InsufficientData
    );
}
