// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, the bundled catalog engine, and well-known dataset ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `pawplate`
//!
//! Integration tests run against the bundled reference dataset so the
//! numbers asserted here match what callers see out of the box.

use std::env;
use std::sync::Once;

use pawplate::catalog::ReferenceCatalog;
use pawplate::engine::NutritionEngine;
use pawplate::pawplate_core::models::{IngredientId, PetId, RecipeLine};
use pawplate::pawplate_intelligence::IntelligenceConfig;
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Chicken breast: 165 kcal, 31 g protein, 3.6 g fat per 100 g
pub const CHICKEN_BREAST: IngredientId = IngredientId(4);
/// Duck
pub const DUCK: IngredientId = IngredientId(7);
/// Chicken egg, a common allergen
pub const CHICKEN_EGG: IngredientId = IngredientId(9);
/// Salmon, a common allergen and Biscuit's allergen
pub const SALMON: IngredientId = IngredientId(10);
/// Carrot: 41 kcal, 0.9 g protein, 0.2 g fat, 9.6 g carbohydrate per 100 g
pub const CARROT: IngredientId = IngredientId(23);
/// Sweet potato
pub const SWEET_POTATO: IngredientId = IngredientId(26);
/// Spinach, unsafe for cats only
pub const SPINACH: IngredientId = IngredientId(27);
/// Brown rice
pub const BROWN_RICE: IngredientId = IngredientId(43);
/// Plain yogurt, unsafe for cats
pub const PLAIN_YOGURT: IngredientId = IngredientId(46);
/// Onion, unsafe for both species
pub const ONION: IngredientId = IngredientId(48);
/// Chocolate
pub const CHOCOLATE: IngredientId = IngredientId(50);
/// Id absent from the bundled dataset
pub const UNKNOWN_INGREDIENT: IngredientId = IngredientId(9999);

/// Adult dog, 4 years, 10 kg, moderate salmon allergy
pub const BISCUIT: PetId = PetId(Uuid::from_u128(0x3b9f_6c1e_2d4a_4f8b_9c7e_1a2b_3c4d_5e6f));
/// Senior cat, 9 years, 4.5 kg, kidney support
pub const MISO: PetId = PetId(Uuid::from_u128(0x8e7d_6c5b_4a39_4281_b7c6_d5e4_f3a2_b1c0));

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG raises verbosity when debugging a failing test
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Bundled dataset
pub fn test_catalog() -> ReferenceCatalog {
    ReferenceCatalog::default_dataset().unwrap()
}

/// Engine with default configuration over `catalog`
pub fn engine_with(catalog: ReferenceCatalog) -> NutritionEngine<ReferenceCatalog> {
    init_test_logging();
    NutritionEngine::new(IntelligenceConfig::default(), catalog).unwrap()
}

/// Engine with default configuration over the bundled dataset
pub fn test_engine() -> NutritionEngine<ReferenceCatalog> {
    engine_with(test_catalog())
}

/// 300 g chicken breast and 100 g carrot
pub fn chicken_and_carrot() -> Vec<RecipeLine> {
    vec![
        RecipeLine::new(CHICKEN_BREAST, 300.0),
        RecipeLine::new(CARROT, 100.0),
    ]
}

/// Absolute tolerance comparison for derived floating point values
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
