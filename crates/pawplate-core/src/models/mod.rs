// ABOUTME: Domain models shared by every PawPlate crate
// ABOUTME: Ingredients, nutrients, pets, recipes, and requirement rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Core data models.

/// Ingredient reference records and categories
pub mod ingredient;
/// Nutrient taxonomy and per-100g profiles
pub mod nutrient;
/// Pet profiles, allergens, and special-needs tags
pub mod pet;
/// Recipes, suitability flags, and validated candidates
pub mod recipe;
/// Nutrient requirement rows
pub mod requirement;

pub use ingredient::{Ingredient, IngredientCategory, IngredientId};
pub use nutrient::{ConcentrationBasis, Nutrient, NutrientProfile, NutrientUnit};
pub use pet::{
    ActivityLevel, AllergySeverity, LifeStage, PetAllergen, PetId, PetProfile, SpecialNeed,
    Species,
};
pub use recipe::{Recipe, RecipeCandidate, RecipeId, RecipeLine, RecipeStatus, SuitabilityFlags};
pub use requirement::{NutrientBand, NutritionRequirement};
