// ABOUTME: Read-only repository traits through which the engine fetches reference data
// ABOUTME: Ingredients, requirement rows, pets and candidate recipes behind Send + Sync seams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! # Repository Traits
//!
//! The engine never owns a storage backend. Each trait below is one narrow
//! read path; implementations must tolerate concurrent readers. Absent
//! records are `Ok(None)` or simply missing from the returned list, and
//! only backend failures become errors.

use std::collections::BTreeSet;

use pawplate_core::errors::AppResult;
use pawplate_core::models::{
    ActivityLevel, Ingredient, IngredientId, LifeStage, NutritionRequirement, PetId, PetProfile,
    Recipe, Species,
};

/// Ingredient reference records
pub trait IngredientRepository: Send + Sync {
    /// Records for every id that exists; unknown ids are omitted
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn ingredients_by_ids(&self, ids: &BTreeSet<IngredientId>) -> AppResult<Vec<Ingredient>>;

    /// Every record flagged as a common allergen
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn common_allergens(&self) -> AppResult<Vec<Ingredient>>;
}

/// Nutrient requirement rows
pub trait RequirementRepository: Send + Sync {
    /// First row matching the key; `None` activity matches any row
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn find_requirement(
        &self,
        species: Species,
        life_stage: LifeStage,
        activity_level: Option<ActivityLevel>,
        weight_kg: f64,
    ) -> AppResult<Option<NutritionRequirement>>;
}

/// Pet profiles
pub trait PetRepository: Send + Sync {
    /// Profile by id
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn pet_by_id(&self, id: PetId) -> AppResult<Option<PetProfile>>;
}

/// Stored recipes
pub trait RecipeRepository: Send + Sync {
    /// Published public recipes in store order, capped at `limit` when given
    ///
    /// The engine passes a multiple of its candidate pool size so that
    /// recipes dropped for allergens or hazards can be replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn candidate_recipes(&self, limit: Option<usize>) -> AppResult<Vec<Recipe>>;
}

/// Every read path the engine needs
pub trait ReferenceStore:
    IngredientRepository + RequirementRepository + PetRepository + RecipeRepository
{
}

impl<T> ReferenceStore for T where
    T: IngredientRepository + RequirementRepository + PetRepository + RecipeRepository
{
}
