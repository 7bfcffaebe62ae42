// ABOUTME: In-memory reference catalog implementing every repository trait over immutable data
// ABOUTME: Loads ingredients, requirement rows, pets and recipes from JSON or the bundled dataset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! # Reference Catalog
//!
//! [`ReferenceCatalog`] is the default [`ReferenceStore`](crate::repository::ReferenceStore).
//! It is built once, validated on load, and never mutated afterwards, so a
//! single instance can be shared across threads behind an `Arc`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pawplate_core::errors::{AppError, AppResult};
use pawplate_core::models::{
    ActivityLevel, Ingredient, IngredientId, LifeStage, NutritionRequirement, PetId, PetProfile,
    Recipe, Species,
};
use pawplate_intelligence::RequirementTable;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::repository::{
    IngredientRepository, PetRepository, RecipeRepository, RequirementRepository,
};

/// Bundled starter dataset
pub const DEFAULT_DATASET: &str = include_str!("../data/reference_catalog.json");

/// Failures while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File could not be read
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// Content is not a valid catalog document
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Content parsed but is inconsistent
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Invalid(_) => Self::config(error.to_string()).with_source(error),
            CatalogError::Io { .. } | CatalogError::Parse(_) => {
                Self::serialization(error.to_string()).with_source(error)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    requirements: Vec<NutritionRequirement>,
    #[serde(default)]
    pets: Vec<PetProfile>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

/// Immutable in-memory reference data
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    ingredients: BTreeMap<IngredientId, Ingredient>,
    requirements: RequirementTable,
    pets: BTreeMap<PetId, PetProfile>,
    recipes: Vec<Recipe>,
}

impl ReferenceCatalog {
    /// Build a catalog from parts, validating every record
    ///
    /// # Errors
    ///
    /// Returns an error if an ingredient or pet id repeats, a requirement row
    /// is inconsistent, or a pet profile is out of range
    pub fn new(
        ingredients: Vec<Ingredient>,
        requirements: Vec<NutritionRequirement>,
        pets: Vec<PetProfile>,
        recipes: Vec<Recipe>,
    ) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();
        for ingredient in ingredients {
            let id = ingredient.id;
            if by_id.insert(id, ingredient).is_some() {
                return Err(CatalogError::Invalid(format!("duplicate ingredient id {id}")));
            }
        }

        let requirements = RequirementTable::new(requirements)
            .map_err(|error| CatalogError::Invalid(error.message))?;

        let mut pets_by_id = BTreeMap::new();
        for pet in pets {
            pet.validate().map_err(|error| {
                CatalogError::Invalid(format!("pet {}: {}", pet.id, error.message))
            })?;
            let id = pet.id;
            if pets_by_id.insert(id, pet).is_some() {
                return Err(CatalogError::Invalid(format!("duplicate pet id {id}")));
            }
        }

        let mut recipe_ids = BTreeSet::new();
        for recipe in &recipes {
            if !recipe_ids.insert(recipe.id) {
                return Err(CatalogError::Invalid(format!("duplicate recipe id {}", recipe.id)));
            }
        }

        debug!(
            ingredients = by_id.len(),
            requirements = requirements.len(),
            pets = pets_by_id.len(),
            recipes = recipes.len(),
            "Built reference catalog"
        );
        Ok(Self {
            ingredients: by_id,
            requirements,
            pets: pets_by_id,
            recipes,
        })
    }

    /// Parse a catalog document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the records are inconsistent
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(
            document.ingredients,
            document.requirements,
            document.pets,
            document.recipes,
        )
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(path = %path.display(), "Loaded reference catalog");
        Ok(catalog)
    }

    /// The bundled starter dataset
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails validation
    pub fn default_dataset() -> AppResult<Self> {
        Ok(Self::from_json_str(DEFAULT_DATASET)?)
    }

    /// Add or replace a pet profile
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is out of range
    pub fn with_pet(mut self, pet: PetProfile) -> AppResult<Self> {
        pet.validate()?;
        self.pets.insert(pet.id, pet);
        Ok(self)
    }

    /// Append a recipe
    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.retain(|existing| existing.id != recipe.id);
        self.recipes.push(recipe);
        self
    }

    /// Ingredient by id
    #[must_use]
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// Every ingredient keyed by id
    #[must_use]
    pub const fn ingredients(&self) -> &BTreeMap<IngredientId, Ingredient> {
        &self.ingredients
    }

    /// Requirement table
    #[must_use]
    pub const fn requirements(&self) -> &RequirementTable {
        &self.requirements
    }

    /// Every stored recipe, recommendable or not
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl IngredientRepository for ReferenceCatalog {
    fn ingredients_by_ids(&self, ids: &BTreeSet<IngredientId>) -> AppResult<Vec<Ingredient>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.ingredients.get(id))
            .cloned()
            .collect())
    }

    fn common_allergens(&self) -> AppResult<Vec<Ingredient>> {
        Ok(self
            .ingredients
            .values()
            .filter(|ingredient| ingredient.common_allergen)
            .cloned()
            .collect())
    }
}

impl RequirementRepository for ReferenceCatalog {
    fn find_requirement(
        &self,
        species: Species,
        life_stage: LifeStage,
        activity_level: Option<ActivityLevel>,
        weight_kg: f64,
    ) -> AppResult<Option<NutritionRequirement>> {
        Ok(self
            .requirements
            .lookup(species, life_stage, activity_level, weight_kg)
            .cloned())
    }
}

impl PetRepository for ReferenceCatalog {
    fn pet_by_id(&self, id: PetId) -> AppResult<Option<PetProfile>> {
        Ok(self.pets.get(&id).cloned())
    }
}

impl RecipeRepository for ReferenceCatalog {
    fn candidate_recipes(&self, limit: Option<usize>) -> AppResult<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| recipe.is_recommendable())
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
