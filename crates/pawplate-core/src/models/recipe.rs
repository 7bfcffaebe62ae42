// ABOUTME: Recipe records, suitability flags, and the validated ingredient candidate set
// ABOUTME: RecipeCandidate rejects empty, duplicate, or non-positive ingredient lines up front
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::ingredient::IngredientId;
use super::pet::Species;
use crate::errors::{AppError, AppResult};

/// Recipe identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub Uuid);

impl RecipeId {
    /// Generate a new random recipe ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    /// Being edited by its author
    #[default]
    Draft,
    /// Visible to recommendations when public
    Published,
    /// Retired
    Archived,
}

bitflags::bitflags! {
    /// Who a recipe was written for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SuitabilityFlags: u8 {
        /// Adult dogs
        const DOGS = 0b0000_0001;
        /// Adult cats
        const CATS = 0b0000_0010;
        /// Puppies
        const PUPPIES = 0b0000_0100;
        /// Kittens
        const KITTENS = 0b0000_1000;
        /// Seniors of either species
        const SENIORS = 0b0001_0000;
    }
}

impl SuitabilityFlags {
    /// Flags of a newly created recipe: both adult species
    #[must_use]
    pub const fn both_species() -> Self {
        Self::DOGS.union(Self::CATS)
    }

    /// Species flag matches
    #[must_use]
    pub const fn suits_species(self, species: Species) -> bool {
        match species {
            Species::Dog => self.contains(Self::DOGS),
            Species::Cat => self.contains(Self::CATS),
        }
    }

    /// Juvenile flag for the species matches
    #[must_use]
    pub const fn suits_juvenile(self, species: Species) -> bool {
        match species {
            Species::Dog => self.contains(Self::PUPPIES),
            Species::Cat => self.contains(Self::KITTENS),
        }
    }

    /// Senior flag matches
    #[must_use]
    pub const fn suits_seniors(self) -> bool {
        self.contains(Self::SENIORS)
    }
}

impl Default for SuitabilityFlags {
    fn default() -> Self {
        Self::both_species()
    }
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Weight in grams
    pub weight_grams: f64,
}

impl RecipeLine {
    /// Create a line
    pub fn new(ingredient_id: impl Into<IngredientId>, weight_grams: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            weight_grams,
        }
    }
}

/// Stored recipe as fetched from the candidate pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: RecipeId,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Publication state
    #[serde(default)]
    pub status: RecipeStatus,
    /// Shared with other users
    #[serde(default)]
    pub is_public: bool,
    /// Intended audience
    #[serde(default)]
    pub suitability: SuitabilityFlags,
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<RecipeLine>,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Create an unpublished recipe
    pub fn new(name: impl Into<String>, ingredients: Vec<RecipeLine>) -> Self {
        Self {
            id: RecipeId::new(),
            name: name.into(),
            description: None,
            status: RecipeStatus::Draft,
            is_public: false,
            suitability: SuitabilityFlags::default(),
            ingredients,
            created_at: Utc::now(),
        }
    }

    /// Mark as published and public
    #[must_use]
    pub const fn published(mut self) -> Self {
        self.status = RecipeStatus::Published;
        self.is_public = true;
        self
    }

    /// Replace the suitability flags
    #[must_use]
    pub const fn with_suitability(mut self, suitability: SuitabilityFlags) -> Self {
        self.suitability = suitability;
        self
    }

    /// Sum of positive line weights
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.ingredients
            .iter()
            .map(|line| line.weight_grams)
            .filter(|weight| weight.is_finite() && *weight > 0.0)
            .sum()
    }

    /// Distinct ingredient IDs
    #[must_use]
    pub fn ingredient_ids(&self) -> BTreeSet<IngredientId> {
        self.ingredients
            .iter()
            .map(|line| line.ingredient_id)
            .collect()
    }

    /// Published, public and non-empty
    #[must_use]
    pub fn is_recommendable(&self) -> bool {
        self.status == RecipeStatus::Published && self.is_public && self.total_weight() > 0.0
    }
}

/// Validated ingredient set: non-empty, unique IDs, finite positive weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCandidate {
    lines: Vec<RecipeLine>,
}

impl RecipeCandidate {
    /// Validate raw `(ingredient, grams)` lines
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, an ID repeats, or a weight is not
    /// a finite positive number
    pub fn new(lines: Vec<RecipeLine>) -> AppResult<Self> {
        if lines.is_empty() {
            return Err(AppError::missing_field("ingredients"));
        }
        let mut seen = BTreeSet::new();
        for line in &lines {
            if !line.weight_grams.is_finite() || line.weight_grams <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "Ingredient {} has non-positive weight {}",
                    line.ingredient_id, line.weight_grams
                ))
                .with_resource_id(line.ingredient_id.to_string()));
            }
            if !seen.insert(line.ingredient_id) {
                return Err(AppError::invalid_input(format!(
                    "Ingredient {} appears more than once",
                    line.ingredient_id
                ))
                .with_resource_id(line.ingredient_id.to_string()));
            }
        }
        Ok(Self { lines })
    }

    /// Lines in caller order
    #[must_use]
    pub fn lines(&self) -> &[RecipeLine] {
        &self.lines
    }

    /// Distinct ingredient IDs
    #[must_use]
    pub fn ingredient_ids(&self) -> BTreeSet<IngredientId> {
        self.lines.iter().map(|line| line.ingredient_id).collect()
    }

    /// Sum of weights in grams
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.lines.iter().map(|line| line.weight_grams).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_rejects_invalid_lines() {
        assert!(RecipeCandidate::new(Vec::new()).is_err());
        assert!(RecipeCandidate::new(vec![RecipeLine::new(1, 0.0)]).is_err());
        assert!(RecipeCandidate::new(vec![RecipeLine::new(1, f64::NAN)]).is_err());
        assert!(
            RecipeCandidate::new(vec![RecipeLine::new(1, 10.0), RecipeLine::new(1, 5.0)]).is_err()
        );
        let candidate =
            RecipeCandidate::new(vec![RecipeLine::new(1, 300.0), RecipeLine::new(2, 100.0)]);
        assert!(candidate.is_ok_and(|c| (c.total_weight() - 400.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_recommendable_requires_published_public_and_weight() {
        let draft = Recipe::new("Draft", vec![RecipeLine::new(1, 100.0)]);
        assert!(!draft.is_recommendable());
        let published = draft.published();
        assert!(published.is_recommendable());
        let empty = Recipe::new("Empty", Vec::new()).published();
        assert!(!empty.is_recommendable());
    }

    #[test]
    fn test_suitability_flags_per_species() {
        let flags = SuitabilityFlags::DOGS | SuitabilityFlags::PUPPIES;
        assert!(flags.suits_species(Species::Dog));
        assert!(!flags.suits_species(Species::Cat));
        assert!(flags.suits_juvenile(Species::Dog));
        assert!(!flags.suits_juvenile(Species::Cat));
        assert!(!flags.suits_seniors());
    }
}
