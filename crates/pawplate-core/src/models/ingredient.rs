// ABOUTME: Ingredient reference records with category, per-100g nutrients, and safety flags
// ABOUTME: Immutable data consumed by aggregation, similarity, and safety checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::nutrient::NutrientProfile;
use super::pet::Species;
use crate::errors::AppError;

/// Ingredient identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub u32);

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for IngredientId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Closed ingredient category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    /// Beef, lamb, pork
    RedMeat,
    /// Poultry and eggs
    WhiteMeat,
    /// Fish and seafood
    Fish,
    /// Liver, heart, kidney, gizzard
    Organs,
    /// Vegetables and tubers
    Vegetables,
    /// Fruits
    Fruits,
    /// Grains and pseudo-grains
    Grains,
    /// Dairy products
    Dairy,
    /// Supplements and additives
    Supplements,
    /// Oils and fats
    Oils,
    /// Foods that must never be fed
    Dangerous,
}

impl IngredientCategory {
    /// All categories in declaration order
    pub const ALL: [Self; 11] = [
        Self::RedMeat,
        Self::WhiteMeat,
        Self::Fish,
        Self::Organs,
        Self::Vegetables,
        Self::Fruits,
        Self::Grains,
        Self::Dairy,
        Self::Supplements,
        Self::Oils,
        Self::Dangerous,
    ];

    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RedMeat => "red_meat",
            Self::WhiteMeat => "white_meat",
            Self::Fish => "fish",
            Self::Organs => "organs",
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Grains => "grains",
            Self::Dairy => "dairy",
            Self::Supplements => "supplements",
            Self::Oils => "oils",
            Self::Dangerous => "dangerous",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown ingredient category: {s}")))
    }
}

const fn default_true() -> bool {
    true
}

/// Ingredient reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: IngredientId,
    /// Display name
    pub name: String,
    /// Category
    pub category: IngredientCategory,
    /// Nutrients per 100g
    #[serde(default)]
    pub nutrients: NutrientProfile,
    /// Safe to feed to dogs
    #[serde(default = "default_true")]
    pub safe_for_dogs: bool,
    /// Safe to feed to cats
    #[serde(default = "default_true")]
    pub safe_for_cats: bool,
    /// Frequently triggers food allergies
    #[serde(default)]
    pub common_allergen: bool,
}

impl Ingredient {
    /// Create an ingredient that is safe for both species and not a common allergen
    pub fn new(
        id: impl Into<IngredientId>,
        name: impl Into<String>,
        category: IngredientCategory,
        nutrients: NutrientProfile,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            nutrients: nutrients.sanitized(),
            safe_for_dogs: true,
            safe_for_cats: true,
            common_allergen: false,
        }
    }

    /// Set the species safety flags
    #[must_use]
    pub const fn with_safety(mut self, safe_for_dogs: bool, safe_for_cats: bool) -> Self {
        self.safe_for_dogs = safe_for_dogs;
        self.safe_for_cats = safe_for_cats;
        self
    }

    /// Mark as a common allergen
    #[must_use]
    pub const fn as_common_allergen(mut self) -> Self {
        self.common_allergen = true;
        self
    }

    /// Whether the species flag allows feeding this ingredient
    #[must_use]
    pub const fn is_safe_for(&self, species: Species) -> bool {
        match species {
            Species::Dog => self.safe_for_dogs,
            Species::Cat => self.safe_for_cats,
        }
    }

    /// Dangerous for `species`: a dangerous category or an unsafe species flag
    #[must_use]
    pub const fn is_dangerous_for(&self, species: Species) -> bool {
        matches!(self.category, IngredientCategory::Dangerous) || !self.is_safe_for(species)
    }

    /// Dangerous regardless of species
    #[must_use]
    pub const fn is_universally_dangerous(&self) -> bool {
        matches!(self.category, IngredientCategory::Dangerous)
            || (!self.safe_for_dogs && !self.safe_for_cats)
    }
}
