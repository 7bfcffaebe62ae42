// ABOUTME: Pet profile model with species, life stage, activity, special needs, and allergens
// ABOUTME: Special-needs free text is parsed into closed tags at the data-entry boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;
use uuid::Uuid;

use super::ingredient::IngredientId;
use crate::constants::physiology::{JUVENILE_MAX_AGE_YEARS, SENIOR_MIN_AGE_YEARS};
use crate::errors::{AppError, AppResult};

/// Pet identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub Uuid);

impl PetId {
    /// Generate a new random pet ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Dog
    Dog,
    /// Cat
    Cat,
}

impl Species {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" | "canine" | "puppy" => Ok(Self::Dog),
            "cat" | "feline" | "kitten" => Ok(Self::Cat),
            other => Err(AppError::invalid_input(format!("Unknown species: {other}"))),
        }
    }
}

/// Age bracket that selects a requirement row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    /// Puppy or kitten (under one year)
    PuppyKitten,
    /// Adult maintenance
    Adult,
    /// Seven years and older
    Senior,
    /// Growth of breeds expected to exceed 70 lb as adults
    LargeBreedPuppy,
    /// Gestation
    Pregnant,
    /// Lactation
    Lactating,
}

impl LifeStage {
    /// Bracket implied by age alone
    #[must_use]
    pub fn from_age(age_years: f64) -> Self {
        if age_years < JUVENILE_MAX_AGE_YEARS {
            Self::PuppyKitten
        } else if age_years >= SENIOR_MIN_AGE_YEARS {
            Self::Senior
        } else {
            Self::Adult
        }
    }

    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PuppyKitten => "puppy_kitten",
            Self::Adult => "adult",
            Self::Senior => "senior",
            Self::LargeBreedPuppy => "large_breed_puppy",
            Self::Pregnant => "pregnant",
            Self::Lactating => "lactating",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifeStage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "puppy_kitten" | "puppy" | "kitten" | "growth" => Ok(Self::PuppyKitten),
            "adult" | "maintenance" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            "large_breed_puppy" => Ok(Self::LargeBreedPuppy),
            "pregnant" | "gestation" => Ok(Self::Pregnant),
            "lactating" | "lactation" => Ok(Self::Lactating),
            other => Err(AppError::invalid_input(format!("Unknown life stage: {other}"))),
        }
    }
}

/// Daily activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Mostly indoors, short walks
    Low,
    /// Regular daily exercise
    Moderate,
    /// Working or sporting animals
    High,
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" | "medium" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(AppError::invalid_input(format!("Unknown activity level: {other}"))),
        }
    }
}

/// Severity of a confirmed allergic reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergySeverity {
    /// Mild reaction
    Mild,
    /// Moderate reaction
    Moderate,
    /// Severe reaction
    Severe,
}

impl AllergySeverity {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for AllergySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllergySeverity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            other => Err(AppError::invalid_input(format!("Unknown allergy severity: {other}"))),
        }
    }
}

/// Structured special-needs tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialNeed {
    /// Overweight or obese, needs calorie restriction
    WeightLoss,
    /// Renal disease, needs protein and phosphorus restriction
    KidneySupport,
    /// Skin and coat condition
    CoatHealth,
    /// Food sensitivities, avoid common allergens
    AllergyFriendly,
}

impl SpecialNeed {
    /// All tags in declaration order
    pub const ALL: [Self; 4] = [
        Self::WeightLoss,
        Self::KidneySupport,
        Self::CoatHealth,
        Self::AllergyFriendly,
    ];

    const fn pattern(self) -> &'static str {
        match self {
            Self::WeightLoss => r"(?i)\b(weight|obes\w*|overweight|diet|slim)",
            Self::KidneySupport => r"(?i)\b(kidney|renal|ckd)",
            Self::CoatHealth => r"(?i)\b(coat|skin|hair|fur)",
            Self::AllergyFriendly => r"(?i)\b(allerg\w*|hypoallergenic|sensitiv\w*)",
        }
    }

    /// Map free-text notes to tags; unmatched text yields no tags
    #[must_use]
    pub fn parse_tags(text: &str) -> BTreeSet<Self> {
        let tags: BTreeSet<Self> = Self::ALL
            .into_iter()
            .zip(special_need_patterns())
            .filter(|(_, pattern)| matches!(pattern, Some(re) if re.is_match(text)))
            .map(|(need, _)| need)
            .collect();
        debug!(input = text, ?tags, "Parsed special-needs tags");
        tags
    }
}

fn special_need_patterns() -> &'static [Option<Regex>; 4] {
    static PATTERNS: OnceLock<[Option<Regex>; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| SpecialNeed::ALL.map(|need| Regex::new(need.pattern()).ok()))
}

/// Confirmed allergy of one pet to one ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetAllergen {
    /// Offending ingredient
    pub ingredient_id: IngredientId,
    /// Reaction severity
    pub severity: AllergySeverity,
    /// Description of the reaction
    #[serde(default)]
    pub notes: Option<String>,
    /// Date the allergy was confirmed by a veterinarian
    #[serde(default)]
    pub confirmed_on: Option<NaiveDate>,
}

impl PetAllergen {
    /// Create an allergen record without notes
    pub fn new(ingredient_id: impl Into<IngredientId>, severity: AllergySeverity) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            severity,
            notes: None,
            confirmed_on: None,
        }
    }

    /// Attach reaction notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Pet profile consumed by suitability, requirement lookup, and safety checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    /// Unique identifier
    pub id: PetId,
    /// Display name
    pub name: String,
    /// Species
    pub species: Species,
    /// Age in years
    pub age_years: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Explicit life stage; derived from age when absent
    #[serde(default)]
    pub life_stage: Option<LifeStage>,
    /// Activity level; matches any requirement row when absent
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    /// Structured special-needs tags
    #[serde(default)]
    pub special_needs: BTreeSet<SpecialNeed>,
    /// Confirmed allergens
    #[serde(default)]
    pub allergens: Vec<PetAllergen>,
}

impl PetProfile {
    /// Create a validated profile with no special needs or allergens
    ///
    /// # Errors
    ///
    /// Returns an error if age or weight is negative, zero weight, or non-finite
    pub fn new(
        name: impl Into<String>,
        species: Species,
        age_years: f64,
        weight_kg: f64,
    ) -> AppResult<Self> {
        let profile = Self {
            id: PetId::new(),
            name: name.into(),
            species,
            age_years,
            weight_kg,
            life_stage: None,
            activity_level: None,
            special_needs: BTreeSet::new(),
            allergens: Vec::new(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the numeric inputs
    ///
    /// # Errors
    ///
    /// Returns an error if age is negative or weight is not strictly positive
    pub fn validate(&self) -> AppResult<()> {
        if !self.age_years.is_finite() || self.age_years < 0.0 {
            return Err(AppError::out_of_range("age_years", self.age_years));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(AppError::out_of_range("weight_kg", self.weight_kg));
        }
        Ok(())
    }

    /// Use a fixed identifier
    #[must_use]
    pub const fn with_id(mut self, id: PetId) -> Self {
        self.id = id;
        self
    }

    /// Override the derived life stage
    #[must_use]
    pub const fn with_life_stage(mut self, life_stage: LifeStage) -> Self {
        self.life_stage = Some(life_stage);
        self
    }

    /// Set the activity level
    #[must_use]
    pub const fn with_activity_level(mut self, activity_level: ActivityLevel) -> Self {
        self.activity_level = Some(activity_level);
        self
    }

    /// Add a special-needs tag
    #[must_use]
    pub fn with_special_need(mut self, need: SpecialNeed) -> Self {
        self.special_needs.insert(need);
        self
    }

    /// Add a confirmed allergen, replacing any earlier record for the same ingredient
    #[must_use]
    pub fn with_allergen(mut self, allergen: PetAllergen) -> Self {
        self.allergens
            .retain(|existing| existing.ingredient_id != allergen.ingredient_id);
        self.allergens.push(allergen);
        self
    }

    /// Effective life stage
    #[must_use]
    pub fn life_stage(&self) -> LifeStage {
        self.life_stage
            .unwrap_or_else(|| LifeStage::from_age(self.age_years))
    }

    /// Ingredient IDs of every confirmed allergen
    #[must_use]
    pub fn allergen_ids(&self) -> BTreeSet<IngredientId> {
        self.allergens
            .iter()
            .map(|allergen| allergen.ingredient_id)
            .collect()
    }
}
