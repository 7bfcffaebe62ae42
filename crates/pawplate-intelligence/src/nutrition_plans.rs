// ABOUTME: Preset nutrition plans with category ratios and macro targets for dogs and cats
// ABOUTME: Plan selection by species, age, and special needs; portion and daily amount helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Nutrition Plans
//!
//! Each plan fixes the share of every ingredient category in a recipe and
//! the macro targets the finished recipe should hit. Plans feed two things:
//! weight suggestions when a user assembles a recipe from chosen
//! ingredients, and fallback targets for `nutrition_match` when no
//! requirement row exists for a pet.

use crate::requirement_evaluator::MacroTargets;
use pawplate_core::constants::physiology::{
    cat_kcal_per_kg, dog_kcal_per_kg, FOOD_KCAL_PER_GRAM, JUVENILE_MAX_AGE_YEARS,
    SENIOR_MIN_AGE_YEARS,
};
use pawplate_core::errors::{AppError, AppResult};
use pawplate_core::models::{
    Ingredient, IngredientCategory, IngredientId, NutrientBand, NutritionRequirement,
    SpecialNeed, Species,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Preset plan identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionProfileKind {
    /// Healthy adult dogs
    BasicDog,
    /// Healthy adult cats
    BasicCat,
    /// Working and high-energy dogs
    ActiveDog,
    /// Dogs seven years and older
    SeniorDog,
    /// Cats seven years and older
    SeniorCat,
    /// Calorie-restricted weight management
    WeightLoss,
    /// Protein- and phosphorus-restricted renal support
    KidneySupport,
    /// Omega-rich skin and coat support
    CoatHealth,
    /// Common-allergen avoidance
    AllergyFriendly,
}

impl NutritionProfileKind {
    /// All kinds in declaration order
    pub const ALL: [Self; 9] = [
        Self::BasicDog,
        Self::BasicCat,
        Self::ActiveDog,
        Self::SeniorDog,
        Self::SeniorCat,
        Self::WeightLoss,
        Self::KidneySupport,
        Self::CoatHealth,
        Self::AllergyFriendly,
    ];

    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicDog => "basic_dog",
            Self::BasicCat => "basic_cat",
            Self::ActiveDog => "active_dog",
            Self::SeniorDog => "senior_dog",
            Self::SeniorCat => "senior_cat",
            Self::WeightLoss => "weight_loss",
            Self::KidneySupport => "kidney_support",
            Self::CoatHealth => "coat_health",
            Self::AllergyFriendly => "allergy_friendly",
        }
    }

    /// Plan addressing a special need
    #[must_use]
    pub const fn for_need(need: SpecialNeed) -> Self {
        match need {
            SpecialNeed::WeightLoss => Self::WeightLoss,
            SpecialNeed::KidneySupport => Self::KidneySupport,
            SpecialNeed::CoatHealth => Self::CoatHealth,
            SpecialNeed::AllergyFriendly => Self::AllergyFriendly,
        }
    }
}

impl fmt::Display for NutritionProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NutritionProfileKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown nutrition plan: {s}")))
    }
}

/// Share of each ingredient category in a plan, summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryRatios {
    /// Red meat share
    pub red_meat: f64,
    /// White meat share
    pub white_meat: f64,
    /// Fish share
    pub fish: f64,
    /// Organ meat share
    pub organs: f64,
    /// Vegetable share
    pub vegetables: f64,
    /// Fruit share
    pub fruits: f64,
    /// Grain share
    pub grains: f64,
}

impl CategoryRatios {
    /// Share assigned to `category`; categories outside the plan get none
    #[must_use]
    pub const fn share(&self, category: IngredientCategory) -> f64 {
        match category {
            IngredientCategory::RedMeat => self.red_meat,
            IngredientCategory::WhiteMeat => self.white_meat,
            IngredientCategory::Fish => self.fish,
            IngredientCategory::Organs => self.organs,
            IngredientCategory::Vegetables => self.vegetables,
            IngredientCategory::Fruits => self.fruits,
            IngredientCategory::Grains => self.grains,
            IngredientCategory::Dairy
            | IngredientCategory::Supplements
            | IngredientCategory::Oils
            | IngredientCategory::Dangerous => 0.0,
        }
    }

    /// Sum of every share
    #[must_use]
    pub fn total(&self) -> f64 {
        IngredientCategory::ALL
            .into_iter()
            .map(|category| self.share(category))
            .sum()
    }

    /// Combined share of animal-protein categories
    #[must_use]
    pub fn protein_sources(&self) -> f64 {
        self.red_meat + self.white_meat + self.fish + self.organs
    }

    /// Shares sum to 1 within 1%
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (self.total() - 1.0).abs() < 0.01
    }
}

/// Macro and energy targets of a plan (percent of weight, kcal per kg body weight)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTargets {
    /// Protein band
    pub protein: NutrientBand,
    /// Fat band
    pub fat: NutrientBand,
    /// Carbohydrate ceiling
    pub carbohydrate_max: f64,
    /// Calcium:phosphorus band
    pub calcium_phosphorus_ratio: NutrientBand,
    /// Daily energy per kg body weight
    pub calories_per_kg: f64,
}

impl PlanTargets {
    const fn new(protein: (f64, f64), fat: (f64, f64), carb_max: f64, kcal: f64) -> Self {
        Self {
            protein: NutrientBand::between(protein.0, protein.1),
            fat: NutrientBand::between(fat.0, fat.1),
            carbohydrate_max: carb_max,
            calcium_phosphorus_ratio: NutrientBand::between(1.0, 2.0),
            calories_per_kg: kcal,
        }
    }

    /// Targets for `nutrition_match`
    #[must_use]
    pub const fn macro_targets(&self) -> MacroTargets {
        MacroTargets {
            protein: self.protein,
            fat: self.fat,
            carbohydrate_max: Some(self.carbohydrate_max),
        }
    }
}

/// A preset nutrition plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionPlan {
    /// Identifier
    pub kind: NutritionProfileKind,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Category shares
    pub category_ratios: CategoryRatios,
    /// Macro targets
    pub targets: PlanTargets,
    /// Feeding notes
    pub notes: &'static [&'static str],
}

const fn ratios(shares: [f64; 7]) -> CategoryRatios {
    CategoryRatios {
        red_meat: shares[0],
        white_meat: shares[1],
        fish: shares[2],
        organs: shares[3],
        vegetables: shares[4],
        fruits: shares[5],
        grains: shares[6],
    }
}

/// Built-in definition of a plan; some kinds have none
#[must_use]
pub fn standard_plan(kind: NutritionProfileKind) -> Option<NutritionPlan> {
    let plan = match kind {
        NutritionProfileKind::BasicDog => NutritionPlan {
            kind,
            name: "Basic Adult Dog Formula",
            description: "Balanced nutrition formula for healthy adult dogs",
            category_ratios: ratios([0.35, 0.25, 0.10, 0.05, 0.15, 0.05, 0.05]),
            targets: PlanTargets::new((18.0, 30.0), (5.5, 15.0), 25.0, 95.0),
            notes: &[
                "Suitable for healthy adult dogs aged 1-7",
                "Maintains weight and daily activity",
            ],
        },
        NutritionProfileKind::BasicCat => NutritionPlan {
            kind,
            name: "Basic Adult Cat Formula",
            description: "High-protein formula for healthy adult cats",
            category_ratios: ratios([0.20, 0.35, 0.25, 0.10, 0.08, 0.02, 0.0]),
            targets: PlanTargets::new((26.0, 45.0), (9.0, 20.0), 10.0, 85.0),
            notes: &[
                "Cats are obligate carnivores requiring high protein",
                "Taurine supplementation essential",
            ],
        },
        NutritionProfileKind::ActiveDog => NutritionPlan {
            kind,
            name: "Active Dog Formula",
            description: "High-energy formula for active and working dogs",
            category_ratios: ratios([0.40, 0.25, 0.10, 0.05, 0.12, 0.03, 0.05]),
            targets: PlanTargets::new((22.0, 35.0), (8.0, 18.0), 20.0, 130.0),
            notes: &[
                "Ideal for working dogs and active breeds",
                "Enhanced protein and fat intake",
            ],
        },
        NutritionProfileKind::SeniorDog => NutritionPlan {
            kind,
            name: "Senior Dog Formula",
            description: "Easily digestible formula for dogs 7+ years old",
            category_ratios: ratios([0.25, 0.35, 0.15, 0.05, 0.15, 0.05, 0.0]),
            targets: PlanTargets::new((18.0, 25.0), (5.5, 12.0), 15.0, 80.0),
            notes: &[
                "Easily digestible proteins",
                "Enhanced omega-3 fatty acids",
                "Reduced calorie intake",
            ],
        },
        NutritionProfileKind::WeightLoss => NutritionPlan {
            kind,
            name: "Weight Management Formula",
            description: "For overweight pets requiring weight loss",
            category_ratios: ratios([0.15, 0.45, 0.15, 0.05, 0.20, 0.0, 0.0]),
            targets: PlanTargets::new((22.0, 30.0), (3.0, 8.0), 10.0, 70.0),
            notes: &[
                "High protein, low fat composition",
                "Increased satiety",
                "Strict calorie control",
            ],
        },
        NutritionProfileKind::KidneySupport => NutritionPlan {
            kind,
            name: "Kidney Support Formula",
            description: "Low protein, low phosphorus formula for kidney issues",
            category_ratios: ratios([0.15, 0.30, 0.10, 0.0, 0.30, 0.10, 0.05]),
            targets: PlanTargets::new((14.0, 18.0), (5.5, 12.0), 30.0, 85.0),
            notes: &[
                "Restricted protein and phosphorus",
                "Requires veterinary supervision",
                "High-quality proteins only",
            ],
        },
        NutritionProfileKind::CoatHealth => NutritionPlan {
            kind,
            name: "Coat Health Formula",
            description: "Promotes healthy coat and skin condition",
            category_ratios: ratios([0.25, 0.20, 0.30, 0.05, 0.15, 0.05, 0.0]),
            targets: PlanTargets::new((22.0, 30.0), (8.0, 15.0), 20.0, 95.0),
            notes: &[
                "Rich in omega-3 fatty acids",
                "High-quality proteins",
                "Enhanced vitamin E and zinc",
            ],
        },
        NutritionProfileKind::SeniorCat | NutritionProfileKind::AllergyFriendly => return None,
    };
    Some(plan)
}

/// Immutable set of nutrition plans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionPlanCatalog {
    plans: BTreeMap<NutritionProfileKind, NutritionPlan>,
}

impl Default for NutritionPlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl NutritionPlanCatalog {
    /// Catalog of every built-in plan
    #[must_use]
    pub fn standard() -> Self {
        Self {
            plans: NutritionProfileKind::ALL
                .into_iter()
                .filter_map(|kind| standard_plan(kind).map(|plan| (kind, plan)))
                .collect(),
        }
    }

    /// Plan for `kind`
    #[must_use]
    pub fn get(&self, kind: NutritionProfileKind) -> Option<&NutritionPlan> {
        self.plans.get(&kind)
    }

    /// Every defined plan
    pub fn plans(&self) -> impl Iterator<Item = &NutritionPlan> {
        self.plans.values()
    }

    /// First defined plan among the kinds suitable for a pet
    #[must_use]
    pub fn first_suitable(
        &self,
        species: Species,
        age_years: f64,
        needs: &BTreeSet<SpecialNeed>,
    ) -> Option<&NutritionPlan> {
        suitable_plans(species, age_years, needs)
            .into_iter()
            .find_map(|kind| self.get(kind))
    }
}

/// Plans for a pet: base plans by species and age, then one per special need
#[must_use]
pub fn suitable_plans(
    species: Species,
    age_years: f64,
    needs: &BTreeSet<SpecialNeed>,
) -> Vec<NutritionProfileKind> {
    let base: &[NutritionProfileKind] = match species {
        Species::Dog if age_years >= SENIOR_MIN_AGE_YEARS => &[NutritionProfileKind::SeniorDog],
        Species::Dog => &[NutritionProfileKind::BasicDog, NutritionProfileKind::ActiveDog],
        Species::Cat => &[NutritionProfileKind::BasicCat],
    };
    let mut plans: Vec<NutritionProfileKind> = Vec::with_capacity(base.len() + needs.len());
    for kind in base
        .iter()
        .copied()
        .chain(needs.iter().map(|&need| NutritionProfileKind::for_need(need)))
    {
        if !plans.contains(&kind) {
            plans.push(kind);
        }
    }
    plans
}

/// Split `total_weight` across `ingredients` by the plan's category shares
///
/// Each category's share is divided evenly among the chosen ingredients of
/// that category. Ingredients in categories without a share get no weight.
///
/// # Errors
///
/// Returns an error if `total_weight` is not a finite positive number
pub fn suggest_ingredient_weights(
    plan: &NutritionPlan,
    total_weight: f64,
    ingredients: &[&Ingredient],
) -> AppResult<BTreeMap<IngredientId, f64>> {
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(AppError::out_of_range("total_weight", total_weight));
    }
    let mut by_category: BTreeMap<IngredientCategory, BTreeSet<IngredientId>> = BTreeMap::new();
    for ingredient in ingredients {
        by_category
            .entry(ingredient.category)
            .or_default()
            .insert(ingredient.id);
    }

    let mut weights = BTreeMap::new();
    for (category, ids) in &by_category {
        let share = plan.category_ratios.share(*category);
        if share <= 0.0 || ids.is_empty() {
            continue;
        }
        let per_ingredient = total_weight * share / ids.len() as f64;
        for id in ids {
            weights.insert(*id, per_ingredient);
        }
    }
    Ok(weights)
}

/// Daily energy and food amount for a pet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFoodAmount {
    /// Energy factor applied
    pub calories_per_kg: f64,
    /// Daily energy in kcal
    pub daily_calories: f64,
    /// Daily food in grams
    pub food_grams: f64,
}

/// Daily energy and food for a pet by species and age
///
/// # Errors
///
/// Returns an error if age is negative or weight is not positive
pub fn daily_food_amount(
    species: Species,
    age_years: f64,
    weight_kg: f64,
) -> AppResult<DailyFoodAmount> {
    if !age_years.is_finite() || age_years < 0.0 {
        return Err(AppError::out_of_range("age_years", age_years));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::out_of_range("weight_kg", weight_kg));
    }
    let calories_per_kg = match species {
        Species::Dog if age_years < JUVENILE_MAX_AGE_YEARS => dog_kcal_per_kg::JUVENILE,
        Species::Dog if age_years >= SENIOR_MIN_AGE_YEARS => dog_kcal_per_kg::SENIOR,
        Species::Dog => dog_kcal_per_kg::ADULT,
        Species::Cat if age_years < JUVENILE_MAX_AGE_YEARS => cat_kcal_per_kg::JUVENILE,
        Species::Cat if age_years >= SENIOR_MIN_AGE_YEARS => cat_kcal_per_kg::SENIOR,
        Species::Cat => cat_kcal_per_kg::ADULT,
    };
    let daily_calories = calories_per_kg * weight_kg;
    Ok(DailyFoodAmount {
        calories_per_kg,
        daily_calories,
        food_grams: daily_calories / FOOD_KCAL_PER_GRAM,
    })
}

/// Daily needs derived from a requirement row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyNeeds {
    /// Daily energy in kcal
    pub calories: f64,
    /// Daily dry matter in kg
    pub dry_matter_kg: f64,
}

/// Daily energy and dry matter for a pet of `weight_kg` under `requirement`
#[must_use]
pub fn daily_needs(requirement: &NutritionRequirement, weight_kg: f64) -> DailyNeeds {
    DailyNeeds {
        calories: requirement.daily_calories(weight_kg),
        dry_matter_kg: requirement.daily_dry_matter_kg(weight_kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawplate_core::models::NutrientProfile;

    #[test]
    fn test_every_plan_ratio_sums_to_one() {
        let catalog = NutritionPlanCatalog::standard();
        assert_eq!(catalog.plans().count(), 7);
        for plan in catalog.plans() {
            assert!(plan.category_ratios.is_valid(), "{} ratios", plan.kind);
        }
        assert!(catalog.get(NutritionProfileKind::SeniorCat).is_none());
        assert!(catalog.get(NutritionProfileKind::AllergyFriendly).is_none());
    }

    #[test]
    fn test_suitable_plans_by_age_and_needs() {
        let none = BTreeSet::new();
        assert_eq!(
            suitable_plans(Species::Dog, 3.0, &none),
            vec![NutritionProfileKind::BasicDog, NutritionProfileKind::ActiveDog]
        );
        assert_eq!(
            suitable_plans(Species::Dog, 9.0, &none),
            vec![NutritionProfileKind::SeniorDog]
        );
        let needs: BTreeSet<SpecialNeed> =
            [SpecialNeed::KidneySupport, SpecialNeed::AllergyFriendly].into();
        assert_eq!(
            suitable_plans(Species::Cat, 12.0, &needs),
            vec![
                NutritionProfileKind::BasicCat,
                NutritionProfileKind::KidneySupport,
                NutritionProfileKind::AllergyFriendly
            ]
        );
    }

    #[test]
    fn test_weights_split_evenly_within_category() {
        let plan = standard_plan(NutritionProfileKind::BasicDog).unwrap();
        let beef = Ingredient::new(1, "Beef", IngredientCategory::RedMeat, NutrientProfile::default());
        let lamb = Ingredient::new(2, "Lamb", IngredientCategory::RedMeat, NutrientProfile::default());
        let oil = Ingredient::new(3, "Fish oil", IngredientCategory::Oils, NutrientProfile::default());
        let weights = suggest_ingredient_weights(&plan, 1000.0, &[&beef, &lamb, &oil]).unwrap();
        assert!((weights[&IngredientId(1)] - 175.0).abs() < 1e-9);
        assert!((weights[&IngredientId(2)] - 175.0).abs() < 1e-9);
        assert!(!weights.contains_key(&IngredientId(3)));
        assert!(suggest_ingredient_weights(&plan, 0.0, &[&beef]).is_err());
    }

    #[test]
    fn test_daily_food_amount() {
        let adult_dog = daily_food_amount(Species::Dog, 4.0, 10.0).unwrap();
        assert!((adult_dog.daily_calories - 950.0).abs() < 1e-9);
        assert!((adult_dog.food_grams - 950.0 / 3.5).abs() < 1e-9);
        let kitten = daily_food_amount(Species::Cat, 0.5, 2.0).unwrap();
        assert!((kitten.calories_per_kg - 120.0).abs() < f64::EPSILON);
        assert!(daily_food_amount(Species::Cat, 3.0, 0.0).is_err());
    }
}
