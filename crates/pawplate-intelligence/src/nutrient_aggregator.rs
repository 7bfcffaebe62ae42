// ABOUTME: Weighted nutrient aggregation over recipe ingredients with lazily derived ratios
// ABOUTME: Folds entries in canonical order so totals are identical under any input permutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Nutrient Aggregator
//!
//! Scales each ingredient's per-100 g profile by `weight / 100` and sums the
//! results into a [`NutrientVector`]. Entries with a non-positive or
//! non-finite weight are skipped rather than rejected. Entries are folded in
//! a canonical order (ingredient id, then weight), so floating-point
//! accumulation does not depend on how the caller ordered them.
//!
//! Derived ratios never divide by zero: percentages fall back to 0 and
//! ratios between two nutrients are `None` when the denominator is 0.

use pawplate_core::constants::units::{GRAMS_PER_KILOGRAM, REFERENCE_PORTION_GRAMS};
use pawplate_core::models::{
    ConcentrationBasis, Ingredient, IngredientId, Nutrient, NutrientProfile,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregated nutrient totals of a set of weighted ingredients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientVector {
    /// Total amount of each nutrient in its storage unit
    pub totals: NutrientProfile,
    /// Sum of the included weights in grams
    pub total_weight: f64,
}

/// Ratios derived from a [`NutrientVector`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedRatios {
    /// Protein as percent of total weight
    pub protein_percent: f64,
    /// Fat as percent of total weight
    pub fat_percent: f64,
    /// Carbohydrate as percent of total weight
    pub carbohydrate_percent: f64,
    /// Fiber as percent of total weight
    pub fiber_percent: f64,
    /// Moisture as percent of total weight
    pub moisture_percent: f64,
    /// Energy density
    pub calories_per_100g: f64,
    /// Calcium to phosphorus, `None` without phosphorus
    pub calcium_phosphorus_ratio: Option<f64>,
    /// Omega-6 to omega-3, `None` without omega-3
    pub omega6_omega3_ratio: Option<f64>,
    /// Weight left after removing moisture, `None` when moisture data is unusable
    pub dry_matter_grams: Option<f64>,
}

impl NutrientVector {
    /// All-zero vector
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// No included weight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_weight <= 0.0
    }

    /// Total amount of one nutrient
    #[must_use]
    pub const fn amount(&self, nutrient: Nutrient) -> f64 {
        self.totals.get(nutrient)
    }

    /// Nutrient mass as percent of total weight; 0 for an empty vector
    #[must_use]
    pub fn percent_of_weight(&self, nutrient: Nutrient) -> f64 {
        percent(self.grams(nutrient), self.total_weight)
    }

    /// Energy per 100 g; 0 for an empty vector
    #[must_use]
    pub fn calories_per_100g(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.totals.calories / self.total_weight * REFERENCE_PORTION_GRAMS
        }
    }

    /// Calcium to phosphorus ratio
    #[must_use]
    pub fn calcium_phosphorus_ratio(&self) -> Option<f64> {
        ratio(self.totals.calcium, self.totals.phosphorus)
    }

    /// Omega-6 to omega-3 ratio
    #[must_use]
    pub fn omega6_omega3_ratio(&self) -> Option<f64> {
        ratio(self.totals.omega_6_fatty_acids, self.totals.omega_3_fatty_acids)
    }

    /// Weight without moisture, when moisture is recorded and below the total
    #[must_use]
    pub fn dry_matter_weight(&self) -> Option<f64> {
        let moisture = self.totals.moisture;
        (moisture > 0.0 && moisture < self.total_weight).then(|| self.total_weight - moisture)
    }

    /// Concentration of a nutrient on its requirement basis
    ///
    /// Percent-basis nutrients return percent of `denominator_grams`;
    /// per-kilogram nutrients return native units per kg of food.
    #[must_use]
    pub fn concentration(&self, nutrient: Nutrient, denominator_grams: f64) -> f64 {
        if denominator_grams <= 0.0 {
            return 0.0;
        }
        match nutrient.basis() {
            ConcentrationBasis::Percent => percent(self.grams(nutrient), denominator_grams),
            ConcentrationBasis::PerKilogram => {
                self.amount(nutrient) / denominator_grams * GRAMS_PER_KILOGRAM
            }
        }
    }

    /// All derived ratios
    #[must_use]
    pub fn ratios(&self) -> DerivedRatios {
        DerivedRatios {
            protein_percent: self.percent_of_weight(Nutrient::Protein),
            fat_percent: self.percent_of_weight(Nutrient::Fat),
            carbohydrate_percent: self.percent_of_weight(Nutrient::Carbohydrate),
            fiber_percent: self.percent_of_weight(Nutrient::Fiber),
            moisture_percent: self.percent_of_weight(Nutrient::Moisture),
            calories_per_100g: self.calories_per_100g(),
            calcium_phosphorus_ratio: self.calcium_phosphorus_ratio(),
            omega6_omega3_ratio: self.omega6_omega3_ratio(),
            dry_matter_grams: self.dry_matter_weight(),
        }
    }

    fn grams(&self, nutrient: Nutrient) -> f64 {
        self.amount(nutrient) * nutrient.unit().grams_factor().unwrap_or(1.0)
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

fn is_included(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Included entries sorted into canonical fold order
fn canonical<'a>(entries: &[(&'a Ingredient, f64)]) -> Vec<(&'a Ingredient, f64)> {
    let mut included: Vec<(&Ingredient, f64)> = entries
        .iter()
        .copied()
        .filter(|(_, weight)| is_included(*weight))
        .collect();
    included.sort_by(|(a, wa), (b, wb)| a.id.cmp(&b.id).then_with(|| wa.total_cmp(wb)));
    included
}

/// Aggregate weighted ingredients into a nutrient vector
#[must_use]
pub fn compute_nutrition(entries: &[(&Ingredient, f64)]) -> NutrientVector {
    let included = canonical(entries);
    let mut vector = NutrientVector::zero();
    for (ingredient, weight) in &included {
        vector
            .totals
            .add_scaled(&ingredient.nutrients, weight / REFERENCE_PORTION_GRAMS);
        vector.total_weight += weight;
    }
    if included.len() < entries.len() {
        debug!(
            skipped = entries.len() - included.len(),
            "Skipped entries with non-positive weight"
        );
    }
    vector
}

/// One ingredient's share of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientContribution {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Ingredient name
    pub name: String,
    /// Weight in grams
    pub weight_grams: f64,
    /// Share of total weight in percent
    pub weight_percent: f64,
    /// Calories contributed
    pub calories: f64,
    /// Protein contributed (g)
    pub protein: f64,
    /// Fat contributed (g)
    pub fat: f64,
    /// Carbohydrate contributed (g)
    pub carbohydrate: f64,
}

/// Per-ingredient contributions in caller order, skipping excluded weights
#[must_use]
pub fn contributions(entries: &[(&Ingredient, f64)]) -> Vec<IngredientContribution> {
    let total: f64 = entries
        .iter()
        .map(|(_, weight)| *weight)
        .filter(|weight| is_included(*weight))
        .sum();
    entries
        .iter()
        .filter(|(_, weight)| is_included(*weight))
        .map(|(ingredient, weight)| {
            let factor = weight / REFERENCE_PORTION_GRAMS;
            IngredientContribution {
                ingredient_id: ingredient.id,
                name: ingredient.name.clone(),
                weight_grams: *weight,
                weight_percent: percent(*weight, total),
                calories: ingredient.nutrients.calories * factor,
                protein: ingredient.nutrients.protein * factor,
                fat: ingredient.nutrients.fat * factor,
                carbohydrate: ingredient.nutrients.carbohydrate * factor,
            }
        })
        .collect()
}

/// Data quality issue found while aggregating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataGap {
    /// Ingredient id has no reference record
    MissingIngredient {
        /// Requested id
        ingredient_id: IngredientId,
    },
    /// Entry skipped for a non-positive or non-finite weight
    IgnoredWeight {
        /// Ingredient
        ingredient_id: IngredientId,
        /// Offending weight
        weight_grams: f64,
    },
    /// Reference record carries no nutrient values
    NoNutrientData {
        /// Ingredient
        ingredient_id: IngredientId,
    },
}

/// Aggregation result with ratios, contributions, and data gaps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Nutrient totals
    pub vector: NutrientVector,
    /// Derived ratios
    pub ratios: DerivedRatios,
    /// Per-ingredient contributions
    pub contributions: Vec<IngredientContribution>,
    /// Data quality issues
    pub gaps: Vec<DataGap>,
}

/// Aggregate resolved entries and record gaps, including unresolved ids
#[must_use]
pub fn summarize(entries: &[(&Ingredient, f64)], missing: &[IngredientId]) -> NutritionSummary {
    let vector = compute_nutrition(entries);
    let mut gaps: Vec<DataGap> = missing
        .iter()
        .map(|&ingredient_id| DataGap::MissingIngredient { ingredient_id })
        .collect();
    for (ingredient, weight) in entries {
        if !is_included(*weight) {
            gaps.push(DataGap::IgnoredWeight {
                ingredient_id: ingredient.id,
                weight_grams: *weight,
            });
        } else if ingredient.nutrients.is_empty() {
            gaps.push(DataGap::NoNutrientData {
                ingredient_id: ingredient.id,
            });
        }
    }
    NutritionSummary {
        ratios: vector.ratios(),
        contributions: contributions(entries),
        vector,
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawplate_core::models::IngredientCategory;

    fn chicken() -> Ingredient {
        Ingredient::new(
            1,
            "Chicken breast",
            IngredientCategory::WhiteMeat,
            NutrientProfile {
                calories: 165.0,
                protein: 31.0,
                fat: 3.6,
                moisture: 75.0,
                calcium: 15.0,
                phosphorus: 228.0,
                ..NutrientProfile::default()
            },
        )
    }

    fn carrot() -> Ingredient {
        Ingredient::new(
            2,
            "Carrot",
            IngredientCategory::Vegetables,
            NutrientProfile {
                calories: 41.0,
                protein: 0.9,
                fat: 0.2,
                carbohydrate: 9.6,
                fiber: 2.8,
                moisture: 88.0,
                ..NutrientProfile::default()
            },
        )
    }

    #[test]
    fn test_worked_example() {
        let (c, k) = (chicken(), carrot());
        let vector = compute_nutrition(&[(&c, 300.0), (&k, 100.0)]);
        assert!((vector.total_weight - 400.0).abs() < 1e-6);
        assert!((vector.totals.calories - 536.0).abs() < 1e-6);
        assert!((vector.totals.protein - 93.9).abs() < 1e-6);
    }

    #[test]
    fn test_permutation_invariant_bitwise() {
        let (c, k) = (chicken(), carrot());
        let forward = compute_nutrition(&[(&c, 123.4), (&k, 56.7)]);
        let backward = compute_nutrition(&[(&k, 56.7), (&c, 123.4)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_zero_weight_excluded() {
        let (c, k) = (chicken(), carrot());
        let with_zero = compute_nutrition(&[(&c, 100.0), (&k, 0.0), (&k, -5.0)]);
        let without = compute_nutrition(&[(&c, 100.0)]);
        assert_eq!(with_zero, without);
    }

    #[test]
    fn test_empty_input_guards_division() {
        let vector = compute_nutrition(&[]);
        assert!(vector.is_empty());
        let ratios = vector.ratios();
        assert!(ratios.protein_percent.abs() < f64::EPSILON);
        assert!(ratios.calories_per_100g.abs() < f64::EPSILON);
        assert_eq!(ratios.calcium_phosphorus_ratio, None);
        assert_eq!(ratios.dry_matter_grams, None);
    }

    #[test]
    fn test_concentration_per_kilogram() {
        let c = chicken();
        let vector = compute_nutrition(&[(&c, 100.0)]);
        // 228 mg phosphorus in 100 g is 2280 mg/kg
        assert!((vector.concentration(Nutrient::Phosphorus, 100.0) - 2280.0).abs() < 1e-9);
        assert!((vector.concentration(Nutrient::Protein, 100.0) - 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_reports_gaps() {
        let c = chicken();
        let summary = summarize(&[(&c, 100.0), (&c, 0.0)], &[IngredientId(99)]);
        assert_eq!(summary.contributions.len(), 1);
        assert!(summary
            .gaps
            .contains(&DataGap::MissingIngredient {
                ingredient_id: IngredientId(99)
            }));
        assert!(summary.gaps.iter().any(|gap| matches!(gap, DataGap::IgnoredWeight { .. })));
    }
}
