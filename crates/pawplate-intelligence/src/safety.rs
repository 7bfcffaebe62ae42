// ABOUTME: Allergen and dangerous-ingredient screening with advisory and blocking policies
// ABOUTME: Reports are structured data; the blocking policy turns an unsafe report into an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Safety Filter
//!
//! A candidate ingredient set is safe for a pet when it contains none of the
//! pet's confirmed allergens and no ingredient that is dangerous for the
//! pet's species. Without a pet only universally dangerous ingredients are
//! violations; a hazard for a single species becomes a warning.
//!
//! Common allergens and unresolvable ingredient ids only produce warnings.
//!
//! The allergen helpers at the bottom of this module back ingredient pickers:
//! they drop a pet's allergens from a list, group the catalog's common
//! allergens, and summarize a pet's recorded allergies.

use pawplate_core::errors::{AppError, AppResult};
use pawplate_core::models::{
    AllergySeverity, Ingredient, IngredientCategory, IngredientId, PetProfile, Species,
    SuitabilityFlags,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// How an unsafe report is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPolicy {
    /// Report only; used to pre-filter recommendations
    Advisory,
    /// Reject with a safety-violation error; used when saving recipes
    Blocking,
}

/// A candidate ingredient the pet is allergic to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenConflict {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Ingredient name, when resolvable
    pub ingredient_name: Option<String>,
    /// Reaction severity
    pub severity: AllergySeverity,
    /// Owner notes
    pub notes: Option<String>,
}

/// A candidate ingredient that must not be fed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyViolation {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Ingredient name
    pub ingredient_name: String,
    /// Reason the ingredient is rejected
    pub reason: String,
}

/// Result of screening a candidate ingredient set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyReport {
    /// No allergen conflicts and no violations
    pub is_safe: bool,
    /// Allergen conflicts, most severe first
    pub conflicts: Vec<AllergenConflict>,
    /// Dangerous ingredients
    pub violations: Vec<SafetyViolation>,
    /// Advisory messages
    pub warnings: Vec<String>,
    /// Requested ids without a reference record
    pub unknown_ingredients: Vec<IngredientId>,
}

impl SafetyReport {
    /// Apply `policy` to this report
    ///
    /// # Errors
    ///
    /// Under [`SafetyPolicy::Blocking`], returns a safety-violation error
    /// carrying the serialized report when the set is unsafe
    pub fn enforce(self, policy: SafetyPolicy) -> AppResult<Self> {
        if self.is_safe || policy == SafetyPolicy::Advisory {
            return Ok(self);
        }
        let details = serde_json::to_value(&self)?;
        Err(AppError::safety_violation(
            format!(
                "Recipe is unsafe: {} allergen conflict(s), {} dangerous ingredient(s)",
                self.conflicts.len(),
                self.violations.len()
            ),
            details,
        ))
    }
}

fn severity_warning(severity: AllergySeverity, name: &str) -> String {
    match severity {
        AllergySeverity::Severe => format!("Severe allergy: {name}"),
        AllergySeverity::Moderate => format!("Moderate allergy: {name}"),
        AllergySeverity::Mild => format!("Mild allergy: {name}"),
    }
}

fn hazard_reason(ingredient: &Ingredient, species: Option<Species>) -> String {
    if ingredient.category == IngredientCategory::Dangerous {
        return format!("{} is toxic to pets", ingredient.name);
    }
    match species {
        Some(species) => format!("{} is unsafe for {species}s", ingredient.name),
        None => format!("{} is unsafe for dogs and cats", ingredient.name),
    }
}

/// Ingredient must not be fed: dangerous for `species`, or for every species when unknown
#[must_use]
pub const fn is_hazardous(ingredient: &Ingredient, species: Option<Species>) -> bool {
    match species {
        Some(species) => ingredient.is_dangerous_for(species),
        None => ingredient.is_universally_dangerous(),
    }
}

/// Screen `ingredient_ids` against the pet's allergens and species hazards
///
/// `resolved` holds the reference records found for the requested ids;
/// ids without a record are reported as unknown.
#[must_use]
pub fn check_safety(
    ingredient_ids: &BTreeSet<IngredientId>,
    resolved: &[Ingredient],
    pet: Option<&PetProfile>,
) -> SafetyReport {
    let records: BTreeMap<IngredientId, &Ingredient> =
        resolved.iter().map(|ingredient| (ingredient.id, ingredient)).collect();
    let mut report = SafetyReport::default();

    for &id in ingredient_ids {
        let Some(ingredient) = records.get(&id) else {
            report.unknown_ingredients.push(id);
            report
                .warnings
                .push(format!("Ingredient {id} has no reference record"));
            continue;
        };

        let species = pet.map(|pet| pet.species);
        if is_hazardous(ingredient, species) {
            report.violations.push(SafetyViolation {
                ingredient_id: id,
                ingredient_name: ingredient.name.clone(),
                reason: hazard_reason(ingredient, species),
            });
        } else if species.is_none() {
            for species in [Species::Dog, Species::Cat] {
                if !ingredient.is_safe_for(species) {
                    report
                        .warnings
                        .push(format!("{} is unsafe for {species}s", ingredient.name));
                }
            }
        }

        if ingredient.common_allergen {
            report
                .warnings
                .push(format!("{} is a common allergen", ingredient.name));
        }
    }

    if let Some(pet) = pet {
        for allergen in &pet.allergens {
            if !ingredient_ids.contains(&allergen.ingredient_id) {
                continue;
            }
            let name = records
                .get(&allergen.ingredient_id)
                .map(|ingredient| ingredient.name.clone());
            report.conflicts.push(AllergenConflict {
                ingredient_id: allergen.ingredient_id,
                ingredient_name: name,
                severity: allergen.severity,
                notes: allergen.notes.clone(),
            });
        }
        report.conflicts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
        });
        for conflict in &report.conflicts {
            let fallback = conflict.ingredient_id.to_string();
            let name = conflict.ingredient_name.as_deref().unwrap_or(&fallback);
            report.warnings.push(severity_warning(conflict.severity, name));
        }
    }

    report.is_safe = report.conflicts.is_empty() && report.violations.is_empty();
    if report.is_safe {
        debug!(
            ingredients = ingredient_ids.len(),
            warnings = report.warnings.len(),
            "Ingredient set passed safety screening"
        );
    } else {
        warn!(
            conflicts = report.conflicts.len(),
            violations = report.violations.len(),
            "Ingredient set failed safety screening"
        );
    }
    report
}

/// Narrow `flags` to the species every ingredient is safe for
///
/// Clears the dog flags when any ingredient is unsafe for dogs and the cat
/// flags likewise; senior flags are left alone.
#[must_use]
pub fn species_suitability(
    ingredients: &[Ingredient],
    mut flags: SuitabilityFlags,
) -> SuitabilityFlags {
    if ingredients.iter().any(|ingredient| !ingredient.is_safe_for(Species::Dog)) {
        flags.remove(SuitabilityFlags::DOGS | SuitabilityFlags::PUPPIES);
    }
    if ingredients.iter().any(|ingredient| !ingredient.is_safe_for(Species::Cat)) {
        flags.remove(SuitabilityFlags::CATS | SuitabilityFlags::KITTENS);
    }
    flags
}

/// `ingredient_ids` without the pet's allergens, in input order
///
/// Without a pet the list is returned unchanged.
#[must_use]
pub fn filter_safe_ingredients(
    ingredient_ids: &[IngredientId],
    pet: Option<&PetProfile>,
) -> Vec<IngredientId> {
    let Some(pet) = pet else {
        return ingredient_ids.to_vec();
    };
    let allergens = pet.allergen_ids();
    ingredient_ids
        .iter()
        .copied()
        .filter(|id| !allergens.contains(id))
        .collect()
}

/// A catalog ingredient flagged as a common allergen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonAllergen {
    /// Ingredient
    pub ingredient_id: IngredientId,
    /// Name
    pub name: String,
}

/// Common allergens grouped by category, each group in id order
#[must_use]
pub fn common_allergens_by_category(
    ingredients: &[Ingredient],
) -> BTreeMap<IngredientCategory, Vec<CommonAllergen>> {
    let mut sorted: Vec<&Ingredient> = ingredients
        .iter()
        .filter(|ingredient| ingredient.common_allergen)
        .collect();
    sorted.sort_by_key(|ingredient| ingredient.id);

    let mut grouped: BTreeMap<IngredientCategory, Vec<CommonAllergen>> = BTreeMap::new();
    for ingredient in sorted {
        grouped
            .entry(ingredient.category)
            .or_default()
            .push(CommonAllergen {
                ingredient_id: ingredient.id,
                name: ingredient.name.clone(),
            });
    }
    grouped
}

/// Counts over a pet's recorded allergies
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllergenStatistics {
    /// Recorded allergies
    pub total_count: usize,
    /// Count per severity; every severity is present
    pub by_severity: BTreeMap<AllergySeverity, usize>,
    /// Count per ingredient category; allergens without a record are skipped
    pub by_category: BTreeMap<IngredientCategory, usize>,
}

/// Summarize the pet's allergies; `resolved` supplies the ingredient categories
#[must_use]
pub fn allergen_statistics(pet: &PetProfile, resolved: &[Ingredient]) -> AllergenStatistics {
    let categories: BTreeMap<IngredientId, IngredientCategory> = resolved
        .iter()
        .map(|ingredient| (ingredient.id, ingredient.category))
        .collect();
    let mut stats = AllergenStatistics {
        total_count: pet.allergens.len(),
        by_severity: [
            AllergySeverity::Mild,
            AllergySeverity::Moderate,
            AllergySeverity::Severe,
        ]
        .into_iter()
        .map(|severity| (severity, 0))
        .collect(),
        by_category: BTreeMap::new(),
    };
    for allergen in &pet.allergens {
        *stats.by_severity.entry(allergen.severity).or_insert(0) += 1;
        if let Some(&category) = categories.get(&allergen.ingredient_id) {
            *stats.by_category.entry(category).or_insert(0) += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawplate_core::errors::ErrorCode;
    use pawplate_core::models::{NutrientProfile, PetAllergen};

    fn catalog() -> Vec<Ingredient> {
        vec![
            Ingredient::new(1, "Chicken", IngredientCategory::WhiteMeat, NutrientProfile::default()),
            Ingredient::new(2, "Salmon", IngredientCategory::Fish, NutrientProfile::default())
                .as_common_allergen(),
            Ingredient::new(3, "Onion", IngredientCategory::Vegetables, NutrientProfile::default())
                .with_safety(false, false),
            Ingredient::new(4, "Grapes", IngredientCategory::Fruits, NutrientProfile::default())
                .with_safety(false, true),
        ]
    }

    fn ids(values: &[u32]) -> BTreeSet<IngredientId> {
        values.iter().copied().map(IngredientId).collect()
    }

    #[test]
    fn test_allergen_conflict_detected() {
        let pet = PetProfile::new("Rex", Species::Dog, 3.0, 12.0)
            .unwrap()
            .with_allergen(PetAllergen::new(1, AllergySeverity::Severe));
        let report = check_safety(&ids(&[1, 2]), &catalog(), Some(&pet));
        assert!(!report.is_safe);
        assert_eq!(report.conflicts.len(), 1);
        assert!(report.warnings.contains(&"Severe allergy: Chicken".to_owned()));
        assert!(report.warnings.contains(&"Salmon is a common allergen".to_owned()));
    }

    #[test]
    fn test_species_hazard_without_pet_is_warning() {
        let report = check_safety(&ids(&[1, 4]), &catalog(), None);
        assert!(report.is_safe);
        assert!(report.warnings.iter().any(|w| w.contains("Grapes")));

        let pet = PetProfile::new("Rex", Species::Dog, 3.0, 12.0).unwrap();
        let report = check_safety(&ids(&[1, 4]), &catalog(), Some(&pet));
        assert!(!report.is_safe);
        assert_eq!(report.violations[0].ingredient_id, IngredientId(4));
    }

    #[test]
    fn test_universal_hazard_without_pet_is_violation() {
        let report = check_safety(&ids(&[3]), &catalog(), None);
        assert!(!report.is_safe);
        assert_eq!(report.violations.len(), 1);
    }

    #[test]
    fn test_unknown_ids_are_warnings() {
        let report = check_safety(&ids(&[1, 42]), &catalog(), None);
        assert!(report.is_safe);
        assert_eq!(report.unknown_ingredients, vec![IngredientId(42)]);
    }

    #[test]
    fn test_blocking_policy_errors() {
        let report = check_safety(&ids(&[3]), &catalog(), None);
        assert!(report.clone().enforce(SafetyPolicy::Advisory).is_ok());
        let error = report.enforce(SafetyPolicy::Blocking).unwrap_err();
        assert_eq!(error.code, ErrorCode::SafetyViolation);
    }

    #[test]
    fn test_species_suitability_clears_unsafe_species() {
        let ingredients = catalog();
        let grapes = &ingredients[3..4];
        assert_eq!(
            species_suitability(grapes, SuitabilityFlags::all()),
            SuitabilityFlags::CATS | SuitabilityFlags::KITTENS | SuitabilityFlags::SENIORS
        );
        assert_eq!(
            species_suitability(&ingredients[0..2], SuitabilityFlags::default()),
            SuitabilityFlags::both_species()
        );
        assert!(species_suitability(&ingredients, SuitabilityFlags::default()).is_empty());
    }

    #[test]
    fn test_filter_safe_ingredients_drops_allergens_in_order() {
        let pet = PetProfile::new("Rex", Species::Dog, 3.0, 12.0)
            .unwrap()
            .with_allergen(PetAllergen::new(2, AllergySeverity::Mild));
        let requested = [IngredientId(4), IngredientId(2), IngredientId(1)];
        assert_eq!(
            filter_safe_ingredients(&requested, Some(&pet)),
            vec![IngredientId(4), IngredientId(1)]
        );
        assert_eq!(filter_safe_ingredients(&requested, None), requested.to_vec());
    }

    #[test]
    fn test_common_allergens_grouped_by_category() {
        let mut ingredients = catalog();
        ingredients.push(
            Ingredient::new(5, "Cod", IngredientCategory::Fish, NutrientProfile::default())
                .as_common_allergen(),
        );
        let grouped = common_allergens_by_category(&ingredients);
        assert_eq!(grouped.len(), 1);
        let fish: Vec<&str> = grouped[&IngredientCategory::Fish]
            .iter()
            .map(|allergen| allergen.name.as_str())
            .collect();
        assert_eq!(fish, vec!["Salmon", "Cod"]);
    }

    #[test]
    fn test_allergen_statistics_counts() {
        let pet = PetProfile::new("Rex", Species::Dog, 3.0, 12.0)
            .unwrap()
            .with_allergen(PetAllergen::new(1, AllergySeverity::Severe))
            .with_allergen(PetAllergen::new(2, AllergySeverity::Severe))
            .with_allergen(PetAllergen::new(42, AllergySeverity::Mild));
        let stats = allergen_statistics(&pet, &catalog());
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.by_severity[&AllergySeverity::Severe], 2);
        assert_eq!(stats.by_severity[&AllergySeverity::Moderate], 0);
        assert_eq!(stats.by_severity[&AllergySeverity::Mild], 1);
        assert_eq!(stats.by_category[&IngredientCategory::WhiteMeat], 1);
        assert_eq!(stats.by_category[&IngredientCategory::Fish], 1);
        assert_eq!(stats.by_category.len(), 2);
    }
}
