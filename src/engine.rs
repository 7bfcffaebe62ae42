// ABOUTME: Engine facade composing repositories, configuration and the intelligence algorithms
// ABOUTME: Exposes nutrition, compliance, safety, recommendation, save and planning operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! # Nutrition Engine
//!
//! [`NutritionEngine`] is the single entry point callers use. It resolves ids
//! through a [`ReferenceStore`], hands plain data to the pure algorithms in
//! `pawplate_intelligence`, and turns unknown pets and invalid input into
//! [`AppError`]s. Data gaps never fail an operation; they are reported in the
//! returned structures instead.
//!
//! The engine is `Send + Sync` whenever the store is, and cloning it only
//! bumps reference counts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use pawplate_core::constants::recommendation::CANDIDATE_FETCH_FACTOR;
use pawplate_core::errors::{AppError, AppResult};
use pawplate_core::models::{
    Ingredient, IngredientCategory, IngredientId, NutritionRequirement, PetId, PetProfile,
    RecipeCandidate, RecipeLine, SuitabilityFlags,
};
use pawplate_intelligence::nutrition_plans::{daily_food_amount, daily_needs};
use pawplate_intelligence::recommendation_engine::{resolve_limit, resolve_targets};
use pawplate_intelligence::{
    allergen_statistics, assess_adequacy, check_safety, common_allergens_by_category,
    filter_safe_ingredients, species_suitability, summarize, AdequacyAssessment,
    AllergenStatistics, CommonAllergen, ComplianceReport, DailyFoodAmount, DailyNeeds,
    IntelligenceConfig, NutrientVector, NutritionPlan, NutritionPlanCatalog, NutritionProfileKind,
    NutritionSummary, QualityScores, RankingContext, RecommendationRanker, RecommendationScore,
    RequirementEvaluator, SafetyPolicy, SafetyReport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::repository::ReferenceStore;

/// Inputs of a recommendation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Ingredients the caller wants recipes built around
    pub reference_ids: BTreeSet<IngredientId>,
    /// Pet the recipes are for
    #[serde(default)]
    pub pet_id: Option<PetId>,
    /// Extra ingredients to avoid on top of the pet's allergens
    #[serde(default)]
    pub exclude_ingredients: BTreeSet<IngredientId>,
    /// Maximum results; the configured default when absent
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    /// Request around `reference_ids` with no pet, exclusions or explicit limit
    pub fn new(reference_ids: impl IntoIterator<Item = IngredientId>) -> Self {
        Self {
            reference_ids: reference_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Rank for a pet
    #[must_use]
    pub const fn for_pet(mut self, pet_id: PetId) -> Self {
        self.pet_id = Some(pet_id);
        self
    }

    /// Avoid additional ingredients
    #[must_use]
    pub fn excluding(mut self, ids: impl IntoIterator<Item = IngredientId>) -> Self {
        self.exclude_ingredients.extend(ids);
        self
    }

    /// Cap the number of results
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Totals and scores of a recipe that passed save-time validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveValidation {
    /// Sum of ingredient weights in grams
    pub total_weight: f64,
    /// Total energy in kcal
    pub total_calories: f64,
    /// Aggregated nutrition
    pub nutrition: NutritionSummary,
    /// Quality heuristics stored with the recipe
    pub quality: QualityScores,
    /// Advisory adequacy assessment
    pub adequacy: AdequacyAssessment,
    /// Safety findings; always safe here, but may carry warnings
    pub safety: SafetyReport,
    /// Audience flags narrowed to the species every ingredient is safe for
    pub suitability: SuitabilityFlags,
}

/// Advisory feedback on a recipe being edited
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftAssessment {
    /// Aggregated nutrition
    pub nutrition: NutritionSummary,
    /// Warnings-count adequacy heuristic
    pub adequacy: AdequacyAssessment,
    /// Quality heuristics
    pub quality: QualityScores,
    /// Safety findings, never blocking
    pub safety: SafetyReport,
    /// Requirement compliance when a pet was given
    pub compliance: Option<ComplianceReport>,
}

/// Feeding guidance for one pet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedingGuide {
    /// Estimate from species and age
    pub estimate: DailyFoodAmount,
    /// Needs from the matching requirement row, if any
    pub requirement_needs: Option<DailyNeeds>,
}

/// Facade over the repositories and algorithms
#[derive(Debug)]
pub struct NutritionEngine<S> {
    config: Arc<IntelligenceConfig>,
    plans: Arc<NutritionPlanCatalog>,
    store: Arc<S>,
}

impl<S> Clone for NutritionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            plans: Arc::clone(&self.plans),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ReferenceStore> NutritionEngine<S> {
    /// Create an engine with the standard plan catalog
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation
    pub fn new(config: IntelligenceConfig, store: S) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            Arc::new(config),
            Arc::new(NutritionPlanCatalog::standard()),
            Arc::new(store),
        ))
    }

    /// Create an engine over shared, already validated parts
    #[must_use]
    pub const fn from_parts(
        config: Arc<IntelligenceConfig>,
        plans: Arc<NutritionPlanCatalog>,
        store: Arc<S>,
    ) -> Self {
        Self {
            config,
            plans,
            store,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &IntelligenceConfig {
        &self.config
    }

    /// Nutrition plan catalog
    #[must_use]
    pub fn plans(&self) -> &NutritionPlanCatalog {
        &self.plans
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_pet(&self, pet_id: PetId) -> AppResult<PetProfile> {
        self.store.pet_by_id(pet_id)?.ok_or_else(|| {
            AppError::not_found(format!("Pet {pet_id}")).with_resource_id(pet_id.to_string())
        })
    }

    fn load_pet(&self, pet_id: Option<PetId>) -> AppResult<Option<PetProfile>> {
        pet_id.map(|id| self.require_pet(id)).transpose()
    }

    fn ingredient_map(
        &self,
        ids: &BTreeSet<IngredientId>,
    ) -> AppResult<BTreeMap<IngredientId, Ingredient>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(self
            .store
            .ingredients_by_ids(ids)?
            .into_iter()
            .map(|ingredient| (ingredient.id, ingredient))
            .collect())
    }

    fn summarize_lines(
        lines: &[RecipeLine],
        records: &BTreeMap<IngredientId, Ingredient>,
    ) -> NutritionSummary {
        let mut missing = Vec::new();
        let mut entries: Vec<(&Ingredient, f64)> = Vec::with_capacity(lines.len());
        for line in lines {
            match records.get(&line.ingredient_id) {
                Some(ingredient) => entries.push((ingredient, line.weight_grams)),
                None if !missing.contains(&line.ingredient_id) => missing.push(line.ingredient_id),
                None => {}
            }
        }
        summarize(&entries, &missing)
    }

    /// Requirement row for a pet's species, effective life stage, activity and weight
    ///
    /// # Errors
    ///
    /// Returns an error if the requirement store cannot be read
    pub fn requirement_for(&self, pet: &PetProfile) -> AppResult<Option<NutritionRequirement>> {
        self.store.find_requirement(
            pet.species,
            pet.life_stage(),
            pet.activity_level,
            pet.weight_kg,
        )
    }

    /// Aggregate nutrients for `(ingredient, grams)` lines
    ///
    /// Unknown ingredient ids and non-positive weights are reported as gaps.
    ///
    /// # Errors
    ///
    /// Returns an error if the ingredient store cannot be read
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn compute_nutrition(&self, lines: &[RecipeLine]) -> AppResult<NutritionSummary> {
        let ids: BTreeSet<IngredientId> = lines.iter().map(|line| line.ingredient_id).collect();
        let records = self.ingredient_map(&ids)?;
        let summary = Self::summarize_lines(lines, &records);
        debug!(
            total_weight = summary.vector.total_weight,
            gaps = summary.gaps.len(),
            "Computed recipe nutrition"
        );
        Ok(summary)
    }

    /// Compliance report of `vector` against `requirement`
    #[must_use]
    pub fn evaluate_requirement(
        &self,
        vector: &NutrientVector,
        requirement: Option<&NutritionRequirement>,
    ) -> ComplianceReport {
        RequirementEvaluator::new(&self.config.nutrition).evaluate(vector, requirement)
    }

    /// Compliance report of `vector` against the pet's requirement row
    ///
    /// # Errors
    ///
    /// Returns an error if the pet does not exist or the store cannot be read
    #[instrument(skip_all, fields(pet_id = %pet_id))]
    pub fn evaluate_for_pet(
        &self,
        vector: &NutrientVector,
        pet_id: PetId,
    ) -> AppResult<ComplianceReport> {
        let pet = self.require_pet(pet_id)?;
        let requirement = self.requirement_for(&pet)?;
        Ok(self.evaluate_requirement(vector, requirement.as_ref()))
    }

    /// Screen ingredients against the pet's allergens and species hazards
    ///
    /// # Errors
    ///
    /// Returns an error if `ingredient_ids` is empty, `pet_id` names an
    /// unknown pet, or the store cannot be read
    #[instrument(skip_all, fields(ingredients = ingredient_ids.len(), pet_id = ?pet_id))]
    pub fn check_safety(
        &self,
        ingredient_ids: &BTreeSet<IngredientId>,
        pet_id: Option<PetId>,
    ) -> AppResult<SafetyReport> {
        if ingredient_ids.is_empty() {
            return Err(AppError::missing_field("ingredient_ids"));
        }
        let pet = self.load_pet(pet_id)?;
        let resolved: Vec<Ingredient> = self.ingredient_map(ingredient_ids)?.into_values().collect();
        Ok(check_safety(ingredient_ids, &resolved, pet.as_ref()))
    }

    /// Drop the pet's allergens from `ingredient_ids`, keeping input order
    ///
    /// # Errors
    ///
    /// Returns an error if `pet_id` names an unknown pet or the store cannot be read
    pub fn filter_safe_ingredients(
        &self,
        ingredient_ids: &[IngredientId],
        pet_id: Option<PetId>,
    ) -> AppResult<Vec<IngredientId>> {
        let pet = self.load_pet(pet_id)?;
        let kept = filter_safe_ingredients(ingredient_ids, pet.as_ref());
        debug!(
            requested = ingredient_ids.len(),
            kept = kept.len(),
            "Filtered pet allergens from ingredient list"
        );
        Ok(kept)
    }

    /// Common allergens in the catalog grouped by category
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub fn common_allergens_by_category(
        &self,
    ) -> AppResult<BTreeMap<IngredientCategory, Vec<CommonAllergen>>> {
        let allergens = self.store.common_allergens()?;
        Ok(common_allergens_by_category(&allergens))
    }

    /// Severity and category counts of the pet's recorded allergies
    ///
    /// # Errors
    ///
    /// Returns an error if the pet does not exist or the store cannot be read
    #[instrument(skip_all, fields(pet_id = %pet_id))]
    pub fn allergen_statistics(&self, pet_id: PetId) -> AppResult<AllergenStatistics> {
        let pet = self.require_pet(pet_id)?;
        let resolved: Vec<Ingredient> = self
            .ingredient_map(&pet.allergen_ids())?
            .into_values()
            .collect();
        Ok(allergen_statistics(&pet, &resolved))
    }

    /// Rank stored recipes against the request
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is zero, the pet is unknown, or a store cannot be read
    #[instrument(
        skip_all,
        fields(
            references = request.reference_ids.len(),
            pet_id = ?request.pet_id,
            limit = ?request.limit,
        )
    )]
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<Vec<RecommendationScore>> {
        let limit = resolve_limit(request.limit, &self.config.recommendation.limits)?;
        let pet = self.load_pet(request.pet_id)?;

        let reference_records = self.ingredient_map(&request.reference_ids)?;
        if reference_records.is_empty() {
            debug!("No reference ingredient resolved, returning no recommendations");
            return Ok(Vec::new());
        }

        let fetch_limit = self
            .config
            .recommendation
            .limits
            .candidate_pool_limit
            .saturating_mul(CANDIDATE_FETCH_FACTOR);
        let recipes = self.store.candidate_recipes(Some(fetch_limit))?;
        let mut wanted: BTreeSet<IngredientId> = recipes
            .iter()
            .flat_map(|recipe| recipe.ingredients.iter().map(|line| line.ingredient_id))
            .collect();
        wanted.retain(|id| !reference_records.contains_key(id));
        let mut ingredients = self.ingredient_map(&wanted)?;
        ingredients.extend(reference_records);

        let requirement = match &pet {
            Some(pet) => self.requirement_for(pet)?,
            None => None,
        };
        let targets = resolve_targets(requirement.as_ref(), &self.plans, pet.as_ref());

        let reference: Vec<&Ingredient> = request
            .reference_ids
            .iter()
            .filter_map(|id| ingredients.get(id))
            .collect();
        let context = RankingContext {
            reference: &reference,
            pet: pet.as_ref(),
            targets,
            exclusions: &request.exclude_ingredients,
        };
        let ranked =
            RecommendationRanker::new(&self.config).rank(&recipes, &ingredients, &context, limit);
        info!(
            returned = ranked.len(),
            requirement_found = requirement.is_some(),
            "Recommendations ready"
        );
        Ok(ranked)
    }

    /// Validate a recipe before it is persisted
    ///
    /// Applies the blocking safety policy and computes the totals and quality
    /// scores stored alongside the recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines are empty, duplicated or non-positive,
    /// the total weight is below the configured minimum, the pet is unknown,
    /// or the ingredient set is unsafe for the pet
    #[instrument(skip_all, fields(lines = lines.len(), pet_id = ?pet_id))]
    pub fn validate_recipe_for_save(
        &self,
        lines: Vec<RecipeLine>,
        pet_id: Option<PetId>,
    ) -> AppResult<SaveValidation> {
        let candidate = RecipeCandidate::new(lines)?;
        let min_weight = self.config.nutrition.min_total_weight_grams;
        if candidate.total_weight() < min_weight {
            return Err(AppError::out_of_range(
                "total_weight",
                format!("{} g is below the {min_weight} g minimum", candidate.total_weight()),
            ));
        }
        let pet = self.load_pet(pet_id)?;
        let ids = candidate.ingredient_ids();
        let records = self.ingredient_map(&ids)?;
        let resolved: Vec<Ingredient> = records.values().cloned().collect();

        let safety = check_safety(&ids, &resolved, pet.as_ref()).enforce(SafetyPolicy::Blocking)?;

        let nutrition = Self::summarize_lines(candidate.lines(), &records);
        let quality = QualityScores::of(&nutrition.vector, candidate.lines().len());
        let adequacy = assess_adequacy(&nutrition.vector, &self.config.nutrition.adequacy);
        let suitability = species_suitability(&resolved, SuitabilityFlags::default());
        info!(
            total_weight = candidate.total_weight(),
            suitability = suitability.bits(),
            nutrition_score = quality.nutrition_score,
            balance_score = quality.balance_score,
            "Recipe passed save-time validation"
        );
        Ok(SaveValidation {
            total_weight: candidate.total_weight(),
            total_calories: nutrition.vector.totals.calories,
            nutrition,
            quality,
            adequacy,
            safety,
            suitability,
        })
    }

    /// Advisory feedback for a recipe being edited; never blocks
    ///
    /// # Errors
    ///
    /// Returns an error if the pet is unknown or a store cannot be read
    #[instrument(skip_all, fields(lines = lines.len(), pet_id = ?pet_id))]
    pub fn assess_draft(
        &self,
        lines: &[RecipeLine],
        pet_id: Option<PetId>,
    ) -> AppResult<DraftAssessment> {
        let pet = self.load_pet(pet_id)?;
        let ids: BTreeSet<IngredientId> = lines.iter().map(|line| line.ingredient_id).collect();
        let records = self.ingredient_map(&ids)?;
        let resolved: Vec<Ingredient> = records.values().cloned().collect();

        let nutrition = Self::summarize_lines(lines, &records);
        let adequacy = assess_adequacy(&nutrition.vector, &self.config.nutrition.adequacy);
        let included = lines
            .iter()
            .filter(|line| line.weight_grams.is_finite() && line.weight_grams > 0.0)
            .count();
        let quality = QualityScores::of(&nutrition.vector, included);
        let safety = check_safety(&ids, &resolved, pet.as_ref());
        let compliance = match &pet {
            Some(pet) => {
                let requirement = self.requirement_for(pet)?;
                Some(self.evaluate_requirement(&nutrition.vector, requirement.as_ref()))
            }
            None => None,
        };
        Ok(DraftAssessment {
            nutrition,
            adequacy,
            quality,
            safety,
            compliance,
        })
    }

    /// Split `total_weight` grams across ingredients by a plan's category shares
    ///
    /// # Errors
    ///
    /// Returns an error if the plan kind has no definition, the weight is not
    /// positive, or an ingredient id is unknown
    pub fn suggest_ingredient_weights(
        &self,
        kind: NutritionProfileKind,
        total_weight: f64,
        ingredient_ids: &BTreeSet<IngredientId>,
    ) -> AppResult<BTreeMap<IngredientId, f64>> {
        let plan = self
            .plans
            .get(kind)
            .ok_or_else(|| AppError::not_found(format!("Nutrition plan {kind}")))?;
        let records = self.ingredient_map(ingredient_ids)?;
        if let Some(missing) = ingredient_ids.iter().find(|id| !records.contains_key(id)) {
            return Err(AppError::not_found(format!("Ingredient {missing}"))
                .with_resource_id(missing.to_string()));
        }
        let ingredients: Vec<&Ingredient> = records.values().collect();
        pawplate_intelligence::suggest_ingredient_weights(plan, total_weight, &ingredients)
    }

    /// Daily energy and food amount for a stored pet
    ///
    /// # Errors
    ///
    /// Returns an error if the pet is unknown or its numbers are out of range
    pub fn daily_food_amount(&self, pet_id: PetId) -> AppResult<FeedingGuide> {
        let pet = self.require_pet(pet_id)?;
        let estimate = daily_food_amount(pet.species, pet.age_years, pet.weight_kg)?;
        let requirement_needs = self
            .requirement_for(&pet)?
            .map(|requirement| daily_needs(&requirement, pet.weight_kg));
        Ok(FeedingGuide {
            estimate,
            requirement_needs,
        })
    }

    /// Defined nutrition plans suited to a stored pet, in preference order
    ///
    /// # Errors
    ///
    /// Returns an error if the pet is unknown
    pub fn suitable_plans(&self, pet_id: PetId) -> AppResult<Vec<NutritionPlan>> {
        let pet = self.require_pet(pet_id)?;
        Ok(pawplate_intelligence::suitable_plans(pet.species, pet.age_years, &pet.special_needs)
            .into_iter()
            .filter_map(|kind| self.plans.get(kind).cloned())
            .collect())
    }
}
