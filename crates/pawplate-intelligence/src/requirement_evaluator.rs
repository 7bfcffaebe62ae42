// ABOUTME: Scores nutrient vectors against AAFCO-style requirement bands with linear range matching
// ABOUTME: Produces per-nutrient compliance reports and the headline nutrition_match score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Requirement Evaluator
//!
//! Selects the requirement row for a pet, then scores a [`NutrientVector`]
//! against it. Every bounded nutrient gets a status and a `[0, 1]`
//! range-match score; the headline `nutrition_match` only averages the
//! protein band, the fat band, and a carbohydrate ceiling check.
//!
//! Evaluation never fails: a missing row yields [`ComplianceStatus::Unknown`]
//! with a neutral score and an empty vector yields
//! [`ComplianceStatus::InsufficientData`].

use crate::config::intelligence::{EvaluationBasis, NutritionConfig};
use crate::nutrient_aggregator::NutrientVector;
use pawplate_core::errors::AppResult;
use pawplate_core::models::{
    ActivityLevel, LifeStage, Nutrient, NutrientBand, NutritionRequirement, Species,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a value sits relative to its band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    /// Below the minimum
    BelowMin,
    /// Inside the band
    WithinRange,
    /// Above the maximum
    AboveMax,
    /// No bound applies or the value is undefined
    NotApplicable,
}

/// Outcome of a requirement evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Scored against a requirement row
    Evaluated,
    /// No requirement row applies
    Unknown,
    /// Nothing to evaluate
    InsufficientData,
}

/// Protein, fat, and carbohydrate targets behind `nutrition_match`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTargets {
    /// Protein band in percent
    pub protein: NutrientBand,
    /// Fat band in percent
    pub fat: NutrientBand,
    /// Carbohydrate ceiling in percent
    pub carbohydrate_max: Option<f64>,
}

impl MacroTargets {
    /// Macro targets of a requirement row
    #[must_use]
    pub fn from_requirement(requirement: &NutritionRequirement) -> Self {
        Self {
            protein: requirement
                .band(Nutrient::Protein)
                .copied()
                .unwrap_or_default(),
            fat: requirement.band(Nutrient::Fat).copied().unwrap_or_default(),
            carbohydrate_max: requirement
                .band(Nutrient::Carbohydrate)
                .and_then(|band| band.max),
        }
    }
}

/// One nutrient's compliance line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientAssessment {
    /// Nutrient
    pub nutrient: Nutrient,
    /// Concentration on the report's basis
    pub value: f64,
    /// Applied band
    pub band: NutrientBand,
    /// Position relative to the band
    pub status: NutrientStatus,
    /// Range-match score
    pub score: f64,
}

/// Calcium:phosphorus ratio compliance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioAssessment {
    /// Ratio, `None` without phosphorus
    pub value: Option<f64>,
    /// Applied band
    pub band: NutrientBand,
    /// Position relative to the band
    pub status: NutrientStatus,
    /// Range-match score, `None` when not applicable
    pub score: Option<f64>,
}

/// Detailed compliance of a nutrient vector with one requirement row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Evaluation outcome
    pub status: ComplianceStatus,
    /// Concentration basis actually used
    pub basis: EvaluationBasis,
    /// Source label of the requirement row
    pub requirement_source: Option<String>,
    /// Per-nutrient lines in nutrient order
    pub nutrients: Vec<NutrientAssessment>,
    /// Calcium:phosphorus line
    pub calcium_phosphorus: Option<RatioAssessment>,
    /// Mean score of applicable lines
    pub overall_compliance: f64,
    /// Headline macro score
    pub nutrition_match: f64,
    /// Advisory messages
    pub warnings: Vec<String>,
}

impl ComplianceReport {
    /// Lines outside their band
    pub fn deficiencies(&self) -> impl Iterator<Item = &NutrientAssessment> {
        self.nutrients.iter().filter(|line| {
            matches!(
                line.status,
                NutrientStatus::BelowMin | NutrientStatus::AboveMax
            )
        })
    }
}

/// Range-match with the default falloff parameters
#[must_use]
pub fn range_match(value: f64, band: &NutrientBand) -> f64 {
    let defaults = NutritionConfig::default();
    range_match_with(
        value,
        band,
        defaults.over_max_falloff,
        defaults.zero_max_exceeded_score,
    )
}

fn range_match_with(value: f64, band: &NutrientBand, falloff: f64, zero_max_score: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    if let Some(min) = band.min {
        if value < min {
            return if min > 0.0 {
                (value / min).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }
    if let Some(max) = band.max {
        if value > max {
            return if max > 0.0 {
                (1.0 - falloff * (value - max) / max).max(0.0)
            } else {
                zero_max_score
            };
        }
    }
    1.0
}

fn status_of(value: f64, band: &NutrientBand) -> NutrientStatus {
    if band.is_unbounded() || !value.is_finite() {
        return NutrientStatus::NotApplicable;
    }
    if band.min.is_some_and(|min| value < min) {
        NutrientStatus::BelowMin
    } else if band.max.is_some_and(|max| value > max) {
        NutrientStatus::AboveMax
    } else {
        NutrientStatus::WithinRange
    }
}

/// Scores nutrient vectors against requirement rows
#[derive(Debug, Clone, Copy)]
pub struct RequirementEvaluator<'a> {
    config: &'a NutritionConfig,
}

impl<'a> RequirementEvaluator<'a> {
    /// Create an evaluator over `config`
    #[must_use]
    pub const fn new(config: &'a NutritionConfig) -> Self {
        Self { config }
    }

    /// Range-match score of `value` against `band`
    #[must_use]
    pub fn range_match(&self, value: f64, band: &NutrientBand) -> f64 {
        range_match_with(
            value,
            band,
            self.config.over_max_falloff,
            self.config.zero_max_exceeded_score,
        )
    }

    /// Denominator in grams for the configured basis, with the basis actually used
    fn denominator(&self, vector: &NutrientVector) -> (f64, EvaluationBasis, Option<String>) {
        match self.config.basis {
            EvaluationBasis::AsFed => (vector.total_weight, EvaluationBasis::AsFed, None),
            EvaluationBasis::DryMatter => vector.dry_matter_weight().map_or_else(
                || {
                    warn!(
                        moisture = vector.totals.moisture,
                        total_weight = vector.total_weight,
                        "Moisture data unusable, evaluating on an as-fed basis"
                    );
                    (
                        vector.total_weight,
                        EvaluationBasis::AsFed,
                        Some("Moisture data missing or inconsistent; evaluated as fed".into()),
                    )
                },
                |dry| (dry, EvaluationBasis::DryMatter, None),
            ),
        }
    }

    /// Mean of protein match, fat match, and the carbohydrate ceiling check
    ///
    /// An empty vector scores 0.
    #[must_use]
    pub fn nutrition_match(&self, vector: &NutrientVector, targets: &MacroTargets) -> f64 {
        if vector.is_empty() {
            return 0.0;
        }
        let (denominator, _, _) = self.denominator(vector);
        self.macro_match(vector, denominator, targets)
    }

    fn macro_match(&self, vector: &NutrientVector, denominator: f64, targets: &MacroTargets) -> f64 {
        let protein = vector.concentration(Nutrient::Protein, denominator);
        let fat = vector.concentration(Nutrient::Fat, denominator);
        let carbohydrate = vector.concentration(Nutrient::Carbohydrate, denominator);

        let protein_score = self.range_match(protein, &targets.protein);
        let fat_score = self.range_match(fat, &targets.fat);
        let carb_score = match targets.carbohydrate_max {
            Some(ceiling) if carbohydrate > ceiling => self.config.carb_over_ceiling_score,
            _ => 1.0,
        };
        ((protein_score + fat_score + carb_score) / 3.0).clamp(0.0, 1.0)
    }

    /// Full compliance report; `None` degrades to [`ComplianceStatus::Unknown`]
    #[must_use]
    pub fn evaluate(
        &self,
        vector: &NutrientVector,
        requirement: Option<&NutritionRequirement>,
    ) -> ComplianceReport {
        if vector.is_empty() {
            return ComplianceReport {
                status: ComplianceStatus::InsufficientData,
                basis: self.config.basis,
                requirement_source: requirement.map(|row| row.source.clone()),
                nutrients: Vec::new(),
                calcium_phosphorus: None,
                overall_compliance: 0.0,
                nutrition_match: 0.0,
                warnings: vec!["Recipe has no ingredient weight to evaluate".into()],
            };
        }
        let Some(requirement) = requirement else {
            return ComplianceReport {
                status: ComplianceStatus::Unknown,
                basis: self.config.basis,
                requirement_source: None,
                nutrients: Vec::new(),
                calcium_phosphorus: None,
                overall_compliance: self.config.neutral_match,
                nutrition_match: self.config.neutral_match,
                warnings: vec!["No nutrition requirement matches this pet".into()],
            };
        };

        let (denominator, basis, basis_warning) = self.denominator(vector);
        let mut warnings: Vec<String> = basis_warning.into_iter().collect();

        let nutrients: Vec<NutrientAssessment> = requirement
            .bands
            .iter()
            .map(|(&nutrient, band)| {
                let value = vector.concentration(nutrient, denominator);
                let status = status_of(value, band);
                let score = self.range_match(value, band);
                if let Some(message) = deviation_message(nutrient.name(), value, band, status) {
                    warnings.push(message);
                }
                NutrientAssessment {
                    nutrient,
                    value,
                    band: *band,
                    status,
                    score,
                }
            })
            .collect();

        let calcium_phosphorus = requirement.calcium_phosphorus_ratio.map(|band| {
            let value = vector.calcium_phosphorus_ratio();
            match value {
                Some(ratio) => {
                    let status = status_of(ratio, &band);
                    if let Some(message) =
                        deviation_message("calcium_phosphorus_ratio", ratio, &band, status)
                    {
                        warnings.push(message);
                    }
                    RatioAssessment {
                        value,
                        band,
                        status,
                        score: Some(self.range_match(ratio, &band)),
                    }
                }
                None => RatioAssessment {
                    value: None,
                    band,
                    status: NutrientStatus::NotApplicable,
                    score: None,
                },
            }
        });

        let nutrition_match =
            self.macro_match(vector, denominator, &MacroTargets::from_requirement(requirement));

        let scores: Vec<f64> = nutrients
            .iter()
            .filter(|line| line.status != NutrientStatus::NotApplicable)
            .map(|line| line.score)
            .chain(calcium_phosphorus.as_ref().and_then(|ratio| ratio.score))
            .collect();
        let overall_compliance = if scores.is_empty() {
            nutrition_match
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        debug!(
            source = %requirement.source,
            overall_compliance,
            nutrition_match,
            deficiencies = warnings.len(),
            "Evaluated nutrient vector against requirement"
        );

        ComplianceReport {
            status: ComplianceStatus::Evaluated,
            basis,
            requirement_source: Some(requirement.source.clone()),
            nutrients,
            calcium_phosphorus,
            overall_compliance,
            nutrition_match,
            warnings,
        }
    }
}

fn deviation_message(
    label: &str,
    value: f64,
    band: &NutrientBand,
    status: NutrientStatus,
) -> Option<String> {
    match (status, band.min, band.max) {
        (NutrientStatus::BelowMin, Some(min), _) => {
            Some(format!("{label} below minimum ({value:.2} < {min})"))
        }
        (NutrientStatus::AboveMax, _, Some(max)) => {
            Some(format!("{label} above maximum ({value:.2} > {max})"))
        }
        _ => None,
    }
}

/// Ordered set of requirement rows with key lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementTable {
    rows: Vec<NutritionRequirement>,
}

impl RequirementTable {
    /// Build a table after validating every row
    ///
    /// # Errors
    ///
    /// Returns an error if any row has inverted or negative bounds
    pub fn new(rows: Vec<NutritionRequirement>) -> AppResult<Self> {
        for row in &rows {
            row.validate()?;
        }
        Ok(Self { rows })
    }

    /// Rows in table order
    #[must_use]
    pub fn rows(&self) -> &[NutritionRequirement] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row matching the key; logs a warning when rows overlap
    #[must_use]
    pub fn lookup(
        &self,
        species: Species,
        life_stage: LifeStage,
        activity_level: Option<ActivityLevel>,
        weight_kg: f64,
    ) -> Option<&NutritionRequirement> {
        let mut matches = self
            .rows
            .iter()
            .filter(|row| row.matches(species, life_stage, activity_level, weight_kg));
        let first = matches.next();
        let overlapping = matches.count();
        if overlapping > 0 {
            warn!(
                %species,
                %life_stage,
                weight_kg,
                overlapping,
                "Overlapping requirement rows, using the first in table order"
            );
        }
        if first.is_none() {
            debug!(%species, %life_stage, weight_kg, "No requirement row matches");
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn adult_dog_row() -> NutritionRequirement {
        let mut bands = BTreeMap::new();
        bands.insert(Nutrient::Protein, NutrientBand::at_least(18.0));
        bands.insert(Nutrient::Fat, NutrientBand::at_least(5.5));
        bands.insert(Nutrient::Calcium, NutrientBand::between(6000.0, 25000.0));
        NutritionRequirement {
            species: Species::Dog,
            life_stage: LifeStage::Adult,
            activity_level: ActivityLevel::Moderate,
            min_weight_kg: 1.0,
            max_weight_kg: 100.0,
            calories_per_kg: 95.0,
            bands,
            calcium_phosphorus_ratio: Some(NutrientBand::between(1.0, 2.0)),
            source: "AAFCO 2016".into(),
            notes: None,
        }
    }

    #[test]
    fn test_range_match_boundaries() {
        let band = NutrientBand::between(10.0, 20.0);
        assert!((range_match(10.0, &band) - 1.0).abs() < f64::EPSILON);
        assert!((range_match(20.0, &band) - 1.0).abs() < f64::EPSILON);
        assert!(range_match(0.0, &band).abs() < f64::EPSILON);
        assert!((range_match(5.0, &band) - 0.5).abs() < 1e-12);
        assert!((range_match(40.0, &band) - 0.5).abs() < 1e-12);
        assert!(range_match(60.0, &band).abs() < 1e-12);
        assert!(range_match(100.0, &band).abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_match_degenerate_bounds() {
        assert!((range_match(1.0, &NutrientBand::at_most(0.0)) - 0.5).abs() < f64::EPSILON);
        assert!((range_match(1_000.0, &NutrientBand::at_least(5.0)) - 1.0).abs() < f64::EPSILON);
        assert!((range_match(3.0, &NutrientBand::default()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_vector_is_insufficient() {
        let config = NutritionConfig::default();
        let report = RequirementEvaluator::new(&config).evaluate(&NutrientVector::zero(), None);
        assert_eq!(report.status, ComplianceStatus::InsufficientData);
        assert!(report.nutrition_match.abs() < f64::EPSILON);
    }

    #[test]
    fn test_lookup_respects_weight_and_activity() {
        let table = RequirementTable::new(vec![adult_dog_row()]).unwrap();
        assert!(table
            .lookup(Species::Dog, LifeStage::Adult, None, 10.0)
            .is_some());
        assert!(table
            .lookup(Species::Dog, LifeStage::Adult, Some(ActivityLevel::Moderate), 10.0)
            .is_some());
        assert!(table
            .lookup(Species::Dog, LifeStage::Adult, Some(ActivityLevel::High), 10.0)
            .is_none());
        assert!(table
            .lookup(Species::Dog, LifeStage::Adult, None, 200.0)
            .is_none());
    }

    #[test]
    fn test_ratio_not_applicable_without_phosphorus() {
        let config = NutritionConfig::default();
        let mut vector = NutrientVector::zero();
        vector.total_weight = 100.0;
        vector.totals.protein = 25.0;
        vector.totals.fat = 10.0;
        let row = adult_dog_row();
        let report = RequirementEvaluator::new(&config).evaluate(&vector, Some(&row));
        let ratio = report.calcium_phosphorus.unwrap();
        assert_eq!(ratio.status, NutrientStatus::NotApplicable);
        assert!((report.nutrition_match - 1.0).abs() < f64::EPSILON);
    }
}
