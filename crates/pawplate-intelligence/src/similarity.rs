// ABOUTME: Ingredient-set similarity from direct overlap, category mix, and mean nutrient features
// ABOUTME: Set semantics make the score independent of input order and duplicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use crate::config::intelligence::SimilarityConfig;
use pawplate_core::models::{Ingredient, IngredientCategory, IngredientId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Components of an ingredient similarity score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    /// Fraction of reference ingredients present in the candidate
    pub direct_match: f64,
    /// Cosine of category-count vectors
    pub category_similarity: f64,
    /// Cosine of mean nutrient-feature vectors
    pub nutrient_feature_similarity: f64,
    /// Weighted combination in `[0, 1]`
    pub score: f64,
}

/// Cosine similarity clamped to `[0, 1]`
///
/// Zero vectors and vectors of different lengths score 0.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    let cosine = dot / (norm_a * norm_b);
    if cosine.is_finite() {
        cosine.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn distinct<'a>(ingredients: &[&'a Ingredient]) -> BTreeMap<IngredientId, &'a Ingredient> {
    ingredients.iter().map(|i| (i.id, *i)).collect()
}

fn category_counts(set: &BTreeMap<IngredientId, &Ingredient>) -> BTreeMap<IngredientCategory, f64> {
    let mut counts = BTreeMap::new();
    for ingredient in set.values() {
        *counts.entry(ingredient.category).or_insert(0.0) += 1.0;
    }
    counts
}

/// Unweighted mean of protein, fat, carbohydrate, calories, calcium, phosphorus per 100 g
fn feature_means(set: &BTreeMap<IngredientId, &Ingredient>) -> [f64; 6] {
    let mut sums = [0.0; 6];
    for ingredient in set.values() {
        let n = &ingredient.nutrients;
        let features = [
            n.protein,
            n.fat,
            n.carbohydrate,
            n.calories,
            n.calcium,
            n.phosphorus,
        ];
        for (sum, value) in sums.iter_mut().zip(features) {
            *sum += value;
        }
    }
    if !set.is_empty() {
        let count = set.len() as f64;
        for sum in &mut sums {
            *sum /= count;
        }
    }
    sums
}

/// Scores how closely a candidate recipe's ingredients resemble a reference set
#[derive(Debug, Clone, Copy)]
pub struct SimilarityScorer<'a> {
    config: &'a SimilarityConfig,
}

impl<'a> SimilarityScorer<'a> {
    /// Create a scorer over `config`
    #[must_use]
    pub const fn new(config: &'a SimilarityConfig) -> Self {
        Self { config }
    }

    /// Similarity of resolved reference and candidate ingredients
    #[must_use]
    pub fn score(&self, reference: &[&Ingredient], candidate: &[&Ingredient]) -> SimilarityBreakdown {
        let reference = distinct(reference);
        let candidate = distinct(candidate);

        let reference_ids: BTreeSet<IngredientId> = reference.keys().copied().collect();
        let candidate_ids: BTreeSet<IngredientId> = candidate.keys().copied().collect();
        let direct_match = if reference_ids.is_empty() {
            0.0
        } else {
            reference_ids.intersection(&candidate_ids).count() as f64 / reference_ids.len() as f64
        };

        let reference_categories = category_counts(&reference);
        let candidate_categories = category_counts(&candidate);
        let union: BTreeSet<IngredientCategory> = reference_categories
            .keys()
            .chain(candidate_categories.keys())
            .copied()
            .collect();
        let to_vector = |counts: &BTreeMap<IngredientCategory, f64>| -> Vec<f64> {
            union
                .iter()
                .map(|category| counts.get(category).copied().unwrap_or(0.0))
                .collect()
        };
        let category_similarity = cosine_similarity(
            &to_vector(&reference_categories),
            &to_vector(&candidate_categories),
        );

        let nutrient_feature_similarity =
            cosine_similarity(&feature_means(&reference), &feature_means(&candidate));

        let score = self.config.category_weight.mul_add(
            category_similarity,
            self.config.direct_match_weight.mul_add(
                direct_match,
                self.config.nutrient_feature_weight * nutrient_feature_similarity,
            ),
        );

        SimilarityBreakdown {
            direct_match,
            category_similarity,
            nutrient_feature_similarity,
            score: score.clamp(0.0, 1.0),
        }
    }
}
