// ABOUTME: Draft-time recipe quality heuristics: adequacy warnings, nutrition score, balance score
// ABOUTME: Advisory only; requirement compliance is judged by the requirement evaluator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

use crate::config::intelligence::AdequacyThresholds;
use crate::nutrient_aggregator::NutrientVector;
use pawplate_core::constants::quality;
use serde::{Deserialize, Serialize};

/// Overall verdict of the adequacy heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdequacyStatus {
    /// No warnings
    Excellent,
    /// A few warnings
    Good,
    /// Many warnings
    NeedsImprovement,
    /// Nothing to assess
    InsufficientData,
}

/// Advisory assessment of a draft recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdequacyAssessment {
    /// Verdict
    pub status: AdequacyStatus,
    /// Problems found
    pub warnings: Vec<String>,
    /// Positive notes and next steps
    pub recommendations: Vec<String>,
    /// Score from 0 to 100
    pub score: u32,
}

/// Warnings-count assessment of macro percentages and the Ca:P ratio
#[must_use]
pub fn assess_adequacy(vector: &NutrientVector, thresholds: &AdequacyThresholds) -> AdequacyAssessment {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();
    if vector.is_empty() {
        return AdequacyAssessment {
            status: AdequacyStatus::InsufficientData,
            warnings,
            recommendations,
            score: 0,
        };
    }
    let ratios = vector.ratios();
    let t = thresholds;
    let mut score: u32 = 0;

    let protein = ratios.protein_percent;
    if protein < t.protein_low_percent {
        warnings.push("Protein content is low, consider adding more meat.".to_owned());
        score += 20;
    } else if protein > t.protein_high_percent {
        warnings.push("Protein content is high, consider reducing meat.".to_owned());
        score += 60;
    } else if (t.protein_ideal_min_percent..=t.protein_ideal_max_percent).contains(&protein) {
        recommendations.push("Good protein ratio.".to_owned());
        score += 100;
    } else {
        score += 80;
    }

    let fat = ratios.fat_percent;
    if fat < t.fat_low_percent {
        warnings.push("Fat content is low, consider adding a fat source.".to_owned());
    } else if fat > t.fat_high_percent {
        warnings.push("Fat content is high, consider reducing high-fat ingredients.".to_owned());
    } else if (t.fat_ideal_min_percent..=t.fat_ideal_max_percent).contains(&fat) {
        recommendations.push("Good fat ratio.".to_owned());
    }

    let carbohydrate = ratios.carbohydrate_percent;
    if carbohydrate > t.carb_high_percent {
        warnings.push("Carbohydrate content is high, consider reducing grains.".to_owned());
    } else if carbohydrate <= t.carb_ideal_max_percent {
        recommendations.push("Reasonable carbohydrate ratio.".to_owned());
    }

    match ratios.calcium_phosphorus_ratio {
        Some(ratio) if vector.totals.calcium > 0.0 => {
            if ratio < t.ca_p_low_ratio {
                warnings.push(format!(
                    "Calcium-phosphorus ratio is low ({ratio:.2}:1), consider adding calcium-rich foods."
                ));
                score += 40;
            } else if ratio > t.ca_p_high_ratio {
                warnings.push(format!(
                    "Calcium-phosphorus ratio is high ({ratio:.2}:1), consider balancing calcium and phosphorus."
                ));
                score += 40;
            } else if (t.ca_p_ideal_min_ratio..=t.ca_p_ideal_max_ratio).contains(&ratio) {
                recommendations.push(format!(
                    "Excellent calcium-phosphorus ratio ({ratio:.2}:1), beneficial for bone health."
                ));
                score += 100;
            } else {
                recommendations.push(format!("Acceptable calcium-phosphorus ratio ({ratio:.2}:1)."));
                score += 80;
            }
        }
        _ => warnings.push(
            "Missing calcium or phosphorus data, consider adding ingredients containing them."
                .to_owned(),
        ),
    }

    let status = if warnings.is_empty() {
        recommendations.push("Excellent nutritional balance, ready to save.".to_owned());
        AdequacyStatus::Excellent
    } else if warnings.len() <= t.good_max_warnings {
        recommendations.push("Good nutritional balance, consider minor adjustments.".to_owned());
        AdequacyStatus::Good
    } else {
        recommendations.push(
            "Adjust ingredient proportions to improve nutritional balance.".to_owned(),
        );
        AdequacyStatus::NeedsImprovement
    };

    AdequacyAssessment {
        status,
        warnings,
        recommendations,
        score: (score / 3).min(100),
    }
}

/// Scoring band: full points in `ideal`, partial in `acceptable`, minimal in `floor`
struct Band {
    ideal: (f64, f64),
    acceptable: (f64, f64),
    floor: (f64, f64),
    points: (f64, f64, f64),
}

impl Band {
    fn points(&self, value: f64) -> f64 {
        let within = |(low, high): (f64, f64)| low <= value && value <= high;
        if within(self.ideal) {
            self.points.0
        } else if within(self.acceptable) {
            self.points.1
        } else if within(self.floor) {
            self.points.2
        } else {
            0.0
        }
    }
}

macro_rules! band {
    ($module:ident) => {
        Band {
            ideal: quality::$module::IDEAL,
            acceptable: quality::$module::ACCEPTABLE,
            floor: quality::$module::FLOOR,
            points: quality::$module::POINTS,
        }
    };
}

const PROTEIN: Band = band!(protein_percent);
const FAT: Band = band!(fat_percent);
const CALCIUM_PHOSPHORUS: Band = band!(calcium_phosphorus);
const ENERGY_DENSITY: Band = band!(energy_density);
const OMEGA_RATIO: Band = band!(omega_ratio);

/// Points for closeness to `target`, zero once `tolerance` away
fn closeness((target, tolerance, points): (f64, f64, f64), value: f64) -> f64 {
    (tolerance - (target - value).abs()).max(0.0) / tolerance * points
}

/// Nutrition score from 0 to 100 over macros, Ca:P, variety, and energy density
#[must_use]
pub fn nutrition_score(vector: &NutrientVector, ingredient_count: usize) -> f64 {
    if vector.is_empty() {
        return 0.0;
    }
    let ratios = vector.ratios();
    let mut score = PROTEIN.points(ratios.protein_percent) + FAT.points(ratios.fat_percent);
    if let Some(ratio) = ratios.calcium_phosphorus_ratio {
        score += CALCIUM_PHOSPHORUS.points(ratio);
    }

    let (pair, few, many) = quality::VARIETY_POINTS;
    score += match ingredient_count {
        0 | 1 => 0.0,
        2 => pair,
        3 | 4 => few,
        _ => many,
    };
    score += ENERGY_DENSITY.points(ratios.calories_per_100g);

    f64::min(score, quality::MAX_SCORE)
}

/// Balance score from 0 to 100 over macro spread, minerals, vitamins, and omega ratio
#[must_use]
pub fn balance_score(vector: &NutrientVector) -> f64 {
    if vector.is_empty() {
        return 0.0;
    }
    let ratios = vector.ratios();
    let totals = &vector.totals;

    let mut score = closeness(quality::PROTEIN_BALANCE, ratios.protein_percent)
        + closeness(quality::FAT_BALANCE, ratios.fat_percent)
        + closeness(quality::CARB_BALANCE, ratios.carbohydrate_percent);

    if totals.calcium > 0.0 && totals.phosphorus > 0.0 {
        let ratio = totals.calcium / totals.phosphorus;
        score += (quality::CA_P_TARGET - ratio)
            .abs()
            .mul_add(-quality::CA_P_PENALTY_PER_UNIT, quality::CA_P_POINTS)
            .clamp(0.0, quality::CA_P_POINTS);
        if totals.iron > 0.0 && totals.zinc > 0.0 {
            score += quality::TRACE_MINERAL_POINTS;
        }
    }

    let vitamins = [
        totals.vitamin_a,
        totals.vitamin_d,
        totals.vitamin_e,
        totals.thiamine,
        totals.riboflavin,
        totals.niacin,
    ];
    let present = vitamins.iter().filter(|amount| **amount > 0.0).count();
    score += f64::min(
        present as f64 * quality::VITAMIN_POINTS_EACH,
        quality::VITAMIN_POINTS_MAX,
    );

    if totals.omega_3_fatty_acids > 0.0 && totals.omega_6_fatty_acids > 0.0 {
        score += OMEGA_RATIO.points(totals.omega_6_fatty_acids / totals.omega_3_fatty_acids);
    }

    f64::min(score, quality::MAX_SCORE)
}

/// Quality scores recorded with a saved recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// Nutrition score
    pub nutrition_score: f64,
    /// Balance score
    pub balance_score: f64,
}

impl QualityScores {
    /// Both scores for a vector of `ingredient_count` ingredients
    #[must_use]
    pub fn of(vector: &NutrientVector, ingredient_count: usize) -> Self {
        Self {
            nutrition_score: nutrition_score(vector, ingredient_count),
            balance_score: balance_score(vector),
        }
    }
}
