// ABOUTME: Scoring weights, thresholds, and physiological constants used across the engine
// ABOUTME: Default values for the injected configuration; algorithms read config, not these directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Application constants organized by domain.

/// Recommendation ranking constants
pub mod recommendation {
    /// Weight of ingredient similarity in the total score
    pub const SIMILARITY_WEIGHT: f64 = 0.40;
    /// Weight of nutrition match in the total score
    pub const NUTRITION_WEIGHT: f64 = 0.35;
    /// Weight of pet suitability in the total score
    pub const SUITABILITY_WEIGHT: f64 = 0.25;
    /// Candidates scoring at or below this are discarded
    pub const MIN_TOTAL_SCORE: f64 = 0.3;
    /// Upper bound on the number of candidate recipes scored per call
    pub const CANDIDATE_POOL_LIMIT: usize = 50;
    /// Recipes fetched per pool slot, leaving room for allergen and hazard filtering
    pub const CANDIDATE_FETCH_FACTOR: usize = 4;
    /// Number of recommendations returned when the caller gives no limit
    pub const DEFAULT_LIMIT: usize = 2;
    /// Largest limit a caller may request
    pub const MAX_LIMIT: usize = 50;
    /// Highlights attached to a single recommendation
    pub const MAX_HIGHLIGHTS: usize = 3;
}

/// Ingredient similarity constants
pub mod similarity {
    /// Weight of the direct ingredient overlap
    pub const DIRECT_MATCH_WEIGHT: f64 = 0.5;
    /// Weight of the category distribution cosine
    pub const CATEGORY_WEIGHT: f64 = 0.3;
    /// Weight of the nutrient feature cosine
    pub const NUTRIENT_FEATURE_WEIGHT: f64 = 0.2;
}

/// Pet suitability constants
pub mod suitability {
    /// Credit for a species flag match
    pub const SPECIES_CREDIT: f64 = 0.4;
    /// Credit for a life-stage match
    pub const LIFE_STAGE_CREDIT: f64 = 0.3;
    /// Credit for special-needs fit (scaled by the match score)
    pub const SPECIAL_NEEDS_CREDIT: f64 = 0.3;
    /// Score when no pet is supplied
    pub const NEUTRAL_SCORE: f64 = 0.8;
    /// Special-needs match when no tag is satisfied
    pub const UNMATCHED_NEEDS_SCORE: f64 = 0.5;
    /// Weight-loss recipes must stay under this energy density (kcal/100g)
    pub const WEIGHT_LOSS_MAX_KCAL_PER_100G: f64 = 300.0;
    /// Weight-loss recipes need at least this protein percentage
    pub const WEIGHT_LOSS_MIN_PROTEIN_PERCENT: f64 = 20.0;
    /// Kidney-support recipes must stay under this protein percentage
    pub const KIDNEY_MAX_PROTEIN_PERCENT: f64 = 20.0;
    /// Match contributed by a satisfied weight-loss tag
    pub const WEIGHT_LOSS_MATCH: f64 = 0.8;
    /// Match contributed by a satisfied kidney-support tag
    pub const KIDNEY_SUPPORT_MATCH: f64 = 0.7;
    /// Match contributed by a satisfied coat-health tag
    pub const COAT_HEALTH_MATCH: f64 = 0.8;
    /// Match contributed by a satisfied allergy-friendly tag
    pub const ALLERGY_FRIENDLY_MATCH: f64 = 0.8;
}

/// Nutrition evaluation constants
pub mod nutrition {
    /// `nutrition_match` when no requirement or plan applies
    pub const NEUTRAL_MATCH: f64 = 0.5;
    /// Carbohydrate ceiling check result when the ceiling is exceeded
    pub const CARB_OVER_CEILING_SCORE: f64 = 0.5;
    /// Slope factor applied to the relative excess above a band maximum
    pub const OVER_MAX_FALLOFF: f64 = 0.5;
    /// Range-match score when a band maximum of zero is exceeded
    pub const ZERO_MAX_EXCEEDED_SCORE: f64 = 0.5;
    /// Lightest recipe accepted at save time (grams)
    pub const MIN_TOTAL_WEIGHT_GRAMS: f64 = 50.0;
}

/// Draft-time quality score bands
///
/// Each band scores full points inside `IDEAL`, partial points inside
/// `ACCEPTABLE` but outside `IDEAL`, and minimal points inside `FLOOR`.
pub mod quality {
    /// Nutrition score: protein percent of weight
    pub mod protein_percent {
        /// Full-credit band
        pub const IDEAL: (f64, f64) = (18.0, 35.0);
        /// Partial-credit band
        pub const ACCEPTABLE: (f64, f64) = (15.0, 40.0);
        /// Minimal-credit band
        pub const FLOOR: (f64, f64) = (10.0, f64::INFINITY);
        /// Full, partial and minimal points
        pub const POINTS: (f64, f64, f64) = (30.0, 20.0, 10.0);
    }
    /// Nutrition score: fat percent of weight
    pub mod fat_percent {
        /// Full-credit band
        pub const IDEAL: (f64, f64) = (5.5, 20.0);
        /// Partial-credit band
        pub const ACCEPTABLE: (f64, f64) = (4.0, 25.0);
        /// Minimal-credit band
        pub const FLOOR: (f64, f64) = (2.0, f64::INFINITY);
        /// Full, partial and minimal points
        pub const POINTS: (f64, f64, f64) = (20.0, 15.0, 10.0);
    }
    /// Nutrition score: calcium to phosphorus ratio
    pub mod calcium_phosphorus {
        /// Full-credit band
        pub const IDEAL: (f64, f64) = (1.0, 2.0);
        /// Partial-credit band
        pub const ACCEPTABLE: (f64, f64) = (0.8, 2.5);
        /// Minimal-credit band
        pub const FLOOR: (f64, f64) = (0.5, f64::INFINITY);
        /// Full, partial and minimal points
        pub const POINTS: (f64, f64, f64) = (20.0, 15.0, 10.0);
    }
    /// Nutrition score: energy density in kcal per 100 g
    pub mod energy_density {
        /// Full-credit band
        pub const IDEAL: (f64, f64) = (250.0, 400.0);
        /// Partial-credit band
        pub const ACCEPTABLE: (f64, f64) = (200.0, 500.0);
        /// Minimal-credit band
        pub const FLOOR: (f64, f64) = (150.0, 600.0);
        /// Full, partial and minimal points
        pub const POINTS: (f64, f64, f64) = (15.0, 10.0, 5.0);
    }
    /// Nutrition score points for 2, 3-4 and 5+ distinct ingredients
    pub const VARIETY_POINTS: (f64, f64, f64) = (5.0, 10.0, 15.0);

    /// Balance score: macro targets as (target percent, tolerance, points)
    pub const PROTEIN_BALANCE: (f64, f64, f64) = (25.0, 20.0, 15.0);
    /// Fat target, tolerance and points
    pub const FAT_BALANCE: (f64, f64, f64) = (12.5, 10.0, 15.0);
    /// Carbohydrate target, tolerance and points
    pub const CARB_BALANCE: (f64, f64, f64) = (10.0, 15.0, 10.0);
    /// Balance score: target Ca:P ratio
    pub const CA_P_TARGET: f64 = 1.5;
    /// Points lost per unit of Ca:P deviation
    pub const CA_P_PENALTY_PER_UNIT: f64 = 10.0;
    /// Maximum Ca:P points
    pub const CA_P_POINTS: f64 = 20.0;
    /// Points when both iron and zinc are present
    pub const TRACE_MINERAL_POINTS: f64 = 10.0;
    /// Points per vitamin present
    pub const VITAMIN_POINTS_EACH: f64 = 3.0;
    /// Cap on vitamin points
    pub const VITAMIN_POINTS_MAX: f64 = 20.0;
    /// Omega-6 to omega-3 ratio bands, same shape as the nutrition bands
    pub mod omega_ratio {
        /// Full-credit band
        pub const IDEAL: (f64, f64) = (5.0, 10.0);
        /// Partial-credit band
        pub const ACCEPTABLE: (f64, f64) = (3.0, 15.0);
        /// Minimal-credit band
        pub const FLOOR: (f64, f64) = (0.0, 20.0);
        /// Full, partial and minimal points
        pub const POINTS: (f64, f64, f64) = (10.0, 7.0, 5.0);
    }
    /// Upper bound of both scores
    pub const MAX_SCORE: f64 = 100.0;
}

/// Age brackets and energy conversions
pub mod physiology {
    /// Pets younger than this (years) are puppies/kittens
    pub const JUVENILE_MAX_AGE_YEARS: f64 = 1.0;
    /// Pets this age or older (years) are seniors
    pub const SENIOR_MIN_AGE_YEARS: f64 = 7.0;
    /// Metabolizable energy density of a typical home-made diet (kcal/g)
    pub const FOOD_KCAL_PER_GRAM: f64 = 3.5;
    /// Energy density of dry matter used for requirement-based intake (kcal/kg)
    pub const DRY_MATTER_KCAL_PER_KG: f64 = 4000.0;
    /// Daily energy factors for dogs (kcal per kg body weight)
    pub mod dog_kcal_per_kg {
        /// Puppies
        pub const JUVENILE: f64 = 100.0;
        /// Adults
        pub const ADULT: f64 = 95.0;
        /// Seniors
        pub const SENIOR: f64 = 80.0;
    }
    /// Daily energy factors for cats (kcal per kg body weight)
    pub mod cat_kcal_per_kg {
        /// Kittens
        pub const JUVENILE: f64 = 120.0;
        /// Adults
        pub const ADULT: f64 = 100.0;
        /// Seniors
        pub const SENIOR: f64 = 85.0;
    }
}

/// Unit conversion factors
pub mod units {
    /// Grams in one milligram
    pub const GRAMS_PER_MILLIGRAM: f64 = 0.001;
    /// Grams in one microgram
    pub const GRAMS_PER_MICROGRAM: f64 = 0.000_001;
    /// Nutrient values are stored per this many grams of ingredient
    pub const REFERENCE_PORTION_GRAMS: f64 = 100.0;
    /// Grams per kilogram
    pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;
}

/// Service identity used in structured logs
pub mod service_names {
    /// Default service name
    pub const PAWPLATE: &str = "pawplate";
}
