// ABOUTME: Closed nutrient taxonomy and the per-100g nutrient profile carried by every ingredient
// ABOUTME: One macro table defines each nutrient's field, unit, and requirement concentration basis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

//! Nutrient taxonomy.
//!
//! [`Nutrient`] enumerates every tracked nutrient and [`NutrientProfile`]
//! stores one required `f64` per nutrient. Absent, null, negative or
//! non-finite values become `0.0` when a profile is deserialized, so scoring
//! code never has to check for missing data.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::units::{GRAMS_PER_MICROGRAM, GRAMS_PER_MILLIGRAM};
use crate::errors::AppError;

/// Unit in which an ingredient stores a nutrient per 100g
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientUnit {
    /// Kilocalories
    Kilocalories,
    /// Grams
    Grams,
    /// Milligrams
    Milligrams,
    /// Micrograms
    Micrograms,
    /// International units
    InternationalUnits,
}

impl NutrientUnit {
    /// Grams represented by one unit, when the unit is a mass
    #[must_use]
    pub const fn grams_factor(self) -> Option<f64> {
        match self {
            Self::Grams => Some(1.0),
            Self::Milligrams => Some(GRAMS_PER_MILLIGRAM),
            Self::Micrograms => Some(GRAMS_PER_MICROGRAM),
            Self::Kilocalories | Self::InternationalUnits => None,
        }
    }
}

/// How a requirement band expresses a nutrient concentration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationBasis {
    /// Mass percentage of the food
    Percent,
    /// Native unit per kilogram of food
    PerKilogram,
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(sanitize(value.unwrap_or(0.0)))
}

/// Clamp a raw nutrient value to a finite, non-negative number
#[must_use]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

macro_rules! nutrient_table {
    ($( $variant:ident($field:ident, $unit:ident, $basis:ident) => $doc:literal; )*) => {
        /// Every nutrient tracked per ingredient
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Nutrient {
            $(
                #[doc = $doc]
                $variant,
            )*
        }

        impl Nutrient {
            /// All nutrients in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Field name used in reference data and reports
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($field),)*
                }
            }

            /// Storage unit per 100g of ingredient
            #[must_use]
            pub const fn unit(self) -> NutrientUnit {
                match self {
                    $(Self::$variant => NutrientUnit::$unit,)*
                }
            }

            /// Concentration basis of requirement bands for this nutrient
            #[must_use]
            pub const fn basis(self) -> ConcentrationBasis {
                match self {
                    $(Self::$variant => ConcentrationBasis::$basis,)*
                }
            }
        }

        /// Nutrient amounts per 100g of ingredient, or aggregated totals
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct NutrientProfile {
            $(
                #[doc = $doc]
                #[serde(default, deserialize_with = "non_negative")]
                pub $field: f64,
            )*
        }

        impl NutrientProfile {
            /// Read one nutrient
            #[must_use]
            pub const fn get(&self, nutrient: Nutrient) -> f64 {
                match nutrient {
                    $(Nutrient::$variant => self.$field,)*
                }
            }

            /// Mutable access to one nutrient
            pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
                match nutrient {
                    $(Nutrient::$variant => &mut self.$field,)*
                }
            }
        }
    };
}

nutrient_table! {
    Calories(calories, Kilocalories, PerKilogram) => "Metabolizable energy";
    Protein(protein, Grams, Percent) => "Crude protein";
    Fat(fat, Grams, Percent) => "Crude fat";
    Carbohydrate(carbohydrate, Grams, Percent) => "Carbohydrate";
    Fiber(fiber, Grams, Percent) => "Crude fiber";
    Moisture(moisture, Grams, Percent) => "Water content";
    Ash(ash, Grams, Percent) => "Ash";
    Calcium(calcium, Milligrams, PerKilogram) => "Calcium";
    Phosphorus(phosphorus, Milligrams, PerKilogram) => "Phosphorus";
    Potassium(potassium, Milligrams, PerKilogram) => "Potassium";
    Sodium(sodium, Milligrams, PerKilogram) => "Sodium";
    Chloride(chloride, Milligrams, PerKilogram) => "Chloride";
    Magnesium(magnesium, Milligrams, PerKilogram) => "Magnesium";
    Iron(iron, Milligrams, PerKilogram) => "Iron";
    Copper(copper, Milligrams, PerKilogram) => "Copper";
    Manganese(manganese, Milligrams, PerKilogram) => "Manganese";
    Zinc(zinc, Milligrams, PerKilogram) => "Zinc";
    Iodine(iodine, Milligrams, PerKilogram) => "Iodine";
    Selenium(selenium, Milligrams, PerKilogram) => "Selenium";
    VitaminA(vitamin_a, InternationalUnits, PerKilogram) => "Vitamin A";
    VitaminD(vitamin_d, InternationalUnits, PerKilogram) => "Vitamin D";
    VitaminE(vitamin_e, InternationalUnits, PerKilogram) => "Vitamin E";
    VitaminK(vitamin_k, Milligrams, PerKilogram) => "Vitamin K";
    Thiamine(thiamine, Milligrams, PerKilogram) => "Thiamine (B1)";
    Riboflavin(riboflavin, Milligrams, PerKilogram) => "Riboflavin (B2)";
    Niacin(niacin, Milligrams, PerKilogram) => "Niacin (B3)";
    PantothenicAcid(pantothenic_acid, Milligrams, PerKilogram) => "Pantothenic acid (B5)";
    Pyridoxine(pyridoxine, Milligrams, PerKilogram) => "Pyridoxine (B6)";
    FolicAcid(folic_acid, Milligrams, PerKilogram) => "Folic acid (B9)";
    VitaminB12(vitamin_b12, Micrograms, PerKilogram) => "Cobalamin (B12)";
    Biotin(biotin, Milligrams, PerKilogram) => "Biotin (B7)";
    Choline(choline, Milligrams, PerKilogram) => "Choline";
    Arginine(arginine, Milligrams, Percent) => "Arginine";
    Histidine(histidine, Milligrams, Percent) => "Histidine";
    Isoleucine(isoleucine, Milligrams, Percent) => "Isoleucine";
    Leucine(leucine, Milligrams, Percent) => "Leucine";
    Lysine(lysine, Milligrams, Percent) => "Lysine";
    Methionine(methionine, Milligrams, Percent) => "Methionine";
    Phenylalanine(phenylalanine, Milligrams, Percent) => "Phenylalanine";
    Threonine(threonine, Milligrams, Percent) => "Threonine";
    Tryptophan(tryptophan, Milligrams, Percent) => "Tryptophan";
    Valine(valine, Milligrams, Percent) => "Valine";
    Taurine(taurine, Milligrams, PerKilogram) => "Taurine";
    AlphaLinolenicAcid(alpha_linolenic_acid, Grams, Percent) => "Alpha-linolenic acid (ALA)";
    EicosapentaenoicAcid(eicosapentaenoic_acid, Grams, Percent) => "Eicosapentaenoic acid (EPA)";
    DocosahexaenoicAcid(docosahexaenoic_acid, Grams, Percent) => "Docosahexaenoic acid (DHA)";
    ArachidonicAcid(arachidonic_acid, Grams, Percent) => "Arachidonic acid";
    Omega3FattyAcids(omega_3_fatty_acids, Grams, Percent) => "Total omega-3 fatty acids";
    Omega6FattyAcids(omega_6_fatty_acids, Grams, Percent) => "Total omega-6 fatty acids";
}

impl NutrientProfile {
    /// Add `other` scaled by `factor` into this profile
    pub fn add_scaled(&mut self, other: &Self, factor: f64) {
        for &nutrient in Nutrient::ALL {
            *self.get_mut(nutrient) += other.get(nutrient) * factor;
        }
    }

    /// Clamp every value to a finite, non-negative number
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for &nutrient in Nutrient::ALL {
            let value = self.get_mut(nutrient);
            *value = sanitize(*value);
        }
        self
    }

    /// Iterate `(nutrient, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ALL.iter().map(move |&nutrient| (nutrient, self.get(nutrient)))
    }

    /// True when every nutrient is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, value)| value <= 0.0)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Nutrient {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|nutrient| nutrient.name() == wanted)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown nutrient: {s}")))
    }
}

impl Serialize for Nutrient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Nutrient {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
