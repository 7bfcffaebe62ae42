// ABOUTME: Main library entry point for the PawPlate nutrition engine
// ABOUTME: Wires repositories, the reference catalog and logging around the intelligence crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

#![deny(unsafe_code)]

//! # `PawPlate`
//!
//! Nutrition aggregation and recipe recommendation for home-made pet food.
//!
//! ## Features
//!
//! - **Nutrient aggregation**: weighted per-100g totals with derived ratios
//! - **Requirement compliance**: AAFCO-style bands with graded range matching
//! - **Safety screening**: pet allergens and species hazards, advisory or blocking
//! - **Recommendations**: similarity, nutrition and suitability blended into one score
//! - **Nutrition plans**: preset plans, ingredient weight suggestions and feeding amounts
//!
//! ## Architecture
//!
//! - **`pawplate_core`**: errors, constants and domain models
//! - **`pawplate_intelligence`**: configuration and pure scoring algorithms
//! - **Repository**: read-only traits the engine fetches reference data through
//! - **Catalog**: immutable in-memory store with a bundled starter dataset
//! - **Engine**: the facade callers use
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pawplate::catalog::ReferenceCatalog;
//! use pawplate::engine::{NutritionEngine, RecommendationRequest};
//! use pawplate::pawplate_core::errors::AppResult;
//! use pawplate::pawplate_core::models::IngredientId;
//! use pawplate::pawplate_intelligence::IntelligenceConfig;
//!
//! fn main() -> AppResult<()> {
//!     let engine = NutritionEngine::new(
//!         IntelligenceConfig::load()?,
//!         ReferenceCatalog::default_dataset()?,
//!     )?;
//!     let request = RecommendationRequest::new([IngredientId(4), IngredientId(23)]);
//!     for score in engine.recommend(&request)? {
//!         println!("{:.2} {}", score.total_score, score.recipe.name);
//!     }
//!     Ok(())
//! }
//! ```

/// In-memory reference catalog
pub mod catalog;

/// Engine facade
pub mod engine;

/// Structured logging setup
pub mod logging;

/// Repository traits for reference data
pub mod repository;

pub use pawplate_core;
pub use pawplate_intelligence;

pub use catalog::{CatalogError, ReferenceCatalog};
pub use engine::{
    DraftAssessment, FeedingGuide, NutritionEngine, RecommendationRequest, SaveValidation,
};
pub use repository::{
    IngredientRepository, PetRepository, RecipeRepository, ReferenceStore, RequirementRepository,
};
