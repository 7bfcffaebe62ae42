// ABOUTME: Core types and constants for the `PawPlate` nutrition engine
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

#![deny(unsafe_code)]

//! # `PawPlate` Core
//!
//! Foundation crate providing shared types and constants for the `PawPlate`
//! nutrition engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Scoring weights, thresholds, and physiological constants
//! - **models**: Ingredients, nutrients, pets, recipes, and requirement rows

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
