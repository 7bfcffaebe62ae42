// ABOUTME: Configuration module for pawplate-intelligence crate
// ABOUTME: Re-exports intelligence configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 PawPlate Contributors

/// Intelligence module configuration (scoring weights, thresholds, limits)
pub mod intelligence;

pub use intelligence::{ConfigError, EvaluationBasis, IntelligenceConfig};
