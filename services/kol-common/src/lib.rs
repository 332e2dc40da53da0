//! KOL Common - Shared types, utilities, and configuration for the KOL insight services.
//!
//! This crate provides:
//! - Tunable configuration tables (humor lexicon, lift thresholds, bucket bounds)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup
//! - Small text utilities used across services

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    AnalysisConfig, HumorLexicon, InsightConfig, ObservabilityConfig, PlannerConfig,
};
pub use error::{Error, Result};
pub use validation::{ConfigValidationError, Validate, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{AnalysisConfig, HumorLexicon, InsightConfig, PlannerConfig};
    pub use crate::error::{Error, Result};
    pub use crate::logging::init_logging;
    pub use crate::validation::Validate;
}
