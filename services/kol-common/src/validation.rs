//! Configuration validation for the KOL insight services.
//!
//! Ensures thresholds and bucket bounds are ordered and the lexicon is usable
//! before an engine is built from a configuration.

use thiserror::Error;

use crate::config::{AnalysisConfig, HumorLexicon, InsightConfig, PlannerConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ConfigValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ConfigValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for InsightConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.analysis.validate() {
            errors.push(e);
        }
        if let Err(e) = self.humor.validate() {
            errors.push(e);
        }
        if let Err(e) = self.planner.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ConfigValidationError::Multiple(errors))
        }
    }
}

impl InsightConfig {
    /// Load, apply env overrides and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigValidationError::InvalidValue {
                field: "analysis.utc_offset_hours".into(),
                reason: format!("{} is outside -12..=14", self.utc_offset_hours),
            });
        }

        if !(self.top_decile_fraction > 0.0 && self.top_decile_fraction <= 1.0) {
            return Err(ConfigValidationError::InvalidValue {
                field: "analysis.top_decile_fraction".into(),
                reason: "must be in (0, 1]".into(),
            });
        }

        if self.medium_impact_threshold >= self.high_impact_threshold {
            return Err(ConfigValidationError::Conflict {
                reason: format!(
                    "medium impact threshold {} must be below high impact threshold {}",
                    self.medium_impact_threshold, self.high_impact_threshold
                ),
            });
        }

        if self.content_short_below > self.content_long_above {
            return Err(ConfigValidationError::Conflict {
                reason: "content_short_below must not exceed content_long_above".into(),
            });
        }

        if self.title_short_below > self.title_long_above {
            return Err(ConfigValidationError::Conflict {
                reason: "title_short_below must not exceed title_long_above".into(),
            });
        }

        if self.base_expected_performance < 0.0 || self.base_expected_performance > 100.0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "analysis.base_expected_performance".into(),
                reason: "must be within 0-100".into(),
            });
        }

        Ok(())
    }
}

impl Validate for HumorLexicon {
    fn validate(&self) -> ValidationResult<()> {
        let tiers = [
            ("humor.light", &self.light),
            ("humor.moderate", &self.moderate),
            ("humor.strong", &self.strong),
            ("humor.emojis", &self.emojis),
        ];

        for (field, entries) in tiers {
            if entries.is_empty() {
                return Err(ConfigValidationError::MissingField {
                    field: field.into(),
                });
            }
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(ConfigValidationError::InvalidValue {
                    field: field.into(),
                    reason: "entries must not be blank".into(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !self.fallback_name_pattern.contains("{code}") {
            return Err(ConfigValidationError::InvalidValue {
                field: "planner.fallback_name_pattern".into(),
                reason: "must contain the {code} placeholder".into(),
            });
        }
        Ok(())
    }
}
