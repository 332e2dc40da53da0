//! Configuration management for the KOL insight services.
//!
//! The analysis and planning engines read their tunable tables (humor lexicon,
//! lift thresholds, length buckets, stock directory) from a single file at
//! `~/.kolinsight/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (KOL_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `KOL_LOG_LEVEL` → observability.log_level
//! - `KOL_LOG_FORMAT` → observability.log_format
//! - `KOL_UTC_OFFSET_HOURS` → analysis.utc_offset_hours
//!
//! # Process-wide Tables
//!
//! [`InsightConfig::install`] publishes a configuration once per process and
//! [`InsightConfig::global`] hands it out. When nothing was installed the
//! defaults below are used.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::Validate;

static GLOBAL: OnceCell<InsightConfig> = OnceCell::new();

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".kolinsight"),
        |dirs| dirs.home_dir().join(".kolinsight"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for the insight and planning engines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Feature extraction, lift ranking and experiment synthesis
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Humor classifier lexicon
    #[serde(default)]
    pub humor: HumorLexicon,

    /// Assignment planner tables
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl InsightConfig {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("KOL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("KOL_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(offset) = std::env::var("KOL_UTC_OFFSET_HOURS") {
            match offset.parse() {
                Ok(hours) => self.analysis.utc_offset_hours = hours,
                Err(_) => tracing::warn!(value = %offset, "Ignoring invalid KOL_UTC_OFFSET_HOURS"),
            }
        }
    }

    /// Save configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Validate and publish this configuration as the process-wide table.
    ///
    /// Fails on invalid values, or if a configuration was already installed or
    /// [`InsightConfig::global`] was read before installation.
    pub fn install(self) -> crate::Result<&'static InsightConfig> {
        self.validate()?;
        GLOBAL
            .set(self)
            .map_err(|_| crate::Error::Config("configuration already installed".into()))?;
        Ok(Self::global())
    }

    /// The process-wide configuration (defaults when nothing was installed).
    pub fn global() -> &'static InsightConfig {
        GLOBAL.get_or_init(InsightConfig::default)
    }
}

// ============================================================================
// Analysis Configuration
// ============================================================================

/// Thresholds and bucket bounds for the feature-lift analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hours east of UTC used to derive the local posting hour (Taipei = 8)
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Share of the corpus treated as the top decile
    #[serde(default = "default_top_decile_fraction")]
    pub top_decile_fraction: f64,

    /// |lift| above this (percentage points) is high impact
    #[serde(default = "default_high_impact_threshold")]
    pub high_impact_threshold: f64,

    /// |lift| above this (percentage points) is medium impact
    #[serde(default = "default_medium_impact_threshold")]
    pub medium_impact_threshold: f64,

    /// Content shorter than this many characters is `short`
    #[serde(default = "default_content_short_below")]
    pub content_short_below: usize,

    /// Content longer than this many characters is `long`
    #[serde(default = "default_content_long_above")]
    pub content_long_above: usize,

    /// Titles shorter than this many characters are `short`
    #[serde(default = "default_title_short_below")]
    pub title_short_below: usize,

    /// Titles longer than this many characters are `long`
    #[serde(default = "default_title_long_above")]
    pub title_long_above: usize,

    /// Number of ranked features that each get their own experiment
    #[serde(default = "default_experiment_top_k")]
    pub experiment_top_k: usize,

    /// Number of leading features merged into the combined experiment
    #[serde(default = "default_combined_feature_count")]
    pub combined_feature_count: usize,

    /// Expected performance of an experiment with zero lift
    #[serde(default = "default_base_expected_performance")]
    pub base_expected_performance: f64,

    /// Expected performance added at a full (100 point) lift
    #[serde(default = "default_performance_span")]
    pub performance_span: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            top_decile_fraction: default_top_decile_fraction(),
            high_impact_threshold: default_high_impact_threshold(),
            medium_impact_threshold: default_medium_impact_threshold(),
            content_short_below: default_content_short_below(),
            content_long_above: default_content_long_above(),
            title_short_below: default_title_short_below(),
            title_long_above: default_title_long_above(),
            experiment_top_k: default_experiment_top_k(),
            combined_feature_count: default_combined_feature_count(),
            base_expected_performance: default_base_expected_performance(),
            performance_span: default_performance_span(),
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_top_decile_fraction() -> f64 {
    0.1
}

fn default_high_impact_threshold() -> f64 {
    15.0
}

fn default_medium_impact_threshold() -> f64 {
    8.0
}

fn default_content_short_below() -> usize {
    200
}

fn default_content_long_above() -> usize {
    500
}

fn default_title_short_below() -> usize {
    20
}

fn default_title_long_above() -> usize {
    40
}

fn default_experiment_top_k() -> usize {
    3
}

fn default_combined_feature_count() -> usize {
    3
}

fn default_base_expected_performance() -> f64 {
    60.0
}

fn default_performance_span() -> f64 {
    40.0
}

// ============================================================================
// Humor Lexicon
// ============================================================================

/// Weighted keyword tiers used by the humor classifier.
///
/// Weights: light = 1, moderate = 2, strong = 3, emoji = 2.
/// Keywords are matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumorLexicon {
    #[serde(default = "default_light_keywords")]
    pub light: Vec<String>,

    #[serde(default = "default_moderate_keywords")]
    pub moderate: Vec<String>,

    #[serde(default = "default_strong_keywords")]
    pub strong: Vec<String>,

    #[serde(default = "default_humor_emojis")]
    pub emojis: Vec<String>,
}

impl Default for HumorLexicon {
    fn default() -> Self {
        Self {
            light: default_light_keywords(),
            moderate: default_moderate_keywords(),
            strong: default_strong_keywords(),
            emojis: default_humor_emojis(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_light_keywords() -> Vec<String> {
    strings(&["笑", "有趣", "好玩", "呵呵", "嘿嘿", "lol"])
}

fn default_moderate_keywords() -> Vec<String> {
    strings(&["哈哈", "笑死", "xd", "搞笑", "幽默", "傻眼"])
}

fn default_strong_keywords() -> Vec<String> {
    strings(&["哈哈哈哈", "笑到噴飯", "笑爛", "超好笑", "笑到肚子痛"])
}

fn default_humor_emojis() -> Vec<String> {
    strings(&["😂", "🤣", "😆", "😄", "😁", "😜", "🤪", "😹"])
}

// ============================================================================
// Planner Configuration
// ============================================================================

/// Lookup tables for the assignment planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Known stock code → display name
    #[serde(default = "default_stock_names")]
    pub stock_names: BTreeMap<String, String>,

    /// Name used for unknown codes; `{code}` is replaced by the stock code
    #[serde(default = "default_fallback_name_pattern")]
    pub fallback_name_pattern: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            stock_names: default_stock_names(),
            fallback_name_pattern: default_fallback_name_pattern(),
        }
    }
}

impl PlannerConfig {
    /// Fallback display name for a stock code.
    pub fn fallback_name(&self, code: &str) -> String {
        self.fallback_name_pattern.replace("{code}", code)
    }

    /// Resolve a stock code to its display name, falling back to the pattern.
    pub fn resolve_name(&self, code: &str) -> String {
        self.stock_names
            .get(code)
            .cloned()
            .unwrap_or_else(|| self.fallback_name(code))
    }
}

fn default_stock_names() -> BTreeMap<String, String> {
    [
        ("2330", "台積電"),
        ("2317", "鴻海"),
        ("2454", "聯發科"),
        ("2303", "聯電"),
        ("2308", "台達電"),
        ("2412", "中華電"),
        ("2881", "富邦金"),
        ("2882", "國泰金"),
        ("3008", "大立光"),
        ("2603", "長榮"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

fn default_fallback_name_pattern() -> String {
    "股票{code}".to_string()
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format ("json" or "pretty")
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
