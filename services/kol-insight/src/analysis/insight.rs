//! Insight/experiment synthesizer.
//!
//! Turns the leading entries of a lift ranking into schedulable
//! [`ExperimentConfig`] bundles: one per feature, plus one combined bundle that
//! merges the parameter hints of the top features.

use std::collections::BTreeMap;

use kol_common::config::{AnalysisConfig, InsightConfig};
use kol_common::util::round_to;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::lift::FeatureRankingEntry;

// ============================================================================
// Experiment Config
// ============================================================================

/// A named, schedulable parameter bundle derived from lift analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, Value>,
    /// Predicted engagement score (0-100)
    pub expected_performance: f64,
    /// Confidence in the prediction (0-1)
    pub confidence_level: f64,
    /// Feature ids this experiment is built on, in ranking order
    pub based_on_features: Vec<String>,
}

impl ExperimentConfig {
    /// String parameter, if present.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }

    pub fn is_combined(&self) -> bool {
        self.based_on_features.len() > 1
    }
}

// ============================================================================
// Lookup Tables
// ============================================================================

/// Parameter hints suggested by a feature.
fn parameter_hints(feature_id: &str) -> Vec<(&'static str, Value)> {
    match feature_id {
        "posting_time_morning" => vec![("time_window", json!("07:00-11:00"))],
        "posting_time_afternoon" => vec![("time_window", json!("12:00-18:00"))],
        "posting_time_evening" => vec![("time_window", json!("18:00-22:00"))],
        "posting_time_night" => vec![("time_window", json!("00:00-02:00"))],
        "content_length_short" => vec![("content_length", json!("short"))],
        "content_length_medium" => vec![("content_length", json!("medium"))],
        "content_length_long" => vec![("content_length", json!("long"))],
        "title_length_short" => vec![("title_length", json!("short"))],
        "title_length_medium" => vec![("title_length", json!("medium"))],
        "title_length_long" => vec![("title_length", json!("long"))],
        "has_stock_tags" => vec![("include_stock_tags", json!(true))],
        "has_humor" => vec![
            ("content_style", json!("humorous")),
            ("include_humor", json!(true)),
        ],
        "has_emoji" => vec![
            ("content_style", json!("humorous")),
            ("use_emoji", json!(true)),
        ],
        "has_question" => vec![
            ("content_style", json!("casual")),
            ("posting_type", json!("interaction")),
        ],
        "source_system" => vec![("posting_type", json!("analysis"))],
        "has_topic" => vec![("trigger_type", json!("trending_topics"))],
        "has_news_link" => vec![("include_news_links", json!(true))],
        "has_hashtag" => vec![("use_hashtags", json!(true))],
        "has_exclamation" => vec![("tone", json!("excited"))],
        "has_stock_code" => vec![("mention_stock_code", json!(true))],
        "has_paragraph_break" => vec![("content_format", json!("paragraphs"))],
        "has_bullet" => vec![("content_format", json!("bullet_points"))],
        "has_quote" => vec![("content_format", json!("quoted"))],
        _ => Vec::new(),
    }
}

/// Positional scaffolding: (trigger type, stock count, time window).
const SCAFFOLDING_PRESETS: &[(&str, u32, &str)] = &[
    ("limit_up_after_hours", 5, "14:00-16:00"),
    ("intraday_gainers", 10, "09:30-13:30"),
    ("trending_topics", 3, "18:00-22:00"),
];

fn scaffolding(index: usize) -> BTreeMap<String, Value> {
    let (trigger_type, stock_count, time_window) =
        SCAFFOLDING_PRESETS[index % SCAFFOLDING_PRESETS.len()];

    let mut params = BTreeMap::new();
    params.insert("trigger_type".to_string(), json!(trigger_type));
    params.insert("stock_count".to_string(), json!(stock_count));
    params.insert("time_window".to_string(), json!(time_window));
    params
}

/// Confidence by rank: 0.8, 0.75, 0.7, ... down by 0.05 per rank, floored at 0.
pub fn confidence_for_rank(rank: usize) -> f64 {
    round_to((0.8 - 0.05 * rank as f64).max(0.0), 2)
}

// ============================================================================
// Synthesizer
// ============================================================================

/// Synthesizes experiment configs from a lift ranking.
#[derive(Debug, Clone)]
pub struct ExperimentSynthesizer {
    config: AnalysisConfig,
}

impl ExperimentSynthesizer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(config.analysis.clone())
    }

    fn expected_performance(&self, lift_fraction: f64) -> f64 {
        let raw = self.config.base_expected_performance + lift_fraction * self.config.performance_span;
        round_to(raw.clamp(0.0, 100.0), 2)
    }

    /// Synthesize with the configured `experiment_top_k`.
    pub fn synthesize_default(&self, ranking: &[FeatureRankingEntry]) -> Vec<ExperimentConfig> {
        self.synthesize(ranking, self.config.experiment_top_k)
    }

    /// One experiment per leading entry (up to `top_k`), then a combined one.
    ///
    /// The combined experiment is emitted only when at least two features
    /// contribute to it.
    pub fn synthesize(
        &self,
        ranking: &[FeatureRankingEntry],
        top_k: usize,
    ) -> Vec<ExperimentConfig> {
        let mut experiments: Vec<ExperimentConfig> = ranking
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(rank, entry)| self.single(rank, entry))
            .collect();

        let combined_count = self.config.combined_feature_count.min(ranking.len());
        if combined_count >= 2 {
            experiments.push(self.combined(&ranking[..combined_count]));
        }

        tracing::debug!(
            ranked = ranking.len(),
            top_k,
            experiments = experiments.len(),
            "Experiments synthesized"
        );
        experiments
    }

    fn single(&self, rank: usize, entry: &FeatureRankingEntry) -> ExperimentConfig {
        let mut parameters = scaffolding(rank);
        for (key, value) in parameter_hints(&entry.feature_id) {
            parameters.insert(key.to_string(), value);
        }

        let direction = if entry.lift >= 0.0 { "高於" } else { "低於" };

        ExperimentConfig {
            id: format!("exp_{}_{}", rank + 1, entry.feature_id),
            name: format!("實驗{}：{}", rank + 1, entry.feature_name),
            description: format!(
                "高互動貼文的{}{}整體 {:.0} 個百分點，測試調整此特徵對互動的影響",
                entry.feature_name,
                direction,
                entry.lift.abs()
            ),
            parameters,
            expected_performance: self.expected_performance(entry.lift_fraction()),
            confidence_level: confidence_for_rank(rank),
            based_on_features: vec![entry.feature_id.clone()],
        }
    }

    /// Merge the hints of the given entries. For a parameter suggested by
    /// more than one feature, the first feature's value wins.
    fn combined(&self, entries: &[FeatureRankingEntry]) -> ExperimentConfig {
        let mut hints: BTreeMap<String, Value> = BTreeMap::new();
        for entry in entries {
            for (key, value) in parameter_hints(&entry.feature_id) {
                hints.entry(key.to_string()).or_insert(value);
            }
        }

        let mut parameters = scaffolding(0);
        parameters.extend(hints);

        let n = entries.len() as f64;
        let mean_fraction = entries.iter().map(|e| e.lift_fraction()).sum::<f64>() / n;
        let mean_confidence = (0..entries.len()).map(confidence_for_rank).sum::<f64>() / n;

        let mut based_on: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !based_on.contains(&entry.feature_id) {
                based_on.push(entry.feature_id.clone());
            }
        }

        let names: Vec<&str> = entries.iter().map(|e| e.feature_name.as_str()).collect();

        ExperimentConfig {
            id: "exp_combined".to_string(),
            name: format!("綜合實驗：前{}大特徵", entries.len()),
            description: format!("同時套用 {} 的建議參數", names.join("、")),
            parameters,
            expected_performance: self.expected_performance(mean_fraction),
            confidence_level: round_to(mean_confidence, 2),
            based_on_features: based_on,
        }
    }
}

impl Default for ExperimentSynthesizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
