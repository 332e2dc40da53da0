//! Lift ranker.
//!
//! Contrasts the top decile of a corpus (by total interactions) against the
//! whole population and ranks a fixed registry of features by the size of the
//! percentage-point difference.
//!
//! # Algorithm
//!
//! 1. Stable sort posts by total interactions, descending
//! 2. `decile_size = max(1, floor(0.1 * n))`, take the leading posts
//! 3. Summarize the decile and the population
//! 4. `lift = decile − population` for every registered feature
//! 5. Classify impact (`> 15` high, `> 8` medium, else low)
//! 6. Sort by `|lift|` descending, ties kept in registry order

use kol_common::config::{AnalysisConfig, InsightConfig};
use serde::{Deserialize, Serialize};

use super::features::{FeatureExtractor, FeatureSummary};
use crate::error::{Error, Result};
use crate::types::{Impact, Post};

// ============================================================================
// Feature Registry
// ============================================================================

/// A named feature comparison read from a [`FeatureSummary`].
pub struct FeatureDefinition {
    /// Stable identifier, used as key of the experiment parameter hints
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    extract: fn(&FeatureSummary) -> f64,
}

impl FeatureDefinition {
    pub fn value(&self, summary: &FeatureSummary) -> f64 {
        (self.extract)(summary)
    }
}

impl std::fmt::Debug for FeatureDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Registered feature comparisons. Declaration order breaks ranking ties.
pub static FEATURE_REGISTRY: &[FeatureDefinition] = &[
    FeatureDefinition {
        id: "posting_time_afternoon",
        name: "下午發文比例",
        extract: |s| s.time_of_day.afternoon,
    },
    FeatureDefinition {
        id: "posting_time_evening",
        name: "晚上發文比例",
        extract: |s| s.time_of_day.evening,
    },
    FeatureDefinition {
        id: "content_length_medium",
        name: "中等長度內容比例",
        extract: |s| s.content_length.medium,
    },
    FeatureDefinition {
        id: "has_stock_tags",
        name: "帶股票標籤比例",
        extract: |s| s.has_stock_tags,
    },
    FeatureDefinition {
        id: "has_humor",
        name: "幽默內容比例",
        extract: |s| s.has_humor,
    },
    FeatureDefinition {
        id: "has_emoji",
        name: "使用表情符號比例",
        extract: |s| s.markers.emoji,
    },
    FeatureDefinition {
        id: "has_question",
        name: "包含問句比例",
        extract: |s| s.markers.question,
    },
    FeatureDefinition {
        id: "source_system",
        name: "系統發文比例",
        extract: |s| s.system_source,
    },
    FeatureDefinition {
        id: "posting_time_morning",
        name: "早上發文比例",
        extract: |s| s.time_of_day.morning,
    },
    FeatureDefinition {
        id: "posting_time_night",
        name: "深夜發文比例",
        extract: |s| s.time_of_day.night,
    },
    FeatureDefinition {
        id: "content_length_short",
        name: "短內容比例",
        extract: |s| s.content_length.short,
    },
    FeatureDefinition {
        id: "content_length_long",
        name: "長內容比例",
        extract: |s| s.content_length.long,
    },
    FeatureDefinition {
        id: "title_length_short",
        name: "短標題比例",
        extract: |s| s.title_length.short,
    },
    FeatureDefinition {
        id: "title_length_medium",
        name: "中等標題比例",
        extract: |s| s.title_length.medium,
    },
    FeatureDefinition {
        id: "title_length_long",
        name: "長標題比例",
        extract: |s| s.title_length.long,
    },
    FeatureDefinition {
        id: "has_topic",
        name: "關聯話題比例",
        extract: |s| s.has_topic,
    },
    FeatureDefinition {
        id: "has_news_link",
        name: "附新聞連結比例",
        extract: |s| s.has_news_link,
    },
    FeatureDefinition {
        id: "has_hashtag",
        name: "使用標籤符號比例",
        extract: |s| s.markers.hashtag,
    },
    FeatureDefinition {
        id: "has_exclamation",
        name: "包含驚嘆號比例",
        extract: |s| s.markers.exclamation,
    },
    FeatureDefinition {
        id: "has_stock_code",
        name: "提及股票代號比例",
        extract: |s| s.markers.stock_code,
    },
    FeatureDefinition {
        id: "has_paragraph_break",
        name: "分段內容比例",
        extract: |s| s.markers.paragraph_break,
    },
    FeatureDefinition {
        id: "has_bullet",
        name: "條列內容比例",
        extract: |s| s.markers.bullet,
    },
    FeatureDefinition {
        id: "has_quote",
        name: "引用內容比例",
        extract: |s| s.markers.quote,
    },
];

/// Look up a registered feature by id.
pub fn find_feature(id: &str) -> Option<&'static FeatureDefinition> {
    FEATURE_REGISTRY.iter().find(|f| f.id == id)
}

// ============================================================================
// Ranking Types
// ============================================================================

/// One ranked feature comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRankingEntry {
    pub feature_id: String,
    pub feature_name: String,
    /// Prevalence in the top decile (%)
    pub top_decile_value: f64,
    /// Prevalence in the whole population (%)
    pub population_value: f64,
    /// `top_decile_value − population_value` (percentage points)
    pub lift: f64,
    pub impact: Impact,
}

impl FeatureRankingEntry {
    /// `min(1, |lift| / 100)`
    pub fn lift_fraction(&self) -> f64 {
        (self.lift.abs() / 100.0).min(1.0)
    }
}

/// Ranking plus the summaries it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftAnalysis {
    pub population_size: usize,
    pub decile_size: usize,
    pub top_summary: FeatureSummary,
    pub all_summary: FeatureSummary,
    pub ranking: Vec<FeatureRankingEntry>,
}

/// `max(1, floor(fraction * n))`, never more than `n`.
pub fn decile_size(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction).floor() as usize).clamp(1, n.max(1))
}

// ============================================================================
// Lift Ranker
// ============================================================================

/// Ranks features by top-decile lift.
#[derive(Debug, Clone)]
pub struct LiftRanker {
    extractor: FeatureExtractor,
}

impl LiftRanker {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self { extractor }
    }

    pub fn with_defaults() -> Self {
        Self::new(FeatureExtractor::with_defaults())
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(FeatureExtractor::from_config(config))
    }

    fn config(&self) -> &AnalysisConfig {
        self.extractor.config()
    }

    /// Rank features for a corpus. Fails with `InsufficientData` when empty.
    pub fn rank(&self, posts: &[Post]) -> Result<Vec<FeatureRankingEntry>> {
        Ok(self.analyze(posts)?.ranking)
    }

    /// Rank features and keep the decile/population summaries.
    pub fn analyze(&self, posts: &[Post]) -> Result<LiftAnalysis> {
        if posts.is_empty() {
            return Err(Error::insufficient("lift ranking needs at least one post"));
        }

        let mut sorted: Vec<&Post> = posts.iter().collect();
        sorted.sort_by(|a, b| b.total_interactions().cmp(&a.total_interactions()));

        let size = decile_size(posts.len(), self.config().top_decile_fraction);
        let top_summary = self.extractor.summarize(sorted[..size].iter().copied());
        let all_summary = self.extractor.summarize(posts);

        let ranking = self.compare(&top_summary, &all_summary);

        tracing::debug!(
            population = posts.len(),
            decile_size = size,
            features = ranking.len(),
            "Lift ranking computed"
        );

        Ok(LiftAnalysis {
            population_size: posts.len(),
            decile_size: size,
            top_summary,
            all_summary,
            ranking,
        })
    }

    /// Compare two summaries over the registry, sorted by `|lift|` descending.
    pub fn compare(
        &self,
        top: &FeatureSummary,
        all: &FeatureSummary,
    ) -> Vec<FeatureRankingEntry> {
        let cfg = self.config();

        let mut entries: Vec<FeatureRankingEntry> = FEATURE_REGISTRY
            .iter()
            .map(|feature| {
                let top_value = feature.value(top);
                let population_value = feature.value(all);
                let lift = top_value - population_value;
                FeatureRankingEntry {
                    feature_id: feature.id.to_string(),
                    feature_name: feature.name.to_string(),
                    top_decile_value: top_value,
                    population_value,
                    lift,
                    impact: Impact::classify(
                        lift,
                        cfg.high_impact_threshold,
                        cfg.medium_impact_threshold,
                    ),
                }
            })
            .collect();

        // stable: equal |lift| keeps registry order
        entries.sort_by(|a, b| b.lift.abs().total_cmp(&a.lift.abs()));
        entries
    }
}

impl Default for LiftRanker {
    fn default() -> Self {
        Self::with_defaults()
    }
}
