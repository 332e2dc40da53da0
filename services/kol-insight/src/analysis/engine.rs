//! Analysis pipeline.
//!
//! Runs lift ranking and experiment synthesis over one corpus snapshot and
//! attaches human-readable findings for the operator.

use chrono::{DateTime, Utc};
use kol_common::config::InsightConfig;
use serde::{Deserialize, Serialize};

use super::features::FeatureSummary;
use super::insight::{ExperimentConfig, ExperimentSynthesizer};
use super::lift::{FeatureRankingEntry, LiftRanker};
use crate::error::Result;
use crate::store::{InteractionStore, PostFilter};
use crate::types::{Impact, Post};

/// Full result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightAnalysis {
    pub generated_at: DateTime<Utc>,
    pub population_size: usize,
    pub decile_size: usize,
    pub top_summary: FeatureSummary,
    pub all_summary: FeatureSummary,
    pub ranking: Vec<FeatureRankingEntry>,
    pub experiments: Vec<ExperimentConfig>,
    pub insights: Vec<String>,
}

impl InsightAnalysis {
    /// Ranking entries classified medium or high impact.
    pub fn significant_features(&self) -> impl Iterator<Item = &FeatureRankingEntry> {
        self.ranking.iter().filter(|e| e.impact != Impact::Low)
    }
}

/// Feature-lift analysis engine.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    ranker: LiftRanker,
    synthesizer: ExperimentSynthesizer,
}

impl InsightEngine {
    pub fn new(ranker: LiftRanker, synthesizer: ExperimentSynthesizer) -> Self {
        Self {
            ranker,
            synthesizer,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LiftRanker::with_defaults(), ExperimentSynthesizer::with_defaults())
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(
            LiftRanker::from_config(config),
            ExperimentSynthesizer::from_config(config),
        )
    }

    /// Engine built from the process-wide configuration.
    pub fn from_global() -> Self {
        Self::from_config(InsightConfig::global())
    }

    /// Analyze a corpus. Fails with `InsufficientData` when it is empty.
    pub fn analyze(&self, posts: &[Post]) -> Result<InsightAnalysis> {
        let lift = self.ranker.analyze(posts)?;
        let experiments = self.synthesizer.synthesize_default(&lift.ranking);
        let insights = describe(&lift.ranking, &lift.top_summary, &lift.all_summary);

        tracing::info!(
            population = lift.population_size,
            decile_size = lift.decile_size,
            experiments = experiments.len(),
            "Insight analysis completed"
        );

        Ok(InsightAnalysis {
            generated_at: Utc::now(),
            population_size: lift.population_size,
            decile_size: lift.decile_size,
            top_summary: lift.top_summary,
            all_summary: lift.all_summary,
            ranking: lift.ranking,
            experiments,
            insights,
        })
    }

    /// Fetch a snapshot from the store and analyze it.
    pub async fn analyze_store(
        &self,
        store: &dyn InteractionStore,
        filter: &PostFilter,
    ) -> Result<InsightAnalysis> {
        let posts = store.fetch_posts(filter).await?;
        self.analyze(&posts)
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Human-readable findings for the significant ranking entries.
fn describe(
    ranking: &[FeatureRankingEntry],
    top: &FeatureSummary,
    all: &FeatureSummary,
) -> Vec<String> {
    let mut insights = vec![format!(
        "前 {} 篇高互動貼文平均互動 {:.1} 次，整體平均 {:.1} 次",
        top.post_count, top.averages.total_interactions, all.averages.total_interactions
    )];

    let significant: Vec<&FeatureRankingEntry> =
        ranking.iter().filter(|e| e.impact != Impact::Low).collect();

    if significant.is_empty() {
        insights.push("各項特徵在高互動貼文與整體之間差異不大，建議累積更多資料後再分析".to_string());
        return insights;
    }

    for entry in significant {
        let direction = if entry.lift >= 0.0 { "高出" } else { "低了" };
        insights.push(format!(
            "[{}影響] 高互動貼文的{}為 {:.0}%，比整體 {:.0}% {} {:.0} 個百分點",
            entry.impact,
            entry.feature_name,
            entry.top_decile_value,
            entry.population_value,
            direction,
            entry.lift.abs()
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::InMemoryInteractionStore;
    use crate::testing::PostBuilder;

    fn corpus() -> Vec<Post> {
        let mut posts = vec![PostBuilder::new("top")
            .body("大家覺得會噴嗎？😂")
            .likes(300)
            .build()];
        for i in 0..19 {
            posts.push(
                PostBuilder::new(&format!("p{}", i))
                    .body("盤後整理")
                    .likes(i)
                    .build(),
            );
        }
        posts
    }

    #[test]
    fn test_analyze_builds_experiments_and_insights() {
        let engine = InsightEngine::with_defaults();
        let analysis = engine.analyze(&corpus()).unwrap();

        assert_eq!(analysis.population_size, 20);
        assert_eq!(analysis.decile_size, 2);
        // 3 single experiments + combined
        assert_eq!(analysis.experiments.len(), 4);
        assert!(analysis.significant_features().count() >= 2);
        assert!(analysis.insights.len() >= 3);
        assert!(analysis.insights[1].contains("高出"));
    }

    #[test]
    fn test_flat_corpus_reports_no_difference() {
        let engine = InsightEngine::with_defaults();
        let posts: Vec<Post> = (0..5)
            .map(|i| PostBuilder::new(&format!("p{}", i)).likes(i).build())
            .collect();
        let analysis = engine.analyze(&posts).unwrap();
        assert_eq!(analysis.significant_features().count(), 0);
        assert_eq!(analysis.insights.len(), 2);
    }

    #[test]
    fn test_empty_corpus_is_insufficient() {
        let engine = InsightEngine::with_defaults();
        assert!(matches!(
            engine.analyze(&[]),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_analyze_store() {
        let engine = InsightEngine::with_defaults();
        let store = InMemoryInteractionStore::new(corpus());
        let analysis = engine
            .analyze_store(&store, &PostFilter::default())
            .await
            .unwrap();
        assert_eq!(analysis.population_size, 20);
    }
}
