//! End-to-end tests for the analysis flow.
//!
//! InteractionStore → InsightEngine → InsightReport / ScheduleSeed

use chrono::{TimeZone, Utc};

use kol_common::config::InsightConfig;
use kol_insight::analysis::{InsightEngine, InsightReport, ReportFormat};
use kol_insight::schedule::experiment_to_schedule_seed;
use kol_insight::store::{InMemoryInteractionStore, InteractionStore, PostFilter};
use kol_insight::{Impact, InteractionMetrics, Post, PostSource};

// ============================================================================
// Test Data
// ============================================================================

fn post(id: &str, body: &str, likes: u64, source: PostSource) -> Post {
    Post {
        id: id.to_string(),
        // 09:00 in Taipei
        created_at: Utc.with_ymd_and_hms(2024, 6, 3, 1, 0, 0).unwrap(),
        title: "盤後觀察".to_string(),
        body: body.to_string(),
        kol_serial: "101".to_string(),
        source,
        topic_id: None,
        commodity_tags: Vec::new(),
        metrics: InteractionMetrics {
            likes,
            views: 1_000,
            ..InteractionMetrics::default()
        },
    }
}

/// 20 system posts where the two best performers joke and ask a question,
/// plus two viral external posts that the default filter drops.
fn seeded_store() -> InMemoryInteractionStore {
    let mut posts = vec![
        post("hot-1", "哈哈，大家怎麼看？", 500, PostSource::System),
        post("hot-2", "哈哈，這波還能上車嗎？", 400, PostSource::System),
    ];
    for i in 0..18u64 {
        posts.push(post(&format!("p{}", i), "盤後整理", i, PostSource::System));
    }
    posts.push(post("ext-1", "盤後整理", 5_000, PostSource::External));
    posts.push(post("ext-2", "盤後整理", 4_000, PostSource::External));
    InMemoryInteractionStore::new(posts)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_store_to_ranking() {
    let store = seeded_store();
    let engine = InsightEngine::with_defaults();

    let analysis = engine
        .analyze_store(&store, &PostFilter::default())
        .await
        .unwrap();

    assert_eq!(analysis.population_size, 20);
    assert_eq!(analysis.decile_size, 2);

    let leading: Vec<&str> = analysis
        .ranking
        .iter()
        .take(2)
        .map(|e| e.feature_id.as_str())
        .collect();
    assert_eq!(leading, vec!["has_humor", "has_question"]);
    assert_eq!(analysis.ranking[0].top_decile_value, 100.0);
    assert_eq!(analysis.ranking[0].population_value, 10.0);
    assert_eq!(analysis.ranking[0].impact, Impact::High);
    assert_eq!(analysis.significant_features().count(), 2);

    // summary line + one per significant feature
    assert_eq!(analysis.insights.len(), 3);
    assert!(analysis.insights[1].contains("幽默內容比例"));
    assert!(analysis.insights[1].contains("高出 90 個百分點"));
}

#[tokio::test]
async fn test_external_posts_when_included() {
    let store = seeded_store();
    let filter = PostFilter {
        include_external: true,
        ..PostFilter::default()
    };

    let posts = store.fetch_posts(&filter).await.unwrap();
    assert_eq!(posts.len(), 22);

    let analysis = InsightEngine::with_defaults().analyze(&posts).unwrap();
    // the external posts now form the top decile
    assert_eq!(analysis.top_summary.system_source, 0.0);
    assert_eq!(analysis.ranking[0].feature_id, "source_system");
}

#[tokio::test]
async fn test_experiments_feed_schedule_seeds() {
    let analysis = InsightEngine::with_defaults()
        .analyze_store(&seeded_store(), &PostFilter::default())
        .await
        .unwrap();

    assert_eq!(analysis.experiments.len(), 4);
    let first = &analysis.experiments[0];
    assert_eq!(first.id, "exp_1_has_humor");
    assert_eq!(first.expected_performance, 96.0);

    let seed = experiment_to_schedule_seed(first);
    assert_eq!(seed.posting_type, "analysis");
    assert_eq!(seed.trigger_type, "limit_up_after_hours");
    assert_eq!(seed.content_style, "humorous");
    assert_eq!(seed.time_window, "14:00-16:00");

    let seed = experiment_to_schedule_seed(&analysis.experiments[1]);
    assert_eq!(seed.posting_type, "interaction");
    assert_eq!(seed.content_style, "casual");

    let combined = analysis.experiments.last().unwrap();
    assert!(combined.is_combined());
    // first feature wins the content_style conflict
    assert_eq!(combined.param_str("content_style"), Some("humorous"));
}

#[tokio::test]
async fn test_wider_top_group_from_config() {
    let mut config = InsightConfig::default();
    config.analysis.top_decile_fraction = 0.2;

    let analysis = InsightEngine::from_config(&config)
        .analyze_store(&seeded_store(), &PostFilter::default())
        .await
        .unwrap();

    assert_eq!(analysis.decile_size, 4);
    assert_eq!(analysis.ranking[0].feature_id, "has_humor");
    assert_eq!(analysis.ranking[0].top_decile_value, 50.0);
    assert_eq!(analysis.ranking[0].lift, 40.0);
}

#[tokio::test]
async fn test_report_written_to_disk() {
    let analysis = InsightEngine::with_defaults()
        .analyze_store(&seeded_store(), &PostFilter::default())
        .await
        .unwrap();
    let report = InsightReport::new(&analysis);

    let markdown = report.generate(ReportFormat::Markdown);
    assert!(markdown.contains("## 特徵排名"));
    assert!(markdown.contains("幽默內容比例"));

    let dir = tempfile::tempdir().unwrap();
    let path = report
        .save_to_file(&dir.path().join("reports/insight"), ReportFormat::Json)
        .unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["population_size"], 20);
}

#[tokio::test]
async fn test_empty_snapshot_is_insufficient() {
    let store = InMemoryInteractionStore::default();
    let err = InsightEngine::with_defaults()
        .analyze_store(&store, &PostFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, kol_insight::Error::InsufficientData { .. }));
}
