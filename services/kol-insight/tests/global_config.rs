//! Process-wide configuration flowing into the engines.
//!
//! Runs in its own test binary: the table can only be installed once.

use chrono::{TimeZone, Utc};

use kol_common::config::InsightConfig;
use kol_insight::analysis::{FeatureExtractor, InsightEngine};
use kol_insight::planner::{AssignmentPlanner, AssignmentStrategy, PlanRequest};
use kol_insight::{InteractionMetrics, Post, PostSource};

fn post(id: &str, body: &str, likes: u64) -> Post {
    Post {
        id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 7, 1, 2, 0, 0).unwrap(),
        title: "盤中".to_string(),
        body: body.to_string(),
        kol_serial: "101".to_string(),
        source: PostSource::System,
        topic_id: None,
        commodity_tags: Vec::new(),
        metrics: InteractionMetrics {
            likes,
            ..InteractionMetrics::default()
        },
    }
}

#[test]
fn test_installed_config_reaches_engines() {
    let mut config = InsightConfig::default();
    config.humor.light.push("韭菜".to_string());
    config.planner.fallback_name_pattern = "代號{code}".to_string();
    config.analysis.top_decile_fraction = 0.5;

    let installed = config.install().unwrap();
    assert_eq!(installed.analysis.top_decile_fraction, 0.5);
    assert!(std::ptr::eq(installed, InsightConfig::global()));

    // second install is refused
    let err = InsightConfig::default().install().unwrap_err();
    assert!(matches!(err, kol_common::Error::Config(_)));

    let summary = FeatureExtractor::from_global().summarize(&[post("p1", "又當韭菜", 1)]);
    assert_eq!(summary.has_humor, 100.0);

    let tasks = AssignmentPlanner::from_global()
        .plan(&PlanRequest::stocks(
            "s1",
            vec!["9999"],
            Vec::new(),
            vec!["101"],
            AssignmentStrategy::Mixed,
        ))
        .unwrap();
    assert_eq!(tasks[0].stock_name, "代號9999");

    let posts: Vec<Post> = (0..4)
        .map(|i| post(&format!("p{}", i), "盤勢整理", i))
        .collect();
    let analysis = InsightEngine::from_global().analyze(&posts).unwrap();
    assert_eq!(analysis.decile_size, 2);
}
