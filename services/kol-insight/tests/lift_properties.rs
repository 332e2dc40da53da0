//! Property tests for the lift ranking and its building blocks.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use kol_insight::analysis::{decile_size, FeatureExtractor, LiftRanker, FEATURE_REGISTRY};
use kol_insight::{Error, HumorLevel, InteractionMetrics, Post, PostSource};

// ============================================================================
// Generators
// ============================================================================

const BODIES: &[&str] = &[
    "今天盤勢整理",
    "哈哈，這檔要噴了😂",
    "大家覺得 2330 還能追嗎？",
    "重點如下\n\n- 外資賣超\n- 融資減少",
    "「利多出盡」了嗎！ https://news.example.com/a",
    "#台積電 法說會前布局",
];

fn post(index: usize, likes: u64, body: usize, utc_hour: u32, external: bool) -> Post {
    Post {
        id: format!("p{}", index),
        created_at: Utc.with_ymd_and_hms(2024, 5, 2, utc_hour, 0, 0).unwrap(),
        title: "盤後觀察".to_string(),
        body: BODIES[body].to_string(),
        kol_serial: format!("{}", 100 + index % 3),
        source: if external {
            PostSource::External
        } else {
            PostSource::System
        },
        topic_id: None,
        commodity_tags: Vec::new(),
        metrics: InteractionMetrics {
            likes,
            comments: likes / 3,
            views: likes * 10,
            ..InteractionMetrics::default()
        },
    }
}

fn corpus() -> impl Strategy<Value = Vec<Post>> {
    prop::collection::vec(
        (0u64..500, 0..BODIES.len(), 0u32..24, any::<bool>()),
        1..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (likes, body, hour, external))| post(i, likes, body, hour, external))
            .collect()
    })
}

fn registry_index(feature_id: &str) -> usize {
    FEATURE_REGISTRY
        .iter()
        .position(|f| f.id == feature_id)
        .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn decile_size_is_tenth_floored_at_one(n in 1usize..100_000) {
        prop_assert_eq!(decile_size(n, 0.1), std::cmp::max(1, n / 10));
    }

    #[test]
    fn humor_level_is_monotonic(a in 0u32..50, b in 0u32..50) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(HumorLevel::from_score(lo) <= HumorLevel::from_score(hi));
    }

    #[test]
    fn ranking_sorted_by_magnitude_with_registry_tiebreak(posts in corpus()) {
        let ranking = LiftRanker::with_defaults().rank(&posts).unwrap();
        prop_assert_eq!(ranking.len(), FEATURE_REGISTRY.len());

        for pair in ranking.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.lift.abs() >= b.lift.abs());
            if a.lift.abs() == b.lift.abs() {
                prop_assert!(registry_index(&a.feature_id) < registry_index(&b.feature_id));
            }
        }
    }

    #[test]
    fn ranking_is_deterministic(posts in corpus()) {
        let ranker = LiftRanker::with_defaults();
        prop_assert_eq!(ranker.rank(&posts).unwrap(), ranker.rank(&posts).unwrap());
    }

    #[test]
    fn summary_ignores_post_order(posts in corpus()) {
        let extractor = FeatureExtractor::with_defaults();
        let mut reversed = posts.clone();
        reversed.reverse();
        prop_assert_eq!(extractor.summarize(&posts), extractor.summarize(&reversed));
    }
}

#[test]
fn test_decile_examples() {
    assert_eq!(decile_size(7, 0.1), 1);
    assert_eq!(decile_size(30, 0.1), 3);
    assert_eq!(decile_size(100, 0.1), 10);
}

#[test]
fn test_empty_corpus_is_insufficient() {
    let err = LiftRanker::with_defaults().rank(&[]).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { .. }));
}
