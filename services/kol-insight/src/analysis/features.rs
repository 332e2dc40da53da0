//! Feature extractor.
//!
//! Turns a set of posts into an aggregate [`FeatureSummary`] in a single pass:
//! prevalence percentages (0-100, rounded to the nearest integer), means over
//! the raw counts, a humor-level distribution and per-KOL post counts.
//!
//! All sums are accumulated as integers, so the summary does not depend on the
//! order of the input posts.

use std::collections::BTreeMap;

use kol_common::config::{AnalysisConfig, InsightConfig};
use kol_common::util::{char_len, round_to};
use serde::{Deserialize, Serialize};

use super::humor::HumorClassifier;
use super::markers::StructuralMarkers;
use crate::error::{Error, Result};
use crate::types::{HumorLevel, LengthBucket, Post, PostSource, TimeSlot};

// ============================================================================
// Feature Summary
// ============================================================================

/// Share of posts per time-of-day bucket (%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotShare {
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    pub night: f64,
}

impl TimeSlotShare {
    pub fn get(&self, slot: TimeSlot) -> f64 {
        match slot {
            TimeSlot::Morning => self.morning,
            TimeSlot::Afternoon => self.afternoon,
            TimeSlot::Evening => self.evening,
            TimeSlot::Night => self.night,
        }
    }
}

/// Share of posts per length bucket (%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthShare {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

impl LengthShare {
    pub fn get(&self, bucket: LengthBucket) -> f64 {
        match bucket {
            LengthBucket::Short => self.short,
            LengthBucket::Medium => self.medium,
            LengthBucket::Long => self.long,
        }
    }
}

/// Share of posts carrying each structural marker (%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerShare {
    pub emoji: f64,
    pub hashtag: f64,
    pub question: f64,
    pub exclamation: f64,
    pub digit: f64,
    pub stock_code: f64,
    pub paragraph_break: f64,
    pub line_break: f64,
    pub bullet: f64,
    pub quote: f64,
}

/// Mean values per post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureAverages {
    pub content_length: f64,
    pub title_length: f64,
    pub stock_tag_count: f64,
    pub total_interactions: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub bookmarks: f64,
    pub views: f64,
    /// Mean engagement rate (% of views)
    pub engagement_rate: f64,
}

/// Number of posts per humor level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumorDistribution {
    pub none: usize,
    pub light: usize,
    pub moderate: usize,
    pub strong: usize,
}

impl HumorDistribution {
    fn record(&mut self, level: HumorLevel) {
        match level {
            HumorLevel::None => self.none += 1,
            HumorLevel::Light => self.light += 1,
            HumorLevel::Moderate => self.moderate += 1,
            HumorLevel::Strong => self.strong += 1,
        }
    }

    pub fn get(&self, level: HumorLevel) -> usize {
        match level {
            HumorLevel::None => self.none,
            HumorLevel::Light => self.light,
            HumorLevel::Moderate => self.moderate,
            HumorLevel::Strong => self.strong,
        }
    }
}

/// Aggregate features of a subset of posts.
///
/// Purely derived data: computed on demand, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub post_count: usize,
    pub time_of_day: TimeSlotShare,
    pub has_stock_tags: f64,
    pub has_topic: f64,
    pub has_humor: f64,
    pub has_news_link: f64,
    pub system_source: f64,
    pub markers: MarkerShare,
    pub content_length: LengthShare,
    pub title_length: LengthShare,
    pub averages: FeatureAverages,
    pub humor_distribution: HumorDistribution,
    pub kol_post_counts: BTreeMap<String, usize>,
}

// ============================================================================
// Accumulator
// ============================================================================

#[derive(Default)]
struct Counts {
    posts: u64,
    time_slots: [u64; 4],
    stock_tags: u64,
    topic: u64,
    humor: u64,
    news_link: u64,
    system: u64,
    emoji: u64,
    hashtag: u64,
    question: u64,
    exclamation: u64,
    digit: u64,
    stock_code: u64,
    paragraph_break: u64,
    line_break: u64,
    bullet: u64,
    quote: u64,
    content_buckets: [u64; 3],
    title_buckets: [u64; 3],
    content_chars: u64,
    title_chars: u64,
    tag_count: u64,
    total_interactions: u64,
    likes: u64,
    comments: u64,
    shares: u64,
    bookmarks: u64,
    views: u64,
    engagement_bp: u64,
    humor_distribution: HumorDistribution,
    kol_post_counts: BTreeMap<String, usize>,
}

fn slot_index(slot: TimeSlot) -> usize {
    match slot {
        TimeSlot::Morning => 0,
        TimeSlot::Afternoon => 1,
        TimeSlot::Evening => 2,
        TimeSlot::Night => 3,
    }
}

fn bucket_index(bucket: LengthBucket) -> usize {
    match bucket {
        LengthBucket::Short => 0,
        LengthBucket::Medium => 1,
        LengthBucket::Long => 2,
    }
}

impl Counts {
    fn pct(&self, count: u64) -> f64 {
        (count as f64 * 100.0 / self.posts as f64).round()
    }

    fn mean(&self, sum: u64) -> f64 {
        round_to(sum as f64 / self.posts as f64, 2)
    }

    fn length_share(&self, buckets: &[u64; 3]) -> LengthShare {
        LengthShare {
            short: self.pct(buckets[0]),
            medium: self.pct(buckets[1]),
            long: self.pct(buckets[2]),
        }
    }

    fn finish(self) -> FeatureSummary {
        FeatureSummary {
            post_count: self.posts as usize,
            time_of_day: TimeSlotShare {
                morning: self.pct(self.time_slots[0]),
                afternoon: self.pct(self.time_slots[1]),
                evening: self.pct(self.time_slots[2]),
                night: self.pct(self.time_slots[3]),
            },
            has_stock_tags: self.pct(self.stock_tags),
            has_topic: self.pct(self.topic),
            has_humor: self.pct(self.humor),
            has_news_link: self.pct(self.news_link),
            system_source: self.pct(self.system),
            markers: MarkerShare {
                emoji: self.pct(self.emoji),
                hashtag: self.pct(self.hashtag),
                question: self.pct(self.question),
                exclamation: self.pct(self.exclamation),
                digit: self.pct(self.digit),
                stock_code: self.pct(self.stock_code),
                paragraph_break: self.pct(self.paragraph_break),
                line_break: self.pct(self.line_break),
                bullet: self.pct(self.bullet),
                quote: self.pct(self.quote),
            },
            content_length: self.length_share(&self.content_buckets),
            title_length: self.length_share(&self.title_buckets),
            averages: FeatureAverages {
                content_length: self.mean(self.content_chars),
                title_length: self.mean(self.title_chars),
                stock_tag_count: self.mean(self.tag_count),
                total_interactions: self.mean(self.total_interactions),
                likes: self.mean(self.likes),
                comments: self.mean(self.comments),
                shares: self.mean(self.shares),
                bookmarks: self.mean(self.bookmarks),
                views: self.mean(self.views),
                engagement_rate: round_to(
                    self.engagement_bp as f64 / self.posts as f64 / 100.0,
                    2,
                ),
            },
            humor_distribution: self.humor_distribution,
            kol_post_counts: self.kol_post_counts,
        }
    }
}

// ============================================================================
// Feature Extractor
// ============================================================================

/// Extracts aggregate features from a set of posts.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
    humor: HumorClassifier,
}

impl FeatureExtractor {
    /// Create a new extractor.
    pub fn new(config: AnalysisConfig, humor: HumorClassifier) -> Self {
        Self { config, humor }
    }

    /// Create with default thresholds and lexicon.
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default(), HumorClassifier::with_defaults())
    }

    /// Create from a full configuration.
    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(config.analysis.clone(), HumorClassifier::new(&config.humor))
    }

    /// Create from the process-wide configuration.
    pub fn from_global() -> Self {
        Self::from_config(InsightConfig::global())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Summarize a set of posts.
    ///
    /// An empty set yields an all-zero summary; use
    /// [`FeatureExtractor::summarize_checked`] to reject it instead.
    pub fn summarize<'a, I>(&self, posts: I) -> FeatureSummary
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut counts = Counts::default();

        for post in posts {
            self.accumulate(&mut counts, post);
        }

        if counts.posts == 0 {
            tracing::warn!("Summarizing an empty post set, returning zero summary");
            return FeatureSummary::default();
        }

        tracing::debug!(posts = counts.posts, "Feature summary computed");
        counts.finish()
    }

    /// Summarize a set of posts, failing with `InsufficientData` when empty.
    pub fn summarize_checked<'a, I>(&self, posts: I) -> Result<FeatureSummary>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let summary = self.summarize(posts);
        if summary.post_count == 0 {
            return Err(Error::insufficient("no posts to summarize"));
        }
        Ok(summary)
    }

    fn accumulate(&self, counts: &mut Counts, post: &Post) {
        let cfg = &self.config;
        counts.posts += 1;

        let slot = TimeSlot::from_hour(post.local_hour(cfg.utc_offset_hours));
        counts.time_slots[slot_index(slot)] += 1;

        if !post.commodity_tags.is_empty() {
            counts.stock_tags += 1;
        }
        counts.tag_count += post.commodity_tags.len() as u64;

        if post.topic_id.is_some() {
            counts.topic += 1;
        }
        if post.source == PostSource::System {
            counts.system += 1;
        }

        let humor = self.humor.classify_post(&post.title, &post.body);
        if humor.is_humorous() {
            counts.humor += 1;
        }
        counts.humor_distribution.record(humor.level);

        let markers = StructuralMarkers::detect(&post.title, &post.body);
        let flags = [
            (markers.news_link, &mut counts.news_link),
            (markers.emoji, &mut counts.emoji),
            (markers.hashtag, &mut counts.hashtag),
            (markers.question, &mut counts.question),
            (markers.exclamation, &mut counts.exclamation),
            (markers.digit, &mut counts.digit),
            (markers.stock_code, &mut counts.stock_code),
            (markers.paragraph_break, &mut counts.paragraph_break),
            (markers.line_break, &mut counts.line_break),
            (markers.bullet, &mut counts.bullet),
            (markers.quote, &mut counts.quote),
        ];
        for (present, counter) in flags {
            if present {
                *counter += 1;
            }
        }

        let content_len = char_len(&post.body);
        let title_len = char_len(&post.title);
        counts.content_chars += content_len as u64;
        counts.title_chars += title_len as u64;
        counts.content_buckets[bucket_index(LengthBucket::classify(
            content_len,
            cfg.content_short_below,
            cfg.content_long_above,
        ))] += 1;
        counts.title_buckets[bucket_index(LengthBucket::classify(
            title_len,
            cfg.title_short_below,
            cfg.title_long_above,
        ))] += 1;

        // saturating sums
        let m = &post.metrics;
        let sums = [
            (&mut counts.total_interactions, m.total_interactions()),
            (&mut counts.likes, m.likes),
            (&mut counts.comments, m.comments),
            (&mut counts.shares, m.shares),
            (&mut counts.bookmarks, m.bookmarks),
            (&mut counts.views, m.views),
            (&mut counts.engagement_bp, m.engagement_rate_bp()),
        ];
        for (sum, value) in sums {
            *sum = sum.saturating_add(value);
        }

        *counts
            .kol_post_counts
            .entry(post.kol_serial.clone())
            .or_insert(0) += 1;
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PostBuilder;

    #[test]
    fn test_empty_set_returns_zero_summary() {
        let extractor = FeatureExtractor::with_defaults();
        let empty: Vec<Post> = Vec::new();
        let summary = extractor.summarize(&empty);
        assert_eq!(summary, FeatureSummary::default());
        assert!(matches!(
            extractor.summarize_checked(&empty),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_time_of_day_uses_local_hour() {
        let extractor = FeatureExtractor::with_defaults();
        // 05:00 UTC = 13:00 Taipei (afternoon), 11:00 UTC = 19:00 (evening)
        let posts = vec![
            PostBuilder::new("p1").utc_hour(5).build(),
            PostBuilder::new("p2").utc_hour(11).build(),
            PostBuilder::new("p3").utc_hour(11).build(),
            PostBuilder::new("p4").utc_hour(20).build(), // 04:00 local
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.time_of_day.afternoon, 25.0);
        assert_eq!(summary.time_of_day.evening, 50.0);
        assert_eq!(summary.time_of_day.night, 25.0);
        assert_eq!(summary.time_of_day.morning, 0.0);
    }

    #[test]
    fn test_percentages_round_to_nearest_integer() {
        let extractor = FeatureExtractor::with_defaults();
        let posts = vec![
            PostBuilder::new("p1").body("要噴了嗎？").build(),
            PostBuilder::new("p2").body("穩穩的").build(),
            PostBuilder::new("p3").body("觀望").build(),
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.markers.question, 33.0);
        assert_eq!(summary.post_count, 3);
    }

    #[test]
    fn test_means_and_tag_counts() {
        let extractor = FeatureExtractor::with_defaults();
        let posts = vec![
            PostBuilder::new("p1")
                .tags(&["2330", "2317"])
                .likes(10)
                .comments(4)
                .views(100)
                .build(),
            PostBuilder::new("p2").likes(2).views(0).build(),
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.has_stock_tags, 50.0);
        assert_eq!(summary.averages.stock_tag_count, 1.0);
        assert_eq!(summary.averages.total_interactions, 8.0);
        assert_eq!(summary.averages.likes, 6.0);
        assert_eq!(summary.averages.views, 50.0);
        // (14% + 0%) / 2
        assert_eq!(summary.averages.engagement_rate, 7.0);
    }

    #[test]
    fn test_length_buckets_count_characters() {
        let extractor = FeatureExtractor::with_defaults();
        let posts = vec![
            PostBuilder::new("p1").body(&"漲".repeat(199)).build(),
            PostBuilder::new("p2").body(&"漲".repeat(300)).build(),
            PostBuilder::new("p3").body(&"漲".repeat(501)).build(),
            PostBuilder::new("p4").title(&"台".repeat(41)).build(),
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.content_length.short, 50.0);
        assert_eq!(summary.content_length.medium, 25.0);
        assert_eq!(summary.content_length.long, 25.0);
        assert_eq!(summary.title_length.long, 25.0);
    }

    #[test]
    fn test_humor_distribution_and_kol_counts() {
        let extractor = FeatureExtractor::with_defaults();
        let posts = vec![
            PostBuilder::new("p1").kol("101").body("哈哈 😂").build(),
            PostBuilder::new("p2").kol("101").body("財報分析").build(),
            PostBuilder::new("p3").kol("102").body("笑爛 🤣 搞笑").build(),
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.has_humor, 67.0);
        assert_eq!(summary.humor_distribution.get(HumorLevel::Moderate), 1);
        assert_eq!(summary.humor_distribution.get(HumorLevel::Strong), 1);
        assert_eq!(summary.humor_distribution.none, 1);
        assert_eq!(summary.kol_post_counts.get("101"), Some(&2));
        assert_eq!(summary.kol_post_counts.get("102"), Some(&1));
    }

    #[test]
    fn test_huge_interaction_counts_saturate() {
        let extractor = FeatureExtractor::with_defaults();
        let posts = vec![
            PostBuilder::new("p1").likes(u64::MAX / 2 + 1).views(1).build(),
            PostBuilder::new("p2").likes(u64::MAX / 2 + 1).views(1).build(),
        ];
        let summary = extractor.summarize(&posts);
        assert_eq!(summary.post_count, 2);
        assert_eq!(summary.averages.likes, u64::MAX as f64 / 2.0);
        assert_eq!(summary.averages.total_interactions, u64::MAX as f64 / 2.0);
    }

    #[test]
    fn test_summary_is_order_independent() {
        let extractor = FeatureExtractor::with_defaults();
        let mut posts = vec![
            PostBuilder::new("p1").likes(3).views(7).body("哈哈").build(),
            PostBuilder::new("p2").likes(11).views(13).external().build(),
            PostBuilder::new("p3").likes(5).views(9).topic("t1").build(),
        ];
        let forward = extractor.summarize(&posts);
        posts.reverse();
        let backward = extractor.summarize(&posts);
        assert_eq!(forward, backward);
        assert_eq!(
            serde_json::to_string(&forward).unwrap(),
            serde_json::to_string(&backward).unwrap()
        );
    }
}
