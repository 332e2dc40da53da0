//! Core data model shared by the analysis and planning engines.
//!
//! Posts are immutable snapshots fetched from the interaction store. Derived
//! values such as total interactions are always recomputed from the raw counts.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Post Snapshot
// ============================================================================

/// Where a post originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSource {
    /// Generated and published by the posting system
    System,
    /// Imported from the platform, written outside the system
    External,
}

impl std::fmt::Display for PostSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "系統發文"),
            Self::External => write!(f, "外部發文"),
        }
    }
}

/// A commodity/stock tag attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityTag {
    /// Ticker symbol (e.g., "2330")
    pub symbol: String,
    /// Tag type reported by the platform (e.g., "Stock")
    pub tag_type: String,
    /// Bull (`true`) / bear (`false`) stance, if the author set one
    #[serde(default)]
    pub bullish: Option<bool>,
}

/// Raw interaction counts of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMetrics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub bookmarks: u64,
    #[serde(default)]
    pub donations: Option<u64>,
}

impl InteractionMetrics {
    /// likes + comments + shares + bookmarks
    pub fn total_interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
            .saturating_add(self.bookmarks)
    }

    /// Engagement rate in basis points (total interactions per 10,000 views).
    ///
    /// Zero when the post has no views.
    pub fn engagement_rate_bp(&self) -> u64 {
        if self.views == 0 {
            0
        } else {
            self.total_interactions().saturating_mul(10_000) / self.views
        }
    }

    /// Engagement rate as a percentage of views.
    pub fn engagement_rate(&self) -> f64 {
        self.engagement_rate_bp() as f64 / 100.0
    }
}

/// A published post with its interaction snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub kol_serial: String,
    pub source: PostSource,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub commodity_tags: Vec<CommodityTag>,
    #[serde(default)]
    pub metrics: InteractionMetrics,
}

impl Post {
    /// Total interactions, recomputed from the raw counts.
    pub fn total_interactions(&self) -> u64 {
        self.metrics.total_interactions()
    }

    /// Hour of creation on the local clock `utc_offset_hours` east of UTC.
    pub fn local_hour(&self, utc_offset_hours: i32) -> u32 {
        match FixedOffset::east_opt(utc_offset_hours * 3600) {
            Some(offset) => self.created_at.with_timezone(&offset).hour(),
            None => self.created_at.hour(),
        }
    }
}

// ============================================================================
// Classification Enums
// ============================================================================

/// Time-of-day bucket by local hour, half-open: `[6,12) [12,18) [18,24) [0,6)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=23 => Self::Evening,
            _ => Self::Night,
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Morning => write!(f, "早上"),
            Self::Afternoon => write!(f, "下午"),
            Self::Evening => write!(f, "晚上"),
            Self::Night => write!(f, "深夜"),
        }
    }
}

/// Length bucket for content or titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// `short` below `short_below`, `long` above `long_above`, `medium` in between (inclusive).
    pub fn classify(len: usize, short_below: usize, long_above: usize) -> Self {
        if len < short_below {
            Self::Short
        } else if len > long_above {
            Self::Long
        } else {
            Self::Medium
        }
    }
}

impl std::fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "短"),
            Self::Medium => write!(f, "中"),
            Self::Long => write!(f, "長"),
        }
    }
}

/// Ordinal humor level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumorLevel {
    None,
    Light,
    Moderate,
    Strong,
}

impl HumorLevel {
    /// `0 → none`, `1-2 → light`, `3-5 → moderate`, `>5 → strong`
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => Self::None,
            1..=2 => Self::Light,
            3..=5 => Self::Moderate,
            _ => Self::Strong,
        }
    }
}

impl std::fmt::Display for HumorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "無"),
            Self::Light => write!(f, "輕度"),
            Self::Moderate => write!(f, "中度"),
            Self::Strong => write!(f, "強烈"),
        }
    }
}

/// Effect-size class of a feature lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// `|lift| > high → high`, `|lift| > medium → medium`, else `low`.
    pub fn classify(lift: f64, high_threshold: f64, medium_threshold: f64) -> Self {
        let magnitude = lift.abs();
        if magnitude > high_threshold {
            Self::High
        } else if magnitude > medium_threshold {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "高"),
            Self::Medium => write!(f, "中"),
            Self::Low => write!(f, "低"),
        }
    }
}

// ============================================================================
// Planning Types
// ============================================================================

/// A topic picked by a topic trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSelection {
    pub id: String,
    pub title: String,
    /// Stocks associated with the topic (may be empty)
    #[serde(default)]
    pub stock_ids: Vec<String>,
}

/// One post to be generated: one KOL writing about one stock or topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTask {
    pub stock_code: String,
    pub stock_name: String,
    pub kol_serial: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_title: Option<String>,
}
