//! KOL Insight - feature-lift analysis and batch assignment planning for
//! KOL stock-commentary posts.
//!
//! This crate provides:
//! - Humor scoring and structural marker detection over post text
//! - Feature summaries, top-decile lift ranking and experiment synthesis
//! - Assignment planning from stock/topic triggers to per-KOL post tasks
//! - Seams to the interaction store, batch worker and scheduler

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analysis;
pub mod error;
pub mod planner;
pub mod schedule;
pub mod store;
pub mod types;
pub mod worker;

#[cfg(test)]
mod testing;

pub use analysis::{
    ExperimentConfig, FeatureExtractor, FeatureRankingEntry, FeatureSummary, HumorClassifier,
    InsightAnalysis, InsightEngine, InsightReport, LiftRanker, ReportFormat,
};
pub use error::{Error, Result, ValidationError};
pub use planner::{AssignmentPlanner, AssignmentStrategy, PlanRequest, TriggerSelection};
pub use schedule::{experiment_to_schedule_seed, ScheduleSeed};
pub use store::{InMemoryInteractionStore, InteractionStore, PostFilter};
pub use types::{
    CommodityTag, HumorLevel, Impact, InteractionMetrics, LengthBucket, Post, PostSource,
    PostTask, TimeSlot, TopicSelection,
};
pub use worker::{BatchDispatcher, BatchHandle, BatchOutcome, BatchRequest, BatchWorker};
