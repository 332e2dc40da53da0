//! Feature-Lift Analysis Engine.
//!
//! Finds what separates the best-performing posts from the rest of a corpus
//! and turns the strongest differences into experiment bundles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     互動特徵分析 (Feature Lift)                       │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  InteractionStore ──▶ posts snapshot                                │
//! │                            │                                        │
//! │                ┌───────────┴───────────┐                            │
//! │                ▼                       ▼                            │
//! │        top decile (by total)      whole population                  │
//! │                │                       │                            │
//! │                └──▶ FeatureExtractor ◀─┘   (HumorClassifier,        │
//! │                            │                StructuralMarkers)      │
//! │                            ▼                                        │
//! │                       LiftRanker ──▶ ExperimentSynthesizer          │
//! │                                               │                     │
//! │                                               ▼                     │
//! │                                  ExperimentConfig → ScheduleSeed    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use kol_insight::analysis::{InsightEngine, InsightReport, ReportFormat};
//!
//! let engine = InsightEngine::from_global();
//! let analysis = engine.analyze(&posts)?;
//! println!("{}", InsightReport::new(&analysis).generate(ReportFormat::Markdown));
//! ```

pub mod engine;
pub mod features;
pub mod humor;
pub mod insight;
pub mod lift;
pub mod markers;
pub mod report;

pub use engine::{InsightAnalysis, InsightEngine};
pub use features::{FeatureExtractor, FeatureSummary};
pub use humor::{HumorClassifier, HumorScore};
pub use insight::{ExperimentConfig, ExperimentSynthesizer};
pub use lift::{decile_size, FeatureRankingEntry, LiftAnalysis, LiftRanker, FEATURE_REGISTRY};
pub use markers::StructuralMarkers;
pub use report::{InsightReport, ReportFormat};
