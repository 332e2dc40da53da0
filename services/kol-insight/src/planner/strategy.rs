//! Planner inputs: assignment strategy, trigger selection and request.

use serde::{Deserialize, Serialize};

use crate::types::TopicSelection;

/// How stocks are fanned out over the KOL roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Pair stocks and KOLs one to one
    OneKolOneStock,
    /// One KOL covers every stock (or every KOL covers the single stock)
    OneKolAllStocks,
    /// Round robin over the roster
    #[default]
    Mixed,
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneKolOneStock => "one_kol_one_stock",
            Self::OneKolAllStocks => "one_kol_all_stocks",
            Self::Mixed => "mixed",
        }
    }

    /// Operator-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneKolOneStock => "一位KOL一檔股票",
            Self::OneKolAllStocks => "一位KOL全部股票",
            Self::Mixed => "混合輪流分配",
        }
    }
}

impl std::fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one_kol_one_stock" => Ok(Self::OneKolOneStock),
            "one_kol_all_stocks" => Ok(Self::OneKolAllStocks),
            "mixed" => Ok(Self::Mixed),
            _ => Err(format!("Unknown assignment strategy: {}", s)),
        }
    }
}

/// What a trigger selected for this batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSelection {
    /// Stock trigger: codes with a parallel (possibly shorter) name list
    Stocks {
        codes: Vec<String>,
        #[serde(default)]
        names: Vec<String>,
    },
    /// Topic trigger: selected topics, each optionally carrying stocks
    Topics { topics: Vec<TopicSelection> },
}

impl TriggerSelection {
    pub fn is_topic_trigger(&self) -> bool {
        matches!(self, Self::Topics { .. })
    }
}

/// One planning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Copied onto every task produced by this call
    pub session_id: String,
    pub trigger: TriggerSelection,
    pub kol_serials: Vec<String>,
    /// Ignored for topic triggers
    #[serde(default)]
    pub strategy: AssignmentStrategy,
}

impl PlanRequest {
    /// Request for a stock trigger.
    pub fn stocks<S: Into<String>>(
        session_id: impl Into<String>,
        codes: impl IntoIterator<Item = S>,
        names: impl IntoIterator<Item = S>,
        kol_serials: impl IntoIterator<Item = S>,
        strategy: AssignmentStrategy,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            trigger: TriggerSelection::Stocks {
                codes: codes.into_iter().map(Into::into).collect(),
                names: names.into_iter().map(Into::into).collect(),
            },
            kol_serials: kol_serials.into_iter().map(Into::into).collect(),
            strategy,
        }
    }

    /// Request for a topic trigger.
    pub fn topics<S: Into<String>>(
        session_id: impl Into<String>,
        topics: Vec<TopicSelection>,
        kol_serials: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            trigger: TriggerSelection::Topics { topics },
            kol_serials: kol_serials.into_iter().map(Into::into).collect(),
            strategy: AssignmentStrategy::default(),
        }
    }
}
