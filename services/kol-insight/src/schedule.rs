//! Schedule seed mapping.
//!
//! The scheduler outside the core only understands four knobs. This maps an
//! experiment's parameter bundle onto them, filling whatever the experiment
//! left unset.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::analysis::ExperimentConfig;

const DEFAULT_POSTING_TYPE: &str = "analysis";
const DEFAULT_TRIGGER_TYPE: &str = "limit_up_after_hours";
const DEFAULT_CONTENT_STYLE: &str = "professional";
const DEFAULT_TIME_WINDOW: &str = "09:00-18:00";

/// Scheduler input derived from one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSeed {
    pub posting_type: String,
    pub trigger_type: String,
    pub content_style: String,
    /// `HH:MM-HH:MM`
    pub time_window: String,
}

impl Default for ScheduleSeed {
    fn default() -> Self {
        Self {
            posting_type: DEFAULT_POSTING_TYPE.to_string(),
            trigger_type: DEFAULT_TRIGGER_TYPE.to_string(),
            content_style: DEFAULT_CONTENT_STYLE.to_string(),
            time_window: DEFAULT_TIME_WINDOW.to_string(),
        }
    }
}

impl ScheduleSeed {
    /// Start and end of the posting window, if it parses.
    pub fn window_bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        let (start, end) = self.time_window.split_once('-')?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        Some((start, end))
    }
}

impl From<&ExperimentConfig> for ScheduleSeed {
    fn from(experiment: &ExperimentConfig) -> Self {
        experiment_to_schedule_seed(experiment)
    }
}

/// Map an experiment onto a schedule seed. Missing or non-string parameters
/// take the defaults.
pub fn experiment_to_schedule_seed(experiment: &ExperimentConfig) -> ScheduleSeed {
    let pick = |key: &str, default: &str| {
        experiment
            .param_str(key)
            .unwrap_or(default)
            .to_string()
    };

    let seed = ScheduleSeed {
        posting_type: pick("posting_type", DEFAULT_POSTING_TYPE),
        trigger_type: pick("trigger_type", DEFAULT_TRIGGER_TYPE),
        content_style: pick("content_style", DEFAULT_CONTENT_STYLE),
        time_window: pick("time_window", DEFAULT_TIME_WINDOW),
    };

    tracing::debug!(
        experiment_id = %experiment.id,
        trigger_type = %seed.trigger_type,
        time_window = %seed.time_window,
        "Schedule seed derived"
    );

    seed
}
