//! Assignment planner.
//!
//! Expands a trigger selection and a KOL roster into one-stock/one-KOL post
//! tasks. Topic triggers override the strategy; stock triggers fan out per
//! strategy:
//!
//! | strategy             | condition        | output                              |
//! |----------------------|------------------|-------------------------------------|
//! | `one_kol_one_stock`  | `k == 1`         | every stock → `kol[0]`              |
//! | `one_kol_one_stock`  | `k > 1`          | `min(n, k)` pairs, surplus dropped  |
//! | `one_kol_all_stocks` | `n == 1, k > 1`  | the stock → every KOL               |
//! | `one_kol_all_stocks` | otherwise        | every stock → `kol[0]`              |
//! | `mixed`              | `n == 1, k > 1`  | the stock → every KOL               |
//! | `mixed`              | otherwise        | stock `i` → `kol[i % k]`            |

use kol_common::config::{InsightConfig, PlannerConfig};
use kol_common::util::truncate_with_ellipsis;

use super::strategy::{AssignmentStrategy, PlanRequest, TriggerSelection};
use crate::error::{Result, ValidationError};
use crate::types::{PostTask, TopicSelection};

/// Plans post tasks for one batch.
#[derive(Debug, Clone)]
pub struct AssignmentPlanner {
    config: PlannerConfig,
}

impl AssignmentPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(config.planner.clone())
    }

    /// Planner built from the process-wide configuration.
    pub fn from_global() -> Self {
        Self::from_config(InsightConfig::global())
    }

    /// Reject requests with nothing to plan. Runs before any planning work.
    pub fn validate(request: &PlanRequest) -> std::result::Result<(), ValidationError> {
        match &request.trigger {
            TriggerSelection::Topics { topics } if topics.is_empty() => {
                return Err(ValidationError::MissingTopics);
            }
            TriggerSelection::Stocks { codes, .. } if codes.is_empty() => {
                return Err(ValidationError::MissingStocks);
            }
            _ => {}
        }

        if request.kol_serials.is_empty() {
            return Err(ValidationError::MissingKols);
        }

        Ok(())
    }

    /// Expand a request into an ordered task list.
    pub fn plan(&self, request: &PlanRequest) -> Result<Vec<PostTask>> {
        Self::validate(request)?;

        let tasks = match &request.trigger {
            TriggerSelection::Topics { topics } => self.plan_topics(request, topics),
            TriggerSelection::Stocks { codes, names } => {
                self.plan_stocks(request, codes, names)
            }
        };

        tracing::info!(
            session_id = %request.session_id,
            strategy = %request.strategy,
            topic_trigger = request.trigger.is_topic_trigger(),
            kols = request.kol_serials.len(),
            tasks = tasks.len(),
            "Post tasks planned"
        );

        Ok(tasks)
    }

    fn task(&self, request: &PlanRequest, code: &str, name: String, kol: &str) -> PostTask {
        PostTask {
            stock_code: code.to_string(),
            stock_name: name,
            kol_serial: kol.to_string(),
            session_id: request.session_id.clone(),
            topic_id: None,
            topic_title: None,
        }
    }

    /// Topic mode: one task per topic stock, or one synthetic task per
    /// stock-less topic. Every task goes to the first KOL.
    fn plan_topics(&self, request: &PlanRequest, topics: &[TopicSelection]) -> Vec<PostTask> {
        let kol = &request.kol_serials[0];
        let mut tasks = Vec::new();

        for topic in topics {
            if topic.stock_ids.is_empty() {
                let mut task = self.task(
                    request,
                    &format!("TOPIC_{}", topic.id),
                    topic.title.clone(),
                    kol,
                );
                task.topic_id = Some(topic.id.clone());
                task.topic_title = Some(topic.title.clone());
                tasks.push(task);
                continue;
            }

            for stock_id in &topic.stock_ids {
                if !self.config.stock_names.contains_key(stock_id) {
                    tracing::warn!(
                        stock_id = %stock_id,
                        topic_id = %topic.id,
                        topic = %truncate_with_ellipsis(&topic.title, 20),
                        "Unknown stock name, using fallback"
                    );
                }
                let mut task = self.task(request, stock_id, self.config.resolve_name(stock_id), kol);
                task.topic_id = Some(topic.id.clone());
                task.topic_title = Some(topic.title.clone());
                tasks.push(task);
            }
        }

        tasks
    }

    fn plan_stocks(
        &self,
        request: &PlanRequest,
        codes: &[String],
        names: &[String],
    ) -> Vec<PostTask> {
        let kols = &request.kol_serials;
        let n = codes.len();
        let k = kols.len();

        let name_at = |i: usize| -> String {
            names
                .get(i)
                .cloned()
                .unwrap_or_else(|| self.config.fallback_name(&codes[i]))
        };

        let fan_out_by_kol = || -> Vec<PostTask> {
            kols.iter()
                .map(|kol| self.task(request, &codes[0], name_at(0), kol))
                .collect()
        };

        let all_to_first = || -> Vec<PostTask> {
            codes
                .iter()
                .enumerate()
                .map(|(i, code)| self.task(request, code, name_at(i), &kols[0]))
                .collect()
        };

        match request.strategy {
            AssignmentStrategy::OneKolOneStock if k == 1 => all_to_first(),
            AssignmentStrategy::OneKolOneStock => {
                if n != k {
                    tracing::warn!(
                        stocks = n,
                        kols = k,
                        dropped = n.abs_diff(k),
                        "One-to-one pairing drops surplus entries"
                    );
                }
                codes
                    .iter()
                    .zip(kols.iter())
                    .enumerate()
                    .map(|(i, (code, kol))| self.task(request, code, name_at(i), kol))
                    .collect()
            }
            AssignmentStrategy::OneKolAllStocks | AssignmentStrategy::Mixed
                if n == 1 && k > 1 =>
            {
                fan_out_by_kol()
            }
            AssignmentStrategy::OneKolAllStocks => all_to_first(),
            AssignmentStrategy::Mixed => codes
                .iter()
                .enumerate()
                .map(|(i, code)| self.task(request, code, name_at(i), &kols[i % k]))
                .collect(),
        }
    }
}

impl Default for AssignmentPlanner {
    fn default() -> Self {
        Self::with_defaults()
    }
}
