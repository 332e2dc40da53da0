//! Batch worker seam.
//!
//! The planner's task list is handed to a content-generation worker that
//! runs outside the core. Every batch carries a cancellation token so a
//! caller can stop generation before anything is published.
//!
//! ```text
//! PlanRequest ──► AssignmentPlanner ──► Vec<PostTask>
//!                                            │
//!                                 BatchDispatcher::dispatch
//!                                            │
//!                         ┌──────────────────┴─────────────┐
//!                         ▼                                ▼
//!              BatchWorker::run_batch           BatchHandle::cancel
//!                         │                                │
//!                         └────────► BatchHandle::join ◄───┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::PostTask;

/// One batch handed to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub session_id: String,
    /// Ordered tasks from one planning call
    pub tasks: Vec<PostTask>,
    /// Generation parameters, opaque to the core
    #[serde(default)]
    pub params: Value,
}

impl BatchRequest {
    pub fn new(session_id: impl Into<String>, tasks: Vec<PostTask>) -> Self {
        Self {
            session_id: session_id.into(),
            tasks,
            params: Value::Null,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// Worker result for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub generated_count: usize,
    pub failed_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BatchOutcome {
    /// Whether every task was generated.
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && self.errors.is_empty()
    }
}

/// Content-generation worker.
#[async_trait]
pub trait BatchWorker: Send + Sync {
    /// Run one batch. Implementations should check `cancel` between tasks
    /// and stop publishing once it fires.
    async fn run_batch(&self, request: BatchRequest, cancel: CancellationToken)
        -> Result<BatchOutcome>;
}

/// Spawns batches onto the tokio runtime.
#[derive(Clone)]
pub struct BatchDispatcher {
    worker: Arc<dyn BatchWorker>,
}

impl BatchDispatcher {
    pub fn new(worker: Arc<dyn BatchWorker>) -> Self {
        Self { worker }
    }

    /// Start a batch and return immediately.
    pub fn dispatch(&self, request: BatchRequest) -> BatchHandle {
        let cancel = CancellationToken::new();
        let session_id = request.session_id.clone();

        tracing::info!(
            session_id = %session_id,
            tasks = request.tasks.len(),
            "Dispatching post batch"
        );

        let worker = Arc::clone(&self.worker);
        let token = cancel.clone();
        let sid = session_id.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::warn!(session_id = %sid, "Post batch cancelled");
                    Err(Error::Cancelled { session_id: sid })
                }

                result = worker.run_batch(request, token.clone()) => {
                    match &result {
                        Ok(outcome) => tracing::info!(
                            session_id = %sid,
                            generated = outcome.generated_count,
                            failed = outcome.failed_count,
                            "Post batch finished"
                        ),
                        Err(e) => tracing::warn!(session_id = %sid, error = %e, "Post batch failed"),
                    }
                    result
                }
            }
        });

        BatchHandle {
            session_id,
            cancel,
            task,
        }
    }
}

impl std::fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDispatcher").finish_non_exhaustive()
    }
}

/// Handle to a running batch.
#[derive(Debug)]
pub struct BatchHandle {
    session_id: String,
    cancel: CancellationToken,
    task: JoinHandle<Result<BatchOutcome>>,
}

impl BatchHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Request cancellation. The worker sees the same token.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker. Returns `Error::Cancelled` if the batch was
    /// cancelled before the worker finished.
    pub async fn join(self) -> Result<BatchOutcome> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled {
                session_id: self.session_id,
            }),
            Err(e) => Err(Error::Worker(format!("batch task aborted: {}", e))),
        }
    }
}
