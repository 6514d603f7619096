//! Task trees: ordered or concurrent composition of units of work.
//!
//! Every child runs on its own tokio task and delivers exactly one outcome
//! through its join handle. A panicking child still delivers one, as
//! [`EngineError::TaskAbandoned`], so a tree never hangs on a lost result.
//!
//! - Serial trees run children in order and stop at the first failure.
//! - Parallel trees start every child, wait for all of them, and return the
//!   first failure observed. Siblings are not cancelled.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, error};

use crate::error::EngineError;

/// A named unit of work with a single outcome.
#[async_trait]
pub trait Task: Send + Sync {
    /// Human-readable description used in logs.
    fn describe(&self) -> String;

    /// Run the task once.
    async fn run(&self) -> Result<(), EngineError>;
}

/// Adapts an async closure into a [`Task`].
pub struct TaskFn<F> {
    info: String,
    call: F,
}

impl<F, Fut> TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EngineError>> + Send + 'static,
{
    pub fn new(info: impl Into<String>, call: F) -> Self {
        Self {
            info: info.into(),
            call,
        }
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EngineError>> + Send + 'static,
{
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self) -> Result<(), EngineError> {
        (self.call)().await
    }
}

/// An ordered group of tasks, itself a [`Task`].
#[derive(Clone, Default)]
pub struct TaskTree {
    tasks: Vec<Arc<dyn Task>>,
    parallel: bool,
}

impl TaskTree {
    pub fn serial() -> Self {
        Self {
            tasks: Vec::new(),
            parallel: false,
        }
    }

    pub fn parallel() -> Self {
        Self {
            tasks: Vec::new(),
            parallel: true,
        }
    }

    pub fn append(&mut self, task: impl Task + 'static) {
        self.tasks.push(Arc::new(task));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    async fn run_serial(&self) -> Result<(), EngineError> {
        for task in &self.tasks {
            let info = task.describe();
            debug!(task = %info, "starting task");
            let task = Arc::clone(task);
            let outcome = tokio::spawn(async move { task.run().await }).await;
            if let Err(err) = settle(&info, outcome) {
                error!(task = %info, error = %err, "task failed; skipping remaining tasks");
                return Err(err);
            }
            debug!(task = %info, "task finished");
        }
        Ok(())
    }

    async fn run_parallel(&self) -> Result<(), EngineError> {
        let mut running = JoinSet::new();
        let mut names: HashMap<task::Id, String> = HashMap::new();
        for task in &self.tasks {
            let info = task.describe();
            debug!(task = %info, "starting task");
            let task = Arc::clone(task);
            let handle = running.spawn(async move { task.run().await });
            names.insert(handle.id(), info);
        }

        let mut first_failure = None;
        while let Some(joined) = running.join_next_with_id().await {
            let id = match &joined {
                Ok((id, _)) => *id,
                Err(err) => err.id(),
            };
            let info = names.remove(&id).unwrap_or_default();
            let outcome = match joined {
                Ok((_, result)) => result,
                Err(err) => Err(abandoned(&info, err)),
            };
            match outcome {
                Ok(()) => debug!(task = %info, "task finished"),
                Err(err) => {
                    error!(task = %info, error = %err, "task failed");
                    first_failure.get_or_insert(err);
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Task for TaskTree {
    fn describe(&self) -> String {
        self.to_string()
    }

    async fn run(&self) -> Result<(), EngineError> {
        if self.parallel {
            self.run_parallel().await
        } else {
            self.run_serial().await
        }
    }
}

impl fmt::Display for TaskTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.parallel { "parallel" } else { "sequential" };
        let noun = if self.tasks.len() == 1 { "task" } else { "tasks" };
        let children: Vec<String> = self.tasks.iter().map(|t| t.describe()).collect();
        write!(
            f,
            "{} {mode} {noun}: {{ {} }}",
            self.tasks.len(),
            children.join(", ")
        )
    }
}

impl fmt::Debug for TaskTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string())
    }
}

fn settle(
    info: &str,
    outcome: Result<Result<(), EngineError>, JoinError>,
) -> Result<(), EngineError> {
    match outcome {
        Ok(result) => result,
        Err(err) => Err(abandoned(info, err)),
    }
}

fn abandoned(info: &str, err: JoinError) -> EngineError {
    let reason = if err.is_panic() {
        "task panicked".to_string()
    } else {
        err.to_string()
    };
    EngineError::TaskAbandoned {
        task: info.to_string(),
        reason,
    }
}
