//! Logging reconciliation pipeline.
//!
//! 1. Expand and validate the declared facilities (no provider calls yet).
//! 2. Fetch the observed logging state.
//! 3. Diff by set.
//! 4. If anything changed and this is not a plan run, execute the update
//!    task tree: update call followed by the operation waiter.
//!
//! Running it twice with no external change reports `changed == false` the
//! second time.

use async_trait::async_trait;
use tracing::{info, warn};

use cpctl_core::{
    facility::supported_logging_types, set_cluster_config_defaults, ClusterConfig, ClusterMeta,
};

use crate::control_plane::ClusterProvider;
use crate::diff::{plan_logging, LoggingPlan, ObservedLogging};
use crate::error::EngineError;
use crate::tasks::{Task, TaskTree};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub meta: ClusterMeta,
    pub plan: LoggingPlan,
    /// `true` only when an update was sent and reached `Successful`.
    pub applied: bool,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.plan.changed
    }
}

/// Sends one logging update and waits for it to complete.
pub struct UpdateLoggingTask {
    info: String,
    provider: ClusterProvider,
    meta: ClusterMeta,
    enabled: Vec<String>,
    disabled: Vec<String>,
}

#[async_trait]
impl Task for UpdateLoggingTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self) -> Result<(), EngineError> {
        self.provider
            .update_logging_blocking(&self.meta, &self.enabled, &self.disabled)
            .await
    }
}

impl ClusterProvider {
    /// The task that applies `plan` to the cluster described by `meta`.
    pub fn logging_update_task(&self, meta: &ClusterMeta, plan: &LoggingPlan) -> UpdateLoggingTask {
        UpdateLoggingTask {
            info: "update CloudWatch logging configuration".to_string(),
            provider: self.clone(),
            meta: meta.clone(),
            enabled: plan.to_enable.clone(),
            disabled: plan.to_disable.clone(),
        }
    }

    /// All tasks for bringing a cluster's configuration in line with `cfg`.
    ///
    /// `cfg` must already have been through [`set_cluster_config_defaults`].
    /// Callers may append sibling updates before running the tree.
    pub fn update_cluster_config_tasks(&self, cfg: &ClusterConfig) -> TaskTree {
        // planning against an empty observation yields the full send lists
        let plan = plan_logging(
            &ObservedLogging::default(),
            cfg.enable_types(),
            &supported_logging_types(),
        );
        let mut tasks = TaskTree::serial();
        tasks.append(self.logging_update_task(&cfg.metadata, &plan));
        tasks
    }

    /// Reconcile the cluster's logging facilities with `cfg`.
    ///
    /// `cfg`'s enable list is expanded in place. With `plan_only` the
    /// intended change is reported but never sent.
    pub async fn reconcile_logging(
        &self,
        cfg: &mut ClusterConfig,
        plan_only: bool,
    ) -> Result<ReconcileOutcome, EngineError> {
        set_cluster_config_defaults(cfg)?;

        let meta = cfg.metadata.clone();
        let observed = self.current_logging(&meta.name).await?;
        let plan = plan_logging(&observed, cfg.enable_types(), &supported_logging_types());

        if !plan.changed {
            info!(
                "CloudWatch logging for cluster {:?} in {:?} is already up-to-date",
                meta.name.0, meta.region
            );
            return Ok(ReconcileOutcome {
                meta,
                plan,
                applied: false,
            });
        }

        let prefix = if plan_only { "(plan) " } else { "will " };
        info!(
            "{prefix}update CloudWatch logging for cluster {:?} in {:?} ({} & {})",
            meta.name.0,
            meta.region,
            plan.describe_enable(),
            plan.describe_disable(),
        );

        if plan_only {
            warn!("no changes were applied, run again with '--approve' to apply the changes");
            return Ok(ReconcileOutcome {
                meta,
                plan,
                applied: false,
            });
        }

        let mut tasks = TaskTree::serial();
        tasks.append(self.logging_update_task(&meta, &plan));
        tasks.run().await?;

        Ok(ReconcileOutcome {
            meta,
            plan,
            applied: true,
        })
    }
}
