//! `cpctl enable-logging`: reconcile CloudWatch logging facilities.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use cpctl_core::{
    facility::supported_logging_types, load_config_at, regions::DEFAULT_REGION,
    set_cluster_config_defaults, validate_metadata, ClusterConfig, WaitSettings,
};
use cpctl_engine::ClusterProvider;

use crate::client::HttpControlPlaneClient;
use crate::GlobalArgs;

const FACILITY_FLAGS: [&str; 6] = [
    "all",
    "api",
    "audit",
    "authenticator",
    "controller_manager",
    "scheduler",
];

/// Arguments for `cpctl enable-logging`.
#[derive(Args, Debug)]
pub struct EnableLoggingArgs {
    /// Cluster name.
    #[arg(long, short = 'n', conflicts_with = "config_file")]
    pub name: Option<String>,

    /// Region of the cluster (defaults to us-west-2).
    #[arg(long, short = 'r', conflicts_with = "config_file")]
    pub region: Option<String>,

    /// Load the cluster config from a YAML file.
    #[arg(
        long = "config-file",
        short = 'f',
        value_name = "PATH",
        conflicts_with_all = FACILITY_FLAGS
    )]
    pub config_file: Option<PathBuf>,

    /// Enable all supported log types (api, audit, authenticator, controllerManager, scheduler).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub all: Option<bool>,

    /// Enable "api" log type.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub api: Option<bool>,

    /// Enable "audit" log type.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub audit: Option<bool>,

    /// Enable "authenticator" log type.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub authenticator: Option<bool>,

    /// Enable "controllerManager" log type.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub controller_manager: Option<bool>,

    /// Enable "scheduler" log type.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub scheduler: Option<bool>,

    /// Apply the changes; without it the command only reports them.
    #[arg(long)]
    pub approve: bool,

    /// Seconds to wait for the update to complete.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl EnableLoggingArgs {
    pub async fn run(self, global: &GlobalArgs) -> Result<()> {
        let mut cfg = self.cluster_config()?;
        validate_metadata(&cfg)?;
        set_cluster_config_defaults(&mut cfg)?;

        let endpoint = global.endpoint()?;
        info!("using region {}", cfg.metadata.region);

        let wait = match self.timeout {
            Some(secs) => WaitSettings::with_timeout(Duration::from_secs(secs)),
            None => WaitSettings::default(),
        };
        let client = HttpControlPlaneClient::new(endpoint, &cfg.metadata.region);
        let provider = ClusterProvider::new(Arc::new(client), wait);

        let outcome = provider
            .reconcile_logging(&mut cfg, !self.approve)
            .await
            .with_context(|| {
                format!("failed to update logging for cluster {:?}", cfg.metadata.name.0)
            })?;

        let status = if !outcome.changed() {
            "up-to-date".green()
        } else if outcome.applied {
            "updated".green()
        } else {
            "planned".yellow()
        };
        println!(
            "{} {} ({} & {})",
            outcome.meta.name,
            status.bold(),
            outcome.plan.describe_enable(),
            outcome.plan.describe_disable(),
        );
        Ok(())
    }

    /// Cluster config from `-f`, or built from flags.
    fn cluster_config(&self) -> Result<ClusterConfig> {
        if let Some(path) = &self.config_file {
            return load_config_at(path)
                .with_context(|| format!("failed to load cluster config '{}'", path.display()));
        }

        let mut cfg = ClusterConfig::new(
            self.name.clone().unwrap_or_default(),
            self.region.clone().unwrap_or_else(|| DEFAULT_REGION.to_string()),
        );
        *cfg.enable_types_mut() = self.selected_types();
        Ok(cfg)
    }

    fn facility_flags(&self) -> [(&'static str, Option<bool>); 5] {
        [
            ("api", self.api),
            ("audit", self.audit),
            ("authenticator", self.authenticator),
            ("controllerManager", self.controller_manager),
            ("scheduler", self.scheduler),
        ]
    }

    fn selected_types(&self) -> Vec<String> {
        select_types(self.all, &self.facility_flags())
    }
}

/// Resolve facility flags to an enable list.
///
/// `--all` defaults to on. A facility flag set to true switches that
/// default off unless `--all` was given explicitly; a facility flag set
/// to false excludes it from `--all`.
pub fn select_types(all: Option<bool>, flags: &[(&str, Option<bool>)]) -> Vec<String> {
    let mut enable_all = all.unwrap_or(true);
    let mut selected = Vec::new();
    let mut excluded = BTreeSet::new();

    for (name, value) in flags {
        match value {
            Some(true) => {
                selected.push(name.to_string());
                if all.is_none() {
                    enable_all = false;
                }
            }
            Some(false) => {
                excluded.insert(name.to_string());
            }
            None => {}
        }
    }

    if enable_all {
        for name in supported_logging_types() {
            if !excluded.contains(&name) && !selected.contains(&name) {
                selected.push(name);
            }
        }
    }
    selected
}
