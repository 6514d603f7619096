//! Control-plane operations built on a [`ControlPlaneClient`].
//!
//! [`ClusterProvider`] pairs a region-bound client with the wait settings
//! used for every asynchronous update it starts.

use std::sync::Arc;

use tracing::{debug, info};

use cpctl_core::{
    ClusterMeta, ClusterName, ClusterStatus, ControlPlaneSnapshot, LogSetup, Logging,
    OperationHandle, UpdateStatus, WaitSettings,
};

use crate::diff::{describe_types, ObservedLogging};
use crate::error::{EngineError, ProviderError};
use crate::provider::ControlPlaneClient;
use crate::waiter::Waiter;

/// Client plus wait policy; cheap to clone and share between tasks.
#[derive(Clone)]
pub struct ClusterProvider {
    client: Arc<dyn ControlPlaneClient>,
    wait: WaitSettings,
}

impl ClusterProvider {
    pub fn new(client: Arc<dyn ControlPlaneClient>, wait: WaitSettings) -> Self {
        Self { client, wait }
    }

    pub fn client(&self) -> &Arc<dyn ControlPlaneClient> {
        &self.client
    }

    pub fn region(&self) -> &str {
        self.client.region()
    }

    pub fn wait_settings(&self) -> WaitSettings {
        self.wait
    }

    /// Describe a control plane; a missing cluster becomes [`EngineError::NotFound`].
    pub async fn describe_control_plane(
        &self,
        name: &ClusterName,
    ) -> Result<ControlPlaneSnapshot, EngineError> {
        match self.client.describe_cluster(name).await {
            Ok(snapshot) => Ok(snapshot),
            Err(ProviderError::NotFound { .. }) => Err(EngineError::NotFound {
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Describe a control plane and require it to be `ACTIVE`.
    pub async fn describe_control_plane_must_be_active(
        &self,
        name: &ClusterName,
    ) -> Result<ControlPlaneSnapshot, EngineError> {
        let snapshot = self.describe_control_plane(name).await?;
        if snapshot.status != ClusterStatus::Active {
            return Err(EngineError::ClusterNotActive {
                name: snapshot.name.to_string(),
                status: snapshot.status.to_string(),
            });
        }
        Ok(snapshot)
    }

    /// Fetch the current logging configuration as enabled/disabled sets.
    pub async fn current_logging(&self, name: &ClusterName) -> Result<ObservedLogging, EngineError> {
        let snapshot = self.describe_control_plane_must_be_active(name).await?;
        observed_logging(&snapshot)
    }

    /// Send a logging update and block until the provider reports it done.
    pub async fn update_logging_blocking(
        &self,
        meta: &ClusterMeta,
        enabled: &[String],
        disabled: &[String],
    ) -> Result<(), EngineError> {
        let logging = Logging {
            cluster_logging: vec![
                LogSetup::enabled(enabled.iter().cloned()),
                LogSetup::disabled(disabled.iter().cloned()),
            ],
        };
        let handle = self.client.update_logging(&meta.name, logging).await?;
        self.wait_for_update(&meta.name, &handle).await?;

        info!(
            "configured CloudWatch logging for cluster {:?} in {:?} ({} & {})",
            meta.name.0,
            meta.region,
            describe_types(enabled, "enabled types", "no types enabled"),
            describe_types(disabled, "disabled types", "no types disabled"),
        );
        Ok(())
    }

    /// Start a version upgrade to `meta.version`.
    pub async fn update_cluster_version(
        &self,
        meta: &ClusterMeta,
    ) -> Result<OperationHandle, EngineError> {
        let version = meta
            .version
            .as_deref()
            .ok_or_else(|| EngineError::MissingVersion {
                name: meta.name.to_string(),
            })?;
        Ok(self.client.update_version(&meta.name, version).await?)
    }

    /// Start a version upgrade and block until it succeeds.
    pub async fn update_cluster_version_blocking(&self, meta: &ClusterMeta) -> Result<(), EngineError> {
        let handle = self.update_cluster_version(meta).await?;
        self.wait_for_update(&meta.name, &handle).await
    }

    /// Poll an update until `Successful`; `Failed` and `Cancelled` are terminal failures.
    pub async fn wait_for_update(
        &self,
        name: &ClusterName,
        handle: &OperationHandle,
    ) -> Result<(), EngineError> {
        let waiter = Waiter::new(
            format!("cluster {:?}", name.0),
            format!("requested {:?} ({})", handle.kind.to_string(), handle.id),
            UpdateStatus::Successful,
            vec![UpdateStatus::Failed, UpdateStatus::Cancelled],
            self.wait,
        );

        let client = &self.client;
        waiter
            .wait(|| async move {
                let update = client.describe_update(name, &handle.id).await?;
                debug!(update = %update.id, status = ?update.status, "described update");
                update.status.ok_or_else(|| {
                    EngineError::UnexpectedResponse(format!("update {} has no status", update.id))
                })
            })
            .await
    }
}

/// Split a snapshot's log setups into enabled and disabled facility sets.
pub fn observed_logging(snapshot: &ControlPlaneSnapshot) -> Result<ObservedLogging, EngineError> {
    let mut observed = ObservedLogging::default();
    for setup in &snapshot.logging.cluster_logging {
        for name in &setup.types {
            let Some(name) = name else {
                return Err(EngineError::UnexpectedResponse(
                    "nil string in log setup types".to_string(),
                ));
            };
            match setup.enabled {
                Some(true) => {
                    observed.enabled.insert(name.clone());
                }
                Some(false) => {
                    observed.disabled.insert(name.clone());
                }
                None => {}
            }
        }
    }
    Ok(observed)
}
