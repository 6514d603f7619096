//! Provider client seam.
//!
//! Everything the engine needs from the cloud provider goes through
//! [`ControlPlaneClient`]. Implementations own transport, credentials and
//! transient-error retry; the engine only sequences calls.

use std::sync::Arc;

use async_trait::async_trait;

use cpctl_core::{ClusterName, ControlPlaneSnapshot, Logging, OperationHandle};

use crate::error::ProviderError;

/// One page of cluster names from a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterPage {
    pub clusters: Vec<String>,
    /// Opaque cursor for the next page; `None` or empty ends the listing.
    pub next_token: Option<String>,
}

/// Region-scoped client for the managed control-plane API.
///
/// A client is bound to one region. It is shared read-only across
/// concurrently running tasks.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Region this client talks to.
    fn region(&self) -> &str;

    /// Describe a control plane. Missing clusters yield [`ProviderError::NotFound`].
    async fn describe_cluster(
        &self,
        name: &ClusterName,
    ) -> Result<ControlPlaneSnapshot, ProviderError>;

    /// Submit a logging configuration change.
    async fn update_logging(
        &self,
        name: &ClusterName,
        logging: Logging,
    ) -> Result<OperationHandle, ProviderError>;

    /// Submit a Kubernetes version upgrade.
    async fn update_version(
        &self,
        name: &ClusterName,
        version: &str,
    ) -> Result<OperationHandle, ProviderError>;

    /// Re-query an operation started by one of the update calls.
    async fn describe_update(
        &self,
        name: &ClusterName,
        update_id: &str,
    ) -> Result<OperationHandle, ProviderError>;

    /// List cluster names, one page at a time.
    async fn list_clusters(
        &self,
        max_results: u32,
        next_token: Option<String>,
    ) -> Result<ClusterPage, ProviderError>;
}

/// Builds a client for a given region; used to fan listing out over regions.
pub trait ClientFactory: Send + Sync {
    fn for_region(&self, region: &str) -> Arc<dyn ControlPlaneClient>;
}

impl<F> ClientFactory for F
where
    F: Fn(&str) -> Arc<dyn ControlPlaneClient> + Send + Sync,
{
    fn for_region(&self, region: &str) -> Arc<dyn ControlPlaneClient> {
        self(region)
    }
}
