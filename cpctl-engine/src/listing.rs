//! Cluster listing, single-region and across regions.

use std::sync::Arc;

use tracing::debug;

use cpctl_core::{ClusterMeta, ClusterName, ControlPlaneSnapshot};

use crate::control_plane::ClusterProvider;
use crate::enumerate::{enumerate_partitions, paginate, Enumeration, Page};
use crate::error::EngineError;
use crate::provider::{ClientFactory, ControlPlaneClient};

/// Page through every cluster in the client's region.
pub async fn list_clusters_in(
    client: Arc<dyn ControlPlaneClient>,
    chunk_size: u32,
) -> Result<Vec<ClusterMeta>, EngineError> {
    let region = client.region().to_string();
    paginate(|token| {
        let client = Arc::clone(&client);
        let region = region.clone();
        async move {
            let page = client.list_clusters(chunk_size, token).await?;
            debug!(region = %region, count = page.clusters.len(), "listed cluster page");
            Ok(Page {
                items: page
                    .clusters
                    .into_iter()
                    .map(|name| ClusterMeta {
                        name: ClusterName::from(name),
                        region: region.clone(),
                        version: None,
                    })
                    .collect(),
                next_token: page.next_token,
            })
        }
    })
    .await
}

/// List clusters in every region, skipping regions whose listing fails.
pub async fn list_clusters_each_region<F>(
    factory: &F,
    regions: Vec<String>,
    chunk_size: u32,
) -> Enumeration<ClusterMeta>
where
    F: ClientFactory + ?Sized,
{
    enumerate_partitions(regions, |region| {
        let client = factory.for_region(&region);
        list_clusters_in(client, chunk_size)
    })
    .await
}

impl ClusterProvider {
    /// Clusters in this provider's region.
    pub async fn list_clusters(&self, chunk_size: u32) -> Result<Vec<ClusterMeta>, EngineError> {
        list_clusters_in(Arc::clone(self.client()), chunk_size).await
    }

    /// A single cluster, by name.
    pub async fn get_cluster(&self, name: &ClusterName) -> Result<ControlPlaneSnapshot, EngineError> {
        self.describe_control_plane(name).await
    }
}
