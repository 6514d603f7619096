//! JSON-over-HTTP implementation of [`ControlPlaneClient`].
//!
//! Requests are made with a blocking `ureq` agent on tokio's blocking pool.
//! An endpoint containing `{region}` is expanded per region, so one
//! template serves `--all-regions` enumeration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use urlencoding::encode;

use cpctl_core::{ClusterName, ControlPlaneSnapshot, Logging, OperationHandle};
use cpctl_engine::{ClientFactory, ClusterPage, ControlPlaneClient, ProviderError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ClusterEnvelope {
    cluster: ControlPlaneSnapshot,
}

#[derive(Deserialize)]
struct UpdateEnvelope {
    update: OperationHandle,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterListEnvelope {
    #[serde(default)]
    clusters: Vec<String>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Serialize)]
struct UpdateConfigRequest {
    logging: Logging,
}

#[derive(Serialize)]
struct UpdateVersionRequest<'a> {
    version: &'a str,
}

/// Region-bound REST client.
#[derive(Clone)]
pub struct HttpControlPlaneClient {
    agent: ureq::Agent,
    base_url: String,
    region: String,
}

impl HttpControlPlaneClient {
    pub fn new(endpoint: &str, region: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            base_url: endpoint_for_region(endpoint, region),
            region: region.to_string(),
        }
    }

    fn url(&self, route: &Route<'_>) -> String {
        format!("{}{}", self.base_url, route.path())
    }
}

/// REST routes of the control-plane API. Path segments are percent-encoded.
#[derive(Debug, Clone, Copy)]
enum Route<'a> {
    Cluster(&'a ClusterName),
    UpdateConfig(&'a ClusterName),
    Updates(&'a ClusterName),
    Update(&'a ClusterName, &'a str),
    ListClusters {
        max_results: u32,
        next_token: Option<&'a str>,
    },
}

impl Route<'_> {
    fn path(&self) -> String {
        match self {
            Route::Cluster(name) => format!("/clusters/{}", encode(&name.0)),
            Route::UpdateConfig(name) => format!("/clusters/{}/update-config", encode(&name.0)),
            Route::Updates(name) => format!("/clusters/{}/updates", encode(&name.0)),
            Route::Update(name, id) => {
                format!("/clusters/{}/updates/{}", encode(&name.0), encode(id))
            }
            Route::ListClusters {
                max_results,
                next_token,
            } => match next_token {
                Some(token) => format!(
                    "/clusters?maxResults={max_results}&nextToken={}",
                    encode(token)
                ),
                None => format!("/clusters?maxResults={max_results}"),
            },
        }
    }
}

/// Expand `{region}` and drop any trailing slash.
pub fn endpoint_for_region(endpoint: &str, region: &str) -> String {
    endpoint
        .replace("{region}", region)
        .trim_end_matches('/')
        .to_string()
}

/// Builds an [`HttpControlPlaneClient`] per region from one endpoint template.
pub struct HttpClientFactory {
    endpoint: String,
}

impl HttpClientFactory {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl ClientFactory for HttpClientFactory {
    fn for_region(&self, region: &str) -> Arc<dyn ControlPlaneClient> {
        Arc::new(HttpControlPlaneClient::new(&self.endpoint, region))
    }
}

/// Run one blocking request and decode its JSON body.
async fn send<T, F>(resource: String, request: F) -> Result<T, ProviderError>
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce() -> Result<ureq::Response, ureq::Error> + Send + 'static,
{
    let body = tokio::task::spawn_blocking(move || read_body(&resource, request()))
        .await
        .map_err(|err| ProviderError::Transport(format!("request task join error: {err}")))??;
    Ok(serde_json::from_str(&body)?)
}

fn read_body(
    resource: &str,
    response: Result<ureq::Response, ureq::Error>,
) -> Result<String, ProviderError> {
    match response {
        Ok(response) => response
            .into_string()
            .map_err(|err| ProviderError::Transport(err.to_string())),
        Err(ureq::Error::Status(404, _)) => Err(ProviderError::NotFound {
            resource: resource.to_string(),
        }),
        Err(ureq::Error::Status(status, response)) => Err(ProviderError::Api {
            status,
            message: response
                .into_string()
                .unwrap_or_else(|_| "<unreadable body>".to_string()),
        }),
        Err(ureq::Error::Transport(err)) => Err(ProviderError::Transport(err.to_string())),
    }
}

#[async_trait]
impl ControlPlaneClient for HttpControlPlaneClient {
    fn region(&self) -> &str {
        &self.region
    }

    async fn describe_cluster(
        &self,
        name: &ClusterName,
    ) -> Result<ControlPlaneSnapshot, ProviderError> {
        let request = self.agent.get(&self.url(&Route::Cluster(name)));
        debug!(url = %request.url(), "describe cluster");
        let envelope: ClusterEnvelope =
            send(format!("cluster {:?}", name.0), move || request.call()).await?;
        Ok(envelope.cluster)
    }

    async fn update_logging(
        &self,
        name: &ClusterName,
        logging: Logging,
    ) -> Result<OperationHandle, ProviderError> {
        let request = self.agent.post(&self.url(&Route::UpdateConfig(name)));
        debug!(url = %request.url(), "update cluster logging");
        let body = UpdateConfigRequest { logging };
        let envelope: UpdateEnvelope =
            send(format!("cluster {:?}", name.0), move || request.send_json(body)).await?;
        Ok(envelope.update)
    }

    async fn update_version(
        &self,
        name: &ClusterName,
        version: &str,
    ) -> Result<OperationHandle, ProviderError> {
        let request = self.agent.post(&self.url(&Route::Updates(name)));
        debug!(url = %request.url(), version, "update cluster version");
        let version = version.to_string();
        let envelope: UpdateEnvelope = send(format!("cluster {:?}", name.0), move || {
            request.send_json(UpdateVersionRequest { version: &version })
        })
        .await?;
        Ok(envelope.update)
    }

    async fn describe_update(
        &self,
        name: &ClusterName,
        update_id: &str,
    ) -> Result<OperationHandle, ProviderError> {
        let request = self.agent.get(&self.url(&Route::Update(name, update_id)));
        let envelope: UpdateEnvelope =
            send(format!("update {update_id:?}"), move || request.call()).await?;
        Ok(envelope.update)
    }

    async fn list_clusters(
        &self,
        max_results: u32,
        next_token: Option<String>,
    ) -> Result<ClusterPage, ProviderError> {
        let request = self.agent.get(&self.url(&Route::ListClusters {
            max_results,
            next_token: next_token.as_deref(),
        }));
        let envelope: ClusterListEnvelope =
            send(format!("clusters in {}", self.region), move || request.call()).await?;
        Ok(ClusterPage {
            clusters: envelope.clusters,
            next_token: envelope.next_token,
        })
    }
}
