//! In-memory control plane used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cpctl_core::{
    ClusterName, ClusterStatus, ControlPlaneSnapshot, LogSetup, Logging, OperationHandle,
    UpdateStatus, UpdateType, WaitSettings,
};
use cpctl_engine::{ClusterPage, ControlPlaneClient, ProviderError};

pub fn fast_wait() -> WaitSettings {
    WaitSettings {
        poll_interval: Duration::from_secs(1),
        timeout: Duration::from_secs(60),
    }
}

pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Fake provider for one region.
///
/// Update statuses are served from a script; the last entry repeats. When
/// an update reports `Successful` the sent logging becomes the observed one.
pub struct FakeControlPlane {
    region: String,
    snapshot: Mutex<Option<ControlPlaneSnapshot>>,
    statuses: Mutex<VecDeque<UpdateStatus>>,
    pub sent_logging: Mutex<Vec<Logging>>,
    pub sent_versions: Mutex<Vec<String>>,
    pending: Mutex<Option<Logging>>,
    pages: HashMap<Option<String>, ClusterPage>,
    fail_listing: bool,
    pub describe_calls: AtomicUsize,
    pub describe_update_calls: AtomicUsize,
}

impl FakeControlPlane {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            snapshot: Mutex::new(None),
            statuses: Mutex::new(VecDeque::from([UpdateStatus::Successful])),
            sent_logging: Mutex::new(Vec::new()),
            sent_versions: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            pages: HashMap::new(),
            fail_listing: false,
            describe_calls: AtomicUsize::new(0),
            describe_update_calls: AtomicUsize::new(0),
        }
    }

    /// Active cluster `testcluster` with api+audit enabled, the rest disabled.
    pub fn with_test_cluster(region: &str) -> Self {
        Self::new(region).with_cluster(
            "testcluster",
            ClusterStatus::Active,
            vec![
                LogSetup::enabled(["api", "audit"]),
                LogSetup::disabled(["controllerManager", "authenticator", "scheduler"]),
            ],
        )
    }

    pub fn with_cluster(self, name: &str, status: ClusterStatus, setups: Vec<LogSetup>) -> Self {
        *self.snapshot.lock().unwrap() = Some(ControlPlaneSnapshot {
            name: ClusterName::from(name),
            status,
            version: Some("1.28".to_string()),
            created_at: None,
            logging: Logging {
                cluster_logging: setups,
            },
        });
        self
    }

    pub fn with_statuses(self, statuses: &[UpdateStatus]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
        self
    }

    pub fn with_page(mut self, token: Option<&str>, clusters: &[&str], next: Option<&str>) -> Self {
        self.pages.insert(
            token.map(str::to_string),
            ClusterPage {
                clusters: strings(clusters),
                next_token: next.map(str::to_string),
            },
        );
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn last_sent(&self) -> Logging {
        self.sent_logging
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("an update was sent")
    }

    fn next_status(&self) -> UpdateStatus {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            *statuses.front().unwrap()
        }
    }
}

/// Types of a sent log setup, unwrapped.
pub fn types_of(setup: &LogSetup) -> Vec<String> {
    setup.types.iter().flatten().cloned().collect()
}

#[async_trait]
impl ControlPlaneClient for FakeControlPlane {
    fn region(&self) -> &str {
        &self.region
    }

    async fn describe_cluster(
        &self,
        name: &ClusterName,
    ) -> Result<ControlPlaneSnapshot, ProviderError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        match self.snapshot.lock().unwrap().as_ref() {
            Some(snapshot) if &snapshot.name == name => Ok(snapshot.clone()),
            _ => Err(ProviderError::NotFound {
                resource: format!("cluster {name}"),
            }),
        }
    }

    async fn update_logging(
        &self,
        _name: &ClusterName,
        logging: Logging,
    ) -> Result<OperationHandle, ProviderError> {
        self.sent_logging.lock().unwrap().push(logging.clone());
        *self.pending.lock().unwrap() = Some(logging);
        Ok(OperationHandle {
            id: "u123".to_string(),
            kind: UpdateType::LoggingUpdate,
            status: Some(UpdateStatus::InProgress),
        })
    }

    async fn update_version(
        &self,
        _name: &ClusterName,
        version: &str,
    ) -> Result<OperationHandle, ProviderError> {
        self.sent_versions.lock().unwrap().push(version.to_string());
        Ok(OperationHandle {
            id: "v456".to_string(),
            kind: UpdateType::VersionUpdate,
            status: Some(UpdateStatus::InProgress),
        })
    }

    async fn describe_update(
        &self,
        _name: &ClusterName,
        update_id: &str,
    ) -> Result<OperationHandle, ProviderError> {
        self.describe_update_calls.fetch_add(1, Ordering::SeqCst);
        let status = self.next_status();
        if status == UpdateStatus::Successful {
            if let Some(logging) = self.pending.lock().unwrap().take() {
                if let Some(snapshot) = self.snapshot.lock().unwrap().as_mut() {
                    snapshot.logging = logging;
                }
            }
        }
        let kind = if update_id == "v456" {
            UpdateType::VersionUpdate
        } else {
            UpdateType::LoggingUpdate
        };
        Ok(OperationHandle {
            id: update_id.to_string(),
            kind,
            status: Some(status),
        })
    }

    async fn list_clusters(
        &self,
        _max_results: u32,
        next_token: Option<String>,
    ) -> Result<ClusterPage, ProviderError> {
        if self.fail_listing {
            return Err(ProviderError::Api {
                status: 403,
                message: format!("access denied in {}", self.region),
            });
        }
        Ok(self.pages.get(&next_token).cloned().unwrap_or_default())
    }
}
