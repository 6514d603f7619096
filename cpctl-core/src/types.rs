//! Domain types for cluster config and the provider's control-plane API.
//!
//! Config types deserialize from the cluster config YAML (camelCase keys).
//! Provider types mirror the JSON shapes the control-plane API returns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed control-plane (cluster) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClusterName(pub String);

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ClusterName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClusterName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Cluster config (the operator's declaration)
// ---------------------------------------------------------------------------

/// Identity of a cluster: where it lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterMeta {
    #[serde(default)]
    pub name: ClusterName,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Desired CloudWatch logging declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCloudWatchLogging {
    /// Facility names to enable; may contain `all` or `*`.
    #[serde(default)]
    pub enable_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCloudWatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_logging: Option<ClusterCloudWatchLogging>,
}

/// Root of a cluster config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default)]
    pub metadata: ClusterMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_watch: Option<ClusterCloudWatch>,
}

impl ClusterConfig {
    /// Config for a named cluster with no logging declaration.
    pub fn new(name: impl Into<ClusterName>, region: impl Into<String>) -> Self {
        Self {
            metadata: ClusterMeta {
                name: name.into(),
                region: region.into(),
                version: None,
            },
            cloud_watch: None,
        }
    }

    /// The declared enable list, or an empty slice when nothing was declared.
    pub fn enable_types(&self) -> &[String] {
        self.cloud_watch
            .as_ref()
            .and_then(|cw| cw.cluster_logging.as_ref())
            .map(|cl| cl.enable_types.as_slice())
            .unwrap_or(&[])
    }

    /// Mutable access to the enable list, materialising empty sections.
    pub fn enable_types_mut(&mut self) -> &mut Vec<String> {
        &mut self
            .cloud_watch
            .get_or_insert_with(ClusterCloudWatch::default)
            .cluster_logging
            .get_or_insert_with(ClusterCloudWatchLogging::default)
            .enable_types
    }
}

// ---------------------------------------------------------------------------
// Provider shapes
// ---------------------------------------------------------------------------

/// Lifecycle status of a control plane.
///
/// Statuses this crate does not know are kept verbatim in `Other`, so a
/// new provider status still reaches the caller instead of failing decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterStatus {
    Creating,
    Active,
    Deleting,
    Failed,
    Updating,
    Other(String),
}

impl From<String> for ClusterStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATING" => ClusterStatus::Creating,
            "ACTIVE" => ClusterStatus::Active,
            "DELETING" => ClusterStatus::Deleting,
            "FAILED" => ClusterStatus::Failed,
            "UPDATING" => ClusterStatus::Updating,
            _ => ClusterStatus::Other(s),
        }
    }
}

impl From<ClusterStatus> for String {
    fn from(status: ClusterStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterStatus::Creating => write!(f, "CREATING"),
            ClusterStatus::Active => write!(f, "ACTIVE"),
            ClusterStatus::Deleting => write!(f, "DELETING"),
            ClusterStatus::Failed => write!(f, "FAILED"),
            ClusterStatus::Updating => write!(f, "UPDATING"),
            ClusterStatus::Other(s) => f.write_str(s),
        }
    }
}

/// One group of facilities sharing an enabled flag.
///
/// `enabled` is optional on the wire; a setup without it is neither
/// enabled nor disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub types: Vec<Option<String>>,
}

impl LogSetup {
    pub fn enabled<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: Some(true),
            types: types.into_iter().map(|t| Some(t.into())).collect(),
        }
    }

    pub fn disabled<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: Some(false),
            types: types.into_iter().map(|t| Some(t.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logging {
    #[serde(default)]
    pub cluster_logging: Vec<LogSetup>,
}

/// Point-in-time view of a control plane as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneSnapshot {
    pub name: ClusterName,
    pub status: ClusterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logging: Logging,
}

/// Kind of asynchronous update a provider operation performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UpdateType {
    VersionUpdate,
    LoggingUpdate,
    EndpointAccessUpdate,
    Other(String),
}

impl From<String> for UpdateType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "VersionUpdate" => UpdateType::VersionUpdate,
            "LoggingUpdate" => UpdateType::LoggingUpdate,
            "EndpointAccessUpdate" => UpdateType::EndpointAccessUpdate,
            _ => UpdateType::Other(s),
        }
    }
}

impl From<UpdateType> for String {
    fn from(kind: UpdateType) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateType::VersionUpdate => write!(f, "VersionUpdate"),
            UpdateType::LoggingUpdate => write!(f, "LoggingUpdate"),
            UpdateType::EndpointAccessUpdate => write!(f, "EndpointAccessUpdate"),
            UpdateType::Other(s) => f.write_str(s),
        }
    }
}

/// Status of an asynchronous provider operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStatus {
    InProgress,
    Failed,
    Cancelled,
    Successful,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStatus::InProgress => write!(f, "InProgress"),
            UpdateStatus::Failed => write!(f, "Failed"),
            UpdateStatus::Cancelled => write!(f, "Cancelled"),
            UpdateStatus::Successful => write!(f, "Successful"),
        }
    }
}

/// Identifies one asynchronous provider-side operation.
///
/// Returned by an update call and only ever re-queried by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHandle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UpdateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UpdateStatus>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
