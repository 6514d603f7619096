//! cpctl core library: domain types, logging facilities, config loading, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and provider-facing domain structs
//! - [`facility`]: the logging facility universe and desired-state expansion
//! - [`regions`]: partitions available for multi-region enumeration
//! - [`config`]: cluster config file loading and defaulting
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod facility;
pub mod regions;
pub mod types;

pub use config::{load_config_at, set_cluster_config_defaults, validate_metadata, WaitSettings};
pub use error::ConfigError;
pub use types::{
    ClusterCloudWatch, ClusterCloudWatchLogging, ClusterConfig, ClusterMeta, ClusterName,
    ClusterStatus, ControlPlaneSnapshot, LogSetup, Logging, OperationHandle, UpdateStatus,
    UpdateType,
};
