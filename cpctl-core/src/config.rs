//! Cluster config file loading and defaulting.
//!
//! # File layout
//!
//! ```yaml
//! metadata:
//!   name: prod
//!   region: us-west-2
//! cloudWatch:
//!   clusterLogging:
//!     enableTypes: ["api", "audit"]   # or ["*"] / ["all"]
//! ```
//!
//! The config comes either from such a file or from command-line flags,
//! never both. [`set_cluster_config_defaults`] is idempotent: the CLI runs
//! it to reject bad log types up front and reconciliation runs it again.

use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::facility::{expand_desired, supported_logging_types};
use crate::regions::is_supported_region;
use crate::types::ClusterConfig;

/// Default cadence for polling asynchronous operations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Default deadline for an asynchronous operation to reach a terminal state.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(25 * 60);

/// Poll cadence and hard deadline used when waiting on provider operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl WaitSettings {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

/// Load a cluster config from a YAML file.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_config_at(path: &Path) -> Result<ClusterConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expand and validate the declared logging facilities in place.
///
/// A missing logging section becomes an explicit empty declaration, so
/// downstream code always sees a concrete enable list.
pub fn set_cluster_config_defaults(cfg: &mut ClusterConfig) -> Result<(), ConfigError> {
    let universe = supported_logging_types();
    let enable_types = cfg.enable_types_mut();
    let expanded = expand_desired(enable_types, &universe)?;
    *enable_types = expanded;
    Ok(())
}

/// Check the cluster identity is usable before any provider call.
pub fn validate_metadata(cfg: &ClusterConfig) -> Result<(), ConfigError> {
    if cfg.metadata.name.0.trim().is_empty() {
        return Err(ConfigError::MissingClusterName);
    }
    if !is_supported_region(&cfg.metadata.region) {
        return Err(ConfigError::UnsupportedRegion {
            region: cfg.metadata.region.clone(),
        });
    }
    Ok(())
}
