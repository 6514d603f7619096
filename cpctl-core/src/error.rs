//! Error types for cpctl-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating cluster config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse cluster config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the given path.
    #[error("cluster config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A declared logging facility is not part of the supported universe.
    #[error("log type {name:?} is unknown")]
    UnknownFacility { name: String },

    /// `metadata.name` was empty after merging file and flags.
    #[error("cluster name must be set")]
    MissingClusterName,

    /// The region is not one of [`crate::regions::SUPPORTED_REGIONS`].
    #[error("region {region:?} is not supported")]
    UnsupportedRegion { region: String },
}
