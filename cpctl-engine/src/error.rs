//! Error types for cpctl-engine.

use std::time::Duration;

use thiserror::Error;

use cpctl_core::ConfigError;

/// Failures raised by [`crate::provider::ControlPlaneClient`] implementations.
///
/// The engine passes these through verbatim; retrying transient transport
/// failures is the client's concern.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The addressed resource does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The request never produced a response (connect, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// All errors that can arise from reconciliation, waiting and enumeration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid declaration; raised before any provider call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A provider call failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("control plane {name:?} not found")]
    NotFound { name: String },

    #[error("status of cluster {name:?} is {status:?}, has to be \"ACTIVE\"")]
    ClusterNotActive { name: String, status: String },

    #[error("no target version set for cluster {name:?}")]
    MissingVersion { name: String },

    #[error("unexpected response from control-plane API: {0}")]
    UnexpectedResponse(String),

    /// An asynchronous operation reached a known terminal failure status.
    #[error("{operation} for {resource} ended with status {status:?}")]
    OperationFailed {
        resource: String,
        operation: String,
        status: String,
    },

    /// No terminal status was observed before the deadline.
    #[error("timed out waiting for {resource} after {elapsed:?}")]
    OperationTimeout { resource: String, elapsed: Duration },

    /// A task stopped (panic or runtime shutdown) without delivering an outcome.
    #[error("task {task:?} ended without reporting an outcome: {reason}")]
    TaskAbandoned { task: String, reason: String },
}
