//! # cpctl-engine
//!
//! Reconciliation and asynchronous-operation layer for managed control planes.
//!
//! - [`waiter`]: poll an operation until it reaches a terminal status or times out
//! - [`enumerate`]: cursor pagination and per-partition fan-out
//! - [`tasks`]: serial/parallel task trees
//! - [`diff`]: desired vs observed facility sets
//! - [`reconcile`]: the logging reconciliation pipeline
//!
//! Provider access goes through [`ControlPlaneClient`].

pub mod control_plane;
pub mod diff;
pub mod enumerate;
pub mod error;
pub mod listing;
pub mod provider;
pub mod reconcile;
pub mod tasks;
pub mod waiter;

pub use control_plane::ClusterProvider;
pub use diff::{plan_logging, LoggingPlan, ObservedLogging};
pub use enumerate::{Enumeration, PartitionFailure};
pub use error::{EngineError, ProviderError};
pub use listing::{list_clusters_each_region, list_clusters_in};
pub use provider::{ClientFactory, ClusterPage, ControlPlaneClient};
pub use reconcile::{ReconcileOutcome, UpdateLoggingTask};
pub use tasks::{Task, TaskFn, TaskTree};
pub use waiter::Waiter;
