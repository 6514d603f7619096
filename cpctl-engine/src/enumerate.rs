//! Paginated and partitioned enumeration.
//!
//! [`paginate`] drives a cursor-based listing to exhaustion.
//! [`enumerate_partitions`] repeats a listing over independent partitions
//! (regions), one tokio task each. A failing partition is logged and
//! skipped; it never fails the aggregate.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use serde::Serialize;
use tokio::task::{self, JoinSet};
use tracing::{debug, warn};

use crate::error::EngineError;

/// One page returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Call `list_page` until it stops returning a cursor.
///
/// The first call receives `None`. Items are accumulated in page order.
/// An error from any page aborts the listing.
pub async fn paginate<T, F, Fut>(mut list_page: F) -> Result<Vec<T>, EngineError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, EngineError>>,
{
    let mut items = Vec::new();
    let mut token = None;
    loop {
        let page = list_page(token.take()).await?;
        items.extend(page.items);
        match page.next_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }
    Ok(items)
}

/// A partition whose listing failed and was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFailure {
    pub partition: String,
    pub error: String,
}

/// Merged result of a partitioned enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enumeration<T> {
    /// Items of every successful partition; partition order is unspecified.
    pub items: Vec<T>,
    pub failed: Vec<PartitionFailure>,
}

impl<T> Default for Enumeration<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Run `enumerate` once per partition, concurrently, and merge the results.
///
/// Workers hand their finished item list back to this function, which is
/// the only writer of the merged result.
pub async fn enumerate_partitions<P, T, F, Fut>(partitions: Vec<P>, enumerate: F) -> Enumeration<T>
where
    P: fmt::Display,
    T: Send + 'static,
    F: Fn(P) -> Fut,
    Fut: Future<Output = Result<Vec<T>, EngineError>> + Send + 'static,
{
    let mut workers = JoinSet::new();
    let mut labels: HashMap<task::Id, String> = HashMap::new();
    for partition in partitions {
        let label = partition.to_string();
        let listing = enumerate(partition);
        let handle = workers.spawn(listing);
        labels.insert(handle.id(), label);
    }

    let mut merged = Enumeration::default();
    while let Some(joined) = workers.join_next_with_id().await {
        let id = match &joined {
            Ok((id, _)) => *id,
            Err(err) => err.id(),
        };
        let partition = labels.remove(&id).unwrap_or_default();
        match joined {
            Ok((_, Ok(items))) => {
                debug!(partition = %partition, count = items.len(), "partition listed");
                merged.items.extend(items);
            }
            Ok((_, Err(err))) => {
                warn!(partition = %partition, error = %err, "error listing partition; skipping it");
                merged.failed.push(PartitionFailure {
                    partition,
                    error: err.to_string(),
                });
            }
            Err(err) => {
                warn!(partition = %partition, error = %err, "partition worker aborted; skipping it");
                merged.failed.push(PartitionFailure {
                    partition,
                    error: err.to_string(),
                });
            }
        }
    }
    merged
}
