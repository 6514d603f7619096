//! Long-running operation waiter.
//!
//! Polls a status function on a fixed cadence until it reports the success
//! value or one of the failure values, or until the deadline fires. The
//! deadline is an independent timer raced against both the tick and the
//! in-flight status call, so a slow or hung call cannot delay it.
//!
//! All timing goes through `tokio::time`; tests drive it with a paused clock.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use cpctl_core::WaitSettings;

use crate::error::EngineError;

/// Shortest poll cadence; a zero interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Waits for one asynchronous operation to reach a terminal status.
#[derive(Debug, Clone)]
pub struct Waiter<S> {
    resource: String,
    operation: String,
    success: S,
    failure: Vec<S>,
    settings: WaitSettings,
}

impl<S> Waiter<S>
where
    S: PartialEq + fmt::Display,
{
    /// `resource` names what is being waited on in errors and logs;
    /// `operation` describes the operation (e.g. its id and kind).
    pub fn new(
        resource: impl Into<String>,
        operation: impl Into<String>,
        success: S,
        failure: Vec<S>,
        mut settings: WaitSettings,
    ) -> Self {
        settings.poll_interval = settings.poll_interval.max(MIN_POLL_INTERVAL);
        Self {
            resource: resource.into(),
            operation: operation.into(),
            success,
            failure,
            settings,
        }
    }

    /// Block until `describe` reports a terminal status or the deadline elapses.
    ///
    /// The first poll happens one interval after the call. An error from
    /// `describe` ends the wait immediately and is returned unchanged.
    pub async fn wait<F, Fut>(&self, mut describe: F) -> Result<(), EngineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S, EngineError>>,
    {
        let started = Instant::now();
        let deadline = time::sleep(self.settings.timeout);
        tokio::pin!(deadline);

        let period = self.settings.poll_interval;
        let mut ticker = time::interval_at(started + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            resource = %self.resource,
            operation = %self.operation,
            timeout = ?self.settings.timeout,
            "waiting for operation to complete"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut deadline => return Err(self.timed_out(started)),
                _ = ticker.tick() => {
                    let status = tokio::select! {
                        biased;
                        _ = &mut deadline => return Err(self.timed_out(started)),
                        status = describe() => status?,
                    };

                    if status == self.success {
                        info!(
                            resource = %self.resource,
                            operation = %self.operation,
                            elapsed = ?started.elapsed(),
                            "operation succeeded"
                        );
                        return Ok(());
                    }
                    if self.failure.contains(&status) {
                        warn!(
                            resource = %self.resource,
                            operation = %self.operation,
                            status = %status,
                            "operation reached a failure status"
                        );
                        return Err(EngineError::OperationFailed {
                            resource: self.resource.clone(),
                            operation: self.operation.clone(),
                            status: status.to_string(),
                        });
                    }
                    debug!(resource = %self.resource, status = %status, "operation still pending");
                }
            }
        }
    }

    fn timed_out(&self, started: Instant) -> EngineError {
        EngineError::OperationTimeout {
            resource: self.resource.clone(),
            elapsed: started.elapsed(),
        }
    }
}
