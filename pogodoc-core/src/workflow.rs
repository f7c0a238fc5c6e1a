//! Step barrier shared by the template and render workflows.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::{PogodocError, WorkflowStep};

/// Runs one workflow step under `cancel`.
///
/// `op` is only invoked if the token has not fired yet, so a cancelled
/// workflow never issues the step's request. The in-flight future is raced
/// against the token. Failures come back tagged with `step`.
pub(crate) async fn run_step<T, F, Fut>(
    cancel: &CancellationToken,
    step: WorkflowStep,
    op: F,
) -> Result<T, PogodocError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, PogodocError>>,
{
    if cancel.is_cancelled() {
        debug!(%step, "Cancelled before step started");
        return Err(PogodocError::Cancelled.at(step));
    }
    debug!(%step, "Starting workflow step");

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PogodocError::Cancelled),
        res = op() => res,
    };

    outcome.map_err(|e| {
        error!(%step, error = %e, "Workflow step failed");
        e.at(step)
    })
}

/// Sleeps for `duration` unless `cancel` fires first.
pub(crate) async fn pause(
    cancel: &CancellationToken,
    duration: Duration,
) -> Result<(), PogodocError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PogodocError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
