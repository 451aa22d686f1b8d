//! Bounded readiness polling.
use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::cancel::pause;
use crate::error::ReconcileError;

/// Result of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    /// Condition held on the given attempt (1-based).
    Ready { attempt: u32 },
    /// Every attempt ran and the condition never held.
    Exhausted,
}

/// Evaluate `probe` up to `attempts` times with `delay` between evaluations.
///
/// Returns as soon as a probe reports `true`. A probe error ends the poll immediately.
/// There is no delay after the last attempt.
pub(crate) async fn poll_until<F, Fut>(
    attempts: u32,
    delay: Duration,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<PollOutcome, ReconcileError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<bool, ReconcileError>>,
{
    for attempt in 1..=attempts {
        if probe(attempt).await? {
            return Ok(PollOutcome::Ready { attempt });
        }
        trace!(attempt, attempts, "condition not met yet");
        if attempt < attempts {
            pause(cancel, delay).await?;
        }
    }
    Ok(PollOutcome::Exhausted)
}
