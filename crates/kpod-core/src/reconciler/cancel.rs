//! Cancellable suspension points.
//!
//! Every await inside a reconciler operation goes through one of these helpers so a
//! cancelled token is observed at the next suspension point, not only by the transport.
use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::error::ReconcileError;

/// Await `fut` unless `cancel` fires first.
pub(crate) async fn guarded<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, ReconcileError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ReconcileError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Sleep for `delay` unless `cancel` fires first. A zero delay still checks the token.
pub(crate) async fn pause(cancel: &CancellationToken, delay: Duration) -> Result<(), ReconcileError> {
    if delay.is_zero() {
        return if cancel.is_cancelled() {
            Err(ReconcileError::Cancelled)
        } else {
            Ok(())
        };
    }
    guarded(cancel, tokio::time::sleep(delay)).await
}

/// Child of `parent` that is cancelled automatically after `after`.
///
/// Lets a caller express a deadline with the same token every operation accepts;
/// hitting the deadline surfaces as [`ReconcileError::Cancelled`].
/// Must be called from within a tokio runtime.
pub fn deadline_token(parent: &CancellationToken, after: Duration) -> CancellationToken {
    let child = parent.child_token();
    let timer = child.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(after) => timer.cancel(),
            _ = timer.cancelled() => {}
        }
    });
    child
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        pause(&cancel, Duration::from_secs(5)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn pause_returns_cancelled_promptly() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let res = pause(&cancel, Duration::from_secs(3600)).await;

        assert!(matches!(res, Err(ReconcileError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn zero_pause_still_observes_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            pause(&cancel, Duration::ZERO).await,
            Err(ReconcileError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn guarded_prefers_cancellation_over_ready_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let res = guarded(&cancel, async { 42 }).await;
        assert!(matches!(res, Err(ReconcileError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_token_fires_after_duration() {
        let parent = CancellationToken::new();
        let token = deadline_token(&parent, Duration::from_millis(50));
        assert!(!token.is_cancelled());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(token.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
