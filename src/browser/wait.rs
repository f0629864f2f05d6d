//! Bounded polling waits.
//!
//! Every synchronisation point in the workflow is a wait for a predicate over
//! observable page state (option present, placeholder absent, option marked
//! selected), bounded by a timeout. The probes here are plain async closures
//! so the wait logic itself needs no browser to test.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use crate::error::{HarvestError, Result};

/// Initial poll interval; doubled each miss up to [`MAX_POLL_INTERVAL`].
const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll `probe` until it yields `Some(value)` or `timeout` expires.
///
/// Probe errors propagate immediately; `None` means "condition not yet
/// observed, keep polling". On expiry the returned [`HarvestError::Timeout`]
/// names the condition via `what`.
pub async fn wait_until<T, F, Fut>(what: &str, timeout: Duration, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let start = Instant::now();
    let mut interval = INITIAL_POLL_INTERVAL;

    loop {
        if let Some(value) = probe().await? {
            debug!("condition met after {:?}: {}", start.elapsed(), what);
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(HarvestError::timeout(what, timeout));
        }
        sleep(interval).await;
        interval = (interval * 2).min(MAX_POLL_INTERVAL);
    }
}

/// Two-phase disappearance wait.
///
/// Phase one gives the element up to `confirm_window` to show up at all, so
/// that its disappearance is meaningful rather than a no-op. If it never
/// shows within that window the whole wait is skipped silently: the list
/// loaded too fast for the placeholder to be observed, which is fine.
/// Phase two then waits up to `timeout` for the element to be absent.
///
/// `probe` answers "is the element currently present?".
pub async fn wait_until_gone<F, Fut>(
    what: &str,
    confirm_window: Duration,
    timeout: Duration,
    mut probe: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let appeared = wait_until(what, confirm_window, || {
        let fut = probe();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await;

    match appeared {
        Ok(()) => {}
        Err(e) if e.is_timeout() => {
            debug!("{} never appeared within {:?}, skipping", what, confirm_window);
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    wait_until(&format!("disappearance of {}", what), timeout, || {
        let fut = probe();
        async move { Ok((!fut.await?).then_some(())) }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn resolves_once_condition_holds() {
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_probe = polls.clone();

        let value = wait_until("test condition", Duration::from_secs(5), move || {
            let polls = polls_probe.clone();
            async move {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                Ok((n >= 3).then_some(42))
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert!(polls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn times_out_with_context() {
        let err = wait_until::<(), _, _>(
            "an option that never loads",
            Duration::from_millis(50),
            || async { Ok(None) },
        )
        .await
        .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("an option that never loads"));
    }

    #[tokio::test]
    async fn probe_errors_propagate_immediately() {
        let err = wait_until::<(), _, _>("failing probe", Duration::from_secs(5), || async {
            Err(crate::error::HarvestError::Dom("boom".to_string()))
        })
        .await
        .unwrap_err();

        assert!(!err.is_timeout());
    }

    /// Placeholder present for a few polls, then gone: the wait must only
    /// resolve after the transition.
    #[tokio::test]
    async fn disappearance_waits_for_transition() {
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_probe = polls.clone();

        wait_until_gone(
            "'Loading...' placeholder",
            Duration::from_secs(1),
            Duration::from_secs(5),
            move || {
                let polls = polls_probe.clone();
                async move {
                    let n = polls.fetch_add(1, Ordering::SeqCst);
                    Ok(n < 4)
                }
            },
        )
        .await
        .unwrap();

        // At least one poll must have confirmed presence and one absence.
        assert!(polls.load(Ordering::SeqCst) > 4);
    }

    /// If the placeholder is never observed the confirm phase is skipped
    /// silently rather than reported as a failure.
    #[tokio::test]
    async fn disappearance_skips_when_never_present() {
        wait_until_gone(
            "'Loading...' placeholder",
            Duration::from_millis(50),
            Duration::from_secs(5),
            || async { Ok(false) },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn disappearance_times_out_when_element_sticks() {
        let err = wait_until_gone(
            "'Loading...' placeholder",
            Duration::from_millis(50),
            Duration::from_millis(100),
            || async { Ok(true) },
        )
        .await
        .unwrap_err();

        assert!(err.is_timeout());
    }
}
