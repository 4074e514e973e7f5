//! Bounded polling
//!
//! Every readiness check in the suite (visibility, enabled state,
//! pointer-events, page loaded) goes through [`poll_until`].

use crate::error::{E2eError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Run `probe` every `interval` until it reports `true` or `timeout` elapses.
///
/// The probe always runs at least once. `ElementNotFound` from the probe
/// counts as "not yet"; any other error is returned immediately.
pub async fn poll_until<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    loop {
        match probe().await {
            Ok(true) => return Ok(()),
            Ok(false) | Err(E2eError::ElementNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(E2eError::Timeout {
                what: what.to_string(),
                elapsed,
            });
        }
        tokio::time::sleep(interval.min(timeout - elapsed)).await;
    }
}

/// Like [`poll_until`] but a timeout is only logged.
///
/// Used for spinners and other transient overlays where a stuck indicator
/// should not fail the scenario by itself.
pub async fn poll_until_or_warn<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    probe: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    match poll_until(what, timeout, interval, probe).await {
        Err(E2eError::Timeout { what, elapsed }) => {
            log::warn!("Gave up waiting for {} after {:?}", what, elapsed);
            Ok(())
        }
        other => other,
    }
}
