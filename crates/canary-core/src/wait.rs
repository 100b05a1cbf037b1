use crate::page::{Page, ReadyCondition};
use crate::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Evaluate `probe` every `interval` until it returns `true` or `timeout` elapses.
///
/// Returns `Ok(true)` when the probe held, `Ok(false)` on timeout. Probe errors
/// end the wait immediately. A probe that never resolves is cut off at the
/// deadline, so the wait is always bounded.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match tokio::time::timeout_at(deadline, probe()).await {
            Ok(Ok(true)) => return Ok(true),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Ok(false),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Suspend until `condition` holds on `page`. `Ok(false)` means the timeout elapsed.
pub async fn wait_for_condition(
    page: &dyn Page,
    condition: ReadyCondition,
    timeout: Duration,
    interval: Duration,
) -> Result<bool> {
    match condition {
        ReadyCondition::NetworkIdle { quiet } => {
            poll_until(timeout, interval, || {
                let activity = page.network_activity();
                let idle = activity.is_idle_for(quiet, std::time::Instant::now());
                tracing::trace!(in_flight = activity.in_flight, idle, "Network activity");
                async move { Ok(idle) }
            })
            .await
        }
    }
}
