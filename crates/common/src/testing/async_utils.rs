//! Async testing utilities
//!
//! Helpers for observing state that another task is about to change, such as
//! waiting until a refresh has queued the expected number of callers.

#![allow(clippy::missing_panics_doc)]

use std::future::Future;
use std::time::Duration;

/// Poll an async condition until it returns true or times out
///
/// # Examples
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use chatrizz_common::testing::poll_until;
///
/// # async fn demo() {
/// let flag = Arc::new(AtomicBool::new(false));
/// let flag_clone = flag.clone();
///
/// tokio::spawn(async move {
///     tokio::time::sleep(Duration::from_millis(50)).await;
///     flag_clone.store(true, Ordering::SeqCst);
/// });
///
/// let result = poll_until(Duration::from_secs(1), Duration::from_millis(10), || async {
///     flag.load(Ordering::SeqCst)
/// })
/// .await;
///
/// assert!(result);
/// # }
/// ```
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        if condition().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }

    condition().await
}

/// Assert that a synchronous condition becomes true within `timeout`.
pub async fn wait_for(timeout: Duration, what: &str, mut condition: impl FnMut() -> bool) {
    let reached =
        poll_until(timeout, Duration::from_millis(5), || std::future::ready(condition())).await;
    assert!(reached, "timed out after {timeout:?} waiting for {what}");
}
