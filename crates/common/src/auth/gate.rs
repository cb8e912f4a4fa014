//! Single-flight gate for credential refresh.
//!
//! The first caller that finds the gate open becomes the leader and receives a
//! [`RefreshLease`]. While the lease is alive every other caller is queued in
//! arrival order. The leader finishes by [draining](RefreshLease::drain) the
//! gate, which reopens it and hands back the queue in one atomic step, so a
//! waiter can never be enqueued after the queue was taken.
//!
//! The gate never awaits while its lock is held; callers do their async work
//! between `begin_refresh` and `drain`. Clones share one gate, and a lease
//! holds its own handle, so it can be moved into a spawned task.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

struct GateState<W> {
    refreshing: bool,
    queue: VecDeque<W>,
}

/// Owned refresh coordinator. `W` is whatever a queued caller needs in order
/// to be resumed later, typically a reply channel.
pub struct RefreshGate<W> {
    state: Arc<Mutex<GateState<W>>>,
}

/// Outcome of [`RefreshGate::begin_refresh`].
#[must_use]
pub enum Admission<W> {
    /// No refresh was running. The caller now owns it and gets its waiter back.
    Leader(RefreshLease<W>, W),
    /// A refresh is running; the waiter was queued behind it.
    Queued,
}

impl<W> RefreshGate<W> {
    /// An open gate with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(GateState { refreshing: false, queue: VecDeque::new() })) }
    }

    /// Start a refresh, or queue `waiter` behind the one in progress.
    pub fn begin_refresh(&self, waiter: W) -> Admission<W> {
        let mut state = self.state.lock();
        if state.refreshing {
            state.queue.push_back(waiter);
            debug!(queued = state.queue.len(), "refresh in flight; caller queued");
            Admission::Queued
        } else {
            state.refreshing = true;
            debug!("refresh started");
            Admission::Leader(RefreshLease { gate: self.clone(), drained: false }, waiter)
        }
    }

    /// Queue `waiter` behind the running refresh.
    ///
    /// # Errors
    /// Hands the waiter back when no refresh is running.
    pub fn enqueue(&self, waiter: W) -> Result<(), W> {
        let mut state = self.state.lock();
        if state.refreshing {
            state.queue.push_back(waiter);
            Ok(())
        } else {
            Err(waiter)
        }
    }

    /// Whether a lease is currently outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of waiters behind the running refresh.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    fn take(&self) -> VecDeque<W> {
        let mut state = self.state.lock();
        state.refreshing = false;
        std::mem::take(&mut state.queue)
    }
}

impl<W> Clone for RefreshGate<W> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state) }
    }
}

impl<W> Default for RefreshGate<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for RefreshGate<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RefreshGate")
            .field("refreshing", &state.refreshing)
            .field("queued", &state.queue.len())
            .finish()
    }
}

/// Proof of leadership over the running refresh.
///
/// Dropping the lease without draining reopens the gate and drops every queued
/// waiter, which resolves their reply channels as cancelled.
pub struct RefreshLease<W> {
    gate: RefreshGate<W>,
    drained: bool,
}

impl<W> RefreshLease<W> {
    /// Reopen the gate and take the queued waiters, oldest first.
    pub fn drain(mut self) -> VecDeque<W> {
        self.drained = true;
        let waiters = self.gate.take();
        debug!(waiters = waiters.len(), "refresh finished; gate drained");
        waiters
    }
}

impl<W> Drop for RefreshLease<W> {
    fn drop(&mut self) {
        if !self.drained {
            let abandoned = self.gate.take();
            if !abandoned.is_empty() {
                warn!(waiters = abandoned.len(), "refresh abandoned; cancelling queued callers");
            }
        }
    }
}

impl<W> fmt::Debug for RefreshLease<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshLease").field("drained", &self.drained).finish()
    }
}
