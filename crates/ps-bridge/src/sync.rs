//! `TickSynchronizer` — one step per `advance()`, bounded wait.
//!
//! # Protocol
//!
//! ```text
//! driver                                worker
//! ──────                                ──────
//! advance(timeout)                      wait_for_request()  (blocks)
//!   requested += 1, phase = Stepping ─▶   served += 1, returns
//!   wait until completed ≥ target         step the engine
//!        or shutdown or deadline    ◀─  complete(tick)
//!   phase = Idle, return outcome          completed = served, phase = Completed
//! ```
//!
//! Both sides block on the same `Condvar` and re-check their predicate on
//! every wake-up, so spurious wake-ups and missed notifications cannot
//! deadlock either side.  Progress is tracked with monotonic counters rather
//! than a boolean flag, so a completion meant for an earlier, timed-out
//! request is never mistaken for the current one.
//!
//! # Coalescing
//!
//! A request the worker has not yet picked up is not duplicated: if the
//! driver times out while the worker is stalled and calls `advance()` again,
//! both calls wait for the same pending step.  The backlog therefore never
//! exceeds one step.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

use ps_core::Tick;

// ── Public types ──────────────────────────────────────────────────────────────

/// Synchronizer state as seen by the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No `advance()` in progress.
    Idle,
    /// A step was requested and has not completed yet.
    Stepping,
    /// The worker finished a step; the waiting `advance()` has not returned yet.
    Completed,
}

/// What a completion signal reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickEventKind {
    StepCompleted,
    Disconnected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickEvent {
    pub kind: TickEventKind,
    /// Completed-step count when the event was raised.
    pub tick: Tick,
}

/// Result of one `advance()`.  None of these is an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The requested step finished within the timeout.
    Completed(TickEvent),
    /// The timeout elapsed first.  The step may still finish later.
    TimedOut,
    /// The synchronizer was shut down.
    Disconnected,
}

impl AdvanceOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AdvanceOutcome::Completed(_))
    }
}

// ── TickSynchronizer ──────────────────────────────────────────────────────────

#[derive(Debug)]
struct SyncState {
    phase:      Phase,
    /// Step requests issued by the driver.
    requested:  u64,
    /// Requests picked up by the worker.
    served:     u64,
    /// Requests the worker has finished.
    completed:  u64,
    shutdown:   bool,
    last_event: Option<TickEvent>,
}

/// Rendezvous between the driver thread and the step worker.
///
/// Shared via `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct TickSynchronizer {
    state: Mutex<SyncState>,
    cv:    Condvar,
}

impl Default for TickSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSynchronizer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SyncState {
                phase:      Phase::Idle,
                requested:  0,
                served:     0,
                completed:  0,
                shutdown:   false,
                last_event: None,
            }),
            cv:    Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Driver side ───────────────────────────────────────────────────────

    /// Request one step and wait at most `timeout` for it to finish.
    ///
    /// A timeout past the range of `Instant` waits until the step completes
    /// or the synchronizer is disconnected.  Always returns with the phase
    /// back at `Idle`.
    pub fn advance(&self, timeout: Duration) -> AdvanceOutcome {
        let mut st = self.lock();
        if st.shutdown {
            return AdvanceOutcome::Disconnected;
        }
        if st.requested == st.served {
            st.requested += 1;
        }
        let target = st.requested;
        st.phase = Phase::Stepping;
        self.cv.notify_all();

        // `None` when the timeout is too large to represent: wait unbounded.
        let deadline = Instant::now().checked_add(timeout);
        let outcome = loop {
            if st.completed >= target {
                let event = st.last_event.unwrap_or(TickEvent {
                    kind: TickEventKind::StepCompleted,
                    tick: Tick(st.completed),
                });
                break AdvanceOutcome::Completed(event);
            }
            if st.shutdown {
                break AdvanceOutcome::Disconnected;
            }
            st = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        trace!(request = target, "advance timed out");
                        break AdvanceOutcome::TimedOut;
                    }
                    self.cv
                        .wait_timeout(st, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self.cv.wait(st).unwrap_or_else(PoisonError::into_inner),
            };
        };

        st.phase = Phase::Idle;
        outcome
    }

    /// Shut down: wake every waiter and make the worker's next
    /// [`wait_for_request`](Self::wait_for_request) return `None`.
    ///
    /// Does not wait for a step in progress.  Idempotent.
    pub fn disconnect(&self) {
        let mut st = self.lock();
        if !st.shutdown {
            st.shutdown = true;
            st.last_event = Some(TickEvent {
                kind: TickEventKind::Disconnected,
                tick: Tick(st.completed),
            });
        }
        self.cv.notify_all();
    }

    // ── Worker side ───────────────────────────────────────────────────────

    /// Block until a step is requested.  Returns the request number, or
    /// `None` once the synchronizer is shut down.
    pub fn wait_for_request(&self) -> Option<u64> {
        let mut st = self.lock();
        loop {
            if st.shutdown {
                return None;
            }
            if st.requested > st.served {
                st.served += 1;
                return Some(st.served);
            }
            st = self.cv.wait(st).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Signal that the step picked up last has finished, whatever its
    /// result.  `tick` is the updated completed-step count.
    pub fn complete(&self, tick: Tick) {
        let mut st = self.lock();
        st.completed = st.served;
        if st.phase == Phase::Stepping {
            st.phase = Phase::Completed;
        }
        if !st.shutdown {
            st.last_event = Some(TickEvent { kind: TickEventKind::StepCompleted, tick });
        }
        self.cv.notify_all();
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_shut_down(&self) -> bool {
        self.lock().shutdown
    }

    /// Requests issued but not yet picked up by the worker (0 or 1).
    pub fn pending_requests(&self) -> u64 {
        let st = self.lock();
        st.requested - st.served
    }
}
