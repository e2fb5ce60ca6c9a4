//! `Bridge` — the facade the host framework drives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use ps_core::{AgentKind, CrossingId, Tick, TickCounter};
use ps_engine::{ExternalAgent, SimulationEngine};

use crate::worker::run_guarded_step;
use crate::{
    AdvanceOutcome, BridgeResult, OwnershipCoordinator, Phase, Publication, PublicationLedger,
    StepWorker, TickEvent, TickEventKind, TickSynchronizer,
};

enum Mode {
    /// A [`StepWorker`] steps the engine; `advance()` waits with a timeout.
    Threaded(StepWorker),
    /// The calling thread steps the engine inside `advance()`.
    Interactive,
}

/// Owns a shared engine and exposes the calls the host framework makes once
/// per tick.
///
/// # Modes
///
/// | Constructor                       | Who steps             | `advance()`                       |
/// |-----------------------------------|-----------------------|-----------------------------------|
/// | [`headless`](Self::headless)       | background worker     | waits at most one tick length     |
/// | [`interactive`](Self::interactive) | the caller's thread   | runs the step inline              |
///
/// Every read and every mutation takes the engine lock, which the step
/// holds from start to finish, so nothing observes a half-applied step.
///
/// Dropping the bridge disconnects the synchronizer but does not wait for an
/// in-flight step.  Use [`shutdown`](Self::shutdown) to also join the worker.
pub struct Bridge<E: SimulationEngine + 'static> {
    engine:    Arc<Mutex<E>>,
    sync:      Arc<TickSynchronizer>,
    counter:   Arc<TickCounter>,
    ownership: OwnershipCoordinator<E>,
    ledger:    PublicationLedger,
    mode:      Mode,
    timeout:   Duration,
}

impl<E: SimulationEngine + 'static> Bridge<E> {
    /// Move `engine` behind the lock and start the step worker.
    pub fn headless(engine: E) -> BridgeResult<Self> {
        let mut bridge = Self::with_mode(engine, Mode::Interactive);
        let worker = StepWorker::spawn(
            Arc::clone(&bridge.engine),
            Arc::clone(&bridge.sync),
            Arc::clone(&bridge.counter),
        )?;
        bridge.mode = Mode::Threaded(worker);
        info!(timeout = ?bridge.timeout, "headless bridge started");
        Ok(bridge)
    }

    /// Bridge without a worker; each `advance()` steps on the caller's thread.
    pub fn interactive(engine: E) -> Self {
        Self::with_mode(engine, Mode::Interactive)
    }

    fn with_mode(engine: E, mode: Mode) -> Self {
        let timeout = engine.tick_length().as_duration();
        let engine = Arc::new(Mutex::new(engine));
        Self {
            ownership: OwnershipCoordinator::new(Arc::clone(&engine)),
            engine,
            sync:      Arc::new(TickSynchronizer::new()),
            counter:   Arc::new(TickCounter::new()),
            ledger:    PublicationLedger::new(),
            mode,
            timeout,
        }
    }

    /// Override how long a headless `advance()` waits.  Defaults to the
    /// engine's tick length.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, E> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Run one step.
    ///
    /// Headless: request a step and wait at most the timeout.  A slow step
    /// keeps running after `TimedOut` is returned and is not requested
    /// twice.  Interactive: step inline and report completion.
    pub fn advance(&self) -> AdvanceOutcome {
        match self.mode {
            Mode::Threaded(_) => self.sync.advance(self.timeout),
            Mode::Interactive => {
                if self.sync.is_shut_down() {
                    return AdvanceOutcome::Disconnected;
                }
                let tick = run_guarded_step(&*self.engine, &self.counter);
                AdvanceOutcome::Completed(TickEvent { kind: TickEventKind::StepCompleted, tick })
            }
        }
    }

    /// Steps completed so far, including steps that failed.
    pub fn tick_count(&self) -> Tick {
        self.counter.get()
    }

    pub fn phase(&self) -> Phase {
        self.sync.phase()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Stop stepping.  Later `advance()` calls return `Disconnected`.
    /// Idempotent; does not wait for a step in progress.
    pub fn disconnect(&self) {
        if !self.sync.is_shut_down() {
            debug!(tick = %self.counter.get(), "bridge disconnecting");
        }
        self.sync.disconnect();
    }

    /// Disconnect and wait for the worker thread to exit.
    pub fn shutdown(mut self) -> BridgeResult<()> {
        self.disconnect();
        match std::mem::replace(&mut self.mode, Mode::Interactive) {
            Mode::Threaded(worker) => worker.join(),
            Mode::Interactive => Ok(()),
        }
    }

    // ── Publication ───────────────────────────────────────────────────────

    /// Every engine-owned agent, plus static obstacles not published before.
    pub fn publish(&mut self) -> Publication {
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        let agents = AgentKind::ALL
            .into_iter()
            .flat_map(|kind| engine.list_agents(kind))
            .map(|a| a.snapshot())
            .collect();
        let obstacles = self.ledger.unpublished(engine.list_static_obstacles());
        Publication { tick: self.counter.get(), agents, obstacles }
    }

    // ── Agent exchange ────────────────────────────────────────────────────

    pub fn add_or_update_external_agent(&self, snapshot: ExternalAgent) {
        self.lock().add_or_update_external_agent(snapshot);
    }

    pub fn delete_agent(&self, identifier: &str) -> bool {
        self.lock().delete_agent(identifier)
    }

    pub fn release_ownership(&self, identifier: &str) -> Option<ExternalAgent> {
        self.ownership.release_ownership(identifier)
    }

    pub fn take_ownership(&self, snapshot: &ExternalAgent) -> BridgeResult<Option<CrossingId>> {
        self.ownership.take_ownership(snapshot)
    }

    pub fn ownership(&self) -> &OwnershipCoordinator<E> {
        &self.ownership
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<E: SimulationEngine + 'static> Drop for Bridge<E> {
    fn drop(&mut self) {
        self.sync.disconnect();
    }
}
