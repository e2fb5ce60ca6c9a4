//! The step worker thread and the guarded single-step routine.
//!
//! # Failure policy
//!
//! A step that returns an error or panics is logged at `error` level and
//! otherwise treated like a successful one: the tick counter advances, the
//! waiting driver is released, and the worker goes back to waiting.  The
//! engine lock is held for the whole step and the panic is caught inside the
//! lock scope, so the mutex is never poisoned by a failed step and readers
//! only ever see fully pre-step or fully post-step state.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use ps_core::{Tick, TickCounter};
use ps_engine::SimulationEngine;

use crate::{BridgeError, BridgeResult, TickSynchronizer};

/// Run one step under the engine lock, contain any failure, and count it.
///
/// Returns the updated completed-step count.
pub fn run_guarded_step<E: SimulationEngine + ?Sized>(
    engine:  &Mutex<E>,
    counter: &TickCounter,
) -> Tick {
    {
        let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
        match panic::catch_unwind(AssertUnwindSafe(|| engine.step())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(tick = %counter.get(), error = %e, "step failed"),
            Err(payload) => {
                error!(tick = %counter.get(), panic = panic_message(&*payload), "step panicked");
            }
        }
    }
    counter.increment()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

/// Background thread that steps the engine once per synchronizer request.
pub struct StepWorker {
    handle: Option<JoinHandle<()>>,
}

impl StepWorker {
    /// Spawn the worker.  It runs until `sync` is disconnected.
    pub fn spawn<E: SimulationEngine + 'static>(
        engine:  Arc<Mutex<E>>,
        sync:    Arc<TickSynchronizer>,
        counter: Arc<TickCounter>,
    ) -> BridgeResult<Self> {
        let handle = thread::Builder::new()
            .name("ps-step-worker".to_owned())
            .spawn(move || {
                info!("step worker started");
                while sync.wait_for_request().is_some() {
                    let tick = run_guarded_step(&*engine, &counter);
                    sync.complete(tick);
                }
                info!(tick = %counter.get(), "step worker stopped");
            })
            .map_err(BridgeError::Spawn)?;
        Ok(Self { handle: Some(handle) })
    }

    /// `true` once the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the thread to exit.  Disconnect the synchronizer first or
    /// this blocks forever.
    pub fn join(mut self) -> BridgeResult<()> {
        match self.handle.take() {
            Some(h) => h.join().map_err(|_| BridgeError::WorkerPanicked),
            None => Ok(()),
        }
    }
}
