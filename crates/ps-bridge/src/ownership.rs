//! Hand-off of individual agents between the engine and the host framework.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use ps_core::CrossingId;
use ps_engine::{Activity, EngineError, ExternalAgent, SimulationEngine};

use crate::{BridgeError, BridgeResult};

/// Flips agents between engine-owned (`Active`) and externally-owned
/// (`NotActive`).
///
/// Takes the engine lock for every call, so a transfer never interleaves
/// with a step.
pub struct OwnershipCoordinator<E> {
    engine: Arc<Mutex<E>>,
}

impl<E> Clone for OwnershipCoordinator<E> {
    fn clone(&self) -> Self {
        Self { engine: Arc::clone(&self.engine) }
    }
}

impl<E: SimulationEngine> OwnershipCoordinator<E> {
    pub fn new(engine: Arc<Mutex<E>>) -> Self {
        Self { engine }
    }

    fn lock(&self) -> MutexGuard<'_, E> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand `identifier` to the external framework and return its current
    /// state.  Calling it again on an already released agent returns the
    /// snapshot unchanged.
    pub fn release_ownership(&self, identifier: &str) -> Option<ExternalAgent> {
        let mut engine = self.lock();
        let Some(agent) = engine.agent_by_identifier(identifier) else {
            info!(identifier, "release_ownership: unknown agent");
            return None;
        };
        agent.activity = Activity::NotActive;
        Some(agent.snapshot())
    }

    /// Take `snapshot.identifier` back from the external framework.
    ///
    /// The agent is moved to the reported position, given a newly drawn exit
    /// (different from its previous one when possible) with a fresh route,
    /// and marked `Active`.  When the drawn exit cannot be reached from the
    /// reported position, the other crossings are tried in order.  Returns
    /// the assigned exit, or `None` when the identifier is unknown or the
    /// agent is already engine-owned.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Unreachable`] when no crossing can be reached.  The
    /// agent then keeps the state it had before the call and stays with the
    /// external framework.
    pub fn take_ownership(&self, snapshot: &ExternalAgent) -> BridgeResult<Option<CrossingId>> {
        let mut engine = self.lock();
        let identifier = snapshot.identifier.as_str();

        let before = match engine.agent_by_identifier(identifier) {
            None => {
                info!(identifier, "take_ownership: unknown agent");
                return Ok(None);
            }
            Some(agent) if agent.is_active() => return Ok(None),
            Some(agent) => {
                let before = agent.clone();
                agent.apply_external(snapshot);
                before
            }
        };

        match assign_exit(&mut *engine, identifier, before.exit) {
            Ok(exit) => {
                if let Some(agent) = engine.agent_by_identifier(identifier) {
                    agent.activity = Activity::Active;
                }
                info!(identifier, exit = %exit, "take_ownership: exit assigned");
                Ok(Some(exit))
            }
            Err(e) => {
                if let Some(agent) = engine.agent_by_identifier(identifier) {
                    *agent = before;
                }
                warn!(identifier, error = %e, "take_ownership: agent left with the external framework");
                Err(e)
            }
        }
    }
}

/// Route `identifier` to a random exit, falling back to the remaining
/// crossings (`previous` last) while planning fails.
fn assign_exit<E: SimulationEngine + ?Sized>(
    engine:     &mut E,
    identifier: &str,
    previous:   CrossingId,
) -> BridgeResult<CrossingId> {
    let known = engine.crossings().iter().any(|c| c.id == previous);
    let drawn = engine
        .random_exit_crossing(known.then_some(previous))
        .ok_or(BridgeError::NoExit)?;

    let mut candidates = vec![drawn];
    candidates.extend(
        engine
            .crossings()
            .iter()
            .map(|c| c.id)
            .filter(|&id| id != drawn && id != previous),
    );
    if known && previous != drawn {
        candidates.push(previous);
    }

    for exit in candidates {
        match engine.route_agent_to(identifier, exit) {
            Ok(()) => return Ok(exit),
            Err(EngineError::Path(e)) => {
                debug!(identifier, exit = %exit, error = %e, "take_ownership: exit unreachable");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(BridgeError::Unreachable(identifier.to_owned()))
}
