//! Departures waiting for admission, and engine counters.

use ps_core::{AgentKind, CrossingId, Tick};

/// A departure drawn from a source but not yet turned into an agent.
///
/// Departures wait in FIFO order while the population is at
/// `SimConfig::max_agents`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub entrance:  CrossingId,
    pub kind:      AgentKind,
    /// Tick at which the departure was drawn.
    pub requested: Tick,
}

/// Running counters, reported by `SimulationEngine::stats`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Agents admitted from departures.
    pub spawned:    u64,
    /// Departures discarded because no route could be found.
    pub dropped:    u64,
    /// Agents removed after reaching the end of their route.
    pub retired:    u64,
    /// Agents currently in the store (both ownership states).
    pub population: usize,
    /// Departures still waiting for admission.
    pub waiting:    usize,
}
