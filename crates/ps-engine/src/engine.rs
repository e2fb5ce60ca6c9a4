//! The `SimulationEngine` trait — the capability set the bridge drives.

use ps_core::{AgentKind, CrossingId, Tick, TickLength};

use crate::{Agent, Crossing, EngineResult, EngineStats, ExternalAgent, StaticObstacle};

/// A steppable microsimulation.
///
/// # Step order
///
/// [`step`](Self::step) runs the four phases in this fixed order, and every
/// implementation must keep it:
///
/// ```text
/// ① generate_departures               draw new departures from each source
/// ② admit_waiting_agents              turn waiting departures into agents
/// ③ compute_next_actions              desired velocity per active agent
/// ④ update_dependent_agent_positions  integrate, consume waypoints, retire,
///                                     mirror externally-owned agents
/// ```
///
/// # Implementations
///
/// [`HeadlessEngine`](crate::HeadlessEngine) is stepped by a worker thread
/// through the bridge; [`VisualEngine`](crate::VisualEngine) is stepped by a
/// presentation loop.  Both answer queries identically, so callers depend
/// only on this trait.
pub trait SimulationEngine: Send {
    // ── Phases ────────────────────────────────────────────────────────────

    fn generate_departures(&mut self) -> EngineResult<()>;

    fn admit_waiting_agents(&mut self) -> EngineResult<()>;

    fn compute_next_actions(&mut self) -> EngineResult<()>;

    fn update_dependent_agent_positions(&mut self) -> EngineResult<()>;

    /// Run one full step.  Stops at the first failing phase.
    fn step(&mut self) -> EngineResult<()> {
        self.generate_departures()?;
        self.admit_waiting_agents()?;
        self.compute_next_actions()?;
        self.update_dependent_agent_positions()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Number of steps completed so far.
    fn current_tick(&self) -> Tick;

    fn tick_length(&self) -> TickLength;

    /// Active agents of `kind`, in ascending id order.  Externally-owned
    /// agents are excluded.
    fn list_agents(&self, kind: AgentKind) -> Vec<&Agent>;

    fn list_static_obstacles(&self) -> &[StaticObstacle];

    fn crossings(&self) -> &[Crossing];

    fn stats(&self) -> EngineStats;

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Report the state of an agent moved by the external framework.
    ///
    /// Buffered and applied during the next
    /// `update_dependent_agent_positions`: unknown identifiers become new
    /// externally-owned agents, known externally-owned agents have their
    /// position and velocity overwritten, and reports for agents this engine
    /// currently moves are ignored.
    fn add_or_update_external_agent(&mut self, snapshot: ExternalAgent);

    /// Remove an agent (and any buffered report for it).  Returns `false`,
    /// with an info log, when the identifier is unknown.
    fn delete_agent(&mut self, identifier: &str) -> bool;

    fn agent_by_identifier(&mut self, identifier: &str) -> Option<&mut Agent>;

    /// Uniformly chosen crossing other than `exclude`.  Falls back to
    /// `exclude` itself when it is the only crossing.
    fn random_exit_crossing(&mut self, exclude: Option<CrossingId>) -> Option<CrossingId>;

    /// Plan a route from the agent's current position to `exit` and make it
    /// the agent's path.
    fn route_agent_to(&mut self, identifier: &str, exit: CrossingId) -> EngineResult<()>;
}
