//! `HeadlessEngine` — no presentation, stepped on demand.
//!
//! The bridge moves this engine behind a mutex and steps it from a worker
//! thread, one step per `advance()`.  It can also be stepped directly, which
//! is what the tests and batch runs do.

use ps_core::{AgentKind, CrossingId, Tick, TickLength};

use crate::world::World;
use crate::{
    Agent, Crossing, EngineResult, EngineStats, ExternalAgent, MotionModel, SimulationEngine,
    StaticObstacle, WaypointFollower,
};

/// Engine without a presentation loop.  Create via
/// [`EngineBuilder::headless`](crate::EngineBuilder::headless).
pub struct HeadlessEngine<M: MotionModel = WaypointFollower> {
    world: World<M>,
}

impl<M: MotionModel> HeadlessEngine<M> {
    pub(crate) fn new(world: World<M>) -> Self {
        Self { world }
    }

    /// Run exactly `n` steps, stopping at the first failure.
    pub fn run_ticks(&mut self, n: u64) -> EngineResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Every agent in the store, including externally-owned ones.
    pub fn all_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.world.agents.iter()
    }

    pub fn motion(&self) -> &M {
        &self.world.motion
    }
}

impl<M: MotionModel> SimulationEngine for HeadlessEngine<M> {
    fn generate_departures(&mut self) -> EngineResult<()> {
        self.world.generate_departures()
    }

    fn admit_waiting_agents(&mut self) -> EngineResult<()> {
        self.world.admit_waiting_agents()
    }

    fn compute_next_actions(&mut self) -> EngineResult<()> {
        self.world.compute_next_actions()
    }

    fn update_dependent_agent_positions(&mut self) -> EngineResult<()> {
        self.world.update_dependent_agent_positions()
    }

    fn current_tick(&self) -> Tick {
        self.world.now
    }

    fn tick_length(&self) -> TickLength {
        self.world.config.tick_length
    }

    fn list_agents(&self, kind: AgentKind) -> Vec<&Agent> {
        self.world.list_agents(kind)
    }

    fn list_static_obstacles(&self) -> &[StaticObstacle] {
        self.world.env.obstacles()
    }

    fn crossings(&self) -> &[Crossing] {
        self.world.env.crossings()
    }

    fn stats(&self) -> EngineStats {
        self.world.stats()
    }

    fn add_or_update_external_agent(&mut self, snapshot: ExternalAgent) {
        self.world.add_or_update_external_agent(snapshot);
    }

    fn delete_agent(&mut self, identifier: &str) -> bool {
        self.world.delete_agent(identifier)
    }

    fn agent_by_identifier(&mut self, identifier: &str) -> Option<&mut Agent> {
        self.world.agents.by_identifier_mut(identifier)
    }

    fn random_exit_crossing(&mut self, exclude: Option<CrossingId>) -> Option<CrossingId> {
        self.world.random_exit_crossing(exclude)
    }

    fn route_agent_to(&mut self, identifier: &str, exit: CrossingId) -> EngineResult<()> {
        self.world.route_agent_to(identifier, exit)
    }
}
