//! `VisualEngine` — stepped from a presentation loop.
//!
//! # Frame pacing
//!
//! The presentation layer calls [`VisualEngine::on_frame`] once per rendered
//! frame with the wall time since the previous frame.  Elapsed time
//! accumulates; each whole tick length in the accumulator runs one step (in
//! the same order as the headless engine) and hands the post-step state to
//! a [`FrameSink`].  At most `max_steps_per_frame` steps run per frame; any
//! backlog beyond that is discarded so a slow frame cannot snowball.
//!
//! Step failures are logged and the frame carries on, exactly as the bridge
//! worker does for the headless engine.

use std::time::Duration;

use tracing::{debug, error};

use ps_core::{AgentKind, CrossingId, Tick, TickLength};

use crate::world::World;
use crate::{
    Agent, Crossing, EngineResult, EngineStats, ExternalAgent, MotionModel, SimulationEngine,
    StaticObstacle, WaypointFollower,
};

/// Default cap on catch-up steps per frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 4;

// ── FrameSink ─────────────────────────────────────────────────────────────────

/// Receives the state to draw.
///
/// Both methods have no-op defaults so implementors only override what they
/// need.
pub trait FrameSink {
    /// Called after each step with every active agent, ascending id order.
    fn on_step(&mut self, _tick: Tick, _agents: &[&Agent]) {}

    /// Called once per frame after all of its steps.
    fn on_frame_end(&mut self, _steps: u32) {}
}

/// A [`FrameSink`] that draws nothing.
pub struct NoopSink;

impl FrameSink for NoopSink {}

// ── VisualEngine ──────────────────────────────────────────────────────────────

/// Engine driven by a presentation loop.  Create via
/// [`EngineBuilder::visual`](crate::EngineBuilder::visual).
pub struct VisualEngine<M: MotionModel = WaypointFollower> {
    world:               World<M>,
    accumulator:         Duration,
    max_steps_per_frame: u32,
}

impl<M: MotionModel> VisualEngine<M> {
    pub(crate) fn new(world: World<M>) -> Self {
        Self {
            world,
            accumulator:         Duration::ZERO,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
        }
    }

    /// Change the catch-up cap (minimum 1).
    pub fn with_max_steps_per_frame(mut self, max: u32) -> Self {
        self.max_steps_per_frame = max.max(1);
        self
    }

    /// Time carried over to the next frame.
    pub fn backlog(&self) -> Duration {
        self.accumulator
    }

    /// Advance by `elapsed` wall time; returns the number of steps run.
    pub fn on_frame(&mut self, elapsed: Duration, sink: &mut dyn FrameSink) -> u32 {
        let tick = self.world.config.tick_length.as_duration();
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= tick && steps < self.max_steps_per_frame {
            self.accumulator -= tick;
            if let Err(e) = self.step() {
                error!(tick = %self.world.now, error = %e, "step failed");
            }
            steps += 1;

            let agents: Vec<&Agent> = self.world.agents.iter().filter(|a| a.is_active()).collect();
            sink.on_step(self.world.now, &agents);
        }

        if self.accumulator >= tick {
            debug!(backlog = ?self.accumulator, "frame too slow; dropping backlog");
            self.accumulator = Duration::ZERO;
        }
        sink.on_frame_end(steps);
        steps
    }
}

impl<M: MotionModel> SimulationEngine for VisualEngine<M> {
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
