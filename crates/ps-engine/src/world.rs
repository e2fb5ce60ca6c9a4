//! State and phase logic shared by both engine implementations.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use ps_core::{AgentId, AgentKind, CrossingId, Point2, SimConfig, SimRng, Tick};
use ps_route::{BehaviorState, PrecomputedPathQueue, RouteLibrary};

use crate::{
    Agent, AgentStore, Departure, EngineError, EngineResult, EngineStats, Environment,
    ExternalAgent, MotionModel,
};

pub(crate) struct World<M: MotionModel> {
    pub config:  SimConfig,
    pub env:     Environment,
    pub agents:  AgentStore,
    pub routes:  RouteLibrary,
    pub motion:  M,
    pub rng:     SimRng,
    pub now:     Tick,
    /// Departures drawn but not yet admitted, oldest first.
    waiting:     VecDeque<Departure>,
    /// Velocities from the last `compute_next_actions`, ascending id order.
    actions:     Vec<(AgentId, Point2)>,
    /// External reports awaiting the next update phase.
    pending:     Vec<ExternalAgent>,
    stats:       EngineStats,
}

impl<M: MotionModel> World<M> {
    pub fn new(config: SimConfig, env: Environment, routes: RouteLibrary, motion: M) -> Self {
        Self {
            rng:     SimRng::new(config.seed),
            config,
            env,
            agents:  AgentStore::new(),
            routes,
            motion,
            now:     Tick::ZERO,
            waiting: VecDeque::new(),
            actions: Vec::new(),
            pending: Vec::new(),
            stats:   EngineStats::default(),
        }
    }

    // ── ① Departures ──────────────────────────────────────────────────────

    pub fn generate_departures(&mut self) -> EngineResult<()> {
        for source in &self.config.departures {
            if self.rng.gen_bool(source.probability) {
                self.waiting.push_back(Departure {
                    entrance:  source.entrance,
                    kind:      source.kind,
                    requested: self.now,
                });
            }
        }
        Ok(())
    }

    // ── ② Admission ───────────────────────────────────────────────────────

    pub fn admit_waiting_agents(&mut self) -> EngineResult<()> {
        while self.agents.len() < self.config.max_agents {
            let Some(departure) = self.waiting.pop_front() else {
                break;
            };
            match self.admit(&departure) {
                Ok(id) => {
                    self.stats.spawned += 1;
                    debug!(agent = %id, entrance = %departure.entrance, "admitted agent");
                }
                Err(e) => {
                    self.stats.dropped += 1;
                    warn!(entrance = %departure.entrance, error = %e, "dropped departure");
                }
            }
        }
        Ok(())
    }

    fn admit(&mut self, departure: &Departure) -> EngineResult<AgentId> {
        let exit = self
            .random_exit_crossing(Some(departure.entrance))
            .ok_or(EngineError::NoCrossings)?;
        let entrance = *self.env.crossing(departure.entrance)?;

        let queue = match self.routes.route(departure.entrance, exit) {
            Some(stored) => stored.clone(),
            None => PrecomputedPathQueue::from_path(
                self.env.plan(entrance.position, exit)?,
                BehaviorState::Move,
                departure.entrance,
                exit,
            ),
        };

        let identifier = format!("{}-{}", departure.kind, self.agents.peek_next_id().0);
        let agent = Agent::spawned(identifier, departure.kind, entrance.position, queue, self.now);
        self.agents.add(agent)
    }

    // ── ③ Next actions ────────────────────────────────────────────────────

    pub fn compute_next_actions(&mut self) -> EngineResult<()> {
        let dt = self.config.tick_length.as_secs_f32();
        let config = &self.config;
        let motion = &self.motion;
        let active: Vec<&Agent> = self.agents.iter().filter(|a| a.is_active()).collect();

        #[cfg(not(feature = "parallel"))]
        let actions: Vec<(AgentId, Point2)> = active
            .iter()
            .map(|a| (a.id, motion.desired_velocity(a, config.speed_of(a.kind), dt)))
            .collect();

        #[cfg(feature = "parallel")]
        let actions: Vec<(AgentId, Point2)> = {
            use rayon::prelude::*;
            active
                .par_iter()
                .map(|a| (a.id, motion.desired_velocity(a, config.speed_of(a.kind), dt)))
                .collect()
        };

        self.actions = actions;
        Ok(())
    }

    // ── ④ Integration and external sync ───────────────────────────────────

    pub fn update_dependent_agent_positions(&mut self) -> EngineResult<()> {
        let dt = self.config.tick_length.as_secs_f32();
        let radius = self.config.arrival_radius;
        let mut first_bad: Option<String> = None;

        for (id, velocity) in std::mem::take(&mut self.actions) {
            // Deleted or handed over since the actions were computed.
            let Some(agent) = self.agents.get_mut(id) else { continue };
            if !agent.is_active() {
                continue;
            }
            if !(velocity.x.is_finite() && velocity.y.is_finite()) {
                agent.velocity = Point2::ORIGIN;
                first_bad.get_or_insert_with(|| agent.identifier.clone());
                continue;
            }

            agent.velocity = velocity;
            agent.position = agent.position + velocity * dt;
            let reached = agent
                .target()
                .is_some_and(|t| agent.position.distance(t) <= radius);
            if reached && let Some(path) = agent.path.as_mut() {
                path.remove_first();
            }
        }

        let finished: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.is_active() && a.route_exhausted())
            .map(|a| a.id)
            .collect();
        for id in finished {
            if let Some(agent) = self.agents.remove(id) {
                self.stats.retired += 1;
                debug!(agent = %agent.identifier, exit = %agent.exit, "agent left the map");
            }
        }

        self.apply_external_reports();
        self.now = self.now.next();

        match first_bad {
            Some(agent) => Err(EngineError::NonFiniteVelocity { agent }),
            None => Ok(()),
        }
    }

    fn apply_external_reports(&mut self) {
        for report in std::mem::take(&mut self.pending) {
            match self.agents.by_identifier_mut(&report.identifier) {
                Some(agent) if !agent.is_active() => agent.apply_external(&report),
                Some(_) => trace!(agent = %report.identifier, "ignored report for engine-owned agent"),
                None => {
                    let agent = Agent::from_external(&report, self.now);
                    if let Err(e) = self.agents.add(agent) {
                        warn!(error = %e, "could not add external agent");
                    }
                }
            }
        }
    }

    // ── Queries and mutations ─────────────────────────────────────────────

    pub fn list_agents(&self, kind: AgentKind) -> Vec<&Agent> {
        self.agents.active_of_kind(kind).collect()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            population: self.agents.len(),
            waiting:    self.waiting.len(),
            ..self.stats
        }
    }

    pub fn add_or_update_external_agent(&mut self, snapshot: ExternalAgent) {
        self.pending.push(snapshot);
    }

    pub fn delete_agent(&mut self, identifier: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|r| r.identifier != identifier);
        let had_pending = self.pending.len() != before;

        let removed = self.agents.remove_by_identifier(identifier).is_some();
        if !removed && !had_pending {
            info!(agent = identifier, "delete_agent: no such agent");
        }
        removed || had_pending
    }

    pub fn random_exit_crossing(&mut self, exclude: Option<CrossingId>) -> Option<CrossingId> {
        let candidates: Vec<CrossingId> = self
            .env
            .crossings()
            .iter()
            .map(|c| c.id)
            .filter(|&id| Some(id) != exclude)
            .collect();
        if candidates.is_empty() {
            return self.env.crossings().first().map(|c| c.id);
        }
        self.rng.choose(&candidates).copied()
    }

    pub fn route_agent_to(&mut self, identifier: &str, exit: CrossingId) -> EngineResult<()> {
        let agent = self
            .agents
            .by_identifier(identifier)
            .ok_or_else(|| EngineError::UnknownAgent(identifier.to_owned()))?;
        let path = self.env.plan(agent.position, exit)?;
        let queue = PrecomputedPathQueue::from_path(path, BehaviorState::Move, agent.entrance, exit);

        if let Some(agent) = self.agents.by_identifier_mut(identifier) {
            agent.path = Some(queue);
            agent.exit = exit;
        }
        Ok(())
    }
}
