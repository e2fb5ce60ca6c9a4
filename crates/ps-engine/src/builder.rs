//! Fluent builder for both engine implementations.

use ps_core::SimConfig;
use ps_route::RouteLibrary;

use crate::world::World;
use crate::{
    EngineError, EngineResult, Environment, HeadlessEngine, MotionModel, VisualEngine,
    WaypointFollower,
};

/// Fluent builder for [`HeadlessEngine`] and [`VisualEngine`].
///
/// # Required inputs
///
/// - [`SimConfig`] (seed, tick length, population cap, speeds, departures)
/// - [`Environment`] (graph, crossings, obstacles)
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default               |
/// |-----------------|-----------------------|
/// | `.routes(lib)`  | empty `RouteLibrary`  |
/// | `.motion(m)`    | `WaypointFollower`    |
///
/// # Example
///
/// ```rust,ignore
/// let env = Environment::new(&grid, [(CrossingId(0), west), (CrossingId(1), east)])?;
/// let mut engine = EngineBuilder::new(config, env)
///     .routes(library)
///     .headless()?;
/// engine.run_ticks(100)?;
/// ```
pub struct EngineBuilder<M: MotionModel = WaypointFollower> {
    config: SimConfig,
    env:    Environment,
    routes: RouteLibrary,
    motion: M,
}

impl EngineBuilder<WaypointFollower> {
    pub fn new(config: SimConfig, env: Environment) -> Self {
        Self {
            config,
            env,
            routes: RouteLibrary::new(),
            motion: WaypointFollower,
        }
    }
}

impl<M: MotionModel> EngineBuilder<M> {
    /// Precomputed routes to reuse instead of searching, keyed by
    /// entrance/exit crossing.
    pub fn routes(mut self, routes: RouteLibrary) -> Self {
        self.routes = routes;
        self
    }

    /// Replace the steering model.
    pub fn motion<N: MotionModel>(self, motion: N) -> EngineBuilder<N> {
        EngineBuilder {
            config: self.config,
            env:    self.env,
            routes: self.routes,
            motion,
        }
    }

    pub fn headless(self) -> EngineResult<HeadlessEngine<M>> {
        Ok(HeadlessEngine::new(self.build_world()?))
    }

    pub fn visual(self) -> EngineResult<VisualEngine<M>> {
        Ok(VisualEngine::new(self.build_world()?))
    }

    /// Validate the configuration against the environment.
    fn build_world(self) -> EngineResult<World<M>> {
        self.config.validate()?;

        for source in &self.config.departures {
            self.env.crossing(source.entrance)?;
        }
        if let Some(bad) = self.routes.iter().find_map(|q| {
            [q.entrance(), q.exit()]
                .into_iter()
                .find(|&c| self.env.crossing(c).is_err())
        }) {
            return Err(EngineError::UnknownCrossing(bad));
        }

        Ok(World::new(self.config, self.env, self.routes, self.motion))
    }
}
