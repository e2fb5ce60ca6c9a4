//! Top-level simulation configuration.
//!
//! Loaded from TOML by the application (or built in code for tests) and
//! passed to the engine and bridge constructors.
//!
//! ```toml
//! seed             = 7
//! max_agents       = 200
//! arrival_radius   = 0.4
//! pedestrian_speed = 1.34
//! vehicle_speed    = 8.0
//!
//! [tick_length]
//! value = 100
//! unit  = "milliseconds"
//!
//! [[departures]]
//! entrance    = 0
//! kind        = "pedestrian"
//! probability = 0.25
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AgentKind, CoreError, CoreResult, CrossingId, TickLength};

/// One stochastic source of new agents at an entrance crossing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartureConfig {
    /// Crossing where spawned agents enter the map.
    pub entrance: CrossingId,
    #[serde(default)]
    pub kind: AgentKind,
    /// Chance that one agent departs from this source in a given tick.
    pub probability: f64,
}

/// Simulation configuration shared by the engine and the bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Duration of one tick.  Bounds how long `advance()` waits for a step
    /// and is the motion integration step.
    pub tick_length: TickLength,

    /// Population cap; departures beyond it wait in the admission queue.
    pub max_agents: usize,

    /// Distance (world units) at which a waypoint counts as reached.
    pub arrival_radius: f32,

    /// Cruise speed of pedestrians, world units per second.
    pub pedestrian_speed: f32,

    /// Cruise speed of vehicles, world units per second.
    pub vehicle_speed: f32,

    /// Departure sources drawn once per tick in declaration order.
    pub departures: Vec<DepartureConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:             42,
            tick_length:      TickLength::default(),
            max_agents:       500,
            arrival_radius:   0.5,
            pedestrian_speed: 1.34,
            vehicle_speed:    8.0,
            departures:       Vec::new(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: SimConfig =
            toml::from_str(text).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_length.value == 0 {
            return Err(CoreError::Config("tick_length must be positive".into()));
        }
        if !(self.pedestrian_speed > 0.0 && self.vehicle_speed > 0.0) {
            return Err(CoreError::Config("agent speeds must be positive".into()));
        }
        if !(self.arrival_radius >= 0.0) {
            return Err(CoreError::Config("arrival_radius must be non-negative".into()));
        }
        if let Some(bad) = self
            .departures
            .iter()
            .find(|d| !(0.0..=1.0).contains(&d.probability))
        {
            return Err(CoreError::Config(format!(
                "departure probability {} at {} is outside [0, 1]",
                bad.probability, bad.entrance
            )));
        }
        Ok(())
    }

    /// Cruise speed for `kind`.
    #[inline]
    pub fn speed_of(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Pedestrian => self.pedestrian_speed,
            AgentKind::Vehicle    => self.vehicle_speed,
        }
    }
}
