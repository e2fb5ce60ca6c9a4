//! What the bridge hands to the host framework after each tick.

use rustc_hash::FxHashSet;

use ps_core::{ObstacleId, Tick};
use ps_engine::{ExternalAgent, StaticObstacle};

/// One publication: every engine-owned agent plus the static obstacles the
/// host has not been sent yet.
#[derive(Clone, Debug, Default)]
pub struct Publication {
    pub tick:      Tick,
    pub agents:    Vec<ExternalAgent>,
    pub obstacles: Vec<StaticObstacle>,
}

/// Remembers which static obstacles were already published.
#[derive(Debug, Default)]
pub struct PublicationLedger {
    published: FxHashSet<ObstacleId>,
}

impl PublicationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obstacles from `all` not returned by an earlier call, in input order.
    pub fn unpublished(&mut self, all: &[StaticObstacle]) -> Vec<StaticObstacle> {
        all.iter()
            .filter(|o| self.published.insert(o.id))
            .cloned()
            .collect()
    }

    pub fn published_count(&self) -> usize {
        self.published.len()
    }
}
