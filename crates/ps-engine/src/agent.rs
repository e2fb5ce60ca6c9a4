//! Agent state and the snapshot exchanged with the host framework.
//!
//! # Ownership
//!
//! Every agent carries an [`Activity`] flag.  `Active` agents are moved by
//! this engine along their [`PrecomputedPathQueue`].  `NotActive` agents are
//! controlled by the external framework: the engine only mirrors the
//! positions it is sent and leaves them out of publication.

use serde::{Deserialize, Serialize};

use ps_core::{AgentId, AgentKind, CrossingId, Point2, Tick};
use ps_route::PrecomputedPathQueue;

// ── Flags ─────────────────────────────────────────────────────────────────────

/// Who moves the agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activity {
    /// Stepped by this engine.
    #[default]
    Active,
    /// Ownership handed to the external framework.
    NotActive,
}

/// Where the agent was created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentOrigin {
    /// Spawned by a departure source.
    Internal,
    /// First reported by the external framework.
    External,
}

// ── ExternalAgent ─────────────────────────────────────────────────────────────

/// Agent state as exchanged with the external framework.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalAgent {
    /// Stable identifier shared by both sides.
    pub identifier: String,
    #[serde(default)]
    pub kind:       AgentKind,
    pub position:   Point2,
    #[serde(default)]
    pub velocity:   Point2,
    /// Exit crossing, `CrossingId::INVALID` when none is assigned.
    #[serde(default)]
    pub exit:       CrossingId,
}

impl ExternalAgent {
    pub fn new(identifier: impl Into<String>, kind: AgentKind, position: Point2) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            position,
            velocity:   Point2::ORIGIN,
            exit:       CrossingId::INVALID,
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One simulated pedestrian or vehicle.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Internal handle, assigned by the store.
    pub id:         AgentId,
    /// Stable string identifier used by the external framework.
    pub identifier: String,
    pub kind:       AgentKind,
    pub position:   Point2,
    /// Velocity applied during the last step (world units per second).
    pub velocity:   Point2,
    pub activity:   Activity,
    pub origin:     AgentOrigin,
    /// Remaining route, head first.  `None` for agents without a route.
    pub path:       Option<PrecomputedPathQueue>,
    pub entrance:   CrossingId,
    pub exit:       CrossingId,
    /// Tick at which the agent entered the engine.
    pub born:       Tick,
}

impl Agent {
    /// An internally spawned agent standing at its entrance, following `path`.
    pub fn spawned(
        identifier: String,
        kind:       AgentKind,
        position:   Point2,
        path:       PrecomputedPathQueue,
        born:       Tick,
    ) -> Self {
        Self {
            id:         AgentId::INVALID,
            identifier,
            kind,
            position,
            velocity:   Point2::ORIGIN,
            activity:   Activity::Active,
            origin:     AgentOrigin::Internal,
            entrance:   path.entrance(),
            exit:       path.exit(),
            path:       Some(path),
            born,
        }
    }

    /// An agent first reported by the external framework.  It starts
    /// externally owned and without a route.
    pub fn from_external(snapshot: &ExternalAgent, born: Tick) -> Self {
        Self {
            id:         AgentId::INVALID,
            identifier: snapshot.identifier.clone(),
            kind:       snapshot.kind,
            position:   snapshot.position,
            velocity:   snapshot.velocity,
            activity:   Activity::NotActive,
            origin:     AgentOrigin::External,
            path:       None,
            entrance:   CrossingId::INVALID,
            exit:       snapshot.exit,
            born,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.activity == Activity::Active
    }

    /// Next waypoint position, if the agent has one.
    pub fn target(&self) -> Option<Point2> {
        self.path.as_ref()?.first().map(|w| w.position())
    }

    /// `true` when the agent has no waypoints left to reach.
    pub fn route_exhausted(&self) -> bool {
        self.path.as_ref().is_none_or(PrecomputedPathQueue::is_empty)
    }

    /// Overwrite the mirrored kinematic state from an external report.
    pub fn apply_external(&mut self, snapshot: &ExternalAgent) {
        self.position = snapshot.position;
        self.velocity = snapshot.velocity;
    }

    /// Snapshot for the external framework.
    pub fn snapshot(&self) -> ExternalAgent {
        ExternalAgent {
            identifier: self.identifier.clone(),
            kind:       self.kind,
            position:   self.position,
            velocity:   self.velocity,
            exit:       self.exit,
        }
    }
}
