//! `PrecomputedPathQueue` — the route an agent is currently following.
//!
//! # Consumption rule
//!
//! [`remove_first`](PrecomputedPathQueue::remove_first) drops the head while
//! two or more waypoints remain, and clears the whole queue when exactly one
//! remains.  The size therefore goes `… → 2 → 1 → 0`, and the final target
//! stays visible through [`first`](PrecomputedPathQueue::first) until the
//! agent explicitly consumes it.

use std::collections::VecDeque;

use ps_core::CrossingId;
use ps_grid::GridPath;

use crate::{BehaviorState, Waypoint};

/// Ordered waypoints plus the behaviour that applies while following them and
/// the crossings the route connects.
#[derive(Clone, Debug, PartialEq)]
pub struct PrecomputedPathQueue {
    waypoints: VecDeque<Waypoint>,
    behavior:  BehaviorState,
    entrance:  CrossingId,
    exit:      CrossingId,
}

impl PrecomputedPathQueue {
    /// An empty queue for a route from `entrance` to `exit`.
    pub fn new(behavior: BehaviorState, entrance: CrossingId, exit: CrossingId) -> Self {
        Self {
            waypoints: VecDeque::new(),
            behavior,
            entrance,
            exit,
        }
    }

    /// Queue over `waypoints`, in traversal order.
    pub fn with_waypoints(
        waypoints: impl IntoIterator<Item = Waypoint>,
        behavior:  BehaviorState,
        entrance:  CrossingId,
        exit:      CrossingId,
    ) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            behavior,
            entrance,
            exit,
        }
    }

    /// Build a queue from an A* result.
    ///
    /// `GridPath` lists positions goal-first; the queue holds them in
    /// traversal order (first step first, goal last) with ids numbered from 1.
    pub fn from_path(
        path:     GridPath,
        behavior: BehaviorState,
        entrance: CrossingId,
        exit:     CrossingId,
    ) -> Self {
        let waypoints = path
            .into_start_to_goal()
            .into_iter()
            .zip(1u32..)
            .map(|(pos, id)| Waypoint::at(pos, id));
        Self::with_waypoints(waypoints, behavior, entrance, exit)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn behavior(&self) -> BehaviorState {
        self.behavior
    }

    pub fn entrance(&self) -> CrossingId {
        self.entrance
    }

    pub fn exit(&self) -> CrossingId {
        self.exit
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Next waypoint to reach.
    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.front()
    }

    /// Final waypoint of the route.
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.waypoints.iter()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append a waypoint at the end of the route.
    pub fn push_back(&mut self, waypoint: Waypoint) {
        self.waypoints.push_back(waypoint);
    }

    /// Consume the head waypoint.
    ///
    /// With two or more waypoints the head is dropped; with exactly one the
    /// queue is cleared.  No-op on an empty queue.
    pub fn remove_first(&mut self) {
        if self.waypoints.len() >= 2 {
            self.waypoints.pop_front();
        } else {
            self.waypoints.clear();
        }
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}

impl<'a> IntoIterator for &'a PrecomputedPathQueue {
    type Item = &'a Waypoint;
    type IntoIter = std::collections::vec_deque::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
