//! A* search over a [`GridGraph`].
//!
//! # Cost model
//!
//! Edge weight = Euclidean distance between the two node positions × the
//! edge's stored cost multiplier.  The heuristic is the straight-line
//! distance to the goal, which never overestimates under that weighting, so
//! returned routes are shortest routes.
//!
//! # Ordering
//!
//! The open set is a binary min-heap keyed by `f = g + h`.  Equal-`f`
//! candidates are expanded in the order they were pushed (each push carries a
//! sequence number), so for a given graph and endpoints the route is always
//! the same.  Closed nodes are never reopened.
//!
//! # Result order
//!
//! [`GridPath`] stores node positions **from the goal back to the start,
//! excluding the start node itself**.  Use [`GridPath::into_start_to_goal`]
//! for traversal order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use ps_core::{NodeId, Point2};

use crate::{GridGraph, PathError};

// ── GridPath ──────────────────────────────────────────────────────────────────

/// A successful search result.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPath {
    /// Goal first, start excluded.
    positions: Vec<Point2>,
    nodes:     Vec<NodeId>,
    /// Sum of edge weights along the route.
    cost:      f32,
}

impl GridPath {
    /// Positions from the goal back to (but not including) the start.
    pub fn positions(&self) -> &[Point2] {
        &self.positions
    }

    /// Node ids in the same goal-to-start order as [`positions`](Self::positions).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` when start and goal fell on the same cell.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Consume the path and return positions in traversal order
    /// (first step after the start, ..., goal).
    pub fn into_start_to_goal(mut self) -> Vec<Point2> {
        self.positions.reverse();
        self.positions
    }
}

// ── Open-set entry ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    f:    f32,
    seq:  u64,
    node: NodeId,
}

impl Ord for OpenEntry {
    /// Reversed so `BinaryHeap` (a max-heap) pops the lowest `f` first, and
    /// among equal `f` the earliest push.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

// ── SearchState ───────────────────────────────────────────────────────────────

/// Per-search scratch buffers, sized to the graph and reset on every call.
#[derive(Default)]
struct SearchState {
    g:      Vec<f32>,
    h:      Vec<f32>,
    pred:   Vec<NodeId>,
    closed: Vec<bool>,
    open:   BinaryHeap<OpenEntry>,
    seq:    u64,
}

impl SearchState {
    fn reset(&mut self, n: usize) {
        self.g.clear();
        self.g.resize(n, f32::INFINITY);
        self.h.clear();
        self.h.resize(n, f32::NAN);
        self.pred.clear();
        self.pred.resize(n, NodeId::INVALID);
        self.closed.clear();
        self.closed.resize(n, false);
        self.open.clear();
        self.seq = 0;
    }

    fn push(&mut self, node: NodeId, f: f32) {
        self.open.push(OpenEntry { f, seq: self.seq, node });
        self.seq += 1;
    }

    /// Heuristic for `node`, computed once per search.
    fn heuristic(&mut self, graph: &GridGraph, node: NodeId, goal: Point2) -> f32 {
        let h = &mut self.h[node.index()];
        if h.is_nan() {
            *h = graph.position(node).distance(goal);
        }
        *h
    }
}

// ── PathFinder ────────────────────────────────────────────────────────────────

/// A* route planner.
///
/// One instance owns one set of search buffers behind a mutex: searches
/// issued through the same `PathFinder` from several threads run one at a
/// time, each seeing freshly reset state.  Use separate instances for
/// parallel searches.
#[derive(Default)]
pub struct PathFinder {
    state: Mutex<SearchState>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a shortest route from `start` to `end` (world coordinates).
    ///
    /// Both points are quantized to their grid cells.  On success the
    /// returned [`GridPath`] lists positions goal → start, excluding the
    /// start.
    ///
    /// # Errors
    ///
    /// - [`PathError::StartBlocked`] / [`PathError::GoalBlocked`] when an
    ///   endpoint is outside the grid or on a blocked cell (no search runs).
    /// - [`PathError::NoRoute`] when the open set is exhausted.
    pub fn find_path(
        &self,
        graph: &GridGraph,
        start: Point2,
        end:   Point2,
    ) -> Result<GridPath, PathError> {
        let Some(from) = graph.node_at(start) else {
            debug!(%start, "path search rejected: start cell not walkable");
            return Err(PathError::StartBlocked(start));
        };
        let Some(to) = graph.node_at(end) else {
            debug!(%end, "path search rejected: goal cell not walkable");
            return Err(PathError::GoalBlocked(end));
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match astar(&mut state, graph, from, to) {
            Some(path) => Ok(path),
            None => {
                debug!(%start, %end, "path search exhausted the open set");
                Err(PathError::NoRoute { from: start, to: end })
            }
        }
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

fn astar(state: &mut SearchState, graph: &GridGraph, from: NodeId, to: NodeId) -> Option<GridPath> {
    let goal = graph.position(to);
    state.reset(graph.node_count());

    state.g[from.index()] = 0.0;
    let h0 = state.heuristic(graph, from, goal);
    state.push(from, h0);

    while let Some(OpenEntry { node, .. }) = state.open.pop() {
        // Stale duplicate of an already-finalized node.
        if state.closed[node.index()] {
            continue;
        }
        if node == to {
            return Some(reconstruct(state, graph, from, to));
        }
        state.closed[node.index()] = true;

        let g_node = state.g[node.index()];
        let pos = graph.position(node);
        for edge in graph.neighbors(node) {
            let next = edge.to;
            if state.closed[next.index()] {
                continue;
            }
            let tentative = g_node + pos.distance(graph.position(next)) * edge.cost;
            if tentative < state.g[next.index()] {
                state.g[next.index()] = tentative;
                state.pred[next.index()] = node;
                let h = state.heuristic(graph, next, goal);
                state.push(next, tentative + h);
            }
        }
    }

    None
}

fn reconstruct(state: &SearchState, graph: &GridGraph, from: NodeId, to: NodeId) -> GridPath {
    let mut nodes = Vec::new();
    let mut cur = to;
    while cur != from {
        nodes.push(cur);
        cur = state.pred[cur.index()];
    }
    GridPath {
        positions: nodes.iter().map(|&n| graph.position(n)).collect(),
        nodes,
        cost:      state.g[to.index()],
    }
}
