//! The static world agents move through.
//!
//! An [`Environment`] bundles the walkable graph, the A* planner, the
//! entrance/exit crossings, and the static obstacles derived from blocked
//! cells.  It is built once and never mutated.
//!
//! # Crossings
//!
//! Declared crossing positions are snapped onto the graph: a position on a
//! walkable cell keeps that cell's node, anything else (a door drawn on a
//! wall, a point just outside the map) moves to the nearest walkable node.
//!
//! # Obstacles
//!
//! Each horizontal run of blocked cells in a row becomes one axis-aligned
//! [`StaticObstacle`], numbered row-major.

use ps_core::{CrossingId, NodeId, ObstacleId, Point2};
use ps_grid::{Cell, GraphBuilder, GridGraph, GridPath, OccupancyGrid, PathFinder};

use crate::{EngineError, EngineResult};

// ── Crossing ──────────────────────────────────────────────────────────────────

/// A map-boundary point where agents enter or leave.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Crossing {
    pub id:       CrossingId,
    /// Snapped onto `node`'s position.
    pub position: Point2,
    pub node:     NodeId,
}

// ── StaticObstacle ────────────────────────────────────────────────────────────

/// Axis-aligned blocked region, `min` inclusive, `max` exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StaticObstacle {
    pub id:  ObstacleId,
    pub min: Point2,
    pub max: Point2,
}

impl StaticObstacle {
    pub fn center(&self) -> Point2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

pub struct Environment {
    graph:     GridGraph,
    finder:    PathFinder,
    crossings: Vec<Crossing>,
    obstacles: Vec<StaticObstacle>,
}

impl Environment {
    /// Build the environment for `grid` with the given crossings.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyGraph`] if no cell is walkable.
    /// - [`EngineError::NoCrossings`] if `crossings` is empty.
    /// - [`EngineError::DuplicateCrossing`] if an id repeats.
    pub fn new(
        grid:      &OccupancyGrid,
        crossings: impl IntoIterator<Item = (CrossingId, Point2)>,
    ) -> EngineResult<Self> {
        let graph = GraphBuilder::new(grid).build();
        if graph.is_empty() {
            return Err(EngineError::EmptyGraph);
        }

        let mut snapped: Vec<Crossing> = Vec::new();
        for (id, pos) in crossings {
            if snapped.iter().any(|c| c.id == id) {
                return Err(EngineError::DuplicateCrossing(id));
            }
            let node = graph
                .node_at(pos)
                .or_else(|| graph.nearest_node(pos))
                .ok_or(EngineError::EmptyGraph)?;
            snapped.push(Crossing { id, position: graph.position(node), node });
        }
        if snapped.is_empty() {
            return Err(EngineError::NoCrossings);
        }

        Ok(Self {
            obstacles: blocked_runs(grid),
            graph,
            finder:    PathFinder::new(),
            crossings: snapped,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn crossing(&self, id: CrossingId) -> EngineResult<&Crossing> {
        self.crossings
            .iter()
            .find(|c| c.id == id)
            .ok_or(EngineError::UnknownCrossing(id))
    }

    pub fn obstacles(&self) -> &[StaticObstacle] {
        &self.obstacles
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Move `pos` onto the walkable graph if it is not already on it.
    pub fn snap(&self, pos: Point2) -> Point2 {
        match self.graph.node_at(pos) {
            Some(_) => pos,
            None => self
                .graph
                .nearest_node(pos)
                .map_or(pos, |n| self.graph.position(n)),
        }
    }

    /// Shortest route from `from` to crossing `exit`.
    ///
    /// `from` is snapped onto the graph first, so agents standing on a
    /// blocked cell (e.g. external agents reported mid-obstacle) still get a
    /// route.  The result is goal-first, as returned by [`PathFinder`].
    pub fn plan(&self, from: Point2, exit: CrossingId) -> EngineResult<GridPath> {
        let goal = self.crossing(exit)?.position;
        let path = self.finder.find_path(&self.graph, self.snap(from), goal)?;
        Ok(path)
    }
}

fn blocked_runs(grid: &OccupancyGrid) -> Vec<StaticObstacle> {
    let cs = grid.cell_size();
    let mut out = Vec::new();
    for row in 0..grid.rows() {
        let mut col = 0;
        while col < grid.cols() {
            if grid.is_walkable(Cell::new(row, col)) {
                col += 1;
                continue;
            }
            let start = col;
            while col < grid.cols() && !grid.is_walkable(Cell::new(row, col)) {
                col += 1;
            }
            let min = grid.cell_position(Cell::new(row, start));
            out.push(StaticObstacle {
                id:  ObstacleId::from_index(out.len()),
                min,
                max: Point2::new(col as f32 * cs, min.y + cs),
            });
        }
    }
    out
}
