//! Walkable-cell graph and its builder.
//!
//! # Data layout
//!
//! Nodes live in a flat `Vec<GraphNode>` in insertion (row-major) order; a
//! node's identity is its index, wrapped as a `NodeId`.  Each node owns an
//! ordered adjacency list of `(neighbor, cost)` edges.  A dense
//! `cell → NodeId` table (with `NodeId::INVALID` for blocked cells) makes
//! quantized lookups O(1).
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps world `(x, y)` to the nearest node.  Used to
//! snap points that fall on blocked cells (e.g. a crossing drawn on a wall)
//! onto the walkable graph.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ps_core::{NodeId, Point2};

use crate::{Cell, GridResult, OccupancyGrid};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [x, y]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Nodes and edges ───────────────────────────────────────────────────────────

/// One directed half of an undirected link.  `cost` is a multiplier applied
/// to the Euclidean distance between the two node positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub to:   NodeId,
    pub cost: f32,
}

/// A walkable cell.
#[derive(Clone, Debug)]
pub struct GraphNode {
    /// `(col * cell_size, row * cell_size)`.
    pub position:  Point2,
    /// Neighbours in the order they were linked.
    pub neighbors: Vec<Edge>,
}

// ── GridGraph ─────────────────────────────────────────────────────────────────

/// Immutable 4-connected graph over the walkable cells of an
/// [`OccupancyGrid`].  Create with [`GraphBuilder`].
pub struct GridGraph {
    nodes:       Vec<GraphNode>,
    cell_node:   Vec<NodeId>,
    rows:        usize,
    cols:        usize,
    cell_size:   f32,
    spatial_idx: RTree<NodeEntry>,
}

impl GridGraph {
    /// Convenience: validate `rows` as an occupancy grid and build its graph.
    pub fn from_rows(rows: Vec<Vec<bool>>, cell_size: f32) -> GridResult<Self> {
        let grid = OccupancyGrid::from_rows(rows, cell_size)?;
        Ok(GraphBuilder::new(&grid).build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges (twice the number of undirected links).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    // ── Node access ───────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn position(&self, id: NodeId) -> Point2 {
        self.nodes[id.index()].position
    }

    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        &self.nodes[id.index()].neighbors
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Every directed edge as `(from, to, cost)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f32)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(i, node)| {
            node.neighbors
                .iter()
                .map(move |e| (NodeId::from_index(i), e.to, e.cost))
        })
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Node of the walkable cell `cell`, if any.
    pub fn node_at_cell(&self, cell: Cell) -> Option<NodeId> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        let id = self.cell_node[cell.row * self.cols + cell.col];
        id.is_valid().then_some(id)
    }

    /// Node of the cell containing `pos` (`floor(coord / cell_size)`).
    ///
    /// Returns `None` when `pos` is outside the grid or on a blocked cell.
    pub fn node_at(&self, pos: Point2) -> Option<NodeId> {
        let col = (pos.x / self.cell_size).floor();
        let row = (pos.y / self.cell_size).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        self.node_at_cell(Cell::new(row as usize, col as usize))
    }

    /// Nearest node to `pos` by straight-line distance.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn nearest_node(&self, pos: Point2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Converts an [`OccupancyGrid`] into a [`GridGraph`].
///
/// Cells are visited row-major.  Each walkable cell becomes a node and is
/// linked, with unit cost and in both directions, to its walkable left and
/// upper neighbours.  Right and lower links appear when those cells are
/// visited later, so every undirected edge is added exactly once and the
/// result equals full 4-connectivity.
///
/// # Example
///
/// ```
/// use ps_grid::{GraphBuilder, OccupancyGrid};
///
/// let grid = OccupancyGrid::parse_ascii("..\n.#\n", 1.0).unwrap();
/// let graph = GraphBuilder::new(&grid).build();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 4); // two links, both directions
/// ```
pub struct GraphBuilder<'a> {
    grid:      &'a OccupancyGrid,
    nodes:     Vec<GraphNode>,
    cell_node: Vec<NodeId>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> Self {
        Self {
            grid,
            nodes:     Vec::with_capacity(grid.walkable_count()),
            cell_node: vec![NodeId::INVALID; grid.rows() * grid.cols()],
        }
    }

    /// Consume the builder and produce the graph.
    ///
    /// Time complexity: O(cells) for the scan + O(N log N) for the R-tree
    /// bulk load, where N = walkable cells.
    pub fn build(mut self) -> GridGraph {
        let grid = self.grid;
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = Cell::new(row, col);
                if !grid.is_walkable(cell) {
                    continue;
                }
                let id = self.add_node(cell);
                if col > 0 {
                    self.link_to(id, Cell::new(row, col - 1));
                }
                if row > 0 {
                    self.link_to(id, Cell::new(row - 1, col));
                }
            }
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry {
                point: [n.position.x, n.position.y],
                id:    NodeId::from_index(i),
            })
            .collect();

        GridGraph {
            nodes:       self.nodes,
            cell_node:   self.cell_node,
            rows:        grid.rows(),
            cols:        grid.cols(),
            cell_size:   grid.cell_size(),
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    fn add_node(&mut self, cell: Cell) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(GraphNode {
            position:  self.grid.cell_position(cell),
            neighbors: Vec::with_capacity(4),
        });
        self.cell_node[self.grid.flat(cell)] = id;
        id
    }

    /// Link `id` with the node at `other` (if walkable) in both directions.
    fn link_to(&mut self, id: NodeId, other: Cell) {
        let other_id = self.cell_node[self.grid.flat(other)];
        if !other_id.is_valid() {
            return;
        }
        self.nodes[id.index()].neighbors.push(Edge { to: other_id, cost: 1.0 });
        self.nodes[other_id.index()].neighbors.push(Edge { to: id, cost: 1.0 });
    }
}
