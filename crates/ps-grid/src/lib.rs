//! `ps-grid` — occupancy grid, walkable-cell graph, and A* routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`occupancy`] | `OccupancyGrid` (immutable walkable map + cell size)     |
//! | [`graph`]     | `GraphBuilder`, `GridGraph`, `GraphNode`, `Edge`         |
//! | [`astar`]     | `PathFinder`, `GridPath`                                 |
//! | [`error`]     | `GridError` (construction), `PathError` (search)         |
//!
//! # Pipeline
//!
//! ```text
//! OccupancyGrid ──GraphBuilder::build──▶ GridGraph ──PathFinder::find_path──▶ GridPath
//! ```
//!
//! The graph is built once at startup and never mutated; any number of
//! searches may run against it.  A single `PathFinder` serializes the
//! searches issued through it.

pub mod astar;
pub mod error;
pub mod graph;
pub mod occupancy;


pub use astar::{GridPath, PathFinder};
pub use error::{GridError, GridResult, PathError};
pub use graph::{Edge, GraphBuilder, GraphNode, GridGraph};
pub use occupancy::{Cell, OccupancyGrid};
