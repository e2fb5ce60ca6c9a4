//! `ps-route` — waypoint queues that agents follow, and their persistence.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`waypoint`]  | `Waypoint` (`x`, `y`, `id`)                               |
//! | [`behavior`]  | `BehaviorState` tag carried by a queue                    |
//! | [`queue`]     | `PrecomputedPathQueue`                                    |
//! | [`library`]   | `RouteLibrary` (routes keyed by entrance/exit crossing)   |
//! | [`loader`]    | `load_paths_csv`, `load_paths_reader`, `save_paths_csv`, `save_paths_writer` |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                            |
//!
//! # Lifecycle
//!
//! A queue is created when a route is computed (from a `ps_grid::GridPath`)
//! or loaded from disk, consumed head-first by the owning agent as it reaches
//! each waypoint, and dropped when the agent leaves or is given a new route.

pub mod behavior;
pub mod error;
pub mod library;
pub mod loader;
pub mod queue;
pub mod waypoint;

#[cfg(test)]
mod tests;

pub use behavior::BehaviorState;
pub use error::{RouteError, RouteResult};
pub use library::RouteLibrary;
pub use loader::{load_paths_csv, load_paths_reader, save_paths_csv, save_paths_writer};
pub use queue::PrecomputedPathQueue;
pub use waypoint::Waypoint;
