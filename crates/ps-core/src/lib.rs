//! `ps-core` — foundational types for the `rust_pedsim` runtime core.
//!
//! This crate is a dependency of every other `ps-*` crate.  It has no `ps-*`
//! dependencies and few external ones (`rand`, `serde`, `toml`, `thiserror`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `CrossingId`, `ObstacleId`            |
//! | [`geo`]     | `Point2`, Euclidean distance                               |
//! | [`kind`]    | `AgentKind` (`Pedestrian`, `Vehicle`)                      |
//! | [`time`]    | `Tick`, `TickCounter`, `TickLength`, `TimeUnit`            |
//! | [`rng`]     | `SimRng` (seeded, reproducible)                            |
//! | [`config`]  | `SimConfig`, `DepartureConfig`, TOML loading               |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DepartureConfig, SimConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Point2;
pub use ids::{AgentId, CrossingId, NodeId, ObstacleId};
pub use kind::AgentKind;
pub use rng::SimRng;
pub use time::{Tick, TickCounter, TickLength, TimeUnit};
