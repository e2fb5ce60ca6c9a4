//! `ps-bridge` — connects an external driver to a [`SimulationEngine`].
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`sync`]        | `TickSynchronizer`, `AdvanceOutcome`, `TickEvent`, `Phase` |
//! | [`worker`]      | `StepWorker`, `run_guarded_step`                         |
//! | [`ownership`]   | `OwnershipCoordinator`                                   |
//! | [`publication`] | `Publication`, `PublicationLedger`                       |
//! | [`bridge`]      | `Bridge` facade                                          |
//! | [`error`]       | `BridgeError`, `BridgeResult<T>`                         |
//!
//! # Threads
//!
//! ```text
//! driver thread                       ps-step-worker
//! ─────────────                       ──────────────
//! bridge.advance() ──request──▶       engine.lock(); engine.step()
//!      (waits ≤ tick length) ◀─done── counter += 1
//! bridge.publish()   ─┐
//! bridge.take_ownership() ─┴─ engine.lock()
//! ```
//!
//! [`SimulationEngine`]: ps_engine::SimulationEngine

pub mod bridge;
pub mod error;
pub mod ownership;
pub mod publication;
pub mod sync;
pub mod worker;

#[cfg(test)]
mod tests;

pub use bridge::Bridge;
pub use error::{BridgeError, BridgeResult};
pub use ownership::OwnershipCoordinator;
pub use publication::{Publication, PublicationLedger};
pub use sync::{AdvanceOutcome, Phase, TickEvent, TickEventKind, TickSynchronizer};
pub use worker::{StepWorker, run_guarded_step};
