//! `ps-engine` — the stepping simulation engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`agent`]       | `Agent`, `Activity`, `AgentOrigin`, `ExternalAgent`      |
//! | [`store`]       | `AgentStore` (by id and by external identifier)          |
//! | [`environment`] | `Environment`, `Crossing`, `StaticObstacle`              |
//! | [`motion`]      | `MotionModel` trait, `WaypointFollower`                  |
//! | [`departure`]   | `Departure`, `EngineStats`                               |
//! | [`engine`]      | `SimulationEngine` trait (phases, queries, mutations)    |
//! | [`headless`]    | `HeadlessEngine`                                         |
//! | [`visual`]      | `VisualEngine`, `FrameSink`, `NoopSink`                  |
//! | [`builder`]     | `EngineBuilder`                                          |
//! | [`error`]       | `EngineError`, `EngineResult<T>`                         |
//!
//! # Step
//!
//! ```text
//! ① generate_departures               each source fires with its probability
//! ② admit_waiting_agents              up to max_agents: pick exit, reuse a
//!                                     stored route or run A*, spawn agent
//! ③ compute_next_actions              MotionModel per active agent
//!                                     (parallel with the `parallel` feature)
//! ④ update_dependent_agent_positions  integrate, pop reached waypoints,
//!                                     retire finished agents, apply
//!                                     external reports
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the next-action phase on Rayon's thread pool.     |

pub mod agent;
pub mod builder;
pub mod departure;
pub mod engine;
pub mod environment;
pub mod error;
pub mod headless;
pub mod motion;
pub mod store;
pub mod visual;

mod world;


pub use agent::{Activity, Agent, AgentOrigin, ExternalAgent};
pub use builder::EngineBuilder;
pub use departure::{Departure, EngineStats};
pub use engine::SimulationEngine;
pub use environment::{Crossing, Environment, StaticObstacle};
pub use error::{EngineError, EngineResult};
pub use headless::HeadlessEngine;
pub use motion::{MotionModel, WaypointFollower};
pub use store::AgentStore;
pub use visual::{FrameSink, NoopSink, VisualEngine, DEFAULT_MAX_STEPS_PER_FRAME};
