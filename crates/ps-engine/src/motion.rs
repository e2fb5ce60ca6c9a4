//! The `MotionModel` trait — how an active agent wants to move this step.

use ps_core::Point2;

use crate::Agent;

/// Pluggable per-agent steering.
///
/// Called once per active agent per step during
/// `compute_next_actions`; the returned velocity is applied in
/// `update_dependent_agent_positions`.
///
/// # Thread safety
///
/// With the `parallel` feature the engine calls this from Rayon worker
/// threads, so implementations must be `Send + Sync`.  Per-agent state
/// belongs on the [`Agent`], not in the model.
pub trait MotionModel: Send + Sync + 'static {
    /// Desired velocity (world units per second) for `agent`, cruising at
    /// `speed`, over a step of `dt` seconds.
    fn desired_velocity(&self, agent: &Agent, speed: f32, dt: f32) -> Point2;
}

/// Straight-line steering toward the head waypoint.
///
/// Never overshoots: when the waypoint is closer than one step at cruise
/// speed, the velocity lands the agent exactly on it.
///
/// The route's [`BehaviorState`](ps_route::BehaviorState) tag is carried for
/// persistence and for custom models; this model steers every tag alike, so
/// a `WAIT` or `QUEUE` route is walked like a `MOVE` one.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaypointFollower;

impl MotionModel for WaypointFollower {
    fn desired_velocity(&self, agent: &Agent, speed: f32, dt: f32) -> Point2 {
        let Some(target) = agent.target() else {
            return Point2::ORIGIN;
        };
        let delta = target - agent.position;
        let dist = delta.length();
        if dist <= speed * dt && dt > 0.0 {
            delta * (1.0 / dt)
        } else {
            delta.normalized() * speed
        }
    }
}
