//! A single target point on a route.

use serde::{Deserialize, Serialize};

use ps_core::Point2;

/// One point an agent steers toward, in world coordinates.
///
/// `id` numbers the waypoints of one route from 1 in traversal order; it is
/// carried through persistence unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x:  f32,
    pub y:  f32,
    pub id: u32,
}

impl Waypoint {
    #[inline]
    pub const fn new(x: f32, y: f32, id: u32) -> Self {
        Self { x, y, id }
    }

    #[inline]
    pub fn at(position: Point2, id: u32) -> Self {
        Self::new(position.x, position.y, id)
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}
