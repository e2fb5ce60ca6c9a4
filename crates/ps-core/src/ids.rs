//! Numeric handles for agents, graph nodes, crossings and obstacles.
//!
//! Every handle is a `u32` newtype.  `u32::MAX` is reserved as the
//! "unassigned" value and is also what `Default` yields, so a crossing field
//! missing from an exchanged snapshot reads as "no exit" rather than
//! crossing 0.
//!
//! Agents also carry a string identifier chosen by the external framework;
//! that one lives on the agent itself.

use std::fmt;

macro_rules! handles {
    ($( $(#[$attr:meta])* $name:ident => $label:literal; )+) => {$(
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            /// Handle for slot `i` of a flat array.  Indices beyond `u32`
            /// map to `INVALID`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                u32::try_from(i).map_or(Self::INVALID, $name)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, "#{}"), self.0)
                } else {
                    f.write_str(concat!($label, "#none"))
                }
            }
        }
    )+};
}

handles! {
    /// Assigned by the agent store in admission order.
    AgentId => "agent";

    /// Walkable cell's node in the grid graph, in row-major scan order.
    NodeId => "node";

    /// Entrance/exit point on the map boundary.
    CrossingId => "crossing";

    /// Static obstacle published to the external framework.
    ObstacleId => "obstacle";
}
