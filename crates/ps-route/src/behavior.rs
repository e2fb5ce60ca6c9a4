//! Behaviour tag attached to a precomputed path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RouteError;

/// What the agent should be doing while it follows a path.
///
/// Persisted in upper case (`MOVE`, `WAIT`, ...); parsing is
/// case-insensitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BehaviorState {
    /// Walk or drive toward the next waypoint.
    #[default]
    Move,
    /// Hold position at the current waypoint.
    Wait,
    /// Join the queue at the head waypoint (e.g. a crossing signal).
    Queue,
    /// Leave the map through the exit crossing.
    Exit,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 4] = [
        BehaviorState::Move,
        BehaviorState::Wait,
        BehaviorState::Queue,
        BehaviorState::Exit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::Move  => "MOVE",
            BehaviorState::Wait  => "WAIT",
            BehaviorState::Queue => "QUEUE",
            BehaviorState::Exit  => "EXIT",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorState {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BehaviorState::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                RouteError::Parse(format!(
                    "invalid behaviour {s:?}: expected one of MOVE, WAIT, QUEUE, EXIT"
                ))
            })
    }
}
