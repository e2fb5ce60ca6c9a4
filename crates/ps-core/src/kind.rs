//! Agent kind enum shared by the engine and the bridge.

/// Which population an agent belongs to.  The engine keeps one collection per
/// kind and `list_agents` filters by it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Pedestrian,
    Vehicle,
}

impl AgentKind {
    /// Every kind, in collection order.
    pub const ALL: [AgentKind; 2] = [AgentKind::Pedestrian, AgentKind::Vehicle];

    /// Dense index for per-kind arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            AgentKind::Pedestrian => 0,
            AgentKind::Vehicle    => 1,
        }
    }

    /// Human-readable label, used in logs and CSV values.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Pedestrian => "pedestrian",
            AgentKind::Vehicle    => "vehicle",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
