//! `AgentStore` — all live agents, addressable by internal id or by the
//! external framework's string identifier.
//!
//! Agents are kept in a `BTreeMap<AgentId, Agent>` so every pass over the
//! population runs in ascending id (admission) order, which keeps stepping
//! deterministic.  A side `FxHashMap<String, AgentId>` resolves identifiers.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use ps_core::{AgentId, AgentKind};

use crate::{Agent, EngineError, EngineResult};

#[derive(Debug, Default)]
pub struct AgentStore {
    agents:  BTreeMap<AgentId, Agent>,
    by_name: FxHashMap<String, AgentId>,
    next_id: u32,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next [`add`](Self::add) will assign.
    pub fn peek_next_id(&self) -> AgentId {
        AgentId(self.next_id)
    }

    /// Insert `agent`, assigning it a fresh id.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateAgent`] if the identifier is already in use.
    pub fn add(&mut self, mut agent: Agent) -> EngineResult<AgentId> {
        if self.by_name.contains_key(&agent.identifier) {
            return Err(EngineError::DuplicateAgent(agent.identifier));
        }
        let id = AgentId(self.next_id);
        self.next_id += 1;
        agent.id = id;
        self.by_name.insert(agent.identifier.clone(), id);
        self.agents.insert(id, agent);
        Ok(id)
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.by_name.remove(&agent.identifier);
        Some(agent)
    }

    pub fn remove_by_identifier(&mut self, identifier: &str) -> Option<Agent> {
        let id = *self.by_name.get(identifier)?;
        self.remove(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn id_of(&self, identifier: &str) -> Option<AgentId> {
        self.by_name.get(identifier).copied()
    }

    pub fn by_identifier(&self, identifier: &str) -> Option<&Agent> {
        self.agents.get(self.by_name.get(identifier)?)
    }

    pub fn by_identifier_mut(&mut self, identifier: &str) -> Option<&mut Agent> {
        let id = *self.by_name.get(identifier)?;
        self.agents.get_mut(&id)
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Active agents of `kind`, ascending id order.
    pub fn active_of_kind(&self, kind: AgentKind) -> impl Iterator<Item = &Agent> + '_ {
        self.iter().filter(move |a| a.kind == kind && a.is_active())
    }
}
