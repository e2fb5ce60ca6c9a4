//! Precomputed routes indexed by the crossings they connect.

use std::collections::BTreeMap;

use ps_core::CrossingId;

use crate::PrecomputedPathQueue;

/// Routes loaded from disk (or recorded from earlier searches), looked up by
/// `(entrance, exit)`.
///
/// Several routes may share a key; [`route`](Self::route) returns the first
/// one inserted.  Iteration is ordered by key, then insertion, so saving a
/// library always writes the same file.
#[derive(Clone, Debug, Default)]
pub struct RouteLibrary {
    routes: BTreeMap<(CrossingId, CrossingId), Vec<PrecomputedPathQueue>>,
}

impl RouteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `queue` under its own entrance/exit pair.
    pub fn insert(&mut self, queue: PrecomputedPathQueue) {
        self.routes
            .entry((queue.entrance(), queue.exit()))
            .or_default()
            .push(queue);
    }

    /// First route from `entrance` to `exit`, if any.
    pub fn route(&self, entrance: CrossingId, exit: CrossingId) -> Option<&PrecomputedPathQueue> {
        self.routes.get(&(entrance, exit)).and_then(|v| v.first())
    }

    /// All routes from `entrance` to `exit`.
    pub fn routes(&self, entrance: CrossingId, exit: CrossingId) -> &[PrecomputedPathQueue] {
        self.routes.get(&(entrance, exit)).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, entrance: CrossingId, exit: CrossingId) -> bool {
        self.routes.contains_key(&(entrance, exit))
    }

    /// Total number of stored routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrecomputedPathQueue> + '_ {
        self.routes.values().flatten()
    }
}

impl FromIterator<PrecomputedPathQueue> for RouteLibrary {
    fn from_iter<I: IntoIterator<Item = PrecomputedPathQueue>>(iter: I) -> Self {
        let mut lib = RouteLibrary::new();
        for q in iter {
            lib.insert(q);
        }
        lib
    }
}
