//! Card-owned hooks keyed by phase.
//!
//! An `InjectionTable` lets a card attach a hook to a phase and later remove
//! it again by its own id. Hooks for one phase run in the order their cards
//! first injected them.
//!
//! The same table type backs both turn-phase hooks on a player and the
//! damage pipeline hooks on a character card; only the phase and hook types
//! differ.
//!
//! ```
//! use flow_ccg::core::CardUid;
//! use flow_ccg::flow::InjectionTable;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Phase { Draw }
//!
//! let mut table: InjectionTable<Phase, fn(i32) -> i32> = InjectionTable::new();
//! table.inject(CardUid::new(1), Phase::Draw, |n| n + 1);
//! table.inject(CardUid::new(2), Phase::Draw, |n| n * 10);
//!
//! let total = table.hooks_mut(Phase::Draw).fold(1, |acc, (_, hook)| hook(acc));
//! assert_eq!(total, 20);
//!
//! table.purify(CardUid::new(1), None).unwrap();
//! assert!(!table.contains(Phase::Draw, CardUid::new(1)));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::core::entity::CardUid;
use crate::core::error::{EngineError, Result};

/// Per-phase ordered hooks, each owned by the card that injected it.
pub struct InjectionTable<P, H> {
    phases: FxHashMap<P, Vec<(CardUid, H)>>,
}

impl<P, H> Default for InjectionTable<P, H> {
    fn default() -> Self {
        Self { phases: FxHashMap::default() }
    }
}

impl<P: Copy + Eq + Hash + fmt::Debug, H> InjectionTable<P, H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for `phase` on behalf of `source`.
    ///
    /// A card holds at most one hook per phase. Injecting again replaces the
    /// previous hook in place, keeping its position; returns `true` when that
    /// happened.
    pub fn inject(&mut self, source: CardUid, phase: P, hook: H) -> bool {
        let hooks = self.phases.entry(phase).or_default();
        if let Some(slot) = hooks.iter_mut().find(|(owner, _)| *owner == source) {
            warn!(target: "engine::inject", %source, ?phase, "hook overwritten");
            slot.1 = hook;
            return true;
        }
        debug!(target: "engine::inject", %source, ?phase, "hook injected");
        hooks.push((source, hook));
        false
    }

    /// Remove the hooks `source` registered.
    ///
    /// With a phase, removes that one hook; without, removes the card's hooks
    /// from every phase. Fails when nothing was found to remove.
    pub fn purify(&mut self, source: CardUid, phase: Option<P>) -> Result<usize> {
        let removed = match phase {
            Some(phase) => self.phases.get_mut(&phase).map_or(0, |hooks| Self::drop_source(hooks, source)),
            None => self
                .phases
                .values_mut()
                .map(|hooks| Self::drop_source(hooks, source))
                .sum(),
        };
        self.phases.retain(|_, hooks| !hooks.is_empty());

        if removed == 0 {
            let phase = phase.map_or_else(|| "any phase".to_string(), |p| format!("{p:?}"));
            return Err(EngineError::HookNotFound { card: source, phase });
        }
        debug!(target: "engine::inject", %source, removed, "hooks purified");
        Ok(removed)
    }

    fn drop_source(hooks: &mut Vec<(CardUid, H)>, source: CardUid) -> usize {
        let before = hooks.len();
        hooks.retain(|(owner, _)| *owner != source);
        before - hooks.len()
    }

    #[must_use]
    pub fn contains(&self, phase: P, source: CardUid) -> bool {
        self.phases
            .get(&phase)
            .is_some_and(|hooks| hooks.iter().any(|(owner, _)| *owner == source))
    }

    /// Whether `source` has a hook on any phase.
    #[must_use]
    pub fn owns_any(&self, source: CardUid) -> bool {
        self.phases.values().any(|hooks| hooks.iter().any(|(owner, _)| *owner == source))
    }

    /// Hooks for `phase` in injection order.
    pub fn hooks_mut(&mut self, phase: P) -> impl Iterator<Item = (CardUid, &mut H)> + '_ {
        self.phases
            .get_mut(&phase)
            .into_iter()
            .flat_map(|hooks| hooks.iter_mut().map(|(owner, hook)| (*owner, hook)))
    }

    /// Cards with a hook on `phase`, in injection order.
    #[must_use]
    pub fn sources(&self, phase: P) -> Vec<CardUid> {
        self.phases
            .get(&phase)
            .map(|hooks| hooks.iter().map(|(owner, _)| *owner).collect())
            .unwrap_or_default()
    }

    /// Total number of hooks across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn clear(&mut self) {
        self.phases.clear();
    }
}

impl<P: fmt::Debug, H> fmt::Debug for InjectionTable<P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (phase, hooks) in &self.phases {
            let owners: Vec<CardUid> = hooks.iter().map(|(owner, _)| *owner).collect();
            map.entry(phase, &owners);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Phase {
        Pre,
        Post,
    }

    type Hook = Box<dyn FnMut(&mut Vec<&'static str>)>;

    fn push(tag: &'static str) -> Hook {
        Box::new(move |log: &mut Vec<&'static str>| log.push(tag))
    }

    fn run(table: &mut InjectionTable<Phase, Hook>, phase: Phase) -> Vec<&'static str> {
        let mut log = Vec::new();
        for (_, hook) in table.hooks_mut(phase) {
            hook(&mut log);
        }
        log
    }

    #[test]
    fn test_hooks_run_in_injection_order() {
        let mut table = InjectionTable::new();
        table.inject(CardUid(9), Phase::Pre, push("nine"));
        table.inject(CardUid(2), Phase::Pre, push("two"));
        table.inject(CardUid(5), Phase::Pre, push("five"));

        assert_eq!(run(&mut table, Phase::Pre), vec!["nine", "two", "five"]);
        assert_eq!(table.sources(Phase::Pre), vec![CardUid(9), CardUid(2), CardUid(5)]);
        assert!(run(&mut table, Phase::Post).is_empty());
    }

    #[test]
    fn test_duplicate_overwrites_in_place() {
        let mut table = InjectionTable::new();
        assert!(!table.inject(CardUid(1), Phase::Pre, push("old")));
        table.inject(CardUid(2), Phase::Pre, push("other"));
        assert!(table.inject(CardUid(1), Phase::Pre, push("new")));

        assert_eq!(table.len(), 2);
        assert_eq!(run(&mut table, Phase::Pre), vec!["new", "other"]);
    }

    #[test]
    fn test_purify_single_phase() {
        let mut table = InjectionTable::new();
        table.inject(CardUid(1), Phase::Pre, push("a"));
        table.inject(CardUid(1), Phase::Post, push("b"));

        assert_eq!(table.purify(CardUid(1), Some(Phase::Pre)), Ok(1));
        assert!(!table.contains(Phase::Pre, CardUid(1)));
        assert!(table.contains(Phase::Post, CardUid(1)));

        let err = table.purify(CardUid(1), Some(Phase::Pre)).unwrap_err();
        assert_eq!(err, EngineError::HookNotFound { card: CardUid(1), phase: "Pre".into() });
    }

    #[test]
    fn test_purify_all_phases() {
        let mut table = InjectionTable::new();
        table.inject(CardUid(1), Phase::Pre, push("a"));
        table.inject(CardUid(1), Phase::Post, push("b"));
        table.inject(CardUid(3), Phase::Post, push("c"));

        assert!(table.owns_any(CardUid(1)));
        assert_eq!(table.purify(CardUid(1), None), Ok(2));
        assert_eq!(table.len(), 1);
        assert!(!table.owns_any(CardUid(1)));
        assert!(table.owns_any(CardUid(3)));

        let err = table.purify(CardUid(1), None).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::NotFound);
    }

    #[test]
    fn test_debug_lists_owners() {
        let mut table: InjectionTable<Phase, Hook> = InjectionTable::new();
        table.inject(CardUid(4), Phase::Post, push("x"));
        assert_eq!(format!("{table:?}"), "{Post: [CardUid(4)]}");
    }
}
