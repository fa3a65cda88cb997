// src/lexer/nfa/mod.rs
//! NFA transition tables shared by the single-pattern builder, the state
//! remapper and the multi-accept merger.
//!
//! States are plain integers. A table maps `state -> byte -> {targets}`;
//! byte `EPSILON` (0) labels empty moves. Ordered maps keep every
//! traversal (and therefore every derived state id) reproducible.

pub mod builder;
pub mod closure;
pub mod merge;

use std::collections::{BTreeMap, BTreeSet};

use crate::lexer::charset::EPSILON;

pub use builder::build_nfa;
pub use closure::{DfaStateInfo, compute_closure};
pub use merge::{GLOBAL_START, MultiAcceptNfa, Remapped, remap_states};

pub type StateId = u32;
pub type Entry = BTreeMap<u8, BTreeSet<StateId>>;
pub type NfaTable = BTreeMap<StateId, Entry>;

/// Reserved start state of a single-pattern NFA.
pub const START: StateId = 0;
/// Reserved accept state of a single-pattern NFA.
pub const ACCEPT: StateId = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    pub table: NfaTable,
}

impl Nfa {
    pub fn add_transition(&mut self, from: StateId, c: u8, to: StateId) {
        add_transition(&mut self.table, from, c, to);
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        add_transition(&mut self.table, from, EPSILON, to);
    }

    pub fn targets(&self, state: StateId, c: u8) -> impl Iterator<Item = StateId> + '_ {
        targets(&self.table, state, c)
    }

    /// Distinct states mentioned anywhere in the table.
    pub fn num_states(&self) -> usize {
        let mut seen: BTreeSet<StateId> = self.table.keys().copied().collect();
        for entry in self.table.values() {
            for ts in entry.values() {
                seen.extend(ts.iter().copied());
            }
        }
        seen.len()
    }
}

pub(crate) fn add_transition(table: &mut NfaTable, from: StateId, c: u8, to: StateId) {
    table.entry(from).or_default().entry(c).or_default().insert(to);
}

/// Targets of `(state, c)`; empty when either lookup misses.
pub(crate) fn targets(
    table: &NfaTable,
    state: StateId,
    c: u8,
) -> impl Iterator<Item = StateId> + '_ {
    table
        .get(&state)
        .and_then(|entry| entry.get(&c))
        .into_iter()
        .flatten()
        .copied()
}
