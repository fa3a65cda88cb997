// src/lexer/nfa/merge.rs
use std::collections::BTreeMap;

use hashbrown::HashMap;

use super::{ACCEPT, Entry, Nfa, NfaTable, START, StateId, add_transition, targets};
use crate::lexer::charset::EPSILON;
use crate::lexer::tables::Symbol;

/// The shared start state of a merged NFA.
pub const GLOBAL_START: StateId = 0;

/// A single-pattern table relabeled into the shared id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub table: NfaTable,
    pub start: StateId,
    pub accept: StateId,
}

/// Relabels every state of `table` with fresh ids drawn from `counter`.
///
/// The pattern's start and accept states get the first two ids; the rest
/// follow in table order (source state, then its targets). The relabeled
/// table always carries an entry for the accept state.
pub fn remap_states(table: &NfaTable, counter: &mut StateId) -> Remapped {
    let mut fresh = || {
        let id = *counter;
        *counter += 1;
        id
    };
    let start = fresh();
    let accept = fresh();

    let mut mapped: HashMap<StateId, StateId> = HashMap::new();
    mapped.insert(START, start);
    mapped.insert(ACCEPT, accept);
    for (&state, transitions) in table {
        mapped.entry(state).or_insert_with(&mut fresh);
        for ts in transitions.values() {
            for &t in ts {
                mapped.entry(t).or_insert_with(&mut fresh);
            }
        }
    }

    let mut new_table = NfaTable::new();
    new_table.insert(accept, Entry::new());
    for (state, transitions) in table {
        let entry: Entry = transitions
            .iter()
            .map(|(&c, ts)| (c, ts.iter().map(|t| mapped[t]).collect()))
            .collect();
        new_table.insert(mapped[state], entry);
    }

    Remapped {
        table: new_table,
        start,
        accept,
    }
}

/// All rules' NFAs under one start state, with per-state accepting symbols.
#[derive(Debug, Clone)]
pub struct MultiAcceptNfa {
    pub table: NfaTable,
    pub accepting: BTreeMap<StateId, Symbol>,
    next_state: StateId,
}

impl Default for MultiAcceptNfa {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiAcceptNfa {
    pub fn new() -> Self {
        let mut table = NfaTable::new();
        table.insert(GLOBAL_START, Entry::new());
        Self {
            table,
            accepting: BTreeMap::new(),
            next_state: GLOBAL_START + 1,
        }
    }

    /// Remaps `nfa` into this automaton, links it from the global start and
    /// marks its accept state for `symbol`. Returns the remapped ids.
    pub fn add_rule(&mut self, nfa: &Nfa, symbol: Symbol) -> Remapped {
        let remapped = remap_states(&nfa.table, &mut self.next_state);
        for (state, entry) in &remapped.table {
            self.table.insert(*state, entry.clone());
        }
        add_transition(&mut self.table, GLOBAL_START, EPSILON, remapped.start);
        self.accepting.insert(remapped.accept, symbol);
        remapped
    }

    pub fn targets(&self, state: StateId, c: u8) -> impl Iterator<Item = StateId> + '_ {
        targets(&self.table, state, c)
    }

    /// Ids handed out so far, the global start included.
    pub fn num_states(&self) -> StateId {
        self.next_state
    }
}
