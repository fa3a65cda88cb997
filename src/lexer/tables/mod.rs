// src/lexer/tables/mod.rs
pub mod build;
pub mod io;
pub mod rules;

use std::collections::BTreeMap;

pub use build::{compile, convert, merge_rules};
pub use io::{
    load_dfa_bin_bytes, load_dfa_json_bytes, save_dfa_bin, save_dfa_json, write_dfa_bin,
    write_dfa_json,
};
pub use rules::{LexRule, Symbol, load_rules_json_bytes, rules_in_order, rules_to_json_string};

use crate::lexer::charset::CHAR_SPACE;
use crate::lexer::nfa::StateId;

/// Missing transition in dense tables.
pub const REJECT: u32 = u32::MAX;
/// Non-accepting state in dense tables.
pub const INVALID_TOKEN: u32 = u32::MAX;

/// Deterministic automaton produced by subset construction.
///
/// Every state owns a (possibly empty) transition row and an accepting
/// entry, so per-state lookups never miss. The start state is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    transitions: Vec<BTreeMap<u8, StateId>>,
    accepting: Vec<Option<Symbol>>,
}

impl Dfa {
    pub const START: StateId = 0;

    pub(crate) fn empty() -> Self {
        Self {
            transitions: Vec::new(),
            accepting: Vec::new(),
        }
    }

    pub(crate) fn add_state(&mut self, accept: Option<Symbol>) -> StateId {
        let id = self.transitions.len() as StateId;
        self.transitions.push(BTreeMap::new());
        self.accepting.push(accept);
        id
    }

    pub(crate) fn add_transition(&mut self, from: StateId, c: u8, to: StateId) {
        self.transitions[from as usize].insert(c, to);
    }

    pub fn start(&self) -> StateId {
        Self::START
    }

    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn next(&self, state: StateId, c: u8) -> Option<StateId> {
        self.transitions
            .get(state as usize)
            .and_then(|row| row.get(&c))
            .copied()
    }

    /// Outgoing edges of `state`; `None` only for ids outside the automaton.
    pub fn row(&self, state: StateId) -> Option<&BTreeMap<u8, StateId>> {
        self.transitions.get(state as usize)
    }

    pub fn accepting(&self, state: StateId) -> Option<&Symbol> {
        self.accepting.get(state as usize).and_then(Option::as_ref)
    }

    pub fn transition_table(&self) -> &[BTreeMap<u8, StateId>] {
        &self.transitions
    }

    pub fn accepting_table(&self) -> &[Option<Symbol>] {
        &self.accepting
    }

    /// Walks `input` from the start state; `None` if an edge is missing.
    pub fn run(&self, input: &[u8]) -> Option<StateId> {
        input
            .iter()
            .try_fold(Self::START, |state, &c| self.next(state, c))
    }

    /// Symbol the whole of `input` is accepted as.
    pub fn classify(&self, input: &[u8]) -> Option<&Symbol> {
        self.run(input).and_then(|s| self.accepting(s))
    }

    /// Flattens into `[state * 128 + byte]` rows plus a token map indexing
    /// `symbols` (ordered by first accepting state).
    pub fn to_dense(&self) -> DenseDfa {
        let n = self.num_states();
        let mut next = vec![REJECT; n * CHAR_SPACE];
        for (s, row) in self.transitions.iter().enumerate() {
            for (&c, &to) in row {
                next[s * CHAR_SPACE + c as usize] = to;
            }
        }

        let mut symbols: Vec<Symbol> = Vec::new();
        let mut token_of = vec![INVALID_TOKEN; n];
        for (s, accept) in self.accepting.iter().enumerate() {
            let Some(sym) = accept else { continue };
            let idx = match symbols.iter().position(|known| known == sym) {
                Some(i) => i,
                None => {
                    symbols.push(sym.clone());
                    symbols.len() - 1
                }
            };
            token_of[s] = idx as u32;
        }

        DenseDfa {
            n_states: n as u32,
            next,
            token_of,
            symbols,
        }
    }

    /// Inverse of [`Dfa::to_dense`].
    pub fn from_dense(dense: &DenseDfa) -> Result<Self, String> {
        let n = dense.n_states as usize;
        if dense.next.len() != n * CHAR_SPACE || dense.token_of.len() != n {
            return Err(format!(
                "dense tables sized {}/{} for {n} states",
                dense.next.len(),
                dense.token_of.len()
            ));
        }
        let mut dfa = Dfa::empty();
        for s in 0..n {
            let accept = match dense.token_of[s] {
                INVALID_TOKEN => None,
                t => Some(
                    dense
                        .symbols
                        .get(t as usize)
                        .cloned()
                        .ok_or_else(|| format!("state {s} names unknown symbol {t}"))?,
                ),
            };
            dfa.add_state(accept);
        }
        for s in 0..n {
            for c in 0..CHAR_SPACE {
                let to = dense.next[s * CHAR_SPACE + c];
                if to == REJECT {
                    continue;
                }
                if to as usize >= n {
                    return Err(format!("state {s} on byte {c} targets missing state {to}"));
                }
                dfa.add_transition(s as StateId, c as u8, to);
            }
        }
        Ok(dfa)
    }
}

/// Flat tables for table-driven scanners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseDfa {
    pub n_states: u32,
    pub next: Vec<u32>,     // n_states * 128, row-major, REJECT if missing
    pub token_of: Vec<u32>, // n_states -> index into `symbols` or INVALID_TOKEN
    pub symbols: Vec<Symbol>,
}

impl DenseDfa {
    #[inline]
    pub fn next_state(&self, state: u32, c: u8) -> Option<u32> {
        if c as usize >= CHAR_SPACE {
            return None;
        }
        match self.next.get(state as usize * CHAR_SPACE + c as usize) {
            Some(&REJECT) | None => None,
            Some(&to) => Some(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::{compile, rules_in_order};

    #[test]
    fn dense_next_agrees_with_rows() {
        let dfa = compile(&rules_in_order([("ab|ac", "AB"), (r"\d\d*", "Int")])).unwrap();
        let dense = dfa.to_dense();
        for s in 0..dfa.num_states() as u32 {
            for c in 0..=u8::MAX {
                assert_eq!(dense.next_state(s, c), dfa.next(s, c), "state {s} byte {c}");
            }
        }
        // A missing edge is stored as REJECT and reads back as None.
        assert_eq!(dense.next[b'z' as usize], REJECT);
        assert_eq!(dense.next_state(Dfa::START, b'z'), None);
        assert_eq!(dense.next_state(Dfa::START, 0xC3), None);
        assert_eq!(Dfa::from_dense(&dense).unwrap(), dfa);
    }
}
