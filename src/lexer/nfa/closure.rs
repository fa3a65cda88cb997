// src/lexer/nfa/closure.rs
use std::collections::{BTreeSet, VecDeque};
use std::hash::{Hash, Hasher};

use super::{GLOBAL_START, MultiAcceptNfa, StateId};
use crate::lexer::charset::EPSILON;
use crate::lexer::tables::Symbol;

/// Expands `set` to a fixed point under `neighbors`. Every element is
/// handed to `neighbors` exactly once, in FIFO discovery order.
pub fn compute_closure<T, I, F>(set: &mut BTreeSet<T>, mut neighbors: F)
where
    T: Ord + Copy,
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> I,
{
    let mut edge: VecDeque<T> = set.iter().copied().collect();
    while let Some(x) = edge.pop_front() {
        for y in neighbors(x) {
            if set.insert(y) {
                edge.push_back(y);
            }
        }
    }
}

/// A DFA state as seen from the NFA: the contributing NFA states plus the
/// symbol they resolve to. Equality and hashing look at the state set only.
#[derive(Debug, Clone)]
pub struct DfaStateInfo<'a> {
    pub nfa_states: BTreeSet<StateId>,
    pub accepted: Option<&'a Symbol>,
}

impl PartialEq for DfaStateInfo<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.nfa_states == other.nfa_states
    }
}

impl Eq for DfaStateInfo<'_> {}

impl Hash for DfaStateInfo<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nfa_states.hash(state);
    }
}

impl MultiAcceptNfa {
    /// Epsilon-closure of `states`, resolving the best accepting symbol on
    /// the way. Lower priority key wins; equal keys fall back to the accept
    /// state allocated first, i.e. the earlier rule.
    pub fn epsilon_closure(&self, states: impl IntoIterator<Item = StateId>) -> DfaStateInfo<'_> {
        let mut closure: BTreeSet<StateId> = states.into_iter().collect();
        let mut best: Option<(StateId, &Symbol)> = None;

        compute_closure(&mut closure, |s| {
            if let Some(sym) = self.accepting.get(&s) {
                let better = best.is_none_or(|(best_state, best_sym)| {
                    (sym.priority, s) < (best_sym.priority, best_state)
                });
                if better {
                    best = Some((s, sym));
                }
            }
            self.targets(s, EPSILON)
        });

        DfaStateInfo {
            nfa_states: closure,
            accepted: best.map(|(_, sym)| sym),
        }
    }

    /// Runs the NFA directly over `input` and reports the symbol the whole
    /// input is accepted as, if any.
    pub fn classify(&self, input: &[u8]) -> Option<&Symbol> {
        let mut current = self.epsilon_closure([GLOBAL_START]);
        for &c in input {
            if c == EPSILON {
                return None;
            }
            let next: BTreeSet<StateId> = current
                .nfa_states
                .iter()
                .flat_map(|&s| self.targets(s, c))
                .collect();
            if next.is_empty() {
                return None;
            }
            current = self.epsilon_closure(next);
        }
        current.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_visits_each_element_once() {
        // 0 -> 1 -> 2 -> 0, plus 1 -> 3
        let edges = |x: u32| -> Vec<u32> {
            match x {
                0 => vec![1],
                1 => vec![2, 3],
                2 => vec![0],
                _ => vec![],
            }
        };
        let mut visits = Vec::new();
        let mut set = BTreeSet::from([0u32]);
        compute_closure(&mut set, |x| {
            visits.push(x);
            edges(x)
        });
        assert_eq!(set, BTreeSet::from([0, 1, 2, 3]));
        assert_eq!(visits, vec![0, 1, 2, 3]);
    }

    #[test]
    fn descriptor_identity_ignores_symbol() {
        let sym = Symbol::new("A", 0);
        let a = DfaStateInfo {
            nfa_states: BTreeSet::from([1, 2]),
            accepted: Some(&sym),
        };
        let b = DfaStateInfo {
            nfa_states: BTreeSet::from([1, 2]),
            accepted: None,
        };
        assert_eq!(a, b);
    }
}
