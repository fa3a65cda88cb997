// src/lexer/tables/build.rs
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use hashbrown::HashMap;

use super::{Dfa, LexRule};
use crate::error::CompileError;
use crate::lexer::charset::EPSILON;
use crate::lexer::nfa::{
    DfaStateInfo, GLOBAL_START, MultiAcceptNfa, StateId, build_nfa, compute_closure,
};
use crate::lexer::regex::parse;

/// Subset construction state for one conversion. Nothing here outlives
/// the call.
struct Nfa2Dfa<'a> {
    merged: &'a MultiAcceptNfa,
    // DFA id -> descriptor
    state_info: Vec<DfaStateInfo<'a>>,
    // NFA state set -> DFA id
    corresponding: HashMap<BTreeSet<StateId>, StateId>,
    dfa: Dfa,
}

impl<'a> Nfa2Dfa<'a> {
    fn new(merged: &'a MultiAcceptNfa) -> Self {
        Self {
            merged,
            state_info: Vec::new(),
            corresponding: HashMap::new(),
            dfa: Dfa::empty(),
        }
    }

    /// Returns the id for `info`'s state set, minting one (with its
    /// accepting symbol) on first sight. The flag is true for new ids.
    fn intern(&mut self, info: DfaStateInfo<'a>) -> (StateId, bool) {
        if let Some(&id) = self.corresponding.get(&info.nfa_states) {
            return (id, false);
        }
        let id = self.dfa.add_state(info.accepted.cloned());
        self.corresponding.insert(info.nfa_states.clone(), id);
        self.state_info.push(info);
        (id, true)
    }

    /// Fills in the row of `dfa_state`; returns the ids it discovered.
    fn expand(&mut self, dfa_state: StateId) -> Vec<StateId> {
        let merged = self.merged;

        let mut merged_transitions: BTreeMap<u8, BTreeSet<StateId>> = BTreeMap::new();
        for nfa_state in &self.state_info[dfa_state as usize].nfa_states {
            let Some(entry) = merged.table.get(nfa_state) else {
                continue;
            };
            for (&c, targets) in entry {
                if c != EPSILON {
                    merged_transitions
                        .entry(c)
                        .or_default()
                        .extend(targets.iter().copied());
                }
            }
        }

        let mut created = Vec::new();
        for (c, targets) in merged_transitions {
            let (to, fresh) = self.intern(merged.epsilon_closure(targets));
            self.dfa.add_transition(dfa_state, c, to);
            if fresh {
                created.push(to);
            }
        }
        created
    }

    fn convert(mut self) -> Dfa {
        let merged = self.merged;
        let (start, _) = self.intern(merged.epsilon_closure([GLOBAL_START]));
        debug_assert_eq!(start, Dfa::START);

        let mut states = BTreeSet::from([start]);
        compute_closure(&mut states, |s| self.expand(s));
        self.dfa
    }
}

/// Subset construction over a merged NFA. Ids are assigned breadth-first,
/// bytes ascending, so the same NFA always yields the same tables.
pub fn convert(merged: &MultiAcceptNfa) -> Dfa {
    Nfa2Dfa::new(merged).convert()
}

/// Parses and builds every rule, then merges them under one start state.
/// Stops at the first rule that fails to parse.
pub fn merge_rules(rules: &[LexRule]) -> Result<MultiAcceptNfa, CompileError> {
    let mut merged = MultiAcceptNfa::new();
    for (index, rule) in rules.iter().enumerate() {
        let tree = parse(&rule.pattern).map_err(|source| CompileError::Regex {
            index,
            symbol: rule.symbol.name.clone(),
            source,
        })?;
        let nfa = build_nfa(&tree);
        let r = merged.add_rule(&nfa, rule.symbol.clone());
        log::debug!(
            "[tables] rule #{index} {} /{}/: {} NFA states remapped to {}..{}",
            rule.symbol,
            rule.pattern,
            nfa.num_states(),
            r.start,
            merged.num_states(),
        );
    }
    Ok(merged)
}

/// Compiles an ordered rule list into one DFA.
pub fn compile(rules: &[LexRule]) -> Result<Dfa, CompileError> {
    let t0 = Instant::now();
    let merged = merge_rules(rules)?;
    let dfa = convert(&merged);
    log::info!(
        "[tables] compiled {} rules: {} NFA states -> {} DFA states in {} ms",
        rules.len(),
        merged.num_states(),
        dfa.num_states(),
        t0.elapsed().as_millis()
    );
    Ok(dfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::{Symbol, rules_in_order};

    #[test]
    fn empty_rule_set_is_a_lone_start_state() {
        let dfa = compile(&[]).unwrap();
        assert_eq!(dfa.num_states(), 1);
        assert!(dfa.row(Dfa::START).unwrap().is_empty());
        assert_eq!(dfa.accepting(Dfa::START), None);
    }

    #[test]
    fn nullable_rule_accepts_at_start() {
        let dfa = compile(&rules_in_order([("a*", "AS")])).unwrap();
        assert_eq!(dfa.accepting(Dfa::START).map(|s| s.name.as_str()), Some("AS"));
    }

    #[test]
    fn loops_reuse_existing_states() {
        // (ab)* cycles between two closures; the cycle must not mint new ids.
        let dfa = compile(&rules_in_order([("(ab)*", "ABS")])).unwrap();
        let a = dfa.next(Dfa::START, b'a').unwrap();
        let back = dfa.next(a, b'b').unwrap();
        assert_eq!(dfa.next(back, b'a'), Some(a));
        assert_eq!(dfa.num_states(), 3);
    }

    #[test]
    fn every_state_set_maps_to_one_id() {
        let merged = merge_rules(&rules_in_order([("a(b|c)*", "X"), ("ab*", "Y")])).unwrap();
        let mut conv = Nfa2Dfa::new(&merged);
        let (start, _) = conv.intern(merged.epsilon_closure([GLOBAL_START]));
        let mut states = BTreeSet::from([start]);
        compute_closure(&mut states, |s| conv.expand(s));
        let mut sets: Vec<_> = conv.state_info.iter().map(|i| &i.nfa_states).collect();
        let n = sets.len();
        sets.sort();
        sets.dedup();
        assert_eq!(sets.len(), n);
        assert_eq!(conv.corresponding.len(), n);
    }

    #[test]
    fn parse_failure_names_the_rule() {
        let rules = vec![
            LexRule::new("a", Symbol::new("A", 0)),
            LexRule::new("[]", Symbol::new("BAD", 1)),
        ];
        let err = compile(&rules).unwrap_err();
        let CompileError::Regex { index, symbol, .. } = err;
        assert_eq!((index, symbol.as_str()), (1, "BAD"));
    }
}
