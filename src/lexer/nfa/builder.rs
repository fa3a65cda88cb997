// src/lexer/nfa/builder.rs
// Thompson-style construction: one regex tree -> one NFA with start 0 and
// accept 1. Each construct gets its own entry/exit states so a loop can
// never leak into a sibling branch.

use super::{ACCEPT, Entry, Nfa, START, StateId};
use crate::lexer::regex::Node;

struct NfaBuilder {
    nfa: Nfa,
    next_state: StateId,
}

impl NfaBuilder {
    fn new_state(&mut self) -> StateId {
        let id = self.next_state;
        self.next_state += 1;
        id
    }

    /// Wires `node` between the existing states `from` and `to`.
    fn build(&mut self, node: &Node, from: StateId, to: StateId) {
        match node {
            Node::Chars(set) => {
                for c in set.iter() {
                    self.nfa.add_transition(from, c, to);
                }
            }
            Node::Concat(seq) => {
                let Some((last, init)) = seq.split_last() else {
                    self.nfa.add_epsilon(from, to);
                    return;
                };
                let mut cur = from;
                for child in init {
                    let mid = self.new_state();
                    self.build(child, cur, mid);
                    cur = mid;
                }
                self.build(last, cur, to);
            }
            Node::Alternation(alts) => {
                for alt in alts {
                    let (s, e) = (self.new_state(), self.new_state());
                    self.nfa.add_epsilon(from, s);
                    self.build(alt, s, e);
                    self.nfa.add_epsilon(e, to);
                }
            }
            Node::Star(inner) => {
                let (s, e) = (self.new_state(), self.new_state());
                self.nfa.add_epsilon(from, s);
                self.build(inner, s, e);
                self.nfa.add_epsilon(e, s);
                self.nfa.add_epsilon(s, to);
            }
            Node::Option(inner) => {
                let (s, e) = (self.new_state(), self.new_state());
                self.nfa.add_epsilon(from, s);
                self.build(inner, s, e);
                self.nfa.add_epsilon(e, to);
                self.nfa.add_epsilon(from, to);
            }
        }
    }
}

/// Builds the NFA for one parsed pattern. Pure: the same tree always
/// yields the same table.
pub fn build_nfa(root: &Node) -> Nfa {
    let mut b = NfaBuilder {
        nfa: Nfa::default(),
        next_state: ACCEPT + 1,
    };
    b.nfa.table.insert(START, Entry::new());
    b.nfa.table.insert(ACCEPT, Entry::new());
    b.build(root, START, ACCEPT);
    b.nfa
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::lexer::charset::EPSILON;
    use crate::lexer::nfa::compute_closure;
    use crate::lexer::regex::parse;

    fn accepts(nfa: &Nfa, input: &str) -> bool {
        let eclose = |set: &mut BTreeSet<StateId>| {
            compute_closure(set, |s| nfa.targets(s, EPSILON).collect::<Vec<_>>())
        };
        let mut cur = BTreeSet::from([START]);
        eclose(&mut cur);
        for &c in input.as_bytes() {
            let mut next: BTreeSet<StateId> =
                cur.iter().flat_map(|&s| nfa.targets(s, c)).collect();
            eclose(&mut next);
            cur = next;
        }
        cur.contains(&ACCEPT)
    }

    fn nfa_for(pattern: &str) -> Nfa {
        build_nfa(&parse(pattern).unwrap())
    }

    #[test]
    fn single_char_is_one_edge() {
        let nfa = nfa_for("a");
        assert_eq!(nfa.targets(START, b'a').collect::<Vec<_>>(), vec![ACCEPT]);
        assert_eq!(nfa.num_states(), 2);
    }

    #[test]
    fn star_option_alternation_languages() {
        let nfa = nfa_for("a(b|c)*d?");
        for ok in ["a", "ab", "acbd", "ad", "abbbcc"] {
            assert!(accepts(&nfa, ok), "should accept {ok:?}");
        }
        for bad in ["", "b", "add", "abda"] {
            assert!(!accepts(&nfa, bad), "should reject {bad:?}");
        }
    }

    #[test]
    fn star_loop_does_not_leak_into_siblings() {
        // With a loop state shared across branches, "a*|b" would also take "ab".
        let nfa = nfa_for("a*|b");
        assert!(accepts(&nfa, "aaa"));
        assert!(accepts(&nfa, "b"));
        assert!(!accepts(&nfa, "ab"));
        assert!(!accepts(&nfa, "bb"));
    }

    #[test]
    fn construction_is_pure() {
        let tree = parse("(x|y)*z").unwrap();
        assert_eq!(build_nfa(&tree), build_nfa(&tree));
    }
}
