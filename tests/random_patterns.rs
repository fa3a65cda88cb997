//! Randomized cross-check: the compiled DFA must classify every input the
//! same way as a direct walk of the merged NFA.
//!
//!   FUZZ_SEED=... (default 42)

use lexc::{
    dev::generator::{gen_input, gen_rules},
    lexer::tables::{compile, convert, merge_rules},
    util::env_u64,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[test]
fn dfa_agrees_with_nfa() {
    let seed = env_u64("FUZZ_SEED", 42);
    let mut rng = StdRng::seed_from_u64(seed);

    for case in 0..200 {
        let n = rng.random_range(1..=4);
        let rules = gen_rules(&mut rng, n);
        let merged = merge_rules(&rules).unwrap();
        let dfa = convert(&merged);

        for _ in 0..32 {
            let input = gen_input(&mut rng, 6);
            assert_eq!(
                dfa.classify(&input),
                merged.classify(&input),
                "seed {seed} case {case}: input {:?} rules {rules:?}",
                String::from_utf8_lossy(&input)
            );
        }
    }
}

#[test]
fn random_rule_sets_compile_deterministically() {
    let mut rng = StdRng::seed_from_u64(env_u64("FUZZ_SEED", 42));
    for _ in 0..100 {
        let n = rng.random_range(1..=5);
        let rules = gen_rules(&mut rng, n);
        let a = compile(&rules).unwrap();
        let b = compile(&rules).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.start(), 0);
        for s in 0..a.num_states() as u32 {
            for &to in a.row(s).unwrap().values() {
                assert!((to as usize) < a.num_states());
            }
        }
    }
}
