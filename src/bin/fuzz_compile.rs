// src/bin/fuzz_compile.rs
// Generate random rule sets, compile them, and check the DFA against a
// direct simulation of the merged NFA.
//   FUZZ_SEED=...    rng seed (default 42)
//   FUZZ_CASES=...   rule sets to try (default 2000)
//   FUZZ_INPUTS=...  inputs per rule set (default 64)

use anyhow::{Result, bail};
use lexc::{
    dev::generator::{gen_input, gen_rules},
    lexer::tables::{compile, convert, merge_rules, rules_to_json_string},
    util::{env_u64, env_usize},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let seed = env_u64("FUZZ_SEED", 42);
    let cases = env_usize("FUZZ_CASES", 2000);
    let inputs = env_usize("FUZZ_INPUTS", 64);
    eprintln!("[fuzz] cases={cases} inputs={inputs} seed={seed}");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut max_states = 0usize;

    for case in 0..cases {
        let n_rules = rng.random_range(1..=4);
        let rules = gen_rules(&mut rng, n_rules);

        let merged = merge_rules(&rules)?;
        let dfa = convert(&merged);
        max_states = max_states.max(dfa.num_states());

        if compile(&rules)? != dfa {
            bail!(
                "case {case}: compiling twice gave different tables\n{}",
                rules_to_json_string(&rules)?
            );
        }

        for _ in 0..inputs {
            let input = gen_input(&mut rng, 8);
            let want = merged.classify(&input);
            let got = dfa.classify(&input);
            if want != got {
                bail!(
                    "case {case}: input {:?}: NFA says {:?}, DFA says {:?}\n{}",
                    String::from_utf8_lossy(&input),
                    want.map(|s| &s.name),
                    got.map(|s| &s.name),
                    rules_to_json_string(&rules)?
                );
            }
        }
    }

    eprintln!("[fuzz] all {cases} cases matched, largest DFA = {max_states} states");
    Ok(())
}
