// src/bin/gen_lex_tables.rs
// Compile a rules file into DFA tables and write them to JSON.
// Usage:
//   cargo run --bin gen_lex_tables                          # tables/lexer_rules.json -> tables/lexer_dfa.json
//   cargo run --bin gen_lex_tables -- rules.json out.json
//   LEXC_BIN=1 cargo run --bin gen_lex_tables               # also writes out.bin (compact)

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use lexc::{
    lexer::tables::{INVALID_TOKEN, compile, load_rules_json_bytes, save_dfa_bin, save_dfa_json},
    util::env_flag_true,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let rules_path = args
        .next()
        .unwrap_or_else(|| "tables/lexer_rules.json".to_string());
    let out = args
        .next()
        .unwrap_or_else(|| "tables/lexer_dfa.json".to_string());
    let out_path = Path::new(&out);

    let data =
        fs::read(&rules_path).with_context(|| format!("failed to read rules {rules_path}"))?;
    let rules = load_rules_json_bytes(&data)
        .with_context(|| format!("failed to parse rules {rules_path}"))?;
    println!("[gen_lex_tables] compiling {} rules…", rules.len());

    let dfa = compile(&rules)?;

    let dense = dfa.to_dense();
    let accepting = dense.token_of.iter().filter(|&&t| t != INVALID_TOKEN).count();
    println!(
        "[gen_lex_tables] {} DFA states ({} accepting), {} symbols, dense next = {} bytes (~{} KiB)",
        dense.n_states,
        accepting,
        dense.symbols.len(),
        dense.next.len() * 4,
        dense.next.len() * 4 / 1024
    );

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    save_dfa_json(out_path, &dfa)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_lex_tables] wrote {}", out_path.display());

    if env_flag_true("LEXC_BIN", false) {
        let bin_path = out_path.with_extension("bin");
        save_dfa_bin(&bin_path, &dfa)
            .with_context(|| format!("failed to write {}", bin_path.display()))?;
        println!("[gen_lex_tables] wrote {}", bin_path.display());
    }
    Ok(())
}
