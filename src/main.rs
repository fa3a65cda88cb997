// src/main.rs
use lexc::lexer::{
    cpu::scan,
    tables::{compile, rules_in_order},
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A tiny rule set covering keywords, identifiers, ints, comments, and symbols.
    let rules = rules_in_order([
        ("if|else|while", "Keyword"),
        (r"[\l_]\w*", "Ident"),
        (r"\d\d*", "Int"),
        (r"[ \t\n]", "White"),
        (r"//[^\n]*", "LineComment"),
        (r"==|=|\+|\*|/|\(|\)", "Op"),
    ]);
    let dfa = compile(&rules)?;

    let src = "if (foo == 12) bar = bar * 7 // hello\nwhile x";
    println!("TOKENS:");
    for t in scan(&dfa, src)? {
        if t.symbol.name == "White" {
            continue;
        }
        println!("{:<12} {:?}", t.symbol.name, t.lexeme(src));
    }
    Ok(())
}
