// src/dev/generator.rs
// Random rule sets over a tiny alphabet, so that generated inputs hit
// overlapping rules often.

use rand::Rng;

use crate::lexer::tables::{LexRule, Symbol};

/// Letters used by generated patterns. Inputs also draw from `INPUT_BYTES`,
/// which adds one byte no literal matches.
pub const PATTERN_LETTERS: &[u8] = b"abc";
pub const INPUT_BYTES: &[u8] = b"abcd";

const CLASSES: &[&str] = &["[ab]", "[^a]", "[bc]", "[^\\l]"];

fn random_letter<R: Rng>(rng: &mut R) -> char {
    PATTERN_LETTERS[rng.random_range(0..PATTERN_LETTERS.len())] as char
}

fn push_atom<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    match rng.random_range(0u32..10) {
        0..=5 => out.push(random_letter(rng)),
        6 => out.push('.'),
        7 => out.push_str(CLASSES[rng.random_range(0..CLASSES.len())]),
        _ if depth > 0 => {
            out.push('(');
            push_alternation(rng, depth - 1, out);
            out.push(')');
        }
        _ => out.push(random_letter(rng)),
    }
}

fn push_sequence<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    let len = rng.random_range(1..=3);
    for _ in 0..len {
        push_atom(rng, depth, out);
        match rng.random_range(0u32..10) {
            0 | 1 => out.push('*'),
            2 => out.push('?'),
            _ => {}
        }
    }
}

fn push_alternation<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    let n = if rng.random_bool(0.3) {
        rng.random_range(2..=3)
    } else {
        1
    };
    for i in 0..n {
        if i > 0 {
            out.push('|');
        }
        push_sequence(rng, depth, out);
    }
}

/// A syntactically valid pattern with groups nested at most `depth` deep.
pub fn gen_pattern<R: Rng>(rng: &mut R, depth: u32) -> String {
    let mut out = String::new();
    push_alternation(rng, depth, &mut out);
    out
}

/// `count` rules named `R0..`; priorities are random draws so they do not
/// always follow declaration order.
pub fn gen_rules<R: Rng>(rng: &mut R, count: usize) -> Vec<LexRule> {
    (0..count)
        .map(|i| {
            let priority = rng.random_range(0..(count as u32 * 2).max(1));
            LexRule::new(gen_pattern(rng, 2), Symbol::new(format!("R{i}"), priority))
        })
        .collect()
}

pub fn gen_input<R: Rng>(rng: &mut R, max_len: usize) -> Vec<u8> {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .map(|_| INPUT_BYTES[rng.random_range(0..INPUT_BYTES.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::lexer::regex::parse;

    #[test]
    fn generated_patterns_parse() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = gen_pattern(&mut rng, 3);
            assert!(parse(&p).is_ok(), "generator produced invalid pattern {p:?}");
        }
    }
}
