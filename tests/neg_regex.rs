//! Negative compile tests: malformed patterns must abort the whole compile.

use lexc::{
    CompileError, RegexError,
    lexer::tables::{LexRule, Symbol, compile, rules_in_order},
};

fn regex_err(pattern: &str) -> RegexError {
    match compile(&rules_in_order([(pattern, "R")])) {
        Err(CompileError::Regex { source, .. }) => source,
        Ok(_) => panic!("{pattern:?} should not compile"),
    }
}

#[test]
fn empty_class() {
    assert!(matches!(regex_err("[]"), RegexError::EmptyClass { .. }));
}

#[test]
fn negated_alphabet_is_empty() {
    let mut pattern = String::from("[^");
    for b in 1u8..128 {
        pattern.push('\\');
        pattern.push(b as char);
    }
    pattern.push(']');
    assert!(matches!(regex_err(&pattern), RegexError::EmptyClass { offset: 0 }));
    assert!(matches!(regex_err("ab[]c"), RegexError::EmptyClass { offset: 2 }));
}

#[test]
fn stray_closing_bracket() {
    assert!(matches!(
        regex_err("ab]"),
        RegexError::UnmatchedBracket { offset: 2 }
    ));
}

#[test]
fn unterminated_class() {
    assert!(matches!(
        regex_err("a[bc"),
        RegexError::UnterminatedClass { offset: 1 }
    ));
}

#[test]
fn unbalanced_groups() {
    assert!(matches!(regex_err("(a"), RegexError::UnclosedGroup { open: 1 }));
    assert!(matches!(regex_err("a)"), RegexError::UnmatchedParen { offset: 1 }));
    assert!(matches!(regex_err("(a))("), RegexError::UnmatchedParen { offset: 3 }));
}

#[test]
fn trailing_escape() {
    assert!(matches!(regex_err("a\\"), RegexError::TrailingEscape { .. }));
    assert!(matches!(regex_err("[a\\"), RegexError::TrailingEscape { .. }));
}

#[test]
fn dangling_quantifier() {
    assert!(matches!(regex_err("*"), RegexError::NothingToRepeat { quantifier: '*', .. }));
    assert!(matches!(regex_err("(?a)"), RegexError::NothingToRepeat { quantifier: '?', .. }));
}

#[test]
fn byte_outside_alphabet() {
    assert!(matches!(
        regex_err("caf\u{e9}"),
        RegexError::OutsideAlphabet { byte: 0xC3, offset: 3 }
    ));
}

#[test]
fn first_bad_rule_aborts_everything() {
    let rules = vec![
        LexRule::new("ok", Symbol::new("Ok", 0)),
        LexRule::new("(", Symbol::new("Bad", 1)),
        LexRule::new("[]", Symbol::new("AlsoBad", 2)),
    ];
    let err = compile(&rules).unwrap_err();
    let CompileError::Regex { index, symbol, .. } = &err;
    assert_eq!(*index, 1);
    assert_eq!(symbol, "Bad");
    assert!(err.to_string().contains("Bad"));
}
