//! Error types for regex parsing, rule compilation, scanning and table I/O.
//!
//! Every failure is a hard stop: nothing here carries a partial AST, NFA or
//! DFA back to the caller.

use thiserror::Error;

/// Syntax errors in a single rule pattern. Offsets are byte offsets into
/// the pattern text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("mismatched brackets []: unexpected ']' at offset {offset}")]
    UnmatchedBracket { offset: usize },

    #[error("unterminated character class starting at offset {offset}")]
    UnterminatedClass { offset: usize },

    #[error("empty character class at offset {offset}")]
    EmptyClass { offset: usize },

    #[error("unmatched ')' at offset {offset}")]
    UnmatchedParen { offset: usize },

    #[error("{open} unclosed group(s) at end of pattern")]
    UnclosedGroup { open: usize },

    #[error("quantifier '{quantifier}' at offset {offset} has nothing to repeat")]
    NothingToRepeat { quantifier: char, offset: usize },

    #[error("pattern ends with an unfinished escape at offset {offset}")]
    TrailingEscape { offset: usize },

    #[error("byte 0x{byte:02X} at offset {offset} is outside the lexer alphabet")]
    OutsideAlphabet { byte: u8, offset: usize },

    /// The parser's own stack discipline broke. Not caused by bad input.
    #[error("internal regex parser error: {0}")]
    Internal(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("rule #{index} ({symbol}): {source}")]
    Regex {
        index: usize,
        symbol: String,
        #[source]
        source: RegexError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no rule matches input at byte {offset}")]
    NoMatch { offset: usize },
}

#[derive(Debug, Error)]
pub enum TablesError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize tables JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad magic in compact DFA .bin")]
    BadMagic,

    #[error("truncated compact DFA .bin: {0}")]
    Truncated(&'static str),

    #[error("malformed DFA tables: {0}")]
    Malformed(String),
}
