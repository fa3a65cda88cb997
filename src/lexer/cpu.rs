// src/lexer/cpu.rs
// Maximal-munch scanner over a compiled DFA. Used by the demo and as the
// end-to-end oracle in tests.

use crate::error::ScanError;
use crate::lexer::tables::{Dfa, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'d> {
    pub symbol: &'d Symbol,
    pub start: usize,
    pub len: usize,
}

impl Token<'_> {
    pub fn lexeme<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.start + self.len]
    }
}

/// Printable window around `i`, with its byte range in `src`.
fn slice_dbg(src: &[u8], i: usize) -> (usize, usize, String) {
    let lo = i.saturating_sub(16);
    let hi = (i + 16).min(src.len());
    let mut s = String::new();
    for &b in &src[lo..hi] {
        s.push(
            if b.is_ascii_graphic() || b == b' ' || b == b'\n' || b == b'\t' || b == b'\r' {
                b as char
            } else {
                '·'
            },
        );
    }
    (lo, hi, s)
}

/// Longest non-empty match from `start`, with the symbol its end state
/// resolved to.
pub fn longest_match<'d>(
    dfa: &'d Dfa,
    bytes: &[u8],
    start: usize,
) -> Option<(usize, &'d Symbol)> {
    let mut state = Dfa::START;
    let mut last = None;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        let Some(next) = dfa.next(state, b) else {
            break;
        };
        state = next;
        if let Some(sym) = dfa.accepting(state) {
            last = Some((i + 1, sym));
        }
    }
    last
}

/// Splits `input` into tokens, always taking the longest match. Empty
/// matches never form a token.
pub fn scan<'d>(dfa: &'d Dfa, input: &str) -> Result<Vec<Token<'d>>, ScanError> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some((end, symbol)) = longest_match(dfa, bytes, pos) else {
            let (ctx_lo, ctx_hi, ctx) = slice_dbg(bytes, pos);
            log::debug!(
                "no match at byte {pos} (0x{:02X}); context [{}..{}):\n{}",
                bytes[pos],
                ctx_lo,
                ctx_hi,
                ctx
            );
            return Err(ScanError::NoMatch { offset: pos });
        };
        out.push(Token {
            symbol,
            start: pos,
            len: end - pos,
        });
        pos = end;
    }
    Ok(out)
}
