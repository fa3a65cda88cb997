// src/lexer/regex/parser.rs
// Dual-stack operator-precedence regex parser.
//
// Precedence: quantifier > concatenation > alternation. Concatenation
// folds lazily: a pending Concat marker only collapses when the next
// operand arrives, so a postfix quantifier still sees the last operand
// on its own.

use super::ast::Node;
use crate::error::RegexError;
use crate::lexer::charset::{ALPHABET, CharSet, chars_for_escape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Concat,
    Alternation,
    Group,
}

#[derive(Default)]
struct RegexParser {
    stack: Vec<Node>,
    operators: Vec<Operator>,
}

impl RegexParser {
    fn pop(&mut self) -> Result<Node, RegexError> {
        self.stack
            .pop()
            .ok_or(RegexError::Internal("operand stack underflow"))
    }

    fn chars(&mut self, set: CharSet) {
        self.stack.push(Node::Chars(set));
    }

    fn fold(op: Operator, x1: Node, x2: Node) -> Result<Node, RegexError> {
        match (op, x1) {
            (Operator::Alternation, Node::Alternation(mut alts)) => {
                alts.push(x2);
                Ok(Node::Alternation(alts))
            }
            (Operator::Alternation, x1) => Ok(Node::Alternation(vec![x1, x2])),
            (Operator::Concat, Node::Concat(mut seq)) => {
                seq.push(x2);
                Ok(Node::Concat(seq))
            }
            (Operator::Concat, _) => Err(RegexError::Internal(
                "concatenation target is not a sequence",
            )),
            (Operator::Group, _) => Err(RegexError::Internal(
                "group boundary reached a reduction",
            )),
        }
    }

    fn reduce(&mut self, op: Operator) -> Result<(), RegexError> {
        let x2 = self.pop()?;
        let x1 = self.pop()?;
        let folded = Self::fold(op, x1, x2).inspect_err(|e| log::error!("{e}"))?;
        self.stack.push(folded);
        Ok(())
    }

    /// Called before every operand that joins the current sequence.
    fn concat(&mut self) -> Result<(), RegexError> {
        while self.operators.last() == Some(&Operator::Concat) {
            self.operators.pop();
            self.reduce(Operator::Concat)?;
        }
        self.operators.push(Operator::Concat);
        Ok(())
    }

    fn alternation(&mut self) -> Result<(), RegexError> {
        while let Some(&op) = self.operators.last() {
            if op == Operator::Group {
                break;
            }
            self.operators.pop();
            self.reduce(op)?;
        }
        self.operators.push(Operator::Alternation);
        self.stack.push(Node::empty_concat());
        Ok(())
    }

    fn begin_group(&mut self) {
        self.operators.push(Operator::Group);
        self.stack.push(Node::empty_concat());
    }

    fn end_group(&mut self) -> Result<(), RegexError> {
        loop {
            match self.operators.pop() {
                Some(Operator::Group) => return Ok(()),
                Some(op) => self.reduce(op)?,
                None => return Err(RegexError::Internal("group boundary missing")),
            }
        }
    }

    fn apply(&mut self, wrap: fn(Box<Node>) -> Node) -> Result<(), RegexError> {
        let x = self.pop()?;
        self.stack.push(wrap(Box::new(x)));
        Ok(())
    }

    fn result(mut self) -> Result<Node, RegexError> {
        if self.stack.len() != 1 || !self.operators.is_empty() {
            return Err(RegexError::Internal("parse did not reduce to a single root"));
        }
        self.pop()
    }
}

#[inline]
fn check_alphabet(byte: u8, offset: usize) -> Result<(), RegexError> {
    if ALPHABET.contains(byte) {
        Ok(())
    } else {
        Err(RegexError::OutsideAlphabet { byte, offset })
    }
}

/// Scans `[...]` / `[^...]` starting at `open`. Returns the set and the
/// offset of the closing `]`.
fn parse_class(src: &[u8], open: usize) -> Result<(CharSet, usize), RegexError> {
    let mut i = open + 1;
    let negated = src.get(i) == Some(&b'^');
    if negated {
        i += 1;
    }
    let mut set = if negated { ALPHABET } else { CharSet::empty() };

    loop {
        let Some(&c) = src.get(i) else {
            return Err(RegexError::UnterminatedClass { offset: open });
        };
        check_alphabet(c, i)?;
        let members = match c {
            b']' => break,
            b'\\' => {
                i += 1;
                let Some(&e) = src.get(i) else {
                    return Err(RegexError::TrailingEscape { offset: i - 1 });
                };
                check_alphabet(e, i)?;
                chars_for_escape(e)
            }
            other => CharSet::single(other),
        };
        if negated {
            set.remove_all(members);
        } else {
            set.insert_all(members);
        }
        i += 1;
    }

    if set.is_empty() {
        return Err(RegexError::EmptyClass { offset: open });
    }
    Ok((set, i))
}

/// Parses one rule pattern into its tree. The whole pattern is treated as
/// one implicit group, so the result is always a single root.
pub fn parse(pattern: &str) -> Result<Node, RegexError> {
    let src = pattern.as_bytes();
    let mut p = RegexParser::default();
    let mut depth = 0usize;
    // Whether the last token produced an operand a quantifier can bind to.
    let mut can_repeat = false;

    p.begin_group();
    let mut i = 0;
    while i < src.len() {
        let c = src[i];
        check_alphabet(c, i)?;
        match c {
            b'|' => {
                p.alternation()?;
                can_repeat = false;
            }
            b'(' => {
                p.concat()?;
                p.begin_group();
                depth += 1;
                can_repeat = false;
            }
            b')' => {
                if depth == 0 {
                    return Err(RegexError::UnmatchedParen { offset: i });
                }
                p.end_group()?;
                depth -= 1;
                can_repeat = true;
            }
            b'*' | b'?' => {
                if !can_repeat {
                    return Err(RegexError::NothingToRepeat {
                        quantifier: c as char,
                        offset: i,
                    });
                }
                let wrap: fn(Box<Node>) -> Node = if c == b'*' {
                    Node::Star
                } else {
                    Node::Option
                };
                p.apply(wrap)?;
            }
            b'.' => {
                p.concat()?;
                p.chars(ALPHABET);
                can_repeat = true;
            }
            b'[' => {
                let (set, close) = parse_class(src, i)?;
                p.concat()?;
                p.chars(set);
                i = close;
                can_repeat = true;
            }
            b']' => return Err(RegexError::UnmatchedBracket { offset: i }),
            b'\\' => {
                let Some(&e) = src.get(i + 1) else {
                    return Err(RegexError::TrailingEscape { offset: i });
                };
                check_alphabet(e, i + 1)?;
                p.concat()?;
                p.chars(chars_for_escape(e));
                i += 1;
                can_repeat = true;
            }
            _ => {
                p.concat()?;
                p.chars(CharSet::single(c));
                can_repeat = true;
            }
        }
        i += 1;
    }

    if depth > 0 {
        return Err(RegexError::UnclosedGroup { open: depth });
    }
    p.end_group()?;
    p.result()
}
