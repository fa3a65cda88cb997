// src/lexer/regex/ast.rs
use std::fmt;

use crate::lexer::charset::{self, CharSet};

/// Regex parse tree. Parents own their children; no sharing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Chars(CharSet),
    Alternation(Vec<Node>),
    Star(Box<Node>),
    Option(Box<Node>),
    Concat(Vec<Node>),
}

impl Node {
    pub fn empty_concat() -> Self {
        Node::Concat(Vec::new())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Chars(_) => "chars",
            Node::Alternation(_) => "<|>",
            Node::Star(_) => "<*>",
            Node::Option(_) => "<?>",
            Node::Concat(_) => "<#>",
        }
    }

    /// Ordered children; quantifiers have exactly one, leaves none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Chars(_) => &[],
            Node::Alternation(c) | Node::Concat(c) => c,
            Node::Star(c) | Node::Option(c) => std::slice::from_ref(c.as_ref()),
        }
    }

    pub fn as_chars(&self) -> Option<CharSet> {
        match self {
            Node::Chars(s) => Some(*s),
            _ => None,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("    ")?;
        }
        f.write_str(self.kind())?;
        match self {
            Node::Chars(set) => {
                f.write_str("[")?;
                charset::write_members(f, *set)?;
                f.write_str("]\n")
            }
            _ => {
                f.write_str(" {\n")?;
                for child in self.children() {
                    child.fmt_indented(f, depth + 1)?;
                }
                for _ in 0..depth {
                    f.write_str("    ")?;
                }
                f.write_str("}\n")
            }
        }
    }
}

/// Debug-oriented tree dump, one node per line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
