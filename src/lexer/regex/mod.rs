// src/lexer/regex/mod.rs
pub mod ast;
pub mod parser;

pub use ast::Node;
pub use parser::parse;
