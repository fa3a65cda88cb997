// src/lib.rs
pub mod dev;
pub mod error;
pub mod lexer;
pub mod util;

pub use error::{CompileError, RegexError, ScanError, TablesError};
pub use lexer::tables::{Dfa, LexRule, Symbol, compile};
