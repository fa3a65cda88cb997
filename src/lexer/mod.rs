// src/lexer/mod.rs
pub mod charset;
pub mod cpu;
pub mod nfa;
pub mod regex;
pub mod tables;
