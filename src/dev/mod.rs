// src/dev/mod.rs
// Shared random generators for the fuzz tool and the randomized tests.
pub mod generator;
