//! Procedural difficulty scaling.

pub mod difficulty;
