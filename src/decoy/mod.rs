//! Decoy password generation for the memory game.

pub mod generator;
pub mod mutation;
