//! Weakness analyzer: static rule tables and flag classification.

pub mod rules;
pub mod weakness;
