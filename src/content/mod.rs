//! Game-facing orchestrators built on the engine modules.

pub mod cracker;
pub mod health;
pub mod memory;
