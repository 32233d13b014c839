#![forbid(unsafe_code)]

//! Password Security Engine (pse): deterministic content generation for
//! password-security training games.
//!
//! The engine covers five concerns:
//! 1. **Strength model**: entropy, tier and crack-time estimates
//! 2. **Weakness analyzer**: rule-table classification into weakness flags
//! 3. **Difficulty scaler**: unbounded level index to tier, multiplier and XP
//! 4. **Decoy generator**: near-duplicate passwords for the memory game
//! 5. **Crack simulation**: paced, cancellable reveal frames
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use password_security_engine::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use password_security_engine::core::config::EngineConfig;
//! use password_security_engine::strength::entropy::{CharacterClasses, entropy_bits};
//! ```

pub mod prelude;

pub mod analyzer;
pub mod content;
pub mod core;
pub mod decoy;
pub mod logger;
pub mod progression;
pub mod simulation;
pub mod strength;
