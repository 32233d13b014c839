//! Memory game round: show a password briefly, then pick it out of a line-up
//! of decoys.

#![allow(missing_docs)]

use rand::Rng;
use serde::Serialize;

use crate::core::config::EngineConfig;
use crate::core::errors::{PseError, Result};
use crate::decoy::generator::{DisplayOrder, generate_decoys, random_reference};
use crate::progression::difficulty::{DifficultyDescriptor, difficulty_for_level, xp_reward};

/// Guesses allowed per round.
pub const MAX_ATTEMPTS: u8 = 3;

/// Memory game brackets. Coarser than the difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryBracket {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl MemoryBracket {
    #[must_use]
    pub const fn for_level(level: u64) -> Self {
        match level {
            0..=5 => Self::Beginner,
            6..=10 => Self::Easy,
            11..=20 => Self::Medium,
            21..=35 => Self::Hard,
            _ => Self::Expert,
        }
    }

    #[must_use]
    pub const fn decoy_count(self) -> usize {
        match self {
            Self::Beginner => 3,
            Self::Easy => 5,
            Self::Medium => 7,
            Self::Hard => 9,
            Self::Expert => 11,
        }
    }

    /// Seconds the reference stays visible.
    #[must_use]
    pub const fn display_seconds(self) -> u32 {
        match self {
            Self::Beginner => 10,
            Self::Easy => 8,
            Self::Medium => 7,
            Self::Hard => 6,
            Self::Expert => 5,
        }
    }

    /// Length of generated references.
    #[must_use]
    pub const fn min_length(self) -> usize {
        match self {
            Self::Beginner => 8,
            Self::Easy => 10,
            Self::Medium => 12,
            Self::Hard => 14,
            Self::Expert => 16,
        }
    }
}

/// One memory game round with its display order fixed.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryChallenge {
    pub level: u64,
    pub difficulty: DifficultyDescriptor,
    pub bracket: MemoryBracket,
    pub reference: String,
    pub display: DisplayOrder,
    pub display_seconds: u32,
    pub max_attempts: u8,
    pub xp_reward: u64,
}

impl MemoryChallenge {
    /// Build a round for `level`. A random reference of the bracket's length
    /// is generated when `reference` is `None`.
    pub fn for_level<R: Rng + ?Sized>(
        level: u64,
        reference: Option<&str>,
        rng: &mut R,
        config: &EngineConfig,
    ) -> Result<Self> {
        let difficulty = difficulty_for_level(level)?;
        let bracket = MemoryBracket::for_level(level);

        let reference = match reference {
            Some("") => {
                return Err(PseError::EmptyPassword {
                    context: "memory challenge",
                });
            }
            Some(r) => r.to_string(),
            None => random_reference(bracket.min_length(), rng),
        };

        let decoys = generate_decoys(&reference, bracket.decoy_count(), rng, &config.decoys)?;
        let display = DisplayOrder::new(reference.clone(), decoys, rng);

        Ok(Self {
            level,
            difficulty,
            bracket,
            reference,
            display,
            display_seconds: bracket.display_seconds(),
            max_attempts: MAX_ATTEMPTS,
            xp_reward: xp_reward(level, &difficulty, &config.rewards),
        })
    }

    /// Whether option `choice` is the reference.
    #[must_use]
    pub fn check(&self, choice: usize) -> bool {
        self.display.is_correct(choice)
    }
}
