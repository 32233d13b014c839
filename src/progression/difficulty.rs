//! Level → difficulty descriptor and XP reward.
//!
//! Multipliers are held in basis points (1/10000) and combined with
//! saturating integer arithmetic, so the curve is exactly monotonic and no
//! `u64` level can overflow it. `f64` is produced only at the edge.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use serde::Serialize;

use crate::core::config::RewardConfig;
use crate::core::errors::{PseError, Result};

/// Basis points per 1.0 of multiplier.
pub const BASIS_POINTS: u64 = 10_000;

/// Ordered difficulty bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
    Insane,
    Legendary,
}

impl DifficultyTier {
    pub const ALL: [Self; 8] = [
        Self::Beginner,
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Expert,
        Self::Master,
        Self::Insane,
        Self::Legendary,
    ];

    /// First level that belongs to this tier.
    #[must_use]
    pub const fn start_level(self) -> u64 {
        match self {
            Self::Beginner => 1,
            Self::Easy => 6,
            Self::Medium => 11,
            Self::Hard => 21,
            Self::Expert => 36,
            Self::Master => 51,
            Self::Insane => 76,
            Self::Legendary => 101,
        }
    }

    /// Last level of the tier; `None` for the open-ended top tier.
    #[must_use]
    pub const fn end_level(self) -> Option<u64> {
        match self {
            Self::Beginner => Some(5),
            Self::Easy => Some(10),
            Self::Medium => Some(20),
            Self::Hard => Some(35),
            Self::Expert => Some(50),
            Self::Master => Some(75),
            Self::Insane => Some(100),
            Self::Legendary => None,
        }
    }

    #[must_use]
    pub const fn base_bp(self) -> u64 {
        match self {
            Self::Beginner => 10_000,
            Self::Easy => 12_000,
            Self::Medium => 15_000,
            Self::Hard => 20_000,
            Self::Expert => 25_000,
            Self::Master => 30_000,
            Self::Insane => 40_000,
            Self::Legendary => 50_000,
        }
    }

    #[must_use]
    pub const fn step_bp(self) -> u64 {
        match self {
            Self::Beginner | Self::Medium => 500,
            Self::Easy => 600,
            Self::Hard | Self::Expert => 300,
            Self::Master | Self::Insane => 200,
            Self::Legendary => 100,
        }
    }

    /// Tier containing `level`. Level 0 maps to `Beginner`; callers validate.
    #[must_use]
    pub const fn for_level(level: u64) -> Self {
        match level {
            0..=5 => Self::Beginner,
            6..=10 => Self::Easy,
            11..=20 => Self::Medium,
            21..=35 => Self::Hard,
            36..=50 => Self::Expert,
            51..=75 => Self::Master,
            76..=100 => Self::Insane,
            _ => Self::Legendary,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "beginner",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
            Self::Master => "master",
            Self::Insane => "insane",
            Self::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

/// Numeric difficulty for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyDescriptor {
    pub level: u64,
    pub tier: DifficultyTier,
    /// Levels past the tier's first level.
    pub modifier: u64,
    /// Exact multiplier in basis points.
    pub multiplier_bp: u64,
    /// `multiplier_bp / 10000`; always >= 1.0.
    pub multiplier: f64,
}

/// Scale a 1-based level into its difficulty descriptor.
pub fn difficulty_for_level(level: u64) -> Result<DifficultyDescriptor> {
    if level == 0 {
        return Err(PseError::InvalidLevel { level });
    }
    let tier = DifficultyTier::for_level(level);
    let modifier = level - tier.start_level();
    let multiplier_bp = tier
        .base_bp()
        .saturating_add(modifier.saturating_mul(tier.step_bp()));
    Ok(DifficultyDescriptor {
        level,
        tier,
        modifier,
        multiplier_bp,
        multiplier: multiplier_bp as f64 / BASIS_POINTS as f64,
    })
}

/// `floor((base_xp + level * level_coefficient) * multiplier)`, saturating.
#[must_use]
pub fn xp_reward(level: u64, descriptor: &DifficultyDescriptor, rewards: &RewardConfig) -> u64 {
    let raw = u128::from(rewards.base_xp)
        .saturating_add(u128::from(level).saturating_mul(u128::from(rewards.level_coefficient)));
    let scaled = raw.saturating_mul(u128::from(descriptor.multiplier_bp)) / u128::from(BASIS_POINTS);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
