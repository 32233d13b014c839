//! Password cracker round: a known-weak password whose weaknesses the player
//! must identify.

#![allow(missing_docs)]

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::analyzer::weakness::{WeaknessFlag, analyze_weaknesses};
use crate::core::config::EngineConfig;
use crate::core::errors::{PseError, Result};
use crate::progression::difficulty::{DifficultyDescriptor, difficulty_for_level, xp_reward};

/// Bonus XP per weakness present in the round's password.
pub const XP_PER_WEAKNESS: u64 = 5;

/// Weak passwords by tier, easiest first.
static WEAK_PASSWORDS: [&[&str]; 8] = [
    &["password", "123456", "qwerty", "abc123", "letmein"],
    &["password1", "12345678", "qwerty123", "welcome", "admin"],
    &["Password1", "Welcome1", "Admin123", "User1234"],
    &["P@ssword", "Passw0rd", "Admin@123", "Welcome!"],
    &["Password123", "Welcome2024", "Admin@2024"],
    &["P@ssw0rd1", "Summer2024", "Winter2023"],
    &["MyPassword", "JohnDoe123", "Sarah1990"],
    &["P@ssw0rd!", "Tr0ub4dor&3", "C0rrectH0rse"],
];

/// Password tier (1..=8) for `level`.
#[must_use]
pub const fn password_tier(level: u64) -> u8 {
    match level {
        0..=5 => 1,
        6..=10 => 2,
        11..=15 => 3,
        16..=20 => 4,
        21..=30 => 5,
        31..=40 => 6,
        41..=50 => 7,
        _ => 8,
    }
}

#[must_use]
pub const fn hints_for_level(level: u64) -> u8 {
    match level {
        0..=10 => 3,
        11..=25 => 2,
        26..=50 => 1,
        _ => 0,
    }
}

#[must_use]
pub const fn time_limit_secs(level: u64) -> u32 {
    match level {
        0..=10 => 60,
        11..=25 => 45,
        26..=50 => 30,
        _ => 20,
    }
}

/// Candidate passwords for a tier (1..=8; out-of-range tiers clamp).
#[must_use]
pub fn passwords_for_tier(tier: u8) -> &'static [&'static str] {
    let index = usize::from(tier.clamp(1, 8)) - 1;
    WEAK_PASSWORDS[index]
}

/// Outcome of a player's weakness selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrackerVerdict {
    pub found: Vec<WeaknessFlag>,
    pub missed: Vec<WeaknessFlag>,
    pub false_positives: Vec<WeaknessFlag>,
}

impl CrackerVerdict {
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty() && self.false_positives.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrackerChallenge {
    pub level: u64,
    pub difficulty: DifficultyDescriptor,
    pub tier: u8,
    pub password: &'static str,
    pub weaknesses: Vec<WeaknessFlag>,
    pub hints_available: u8,
    pub time_limit_secs: u32,
    pub xp_reward: u64,
}

impl CrackerChallenge {
    pub fn for_level<R: Rng + ?Sized>(level: u64, rng: &mut R, config: &EngineConfig) -> Result<Self> {
        let difficulty = difficulty_for_level(level)?;
        let tier = password_tier(level);
        let password = passwords_for_tier(tier)
            .choose(rng)
            .copied()
            .ok_or_else(|| PseError::Runtime {
                details: format!("no weak passwords for tier {tier}"),
            })?;
        let weaknesses = analyze_weaknesses(password);
        let bonus = XP_PER_WEAKNESS.saturating_mul(weaknesses.len() as u64);

        Ok(Self {
            level,
            difficulty,
            tier,
            password,
            weaknesses,
            hints_available: hints_for_level(level),
            time_limit_secs: time_limit_secs(level),
            xp_reward: xp_reward(level, &difficulty, &config.rewards).saturating_add(bonus),
        })
    }

    /// Hint `index` (0-based), if the round still allows it.
    #[must_use]
    pub fn hint(&self, index: usize) -> Option<&'static str> {
        if index >= usize::from(self.hints_available) {
            return None;
        }
        self.weaknesses.get(index).map(|flag| flag.description())
    }

    /// Compare the player's selection with the actual weaknesses.
    #[must_use]
    pub fn evaluate(&self, selected: &[WeaknessFlag]) -> CrackerVerdict {
        let actual: BTreeSet<WeaknessFlag> = self.weaknesses.iter().copied().collect();
        let chosen: BTreeSet<WeaknessFlag> = selected.iter().copied().collect();
        CrackerVerdict {
            found: actual.intersection(&chosen).copied().collect(),
            missed: actual.difference(&chosen).copied().collect(),
            false_positives: chosen.difference(&actual).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn tier_boundaries() {
        let cases = [
            (1, 1),
            (5, 1),
            (6, 2),
            (10, 2),
            (15, 3),
            (20, 4),
            (30, 5),
            (40, 6),
            (50, 7),
            (51, 8),
            (u64::MAX, 8),
        ];
        for (level, tier) in cases {
            assert_eq!(password_tier(level), tier, "level {level}");
        }
    }

    #[test]
    fn hints_and_time_shrink_with_level() {
        assert_eq!((hints_for_level(10), time_limit_secs(10)), (3, 60));
        assert_eq!((hints_for_level(11), time_limit_secs(11)), (2, 45));
        assert_eq!((hints_for_level(50), time_limit_secs(50)), (1, 30));
        assert_eq!((hints_for_level(51), time_limit_secs(51)), (0, 20));
    }

    #[test]
    fn round_uses_tier_table_and_analyzer() {
        let mut rng = StdRng::seed_from_u64(99);
        let round = CrackerChallenge::for_level(3, &mut rng, &EngineConfig::default())
            .expect("round");
        assert!(passwords_for_tier(1).contains(&round.password));
        assert_eq!(round.weaknesses, analyze_weaknesses(round.password));
        assert!(!round.weaknesses.is_empty());
    }

    #[test]
    fn xp_adds_weakness_bonus() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = EngineConfig::default();
        let round = CrackerChallenge::for_level(1, &mut rng, &cfg).expect("round");
        let base = xp_reward(1, &round.difficulty, &cfg.rewards);
        assert_eq!(
            round.xp_reward,
            base + XP_PER_WEAKNESS * round.weaknesses.len() as u64
        );
    }

    #[test]
    fn hints_limited_by_level() {
        let mut rng = StdRng::seed_from_u64(2);
        let round = CrackerChallenge::for_level(60, &mut rng, &EngineConfig::default())
            .expect("round");
        assert_eq!(round.hints_available, 0);
        assert_eq!(round.hint(0), None);

        let round = CrackerChallenge::for_level(1, &mut rng, &EngineConfig::default())
            .expect("round");
        assert_eq!(round.hint(0), Some(round.weaknesses[0].description()));
        assert_eq!(round.hint(3), None);
    }

    #[test]
    fn evaluate_splits_selection() {
        let mut rng = StdRng::seed_from_u64(5);
        let round = CrackerChallenge::for_level(1, &mut rng, &EngineConfig::default())
            .expect("round");
        let perfect = round.evaluate(&round.weaknesses);
        assert!(perfect.is_perfect());

        let verdict = round.evaluate(&[WeaknessFlag::PersonalInfo]);
        assert_eq!(verdict.false_positives, vec![WeaknessFlag::PersonalInfo]);
        assert_eq!(verdict.missed.len(), round.weaknesses.len());
        assert!(!verdict.is_perfect());
    }

    #[test]
    fn every_table_password_is_weak_somehow() {
        for tier in 1..=8 {
            for password in passwords_for_tier(tier) {
                assert!(!analyze_weaknesses(password).is_empty(), "{password}");
            }
        }
    }
}
