//! Vault health report over a set of saved passwords.
//!
//! Generation settings for saved passwords are unknown, so entropy here is
//! the observed-class estimate rather than the generation-pool figure.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::weakness::{WeaknessFlag, analyze_weaknesses};
use crate::strength::entropy::{EntropyBits, StrengthTier, observed_entropy};

/// Passwords older than this many days are flagged for rotation.
pub const MAX_AGE_DAYS: u64 = 90;
/// Passwords below this entropy are flagged as low entropy.
pub const LOW_ENTROPY_BITS: f64 = 60.0;

const BASE_SCORE: i64 = 50;
const STRONG_RATIO_POINTS: f64 = 30.0;
const WEAK_RATIO_POINTS: f64 = 20.0;
const POINTS_PER_ISSUE: i64 = 5;
const MAX_ISSUE_PENALTY: i64 = 30;

/// Entropy a single saved password needs for `entropy_champion`.
pub const CHAMPION_ENTROPY_BITS: f64 = 200.0;

const COUNT_ACHIEVEMENTS: [(&str, u64); 4] = [
    ("first_password", 1),
    ("password_creator", 10),
    ("security_expert", 50),
    ("crypto_master", 100),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPassword {
    pub id: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecurityIssue {
    WeakPassword { id: String, tier: StrengthTier },
    OldPassword { id: String, age_days: u64 },
    LowEntropy { id: String, bits: f64 },
}

impl SecurityIssue {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::WeakPassword { id, .. } | Self::OldPassword { id, .. } | Self::LowEntropy { id, .. } => id,
        }
    }

    #[must_use]
    pub const fn recommendation(&self) -> &'static str {
        match self {
            Self::WeakPassword { .. } => "Generate a stronger password with more entropy",
            Self::OldPassword { .. } => "Consider rotating this password",
            Self::LowEntropy { .. } => "Use a longer or more complex password",
        }
    }
}

/// Progress towards one vault milestone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub unlocked: bool,
    pub requirement: u64,
    pub current_value: u64,
    /// 0.0–1.0.
    pub progress: f64,
}

impl Achievement {
    fn counted(id: &'static str, requirement: u64, current_value: u64) -> Self {
        Self {
            id,
            unlocked: current_value >= requirement,
            requirement,
            current_value,
            progress: (current_value as f64 / requirement as f64).min(1.0),
        }
    }
}

/// Milestones reached by a vault of `total` passwords, `strong` of which
/// are Strong or better, whose best password carries `max_entropy` bits.
#[must_use]
pub fn achievements(total: usize, strong: usize, max_entropy: f64) -> Vec<Achievement> {
    let total = total as u64;
    let mut out: Vec<Achievement> = COUNT_ACHIEVEMENTS
        .iter()
        .map(|&(id, requirement)| {
            // Only the first milestone caps its value at the requirement.
            let current = if requirement == 1 { total.min(1) } else { total };
            Achievement::counted(id, requirement, current)
        })
        .collect();

    let all_strong = total > 0 && strong as u64 == total;
    out.push(Achievement::counted("all_strong", 1, u64::from(all_strong)));

    let max_entropy = max_entropy.max(0.0);
    out.push(Achievement {
        id: "entropy_champion",
        unlocked: max_entropy >= CHAMPION_ENTROPY_BITS,
        requirement: CHAMPION_ENTROPY_BITS as u64,
        current_value: max_entropy as u64,
        progress: (max_entropy / CHAMPION_ENTROPY_BITS).min(1.0),
    });
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub total: usize,
    pub strong: usize,
    pub weak: usize,
    pub distribution: BTreeMap<StrengthTier, usize>,
    pub average_entropy: f64,
    /// `None` for an empty vault.
    pub average_tier: Option<StrengthTier>,
    pub oldest_age_days: u64,
    pub newest_age_days: u64,
    pub issues: Vec<SecurityIssue>,
    pub weakness_counts: BTreeMap<WeaknessFlag, usize>,
    /// 0–100.
    pub score: u8,
    pub achievements: Vec<Achievement>,
}

impl HealthReport {
    fn empty() -> Self {
        Self {
            total: 0,
            strong: 0,
            weak: 0,
            distribution: BTreeMap::new(),
            average_entropy: 0.0,
            average_tier: None,
            oldest_age_days: 0,
            newest_age_days: 0,
            issues: Vec::new(),
            weakness_counts: BTreeMap::new(),
            score: 0,
            achievements: achievements(0, 0, 0.0),
        }
    }

    /// Score `passwords` as of `now`.
    #[must_use]
    pub fn compute(passwords: &[SavedPassword], now: DateTime<Utc>) -> Self {
        if passwords.is_empty() {
            return Self::empty();
        }

        let mut report = Self::empty();
        report.total = passwords.len();
        report.oldest_age_days = 0;
        report.newest_age_days = u64::MAX;
        let mut entropy_sum = 0.0;
        let mut max_entropy: f64 = 0.0;

        for saved in passwords {
            let bits = observed_entropy(&saved.password);
            let tier = bits.tier();
            let age_days = age_in_days(saved.created_at, now);
            entropy_sum += bits.value();
            max_entropy = max_entropy.max(bits.value());

            *report.distribution.entry(tier).or_insert(0) += 1;
            if tier.is_strong() {
                report.strong += 1;
            }
            if tier.is_weak() {
                report.weak += 1;
                report.issues.push(SecurityIssue::WeakPassword {
                    id: saved.id.clone(),
                    tier,
                });
            }
            if age_days > MAX_AGE_DAYS {
                report.issues.push(SecurityIssue::OldPassword {
                    id: saved.id.clone(),
                    age_days,
                });
            }
            if bits.value() < LOW_ENTROPY_BITS {
                report.issues.push(SecurityIssue::LowEntropy {
                    id: saved.id.clone(),
                    bits: bits.value(),
                });
            }

            report.oldest_age_days = report.oldest_age_days.max(age_days);
            report.newest_age_days = report.newest_age_days.min(age_days);

            for flag in analyze_weaknesses(&saved.password) {
                *report.weakness_counts.entry(flag).or_insert(0) += 1;
            }
        }

        report.average_entropy = entropy_sum / report.total as f64;
        report.average_tier = EntropyBits::new(report.average_entropy)
            .ok()
            .map(EntropyBits::tier);
        report.score = health_score(
            report.total,
            report.strong,
            report.weak,
            report.average_entropy,
            report.issues.len(),
        );
        report.achievements = achievements(report.total, report.strong, max_entropy);
        report
    }
}

fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - created_at).num_days()).unwrap_or(0)
}

fn entropy_bonus(average_entropy: f64) -> i64 {
    if average_entropy >= 128.0 {
        20
    } else if average_entropy >= 80.0 {
        15
    } else if average_entropy >= 60.0 {
        10
    } else if average_entropy >= 40.0 {
        5
    } else {
        0
    }
}

fn health_score(total: usize, strong: usize, weak: usize, average_entropy: f64, issues: usize) -> u8 {
    let total = total.max(1) as f64;
    let mut score = BASE_SCORE;
    score += (strong as f64 / total * STRONG_RATIO_POINTS).round() as i64;
    score -= (weak as f64 / total * WEAK_RATIO_POINTS).round() as i64;
    score += entropy_bonus(average_entropy);
    let issues = i64::try_from(issues).unwrap_or(i64::MAX);
    score -= issues.saturating_mul(POINTS_PER_ISSUE).min(MAX_ISSUE_PENALTY);
    score.clamp(0, 100) as u8
}
