//! Crack simulation plan and state machine.
//!
//! The machine reveals one character per step, left to right. It performs no
//! timing itself; the driver paces it.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::time::Duration;

use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::errors::{PseError, Result};
use crate::strength::entropy::{EntropyBits, StrengthTier};

/// One visible step of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrackFrame {
    pub revealed_prefix: String,
    /// Fraction of characters revealed, in `[0, 1]`; exactly `1.0` on the
    /// final frame.
    pub progress: f64,
    /// Cumulative synthetic attempt counter.
    pub attempts: u64,
    pub elapsed_ms: u64,
    pub is_complete: bool,
}

/// Pacing derived from a password's length and entropy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationPlan {
    pub length: usize,
    pub bits: EntropyBits,
    pub total: Duration,
    pub per_char_delay: Duration,
    pub attempts_per_char: u64,
}

impl SimulationPlan {
    pub fn new(password: &str, bits: EntropyBits, config: &SimulationConfig) -> Result<Self> {
        let length = password.chars().count();
        if length == 0 {
            return Err(PseError::EmptyPassword {
                context: "crack simulation",
            });
        }
        let normalization = config.attempt_normalization;
        if !normalization.is_finite() || normalization <= 0.0 {
            return Err(PseError::InvalidConfig {
                details: format!("simulation.attempt_normalization must be > 0, got {normalization}"),
            });
        }

        let total_ms = match bits.tier() {
            StrengthTier::VeryWeak => config.very_weak_total_ms,
            StrengthTier::Weak => config.weak_total_ms,
            StrengthTier::Fair => config.fair_total_ms,
            StrengthTier::Strong | StrengthTier::VeryStrong => config.strong_total_ms,
        };
        let total = Duration::from_millis(total_ms);
        let per_char_nanos = total.as_nanos() / length as u128;
        let per_char_delay = Duration::from_nanos(u64::try_from(per_char_nanos).unwrap_or(u64::MAX));

        Ok(Self {
            length,
            bits,
            total,
            per_char_delay,
            attempts_per_char: attempts_per_char(bits, length, normalization),
        })
    }

    /// Simulated time at which frame `revealed` (1-based) is shown.
    #[must_use]
    pub fn elapsed_after(&self, revealed: usize) -> Duration {
        let nanos = self.per_char_delay.as_nanos().saturating_mul(revealed as u128);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// `round(2^(bits / length) / normalization)`, saturating at `u64::MAX`.
fn attempts_per_char(bits: EntropyBits, length: usize, normalization: f64) -> u64 {
    let per_char_bits = bits.value() / length as f64;
    let raw = (per_char_bits.exp2() / normalization).round();
    if !raw.is_finite() || raw >= u64::MAX as f64 {
        u64::MAX
    } else {
        raw as u64
    }
}

/// Explicit reveal state machine. Not restartable; build a new one to replay.
#[derive(Debug, Clone)]
pub struct CrackSimulation {
    plan: SimulationPlan,
    chars: Vec<char>,
    index: usize,
    revealed: String,
    attempts: u64,
    cancelled: bool,
    last: Option<CrackFrame>,
}

impl CrackSimulation {
    pub fn new(password: &str, bits: EntropyBits, config: &SimulationConfig) -> Result<Self> {
        let plan = SimulationPlan::new(password, bits, config)?;
        Ok(Self {
            plan,
            chars: password.chars().collect(),
            index: 0,
            revealed: String::with_capacity(password.len()),
            attempts: 0,
            cancelled: false,
            last: None,
        })
    }

    #[must_use]
    pub fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    /// Reveal the next character. `None` once finished or cancelled.
    pub fn next_frame(&mut self) -> Option<CrackFrame> {
        if self.cancelled || self.index >= self.chars.len() {
            return None;
        }

        let c = self.chars[self.index];
        self.index += 1;
        self.revealed.push(c);
        self.attempts = self.attempts.saturating_add(self.plan.attempts_per_char);

        let total = self.chars.len();
        let elapsed = self.plan.elapsed_after(self.index);
        let frame = CrackFrame {
            revealed_prefix: self.revealed.clone(),
            progress: self.index as f64 / total as f64,
            attempts: self.attempts,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            is_complete: self.index == total,
        };
        self.last = Some(frame.clone());
        Some(frame)
    }

    /// Stop further reveals. The last emitted frame is kept as-is.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cancelled || self.index >= self.chars.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&CrackFrame> {
        self.last.as_ref()
    }

    /// Frames emitted so far.
    #[must_use]
    pub fn frames_emitted(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Iterator for CrackSimulation {
    type Item = CrackFrame;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.cancelled {
            0
        } else {
            self.chars.len() - self.index
        };
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(v: f64) -> EntropyBits {
        EntropyBits::new(v).expect("valid entropy")
    }

    #[test]
    fn empty_password_rejected() {
        let err = SimulationPlan::new("", bits(0.0), &SimulationConfig::default())
            .expect_err("empty");
        assert_eq!(err.code(), "PSE-2005");
    }

    #[test]
    fn duration_buckets_follow_strength() {
        let cfg = SimulationConfig::default();
        let total = |b: f64| {
            SimulationPlan::new("abcd", bits(b), &cfg)
                .expect("plan")
                .total
                .as_millis()
        };
        assert_eq!(total(10.0), 500);
        assert_eq!(total(28.0), 1_500);
        assert_eq!(total(36.0), 3_000);
        assert_eq!(total(60.0), 5_000);
        assert_eq!(total(300.0), 5_000);
    }

    #[test]
    fn per_char_delay_divides_total() {
        let plan = SimulationPlan::new("abc", bits(10.0), &SimulationConfig::default())
            .expect("plan");
        assert_eq!(plan.per_char_delay, Duration::from_nanos(166_666_666));
    }

    #[test]
    fn attempts_per_char_rounds_and_saturates() {
        // 2^(40/4) / 1000 = 1.024 -> 1
        assert_eq!(attempts_per_char(bits(40.0), 4, 1_000.0), 1);
        // 2^(80/4) / 1000 = 1048.576 -> 1049
        assert_eq!(attempts_per_char(bits(80.0), 4, 1_000.0), 1_049);
        assert_eq!(attempts_per_char(bits(512.0), 1, 1_000.0), u64::MAX);
    }

    #[test]
    fn full_run_reveals_one_char_per_frame() {
        let mut sim =
            CrackSimulation::new("hunter2", bits(30.0), &SimulationConfig::default()).expect("sim");
        let frames: Vec<CrackFrame> = sim.by_ref().collect();
        assert_eq!(frames.len(), 7);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.revealed_prefix, "hunter2"[..=i]);
            assert_eq!(frame.is_complete, i == 6);
        }
        let last = frames.last().expect("last");
        assert!((last.progress - 1.0).abs() < f64::EPSILON);
        assert_eq!(last.elapsed_ms, 1_499);
        assert!(sim.is_finished());
        assert_eq!(sim.next_frame(), None);
    }

    #[test]
    fn attempts_accumulate() {
        let mut sim =
            CrackSimulation::new("abcd", bits(80.0), &SimulationConfig::default()).expect("sim");
        let attempts: Vec<u64> = sim.by_ref().map(|f| f.attempts).collect();
        assert_eq!(attempts, vec![1_049, 2_098, 3_147, 4_196]);
    }

    #[test]
    fn cancel_keeps_last_frame() {
        let mut sim =
            CrackSimulation::new("secret", bits(20.0), &SimulationConfig::default()).expect("sim");
        sim.next_frame();
        let second = sim.next_frame().expect("second frame");
        sim.cancel();
        assert_eq!(sim.next_frame(), None);
        assert_eq!(sim.last_frame(), Some(&second));
        assert_eq!(second.revealed_prefix, "se");
        assert!(!second.is_complete);
        assert_eq!(sim.size_hint(), (0, Some(0)));
    }

    #[test]
    fn multibyte_characters_reveal_whole() {
        let mut sim =
            CrackSimulation::new("né€", bits(20.0), &SimulationConfig::default()).expect("sim");
        let prefixes: Vec<String> = sim.by_ref().map(|f| f.revealed_prefix).collect();
        assert_eq!(prefixes, vec!["n", "né", "né€"]);
    }
}
