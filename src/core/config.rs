//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PseError, Result};

/// Full engine configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub strength: StrengthConfig,
    pub simulation: SimulationConfig,
    pub decoys: DecoyConfig,
    pub rewards: RewardConfig,
    pub logging: LoggingConfig,
}

/// Attacker model used when turning entropy into a crack-time string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrengthConfig {
    /// Assumed offline guess rate.
    pub guesses_per_second: f64,
}

/// Pacing of the crack simulation per entropy bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total run time for entropy below 28 bits.
    pub very_weak_total_ms: u64,
    /// Total run time for entropy in [28, 36).
    pub weak_total_ms: u64,
    /// Total run time for entropy in [36, 60).
    pub fair_total_ms: u64,
    /// Total run time for entropy of 60 bits and above.
    pub strong_total_ms: u64,
    /// Divisor applied to the per-character search space.
    pub attempt_normalization: f64,
    /// Upper bound on one uninterrupted sleep of the threaded pacer.
    pub max_sleep_slice_ms: u64,
}

/// Retry budget for decoy rejection sampling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DecoyConfig {
    pub attempts_per_decoy: usize,
    pub min_attempts: usize,
}

/// XP formula constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewardConfig {
    pub base_xp: u64,
    pub level_coefficient: u64,
}

/// Activity log destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSONL activity log. `None` disables file logging.
    pub jsonl_path: Option<PathBuf>,
    pub fallback_path: Option<PathBuf>,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
    /// Config file the effective settings were loaded from. Set by `load`,
    /// empty otherwise; excluded from serialization and `stable_hash`.
    #[serde(skip)]
    pub config_file: PathBuf,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            guesses_per_second: 1.0e11,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            very_weak_total_ms: 500,
            weak_total_ms: 1_500,
            fair_total_ms: 3_000,
            strong_total_ms: 5_000,
            attempt_normalization: 1_000.0,
            max_sleep_slice_ms: 25,
        }
    }
}

impl Default for DecoyConfig {
    fn default() -> Self {
        Self {
            attempts_per_decoy: 200,
            min_attempts: 1_000,
        }
    }
}

impl DecoyConfig {
    /// Total candidate budget for producing `count` decoys.
    #[must_use]
    pub fn budget_for(&self, count: usize) -> usize {
        count
            .saturating_mul(self.attempts_per_decoy)
            .max(self.min_attempts)
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base_xp: 10,
            level_coefficient: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            jsonl_path: None,
            fallback_path: None,
            max_size_bytes: 16 * 1024 * 1024,
            max_rotated_files: 3,
            config_file: PathBuf::new(),
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[PSE-CONFIG] WARNING: HOME not set, falling back to /tmp for config path");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn default_config_path() -> PathBuf {
    home_dir().join(".config").join("pse").join("config.toml")
}

impl EngineConfig {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| PseError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(PseError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.logging.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for log correlation.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // strength
        set_f64(
            &mut lookup,
            "PSE_STRENGTH_GUESSES_PER_SECOND",
            &mut self.strength.guesses_per_second,
        )?;

        // simulation
        set_u64(
            &mut lookup,
            "PSE_SIMULATION_VERY_WEAK_TOTAL_MS",
            &mut self.simulation.very_weak_total_ms,
        )?;
        set_u64(
            &mut lookup,
            "PSE_SIMULATION_WEAK_TOTAL_MS",
            &mut self.simulation.weak_total_ms,
        )?;
        set_u64(
            &mut lookup,
            "PSE_SIMULATION_FAIR_TOTAL_MS",
            &mut self.simulation.fair_total_ms,
        )?;
        set_u64(
            &mut lookup,
            "PSE_SIMULATION_STRONG_TOTAL_MS",
            &mut self.simulation.strong_total_ms,
        )?;
        set_f64(
            &mut lookup,
            "PSE_SIMULATION_ATTEMPT_NORMALIZATION",
            &mut self.simulation.attempt_normalization,
        )?;
        set_u64(
            &mut lookup,
            "PSE_SIMULATION_MAX_SLEEP_SLICE_MS",
            &mut self.simulation.max_sleep_slice_ms,
        )?;

        // decoys
        set_usize(
            &mut lookup,
            "PSE_DECOYS_ATTEMPTS_PER_DECOY",
            &mut self.decoys.attempts_per_decoy,
        )?;
        set_usize(
            &mut lookup,
            "PSE_DECOYS_MIN_ATTEMPTS",
            &mut self.decoys.min_attempts,
        )?;

        // rewards
        set_u64(&mut lookup, "PSE_REWARDS_BASE_XP", &mut self.rewards.base_xp)?;
        set_u64(
            &mut lookup,
            "PSE_REWARDS_LEVEL_COEFFICIENT",
            &mut self.rewards.level_coefficient,
        )?;

        // logging
        if let Some(raw) = lookup("PSE_LOGGING_JSONL_PATH") {
            self.logging.jsonl_path = Some(PathBuf::from(raw));
        }

        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let gps = self.strength.guesses_per_second;
        if !gps.is_finite() || gps <= 0.0 {
            return Err(PseError::InvalidConfig {
                details: format!("strength.guesses_per_second must be > 0, got {gps}"),
            });
        }

        let sim = &self.simulation;
        if sim.very_weak_total_ms == 0 {
            return Err(PseError::InvalidConfig {
                details: "simulation.very_weak_total_ms must be > 0".to_string(),
            });
        }
        // Weaker passwords must never appear to take longer to fall.
        if !(sim.very_weak_total_ms <= sim.weak_total_ms
            && sim.weak_total_ms <= sim.fair_total_ms
            && sim.fair_total_ms <= sim.strong_total_ms)
        {
            return Err(PseError::InvalidConfig {
                details: "simulation durations must ascend: very_weak <= weak <= fair <= strong"
                    .to_string(),
            });
        }
        if !sim.attempt_normalization.is_finite() || sim.attempt_normalization <= 0.0 {
            return Err(PseError::InvalidConfig {
                details: format!(
                    "simulation.attempt_normalization must be > 0, got {}",
                    sim.attempt_normalization
                ),
            });
        }
        if sim.max_sleep_slice_ms == 0 {
            return Err(PseError::InvalidConfig {
                details: "simulation.max_sleep_slice_ms must be > 0".to_string(),
            });
        }

        if self.decoys.attempts_per_decoy == 0 || self.decoys.min_attempts == 0 {
            return Err(PseError::InvalidConfig {
                details: "decoys.attempts_per_decoy and decoys.min_attempts must be > 0"
                    .to_string(),
            });
        }

        if self.logging.jsonl_path.is_some() && self.logging.max_size_bytes == 0 {
            return Err(PseError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0 when jsonl_path is set".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_error(name: &str, raw: &str, error: impl std::fmt::Display) -> PseError {
    PseError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    }
}

fn set_f64<F>(lookup: &mut F, name: &str, slot: &mut f64) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        *slot = raw
            .trim()
            .parse::<f64>()
            .map_err(|error| parse_error(name, &raw, error))?;
    }
    Ok(())
}

fn set_u64<F>(lookup: &mut F, name: &str, slot: &mut u64) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        *slot = raw
            .trim()
            .parse::<u64>()
            .map_err(|error| parse_error(name, &raw, error))?;
    }
    Ok(())
}

fn set_usize<F>(lookup: &mut F, name: &str, slot: &mut usize) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        *slot = raw
            .trim()
            .parse::<usize>()
            .map_err(|error| parse_error(name, &raw, error))?;
    }
    Ok(())
}
