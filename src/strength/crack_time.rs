//! Human-scaled crack-time estimates computed in the log10 domain.
//!
//! `2^bits / guesses_per_second` overflows `f64` long before the 512-bit
//! inputs the dashboard can produce, so every quantity here stays a base-10
//! logarithm until it is small enough to print directly.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::fmt;

use serde::Serialize;

use crate::core::errors::{PseError, Result};
use crate::strength::entropy::EntropyBits;

/// Values that round to this many units or more are rendered in scientific
/// notation.
const PLAIN_VALUE_LIMIT: f64 = 1.0e6;
const PLAIN_DIGITS_LIMIT_LOG10: f64 = 6.0;

/// Display units, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Years,
    Centuries,
}

impl TimeUnit {
    const ALL_DESCENDING: [Self; 6] = [
        Self::Centuries,
        Self::Years,
        Self::Days,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
    ];

    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
            Self::Years => 31_536_000.0,
            Self::Centuries => 3_153_600_000.0,
        }
    }

    const fn singular(self) -> &'static str {
        match self {
            Self::Seconds => "second",
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
            Self::Years => "year",
            Self::Centuries => "century",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Years => "years",
            Self::Centuries => "centuries",
        }
    }
}

/// Estimated exhaustive-search time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrackTime {
    /// `log10` of the search time in seconds.
    pub log10_seconds: f64,
    /// Largest unit yielding a value >= 1; `None` below one second.
    pub unit: Option<TimeUnit>,
    /// `log10` of the value expressed in `unit`.
    pub log10_value: f64,
}

impl CrackTime {
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.unit.is_none()
    }
}

impl fmt::Display for CrackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(unit) = self.unit else {
            return f.write_str("less than a second");
        };

        if self.log10_value < PLAIN_DIGITS_LIMIT_LOG10 {
            let rounded = 10f64.powf(self.log10_value).round().max(1.0);
            // Rounding can carry a value just below the limit onto it.
            if rounded < PLAIN_VALUE_LIMIT {
                let value = rounded as u64;
                let label = if value == 1 {
                    unit.singular()
                } else {
                    unit.plural()
                };
                return write!(f, "{value} {label}");
            }
        }

        let mut exponent = self.log10_value.floor();
        let mut mantissa = 10f64.powf(self.log10_value - exponent);
        if mantissa >= 9.95 {
            mantissa /= 10.0;
            exponent += 1.0;
        }
        write!(f, "{mantissa:.1}e{} {}", exponent as i64, unit.plural())
    }
}

/// Estimate the time to search `2^bits` candidates at `guesses_per_second`.
pub fn estimate_crack_time(bits: EntropyBits, guesses_per_second: f64) -> Result<CrackTime> {
    if !guesses_per_second.is_finite() || guesses_per_second <= 0.0 {
        return Err(PseError::InvalidGuessRate {
            value: guesses_per_second,
        });
    }

    let log10_seconds = bits.value().mul_add(std::f64::consts::LOG10_2, -guesses_per_second.log10());

    for unit in TimeUnit::ALL_DESCENDING {
        let log10_value = log10_seconds - unit.seconds().log10();
        if log10_value >= 0.0 {
            return Ok(CrackTime {
                log10_seconds,
                unit: Some(unit),
                log10_value,
            });
        }
    }

    Ok(CrackTime {
        log10_seconds,
        unit: None,
        log10_value: log10_seconds,
    })
}

/// Human-readable crack time, e.g. `"3 hours"` or `"1.1e18 centuries"`.
pub fn format_crack_time(bits: EntropyBits, guesses_per_second: f64) -> Result<String> {
    Ok(estimate_crack_time(bits, guesses_per_second)?.to_string())
}
