//! Search-space entropy: character pools, entropy bits, strength tiers.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{PseError, Result};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
/// Symbol set offered by the password generator.
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Pool credited for any non-alphanumeric character when scoring saved
/// passwords whose generation settings are unknown.
const OBSERVED_SYMBOL_POOL: usize = 32;

/// Character classes enabled for generation.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterClasses {
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl CharacterClasses {
    pub const ALL: Self = Self {
        uppercase: true,
        lowercase: true,
        digits: true,
        symbols: true,
    };

    pub const NONE: Self = Self {
        uppercase: false,
        lowercase: false,
        digits: false,
        symbols: false,
    };

    /// Letters and digits, no symbols.
    pub const ALPHANUMERIC: Self = Self {
        symbols: false,
        ..Self::ALL
    };

    /// Size of the union of enabled classes.
    #[must_use]
    pub fn pool_size(self) -> usize {
        let mut size = 0;
        if self.uppercase {
            size += UPPERCASE.len();
        }
        if self.lowercase {
            size += LOWERCASE.len();
        }
        if self.digits {
            size += DIGITS.len();
        }
        if self.symbols {
            size += SYMBOLS.len();
        }
        size
    }

    /// Concatenated alphabet of the enabled classes, in a fixed order.
    #[must_use]
    pub fn alphabet(self) -> Vec<char> {
        let mut chars = Vec::with_capacity(self.pool_size());
        for (enabled, set) in [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ] {
            if enabled {
                chars.extend(set.chars());
            }
        }
        chars
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl Default for CharacterClasses {
    fn default() -> Self {
        Self::ALL
    }
}

/// Assumed brute-force search space, in bits. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct EntropyBits(f64);

impl EntropyBits {
    pub const ZERO: Self = Self(0.0);

    pub fn new(bits: f64) -> Result<Self> {
        if bits.is_finite() && bits >= 0.0 {
            Ok(Self(bits))
        } else {
            Err(PseError::InvalidEntropy { value: bits })
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn tier(self) -> StrengthTier {
        strength_tier(self)
    }
}

impl fmt::Display for EntropyBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} bits", self.0)
    }
}

impl<'de> Deserialize<'de> for EntropyBits {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Discrete strength classification, ordered weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthTier {
    pub const ALL: [Self; 5] = [
        Self::VeryWeak,
        Self::Weak,
        Self::Fair,
        Self::Strong,
        Self::VeryStrong,
    ];

    /// Inclusive lower bound of the tier, in bits.
    #[must_use]
    pub const fn min_bits(self) -> f64 {
        match self {
            Self::VeryWeak => 0.0,
            Self::Weak => 28.0,
            Self::Fair => 36.0,
            Self::Strong => 60.0,
            Self::VeryStrong => 128.0,
        }
    }

    #[must_use]
    pub const fn is_weak(self) -> bool {
        matches!(self, Self::VeryWeak | Self::Weak)
    }

    #[must_use]
    pub const fn is_strong(self) -> bool {
        matches!(self, Self::Strong | Self::VeryStrong)
    }
}

/// Map entropy onto the fixed threshold table (< 28, < 36, < 60, < 128, else).
#[must_use]
pub fn strength_tier(bits: EntropyBits) -> StrengthTier {
    let b = bits.value();
    if b < 28.0 {
        StrengthTier::VeryWeak
    } else if b < 36.0 {
        StrengthTier::Weak
    } else if b < 60.0 {
        StrengthTier::Fair
    } else if b < 128.0 {
        StrengthTier::Strong
    } else {
        StrengthTier::VeryStrong
    }
}

/// `length * log2(pool)` for a password of `length` characters.
pub fn entropy_bits_for_length(length: usize, classes: CharacterClasses) -> Result<EntropyBits> {
    let pool = classes.pool_size();
    if pool == 0 {
        return Err(PseError::EmptyCharacterPool);
    }
    EntropyBits::new(length as f64 * (pool as f64).log2())
}

/// Entropy of `password` as if generated uniformly from `classes`.
///
/// The pool is the set of classes enabled for generation, not the classes
/// observed in the string.
pub fn entropy_bits(password: &str, classes: CharacterClasses) -> Result<EntropyBits> {
    entropy_bits_for_length(password.chars().count(), classes)
}

/// Pool implied by the classes actually present in `password`.
#[must_use]
pub fn observed_pool_size(password: &str) -> usize {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;
    for c in password.chars() {
        lower |= c.is_lowercase();
        upper |= c.is_uppercase();
        digit |= c.is_numeric();
        symbol |= !c.is_alphanumeric();
    }
    let mut size = 0;
    if lower {
        size += LOWERCASE.len();
    }
    if upper {
        size += UPPERCASE.len();
    }
    if digit {
        size += DIGITS.len();
    }
    if symbol {
        size += OBSERVED_SYMBOL_POOL;
    }
    size
}

/// Entropy estimate for a password whose generation settings are unknown.
///
/// Returns zero bits when no class is recognised (e.g. the empty string).
#[must_use]
pub fn observed_entropy(password: &str) -> EntropyBits {
    let pool = observed_pool_size(password);
    if pool == 0 {
        return EntropyBits::ZERO;
    }
    EntropyBits(password.chars().count() as f64 * (pool as f64).log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(v: f64) -> EntropyBits {
        EntropyBits::new(v).expect("valid entropy")
    }

    #[test]
    fn pool_sizes_sum_enabled_classes() {
        assert_eq!(CharacterClasses::ALL.pool_size(), 88);
        assert_eq!(CharacterClasses::ALPHANUMERIC.pool_size(), 62);
        assert_eq!(CharacterClasses::NONE.pool_size(), 0);
        let digits_only = CharacterClasses {
            digits: true,
            ..CharacterClasses::NONE
        };
        assert_eq!(digits_only.pool_size(), 10);
        assert_eq!(digits_only.alphabet().len(), 10);
    }

    #[test]
    fn entropy_uses_enabled_pool_not_observed_characters() {
        // "aaaa" only uses lowercase, but the generator could have produced
        // any of the 62 alphanumerics.
        let e = entropy_bits("aaaa", CharacterClasses::ALPHANUMERIC).expect("entropy");
        assert!((e.value() - 4.0 * 62f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = entropy_bits("abc", CharacterClasses::NONE).expect_err("empty pool");
        assert!(matches!(err, PseError::EmptyCharacterPool));
    }

    #[test]
    fn zero_length_has_zero_entropy() {
        let e = entropy_bits_for_length(0, CharacterClasses::ALL).expect("entropy");
        assert_eq!(e, EntropyBits::ZERO);
    }

    #[test]
    fn entropy_counts_unicode_scalars() {
        let e = entropy_bits("é€", CharacterClasses::ALL).expect("entropy");
        assert!((e.value() - 2.0 * 88f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(strength_tier(bits(0.0)), StrengthTier::VeryWeak);
        assert_eq!(strength_tier(bits(27.99)), StrengthTier::VeryWeak);
        assert_eq!(strength_tier(bits(28.0)), StrengthTier::Weak);
        assert_eq!(strength_tier(bits(35.99)), StrengthTier::Weak);
        assert_eq!(strength_tier(bits(36.0)), StrengthTier::Fair);
        assert_eq!(strength_tier(bits(59.99)), StrengthTier::Fair);
        assert_eq!(strength_tier(bits(60.0)), StrengthTier::Strong);
        assert_eq!(strength_tier(bits(127.99)), StrengthTier::Strong);
        assert_eq!(strength_tier(bits(128.0)), StrengthTier::VeryStrong);
        assert_eq!(strength_tier(bits(512.0)), StrengthTier::VeryStrong);
    }

    #[test]
    fn tier_min_bits_match_classifier() {
        for tier in StrengthTier::ALL {
            assert_eq!(strength_tier(bits(tier.min_bits())), tier);
        }
    }

    #[test]
    fn tiers_are_totally_ordered() {
        let mut sorted = StrengthTier::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, StrengthTier::ALL);
        assert!(StrengthTier::VeryWeak < StrengthTier::VeryStrong);
    }

    #[test]
    fn invalid_entropy_values_rejected() {
        assert!(EntropyBits::new(-0.1).is_err());
        assert!(EntropyBits::new(f64::NAN).is_err());
        assert!(EntropyBits::new(f64::INFINITY).is_err());
    }

    #[test]
    fn entropy_bits_deserialize_validates() {
        let ok: EntropyBits = serde_json::from_str("42.5").expect("valid");
        assert!((ok.value() - 42.5).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<EntropyBits>("-3.0").is_err());
    }

    #[test]
    fn observed_pool_matches_present_classes() {
        assert_eq!(observed_pool_size(""), 0);
        assert_eq!(observed_pool_size("abc"), 26);
        assert_eq!(observed_pool_size("aB3"), 62);
        assert_eq!(observed_pool_size("aB3!"), 94);
        assert_eq!(observed_entropy(""), EntropyBits::ZERO);
        assert!((observed_entropy("abcd").value() - 4.0 * 26f64.log2()).abs() < 1e-9);
    }
}
