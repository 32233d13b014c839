//! Search-space estimates for the memorable password styles.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::strength::entropy::{CharacterClasses, EntropyBits, entropy_bits_for_length};

/// Words in the diceware list the word-based styles draw from.
const DICEWARE_WORDS: f64 = 7_776.0;
/// Syllables available to the pronounceable style.
const SYLLABLES: f64 = 2_205.0;

/// How a password was (or will be) built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum PasswordStyle {
    /// Uniform draw of `length` characters from `classes`.
    Random {
        length: usize,
        classes: CharacterClasses,
    },
    /// Four diceware words, a four-digit number and a separator.
    Xkcd,
    /// Five consonant-vowel pairs, a three-digit number and a separator.
    Phonetic,
    /// Three story words, a year and a two-digit suffix.
    Story,
    /// Three syllables, a two-digit number and a symbol.
    Pronounceable,
}

impl PasswordStyle {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Random { .. } => "random",
            Self::Xkcd => "xkcd",
            Self::Phonetic => "phonetic",
            Self::Story => "story",
            Self::Pronounceable => "pronounceable",
        }
    }

    /// Parse a memorable style by name. `random` needs length and classes and
    /// is not accepted here.
    #[must_use]
    pub fn memorable(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "xkcd" => Some(Self::Xkcd),
            "phonetic" => Some(Self::Phonetic),
            "story" => Some(Self::Story),
            "pronounceable" => Some(Self::Pronounceable),
            _ => None,
        }
    }
}

/// Estimated entropy of a password built in `style`.
pub fn style_entropy(style: &PasswordStyle) -> Result<EntropyBits> {
    let bits = match *style {
        PasswordStyle::Random { length, classes } => {
            return entropy_bits_for_length(length, classes);
        }
        PasswordStyle::Xkcd => {
            4.0 * DICEWARE_WORDS.log2() + 9_000f64.log2() + 8f64.log2()
        }
        PasswordStyle::Phonetic => 5.0 * 26f64.log2() + 900f64.log2() + 8f64.log2(),
        PasswordStyle::Story => 3.0 * 10_000f64.log2() + 2_000f64.log2() + 100f64.log2(),
        PasswordStyle::Pronounceable => 3.0 * SYLLABLES.log2() + 90f64.log2() + 4f64.log2(),
    };
    EntropyBits::new(bits)
}
