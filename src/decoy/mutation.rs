//! Mutation operators that turn a reference password into a near-duplicate.

#![allow(missing_docs)]

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

/// Characters random substitution draws from.
pub const GAME_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";

/// Visually similar replacements. Pairs are listed in both directions;
/// `o` and `I` map one way only.
pub static HOMOGLYPHS: &[(char, char)] = &[
    ('0', 'O'),
    ('O', '0'),
    ('o', '0'),
    ('1', 'l'),
    ('l', '1'),
    ('I', '1'),
    ('5', 'S'),
    ('S', '5'),
    ('8', 'B'),
    ('B', '8'),
    ('2', 'Z'),
    ('Z', '2'),
    ('6', 'G'),
    ('G', '6'),
];

#[must_use]
pub fn homoglyph_of(c: char) -> Option<char> {
    HOMOGLYPHS
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOp {
    AdjacentSwap,
    RandomSubstitution,
    HomoglyphSubstitution,
    CaseFlip,
}

impl MutationOp {
    pub const ALL: [Self; 4] = [
        Self::AdjacentSwap,
        Self::RandomSubstitution,
        Self::HomoglyphSubstitution,
        Self::CaseFlip,
    ];

    /// Apply the operator in place. Operators that cannot act on `chars`
    /// leave it unchanged.
    pub fn apply<R: Rng + ?Sized>(self, chars: &mut [char], rng: &mut R) {
        match self {
            Self::AdjacentSwap => adjacent_swap(chars, rng),
            Self::RandomSubstitution => random_substitution(chars, rng),
            Self::HomoglyphSubstitution => homoglyph_substitution(chars, rng),
            Self::CaseFlip => case_flip(chars, rng),
        }
    }
}

fn adjacent_swap<R: Rng + ?Sized>(chars: &mut [char], rng: &mut R) {
    if chars.len() < 2 {
        return;
    }
    let i = rng.random_range(0..chars.len() - 1);
    chars.swap(i, i + 1);
}

fn random_substitution<R: Rng + ?Sized>(chars: &mut [char], rng: &mut R) {
    if chars.is_empty() {
        return;
    }
    let charset: Vec<char> = GAME_CHARSET.chars().collect();
    let i = rng.random_range(0..chars.len());
    if let Some(&replacement) = charset.choose(rng) {
        chars[i] = replacement;
    }
}

fn homoglyph_substitution<R: Rng + ?Sized>(chars: &mut [char], rng: &mut R) {
    let candidates: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| homoglyph_of(**c).is_some())
        .map(|(i, _)| i)
        .collect();
    let Some(&i) = candidates.choose(rng) else {
        random_substitution(chars, rng);
        return;
    };
    if let Some(replacement) = homoglyph_of(chars[i]) {
        chars[i] = replacement;
    }
}

/// Inverse case of `c` when it maps to exactly one character.
fn flipped_case(c: char) -> Option<char> {
    let mapped: Vec<char> = if c.is_uppercase() {
        c.to_lowercase().collect()
    } else if c.is_lowercase() {
        c.to_uppercase().collect()
    } else {
        return None;
    };
    match mapped.as_slice() {
        [single] if *single != c => Some(*single),
        _ => None,
    }
}

fn case_flip<R: Rng + ?Sized>(chars: &mut [char], rng: &mut R) {
    let letters: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alphabetic() && flipped_case(**c).is_some())
        .map(|(i, _)| i)
        .collect();
    let Some(&i) = letters.choose(rng) else {
        return;
    };
    if let Some(flipped) = flipped_case(chars[i]) {
        chars[i] = flipped;
    }
}
