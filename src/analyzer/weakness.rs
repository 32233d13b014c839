//! Weakness classification for arbitrary passwords.
//!
//! Rules run in a fixed order and each contributes at most one flag, so the
//! output is stable for a given input. The analyzer never fails.

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::rules::{
    self, COMMON_PATTERNS, DICTIONARY_WORDS, KEYBOARD_PATTERNS, MIN_PERSONAL_TOKEN_LEN,
};

/// One independently evaluated reason a password is considered insecure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessFlag {
    TooShort,
    DictionaryWord,
    CommonPattern,
    KeyboardPattern,
    ContainsYear,
    RepeatingChars,
    NoUppercase,
    NoLowercase,
    NoNumbers,
    NoSymbols,
    Sequential,
    PersonalInfo,
}

impl WeaknessFlag {
    /// All flags in evaluation order.
    pub const ALL: [Self; 12] = [
        Self::TooShort,
        Self::DictionaryWord,
        Self::CommonPattern,
        Self::KeyboardPattern,
        Self::ContainsYear,
        Self::RepeatingChars,
        Self::NoUppercase,
        Self::NoLowercase,
        Self::NoNumbers,
        Self::NoSymbols,
        Self::Sequential,
        Self::PersonalInfo,
    ];

    /// Short explanation used as a hint in training content.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::TooShort => "Password is too short (less than 12 characters)",
            Self::DictionaryWord => "Contains a common dictionary word",
            Self::CommonPattern => "Uses a common pattern like 123 or abc",
            Self::KeyboardPattern => "Contains a keyboard pattern like qwerty",
            Self::ContainsYear => "Contains a year, often a birth year",
            Self::RepeatingChars => "Has repeating characters",
            Self::NoUppercase => "No uppercase letters",
            Self::NoLowercase => "No lowercase letters",
            Self::NoNumbers => "No numbers",
            Self::NoSymbols => "No special symbols",
            Self::Sequential => "Contains sequential characters",
            Self::PersonalInfo => "Contains personal information",
        }
    }
}

impl fmt::Display for WeaknessFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TooShort => "too_short",
            Self::DictionaryWord => "dictionary_word",
            Self::CommonPattern => "common_pattern",
            Self::KeyboardPattern => "keyboard_pattern",
            Self::ContainsYear => "contains_year",
            Self::RepeatingChars => "repeating_chars",
            Self::NoUppercase => "no_uppercase",
            Self::NoLowercase => "no_lowercase",
            Self::NoNumbers => "no_numbers",
            Self::NoSymbols => "no_symbols",
            Self::Sequential => "sequential",
            Self::PersonalInfo => "personal_info",
        };
        f.write_str(name)
    }
}

/// Caller-supplied personal tokens (names, birthplaces, pet names).
///
/// Tokens shorter than three characters are ignored; matching is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalContext {
    tokens: Vec<String>,
}

impl PersonalContext {
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| t.chars().count() >= MIN_PERSONAL_TOKEN_LEN)
            .collect();
        Self { tokens }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn matches(&self, lowered: &str) -> bool {
        self.tokens.iter().any(|t| lowered.contains(t.as_str()))
    }
}

/// Flags raised for one password, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeaknessReport {
    pub flags: Vec<WeaknessFlag>,
}

impl WeaknessReport {
    #[must_use]
    pub fn contains(&self, flag: WeaknessFlag) -> bool {
        self.flags.contains(&flag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Classify `password` against the built-in rule tables.
///
/// Never emits [`WeaknessFlag::PersonalInfo`]; use [`analyze_with_context`]
/// for that.
#[must_use]
pub fn analyze_weaknesses(password: &str) -> Vec<WeaknessFlag> {
    let chars: Vec<char> = password.chars().collect();
    let lowered = password.to_lowercase();
    let mut flags = Vec::new();

    if rules::is_too_short(&chars) {
        flags.push(WeaknessFlag::TooShort);
    }
    if rules::contains_any(&lowered, DICTIONARY_WORDS) {
        flags.push(WeaknessFlag::DictionaryWord);
    }
    if rules::contains_any(&lowered, COMMON_PATTERNS) {
        flags.push(WeaknessFlag::CommonPattern);
    }
    if rules::contains_any(&lowered, KEYBOARD_PATTERNS) {
        flags.push(WeaknessFlag::KeyboardPattern);
    }
    if rules::contains_year(&chars) {
        flags.push(WeaknessFlag::ContainsYear);
    }
    if rules::has_repeating_chars(&chars) {
        flags.push(WeaknessFlag::RepeatingChars);
    }
    if !rules::has_uppercase(&chars) {
        flags.push(WeaknessFlag::NoUppercase);
    }
    if !rules::has_lowercase(&chars) {
        flags.push(WeaknessFlag::NoLowercase);
    }
    if !rules::has_digit(&chars) {
        flags.push(WeaknessFlag::NoNumbers);
    }
    if !rules::has_symbol(&chars) {
        flags.push(WeaknessFlag::NoSymbols);
    }
    if rules::has_sequential(&chars) {
        flags.push(WeaknessFlag::Sequential);
    }
    flags
}

/// [`analyze_weaknesses`] plus the personal-information rule.
#[must_use]
pub fn analyze_with_context(password: &str, context: &PersonalContext) -> WeaknessReport {
    let mut flags = analyze_weaknesses(password);
    if !context.is_empty() && context.matches(&password.to_lowercase()) {
        flags.push(WeaknessFlag::PersonalInfo);
    }
    WeaknessReport { flags }
}
