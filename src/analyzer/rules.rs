//! Static rule tables and the per-rule predicates used by the analyzer.
//!
//! Each predicate is pure and total over any `&str`. Substring rules run
//! against a lowercased copy supplied by the caller so the lowering happens
//! once per analysis.

/// Minimum length before a password stops being flagged as too short.
pub const MIN_LENGTH: usize = 12;

/// Inclusive year range treated as a guessable date.
pub const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1990..=2025;

/// Minimum length of a caller-supplied personal token.
pub const MIN_PERSONAL_TOKEN_LEN: usize = 3;

pub static DICTIONARY_WORDS: &[&str] = &[
    "password", "welcome", "admin", "user", "login", "pass", "word", "test", "demo", "qwerty",
    "abc",
];

pub static COMMON_PATTERNS: &[&str] = &["123", "abc", "111", "000", "aaa"];

pub static KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdf", "zxcv", "qaz", "wsx"];

pub(crate) fn contains_any(lowered: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| lowered.contains(needle))
}

pub(crate) fn is_too_short(chars: &[char]) -> bool {
    chars.len() < MIN_LENGTH
}

/// Any window of four consecutive ASCII digits naming a year in range.
pub(crate) fn contains_year(chars: &[char]) -> bool {
    chars.windows(4).any(|window| {
        if !window.iter().all(char::is_ascii_digit) {
            return false;
        }
        let year = window
            .iter()
            .filter_map(|c| c.to_digit(10))
            .fold(0u32, |acc, d| acc * 10 + d);
        YEAR_RANGE.contains(&year)
    })
}

/// An adjacent identical pair whose character occurs at least three times.
pub(crate) fn has_repeating_chars(chars: &[char]) -> bool {
    chars.windows(2).any(|pair| {
        pair[0] == pair[1] && chars.iter().filter(|&&c| c == pair[0]).count() >= 3
    })
}

/// Adjacent characters whose code points differ by exactly one.
pub(crate) fn has_sequential(chars: &[char]) -> bool {
    chars
        .windows(2)
        .any(|pair| (i64::from(u32::from(pair[1])) - i64::from(u32::from(pair[0]))).abs() == 1)
}

pub(crate) fn has_uppercase(chars: &[char]) -> bool {
    chars.iter().any(|c| c.is_uppercase())
}

pub(crate) fn has_lowercase(chars: &[char]) -> bool {
    chars.iter().any(|c| c.is_lowercase())
}

pub(crate) fn has_digit(chars: &[char]) -> bool {
    chars.iter().any(|c| c.is_numeric())
}

pub(crate) fn has_symbol(chars: &[char]) -> bool {
    chars.iter().any(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn year_window_bounds() {
        assert!(contains_year(&chars("x1990y")));
        assert!(contains_year(&chars("2025")));
        assert!(!contains_year(&chars("1989")));
        assert!(!contains_year(&chars("2026")));
        assert!(!contains_year(&chars("199")));
    }

    #[test]
    fn year_windows_overlap() {
        // "12001" contains "2001" starting at the second character.
        assert!(contains_year(&chars("12001")));
    }

    #[test]
    fn non_ascii_digits_are_not_years() {
        // Arabic-Indic digits are numeric but not ASCII.
        assert!(!contains_year(&chars("٢٠٠٠")));
    }

    #[test]
    fn repeating_needs_adjacent_pair_and_three_total() {
        assert!(has_repeating_chars(&chars("aaa")));
        assert!(has_repeating_chars(&chars("aabxa")));
        assert!(!has_repeating_chars(&chars("aab")));
        assert!(!has_repeating_chars(&chars("abab")));
    }

    #[test]
    fn sequential_detects_ascending_and_descending() {
        assert!(has_sequential(&chars("xab")));
        assert!(has_sequential(&chars("x21")));
        assert!(!has_sequential(&chars("acegi")));
        assert!(!has_sequential(&chars("")));
    }

    #[test]
    fn symbol_is_anything_non_alphanumeric() {
        assert!(has_symbol(&chars("a b")));
        assert!(has_symbol(&chars("a€")));
        assert!(!has_symbol(&chars("aé9")));
    }

    #[test]
    fn tables_are_lowercase() {
        for table in [DICTIONARY_WORDS, COMMON_PATTERNS, KEYBOARD_PATTERNS] {
            for entry in table {
                assert_eq!(*entry, entry.to_lowercase());
            }
        }
    }
}
