//! Bounded rejection sampling of decoy sets, plus the fixed display order
//! shown to the player.

#![allow(missing_docs)]

use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;

use crate::core::config::DecoyConfig;
use crate::core::errors::{PseError, Result};
use crate::decoy::mutation::{GAME_CHARSET, MutationOp};

/// Produce one candidate by applying one or two random operators.
fn mutate<R: Rng + ?Sized>(reference: &[char], rng: &mut R) -> String {
    let mut chars = reference.to_vec();
    let rounds = rng.random_range(1..=2);
    for _ in 0..rounds {
        if let Some(op) = MutationOp::ALL.choose(rng) {
            op.apply(&mut chars, rng);
        }
    }
    chars.into_iter().collect()
}

/// Generate exactly `count` distinct decoys, none equal to `reference`.
///
/// Gives up after `config.budget_for(count)` candidates with
/// [`PseError::DecoyBudgetExhausted`]; a short set is never returned.
pub fn generate_decoys<R: Rng + ?Sized>(
    reference: &str,
    count: usize,
    rng: &mut R,
    config: &DecoyConfig,
) -> Result<Vec<String>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let reference_chars: Vec<char> = reference.chars().collect();
    let budget = config.budget_for(count);
    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    let mut decoys = Vec::with_capacity(count);
    let mut attempts = 0usize;

    while decoys.len() < count {
        if attempts >= budget {
            return Err(PseError::DecoyBudgetExhausted {
                requested: count,
                produced: decoys.len(),
                attempts,
            });
        }
        attempts += 1;

        let candidate = mutate(&reference_chars, rng);
        if candidate != reference && seen.insert(candidate.clone()) {
            decoys.push(candidate);
        }
    }

    Ok(decoys)
}

/// Random password of `length` characters drawn from [`GAME_CHARSET`].
///
/// For training content only; not a secure generator.
pub fn random_reference<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let charset: Vec<char> = GAME_CHARSET.chars().collect();
    (0..length)
        .filter_map(|_| charset.choose(rng).copied())
        .collect()
}

/// Reference and decoys in the order shown to the player, fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayOrder {
    options: Vec<String>,
    correct_index: usize,
}

impl DisplayOrder {
    /// Permute `reference` and `decoys` once, uniformly.
    ///
    /// The decoys are shuffled and the reference is inserted at a uniform
    /// position, which is equivalent to shuffling the combined list.
    pub fn new<R: Rng + ?Sized>(reference: String, mut decoys: Vec<String>, rng: &mut R) -> Self {
        decoys.shuffle(rng);
        let correct_index = rng.random_range(0..=decoys.len());
        decoys.insert(correct_index, reference);
        Self {
            options: decoys,
            correct_index,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
