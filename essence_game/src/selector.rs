// SPDX-License-Identifier: MIT OR Apache-2.0
//! Random target/avoid word selection.

use embedding_store::VectorStore;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GameError, Result};

/// Avoid-word draws attempted before falling back to the next index.
pub const MAX_AVOID_DRAWS: usize = 1024;

/// The word to steer towards and the word to steer away from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub target: String,
    pub avoid: String,
}

/// Draws word pairs from a prefix of the vocabulary in load order.
#[derive(Debug, Clone)]
pub struct WordSelector {
    rng: ChaCha8Rng,
}

impl Default for WordSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSelector {
    /// A selector seeded from the thread RNG.
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    /// A selector producing a reproducible sequence of pairs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick two distinct words from the first `threshold_fraction` of the
    /// vocabulary.
    ///
    /// The selectable prefix is `floor(len * threshold_fraction)` words long
    /// and must hold at least two words.
    pub fn select_pair(&mut self, store: &VectorStore, threshold_fraction: f32) -> Result<WordPair> {
        if !(threshold_fraction > 0.0 && threshold_fraction <= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "selection threshold {threshold_fraction} outside (0, 1]"
            )));
        }

        let words = store.all_words();
        let threshold_count = threshold_count(words.len(), threshold_fraction);
        if threshold_count < 2 {
            return Err(GameError::VocabularyTooSmall {
                threshold_count,
                vocabulary_size: words.len(),
            });
        }

        let target_idx = self.rng.gen_range(0..threshold_count);
        let avoid_idx = (0..MAX_AVOID_DRAWS)
            .map(|_| self.rng.gen_range(0..threshold_count))
            .find(|&idx| words[idx] != words[target_idx])
            .unwrap_or((target_idx + 1) % threshold_count);

        let pair = WordPair {
            target: words[target_idx].clone(),
            avoid: words[avoid_idx].clone(),
        };
        debug!(target_word = %pair.target, avoid_word = %pair.avoid, threshold_count, "selected word pair");
        Ok(pair)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn threshold_count(len: usize, fraction: f32) -> usize {
    ((len as f64) * f64::from(fraction)).floor() as usize
}
