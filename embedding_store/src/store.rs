// SPDX-License-Identifier: MIT OR Apache-2.0
//! Immutable word -> embedding table with similarity queries.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{EmbeddingError, Result};
use crate::similarity::{cosine_with_magnitude, magnitude};

/// Vocabulary size at which neighbor scans switch to parallel scoring.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 5000;

/// A word and its cosine similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The neighboring word.
    pub word: String,
    /// Cosine similarity to the query, range -1 to 1.
    pub similarity: f32,
}

/// Word embeddings loaded from a single corpus.
///
/// Words keep the order in which they were first inserted. Re-inserting a
/// word replaces its vector but keeps its original position, so the word
/// list is a stable, reproducible sequence for a given corpus.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    parallel_threshold: usize,
}

impl VectorStore {
    pub(crate) fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            words: Vec::new(),
            vectors: Vec::new(),
            index: HashMap::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Build a store from `(word, vector)` pairs.
    ///
    /// The first vector fixes the dimension; later duplicates overwrite
    /// earlier ones. Fails on an empty vector or a dimension mismatch.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut store: Option<Self> = None;
        for (word, vector) in entries {
            if vector.is_empty() {
                return Err(EmbeddingError::EmptyVector);
            }
            let store = store.get_or_insert_with(|| Self::with_dimension(vector.len()));
            store.insert(word.into(), vector)?;
        }
        Ok(store.unwrap_or_else(|| Self::with_dimension(0)))
    }

    /// Set the vocabulary size above which neighbor scans run in parallel.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Insert or overwrite a word. Returns `true` if the word already existed.
    pub(crate) fn insert(&mut self, word: String, vector: Vec<f32>) -> Result<bool> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }

        if let Some(&idx) = self.index.get(&word) {
            self.vectors[idx] = vector;
            return Ok(true);
        }

        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
        Ok(false)
    }

    /// Dimension shared by every embedding in the store.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&idx| self.vectors[idx].as_slice())
    }

    /// Like [`get`](Self::get) but reports an absent word as an error.
    pub fn require(&self, word: &str) -> Result<&[f32]> {
        self.get(word)
            .ok_or_else(|| EmbeddingError::NotFound(word.to_string()))
    }

    /// Every word in insertion order.
    pub fn all_words(&self) -> &[String] {
        &self.words
    }

    /// Iterate `(word, embedding)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.words
            .iter()
            .zip(&self.vectors)
            .map(|(w, v)| (w.as_str(), v.as_slice()))
    }

    /// Words most similar to `word`, best first.
    ///
    /// Only words with similarity `>= min_similarity` are kept, `word` itself
    /// is excluded and at most `k` words are returned. Equal similarities keep
    /// insertion order. An unknown word yields an empty list.
    pub fn nearest_neighbors(&self, word: &str, k: usize, min_similarity: f32) -> Vec<String> {
        self.nearest_neighbors_scored(word, k, min_similarity)
            .into_iter()
            .map(|n| n.word)
            .collect()
    }

    /// [`nearest_neighbors`](Self::nearest_neighbors) with similarity scores.
    #[instrument(skip(self), fields(vocabulary = self.len()))]
    pub fn nearest_neighbors_scored(
        &self,
        word: &str,
        k: usize,
        min_similarity: f32,
    ) -> Vec<Neighbor> {
        let Some(&origin) = self.index.get(word) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let query = &self.vectors[origin];
        let scores = self.score_all(query);

        let mut results: Vec<Neighbor> = scores
            .into_iter()
            .enumerate()
            .filter(|&(idx, sim)| idx != origin && sim >= min_similarity)
            .map(|(idx, similarity)| Neighbor {
                word: self.words[idx].clone(),
                similarity,
            })
            .collect();

        // Stable sort: ties stay in insertion order
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }

    /// The word whose embedding is most similar to `query`.
    ///
    /// The first word reaching the maximum wins. Returns `Ok(None)` for an
    /// empty store.
    #[instrument(skip(self, query), fields(vocabulary = self.len()))]
    pub fn closest_to(&self, query: &[f32]) -> Result<Option<&str>> {
        if query.len() != self.dimension && !self.is_empty() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut best: Option<usize> = None;
        let mut best_similarity = f32::NEG_INFINITY;
        for (idx, sim) in self.score_all(query).into_iter().enumerate() {
            if sim > best_similarity {
                best_similarity = sim;
                best = Some(idx);
            }
        }

        Ok(best.map(|idx| self.words[idx].as_str()))
    }

    /// Cosine similarity of `query` against every word, in insertion order.
    fn score_all(&self, query: &[f32]) -> Vec<f32> {
        let query_magnitude = magnitude(query);
        if self.vectors.len() >= self.parallel_threshold {
            self.vectors
                .par_iter()
                .map(|v| cosine_with_magnitude(query, v, query_magnitude))
                .collect()
        } else {
            self.vectors
                .iter()
                .map(|v| cosine_with_magnitude(query, v, query_magnitude))
                .collect()
        }
    }
}
