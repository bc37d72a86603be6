// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parser for GloVe-style text corpora.
//!
//! Each line holds a word followed by one whitespace-separated float per
//! dimension. Blank lines are ignored. Lines that cannot be parsed, or whose
//! dimension differs from the first accepted line, are skipped with a
//! warning and the load continues.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{EmbeddingError, Result};
use crate::store::VectorStore;

/// Why a corpus line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The line had a word but no components.
    MissingVector,
    /// A component was not a finite float.
    InvalidNumber { token: String },
    /// The component count differs from the corpus dimension.
    DimensionMismatch { expected: usize, got: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVector => write!(f, "no vector components"),
            Self::InvalidNumber { token } => write!(f, "invalid number {token:?}"),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "expected {expected} components, got {got}")
            },
        }
    }
}

/// A rejected corpus line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub word: String,
    pub reason: SkipReason,
}

/// Summary of a corpus parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Non-blank lines seen.
    pub lines: usize,
    /// Distinct words in the resulting store.
    pub words: usize,
    /// Lines whose word was already present and got overwritten.
    pub overwritten: usize,
    pub skipped: Vec<SkippedLine>,
}

/// Parse corpus text into a [`VectorStore`].
///
/// `name` identifies the corpus in logs and errors. Fails with
/// [`EmbeddingError::EmptyCorpus`] when no line yields an embedding.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_corpus(name: &str, text: &str) -> Result<(VectorStore, LoadReport)> {
    let mut store: Option<VectorStore> = None;
    let mut report = LoadReport::default();

    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            continue;
        };
        report.lines += 1;

        let expected = store.as_ref().map(VectorStore::dimension);
        let vector = match parse_components(tokens, expected) {
            Ok(vector) => vector,
            Err(reason) => {
                warn!(corpus = name, line = idx + 1, word, %reason, "skipping corpus line");
                report.skipped.push(SkippedLine {
                    line: idx + 1,
                    word: word.to_string(),
                    reason,
                });
                continue;
            },
        };

        let store = store.get_or_insert_with(|| VectorStore::with_dimension(vector.len()));
        if store.insert(word.to_string(), vector)? {
            report.overwritten += 1;
        }
    }

    let store = store.ok_or_else(|| EmbeddingError::EmptyCorpus {
        corpus: name.to_string(),
    })?;
    report.words = store.len();
    Ok((store, report))
}

fn parse_components<'a>(
    tokens: impl Iterator<Item = &'a str>,
    expected: Option<usize>,
) -> std::result::Result<Vec<f32>, SkipReason> {
    let mut vector = Vec::with_capacity(expected.unwrap_or(0));
    for token in tokens {
        match token.parse::<f32>() {
            Ok(v) if v.is_finite() => vector.push(v),
            _ => {
                return Err(SkipReason::InvalidNumber {
                    token: token.to_string(),
                })
            },
        }
    }

    if vector.is_empty() {
        return Err(SkipReason::MissingVector);
    }
    if let Some(expected) = expected {
        if vector.len() != expected {
            return Err(SkipReason::DimensionMismatch {
                expected,
                got: vector.len(),
            });
        }
    }
    Ok(vector)
}
