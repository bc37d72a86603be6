// SPDX-License-Identifier: MIT OR Apache-2.0
use thiserror::Error;

/// Errors raised while loading or querying word embeddings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("embedding not found: {0}")]
    NotFound(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("empty vector provided")]
    EmptyVector,

    #[error("corpus {corpus} contains no embeddings")]
    EmptyCorpus { corpus: String },

    #[error("no corpus source available (tried: {})", .tried.join(", "))]
    NoSourceAvailable { tried: Vec<String> },

    #[error("failed to fetch corpus {corpus}: {cause}")]
    Fetch { corpus: String, cause: String },

    #[error("embedding load already started")]
    LoadAlreadyStarted,

    #[error("embedding load failed: {0}")]
    LoadFailed(String),
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;
