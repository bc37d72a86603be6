// SPDX-License-Identifier: MIT OR Apache-2.0
use embedding_store::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("vocabulary too small: {threshold_count} selectable of {vocabulary_size} words, need at least 2")]
    VocabularyTooSmall {
        threshold_count: usize,
        vocabulary_size: usize,
    },

    #[error("word not in vocabulary: {0}")]
    UnknownWord(String),

    #[error("target and avoid words must differ")]
    InvalidPair,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    ConfigIo(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigParse(e.to_string())
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        Self::ConfigIo(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
