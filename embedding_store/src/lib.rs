// SPDX-License-Identifier: MIT OR Apache-2.0
//! Embedding Store - word vectors and cosine similarity
//!
//! Loads a GloVe-style text corpus into an immutable word -> vector table and
//! answers similarity queries against it.
//!
//! # Features
//!
//! - **Corpus parsing**: one `word f1 f2 ... fn` entry per line, malformed
//!   lines skipped and reported
//! - **Priority sources**: the first present corpus wins, no merging
//! - **Background load**: one-shot load with a readiness flag
//! - **Similarity**: cosine similarity with explicit dimension checks
//! - **Neighbors**: thresholded top-k search with stable tie ordering
//!
//! # Quick Start
//!
//! ```rust
//! use embedding_store::{parse_corpus, cosine_similarity};
//!
//! let (store, _report) = parse_corpus("inline", "good 1 0\nbad -1 0\nok 0.9 0.1\n").unwrap();
//! let sim = cosine_similarity(store.get("ok").unwrap(), store.get("good").unwrap()).unwrap();
//! assert!(sim > 0.99);
//! assert_eq!(store.nearest_neighbors("ok", 1, 0.0), vec!["good".to_string()]);
//! ```

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

mod corpus;
mod error;
mod loader;
mod similarity;
mod source;
mod store;

pub use corpus::{parse_corpus, LoadReport, SkipReason, SkippedLine};
pub use error::{EmbeddingError, Result};
pub use loader::{EmbeddingLoader, LoadTask};
pub use similarity::{cosine_similarity, dot_product, magnitude, mean_embedding};
pub use source::{
    default_sources, load_first_available, CorpusSource, FileSource, LoadedCorpus, TextSource,
    DEFAULT_CORPUS_FILES,
};
pub use store::{Neighbor, VectorStore, DEFAULT_PARALLEL_THRESHOLD};
