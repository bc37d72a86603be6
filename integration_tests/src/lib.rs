// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration test helpers for the essence workspace.
//!
//! Provides fixture corpora and session constructors shared by the scenarios
//! under `tests/`.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use embedding_store::{parse_corpus, VectorStore};
use essence_game::{GameParameters, ScoringSession, WordPair, WordSelector};

/// Three-word corpus used by the scoring scenarios.
pub const GOOD_BAD_OK: &str = "good 1 0\nbad -1 0\nok 0.9 0.1\n";

/// A small themed corpus, 4 dimensions, with a malformed line in the middle.
pub const FRUIT_CORPUS: &str = "\
apple 0.9 0.1 0.0 0.0
pear 0.8 0.2 0.0 0.1
banana 0.7 0.3 0.1 0.0
rock 0.0 0.0 1.0 0.0
stone 0.0 0.1 0.9 0.0
gravel 0.1 0.0 0.8 0.2
broken 0.1 oops 0.2 0.3
cloud 0.0 0.9 0.0 0.4
rain 0.1 0.8 0.1 0.5
";

/// Parse a fixture corpus into a shared store.
pub fn store_from(text: &str) -> Arc<VectorStore> {
    let (store, _) = parse_corpus("fixture", text).expect("fixture corpus must parse");
    Arc::new(store)
}

/// A session over `text` with a fixed target/avoid pair.
pub fn session_with_pair(text: &str, target: &str, avoid: &str) -> ScoringSession {
    session_with_params(text, target, avoid, GameParameters::default())
}

/// Same as [`session_with_pair`] with custom parameters.
pub fn session_with_params(
    text: &str,
    target: &str,
    avoid: &str,
    params: GameParameters,
) -> ScoringSession {
    ScoringSession::with_pair(
        store_from(text),
        params,
        WordSelector::seeded(0),
        WordPair {
            target: target.to_string(),
            avoid: avoid.to_string(),
        },
    )
    .expect("fixture pair must be valid")
}

/// Generate a corpus of `count` words with `dim` components each.
pub fn generated_corpus(count: usize, dim: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!("w{i}"));
        for j in 0..dim {
            let x = ((i * dim + j) as f32 * 0.37).sin();
            text.push_str(&format!(" {x:.5}"));
        }
        text.push('\n');
    }
    text
}

/// Write `text` as `file_name` under `dir`.
pub fn write_corpus(dir: &Path, file_name: &str, text: &str) -> io::Result<()> {
    fs::write(dir.join(file_name), text)
}
