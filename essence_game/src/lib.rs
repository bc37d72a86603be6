// SPDX-License-Identifier: MIT OR Apache-2.0
//! Essence Game - similarity-scored word collection
//!
//! A session draws a target word and an avoid word from the loaded
//! vocabulary. Every collected word scores positive when it is closer to the
//! target and negative when it is closer to the avoid word, scaled by how
//! close it is. Energy drains over time and is restored by positive words;
//! when it runs out the game ends and the word nearest the average of the
//! collection is reported as the player's final essence.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use embedding_store::parse_corpus;
//! use essence_game::{GameParameters, ScoringSession, WordPair, WordSelector};
//!
//! let (store, _) = parse_corpus("inline", "good 1 0\nbad -1 0\nok 0.9 0.1\n").unwrap();
//! let pair = WordPair { target: "good".into(), avoid: "bad".into() };
//! let mut session = ScoringSession::with_pair(
//!     Arc::new(store),
//!     GameParameters::default(),
//!     WordSelector::seeded(1),
//!     pair,
//! )
//! .unwrap();
//!
//! session.collect_word("ok").unwrap();
//! assert_eq!(session.score(), 994);
//! ```

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

mod config;
mod error;
mod selector;
mod session;

pub use config::{GameParameters, MAX_POINTS_PER_WORD_LIMIT, PARAMETERS_FILE};
pub use error::{GameError, Result};
pub use selector::{WordPair, WordSelector, MAX_AVOID_DRAWS};
pub use session::{compute_points, CollectOutcome, GameOver, ScoringSession};
