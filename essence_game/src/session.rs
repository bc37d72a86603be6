// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scoring session: collected words, score, energy and the game-over latch.

use std::collections::HashSet;
use std::sync::Arc;

use embedding_store::{cosine_similarity, mean_embedding, VectorStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GameParameters;
use crate::error::{GameError, Result};
use crate::selector::{WordPair, WordSelector};

/// Signed points for a word embedding against target and avoid embeddings.
///
/// The sign says which word `word` is closer to (a tie counts as avoid). The
/// magnitude is the winning similarity scaled by `max_points_per_word`,
/// rounded, regardless of the similarity's own sign.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn compute_points(
    word: &[f32],
    target: &[f32],
    avoid: &[f32],
    max_points_per_word: i64,
) -> Result<i64> {
    let sim_target = cosine_similarity(word, target)?;
    let sim_avoid = cosine_similarity(word, avoid)?;

    let closer_to_target = sim_target > sim_avoid;
    let winning = if closer_to_target { sim_target } else { sim_avoid };
    let raw = (f64::from(winning) * max_points_per_word as f64).round() as i64;

    let magnitude = raw.saturating_abs();
    Ok(if closer_to_target { magnitude } else { magnitude.saturating_neg() })
}

/// What happened to a word handed to [`ScoringSession::collect_word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectOutcome {
    /// Added to the collection, scoring `points`.
    Collected { points: i64 },
    /// Ignored: empty word.
    Empty,
    /// Ignored: already collected this game.
    Duplicate,
    /// Ignored: not in the vocabulary.
    Unknown,
}

impl CollectOutcome {
    pub const fn is_collected(self) -> bool {
        matches!(self, Self::Collected { .. })
    }
}

/// Emitted once per game when energy runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub score: i64,
    /// Word closest to the mean of everything collected.
    pub final_essence: Option<String>,
    pub collected: Vec<String>,
}

/// State of one player's game.
///
/// Owns its parameters and selector and shares the read-only store. A new
/// target/avoid pair is drawn on construction and on every [`reset`](Self::reset).
pub struct ScoringSession {
    store: Arc<VectorStore>,
    params: GameParameters,
    selector: WordSelector,
    pair: WordPair,
    collected: Vec<String>,
    seen: HashSet<String>,
    score: i64,
    current_energy: f32,
    game_over: bool,
}

impl ScoringSession {
    /// Start a session with a freshly drawn word pair.
    pub fn new(
        store: Arc<VectorStore>,
        params: GameParameters,
        mut selector: WordSelector,
    ) -> Result<Self> {
        params.validate()?;
        let pair = selector.select_pair(&store, params.word_selection_threshold)?;
        Ok(Self::from_parts(store, params, selector, pair))
    }

    /// Start a session with a fixed word pair.
    ///
    /// Both words must be in the store and differ. Later resets still draw
    /// from `selector`.
    pub fn with_pair(
        store: Arc<VectorStore>,
        params: GameParameters,
        selector: WordSelector,
        pair: WordPair,
    ) -> Result<Self> {
        params.validate()?;
        if pair.target == pair.avoid {
            return Err(GameError::InvalidPair);
        }
        for word in [&pair.target, &pair.avoid] {
            if !store.contains(word) {
                return Err(GameError::UnknownWord(word.clone()));
            }
        }
        Ok(Self::from_parts(store, params, selector, pair))
    }

    fn from_parts(
        store: Arc<VectorStore>,
        params: GameParameters,
        selector: WordSelector,
        pair: WordPair,
    ) -> Self {
        info!(target_word = %pair.target, avoid_word = %pair.avoid, "game session started");
        let current_energy = params.max_energy;
        Self {
            store,
            params,
            selector,
            pair,
            collected: Vec::new(),
            seen: HashSet::new(),
            score: 0,
            current_energy,
            game_over: false,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn params(&self) -> &GameParameters {
        &self.params
    }

    pub fn target_word(&self) -> &str {
        &self.pair.target
    }

    pub fn avoid_word(&self) -> &str {
        &self.pair.avoid
    }

    pub fn pair(&self) -> &WordPair {
        &self.pair
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn current_energy(&self) -> f32 {
        self.current_energy
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Collected words in collection order.
    pub fn collected_words(&self) -> &[String] {
        &self.collected
    }

    /// Collected words joined with newlines.
    pub fn collected_words_text(&self) -> String {
        self.collected.join("\n")
    }

    /// Points `word` would score against the current pair.
    pub fn calculate_points(&self, word: &str) -> Result<i64> {
        let vector = self.lookup(word)?;
        let target = self.lookup(&self.pair.target)?;
        let avoid = self.lookup(&self.pair.avoid)?;
        compute_points(vector, target, avoid, self.params.max_points_per_word)
    }

    fn lookup(&self, word: &str) -> Result<&[f32]> {
        self.store
            .get(word)
            .ok_or_else(|| GameError::UnknownWord(word.to_string()))
    }

    /// Collect a word, adding its points to the score.
    ///
    /// Empty, duplicate and unknown words change nothing. A positive score
    /// restores energy, capped at the maximum.
    pub fn collect_word(&mut self, word: &str) -> Result<CollectOutcome> {
        if word.is_empty() {
            return Ok(CollectOutcome::Empty);
        }
        if self.seen.contains(word) {
            return Ok(CollectOutcome::Duplicate);
        }
        if !self.store.contains(word) {
            debug!(word, "ignoring word outside vocabulary");
            return Ok(CollectOutcome::Unknown);
        }

        let points = self.calculate_points(word)?;
        self.seen.insert(word.to_string());
        self.collected.push(word.to_string());
        self.score = self.score.saturating_add(points);

        if points > 0 {
            self.set_energy(self.current_energy + self.params.energy_recovery_per_target_fruit);
        }

        debug!(
            word,
            points,
            score = self.score,
            energy = self.current_energy,
            "collected word"
        );
        Ok(CollectOutcome::Collected { points })
    }

    fn set_energy(&mut self, energy: f32) {
        self.current_energy = energy.clamp(0.0, self.params.max_energy);
    }

    /// Advance the energy drain by `delta_seconds`.
    ///
    /// Energy only drains during gameplay, and a negative or non-finite
    /// delta is ignored. Returns the game-over summary the first time energy
    /// reaches zero; later ticks return `None` until [`reset`](Self::reset).
    pub fn tick(&mut self, delta_seconds: f32, in_gameplay: bool) -> Option<GameOver> {
        if !in_gameplay {
            return None;
        }
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            warn!(delta_seconds, "ignoring invalid tick delta");
            return None;
        }

        let drain = self.params.energy_depletion_rate * delta_seconds;
        if drain.is_finite() {
            self.set_energy(self.current_energy - drain);
        } else {
            self.set_energy(0.0);
        }

        if self.current_energy <= 0.0 && !self.game_over {
            self.game_over = true;
            let final_essence = self.final_essence();
            info!(
                score = self.score,
                collected = self.collected.len(),
                essence = final_essence.as_deref().unwrap_or("-"),
                "game over"
            );
            return Some(GameOver {
                score: self.score,
                final_essence,
                collected: self.collected.clone(),
            });
        }
        None
    }

    /// Mean of all collected embeddings, or `None` if nothing was collected.
    pub fn average_embedding(&self) -> Option<Vec<f32>> {
        let vectors = self.collected.iter().filter_map(|w| self.store.get(w));
        match mean_embedding(vectors) {
            Ok(average) => average,
            Err(e) => {
                warn!(error = %e, "collected embeddings disagree, no average");
                None
            },
        }
    }

    /// The vocabulary word closest to the average collected embedding.
    pub fn final_essence(&self) -> Option<String> {
        let average = self.average_embedding()?;
        match self.store.closest_to(&average) {
            Ok(word) => word.map(str::to_string),
            Err(e) => {
                warn!(error = %e, "cannot resolve final essence");
                None
            },
        }
    }

    /// Start a new game: clear words and score, refill energy and draw a
    /// new pair.
    pub fn reset(&mut self) -> Result<()> {
        let pair = self
            .selector
            .select_pair(&self.store, self.params.word_selection_threshold)?;
        self.collected.clear();
        self.seen.clear();
        self.score = 0;
        self.current_energy = self.params.max_energy;
        self.game_over = false;
        info!(target_word = %pair.target, avoid_word = %pair.avoid, "game session reset");
        self.pair = pair;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_store() -> Arc<VectorStore> {
        Arc::new(
            VectorStore::from_entries([
                ("good", vec![1.0, 0.0]),
                ("bad", vec![-1.0, 0.0]),
                ("ok", vec![0.9, 0.1]),
                ("meh", vec![-0.8, 0.3]),
                ("side", vec![0.0, 1.0]),
            ])
            .unwrap(),
        )
    }

    fn good_bad() -> WordPair {
        WordPair {
            target: "good".into(),
            avoid: "bad".into(),
        }
    }

    fn session() -> ScoringSession {
        ScoringSession::with_pair(
            game_store(),
            GameParameters::default(),
            WordSelector::seeded(3),
            good_bad(),
        )
        .unwrap()
    }

    #[test]
    fn test_compute_points_closer_to_target() {
        let points = compute_points(&[0.9, 0.1], &[1.0, 0.0], &[-1.0, 0.0], 1000).unwrap();
        assert_eq!(points, 994);
    }

    #[test]
    fn test_compute_points_closer_to_avoid() {
        let points = compute_points(&[-0.8, 0.3], &[1.0, 0.0], &[-1.0, 0.0], 1000).unwrap();
        assert!(points < 0);
        assert_eq!(points, -936);
    }

    #[test]
    fn test_compute_points_tie_favors_avoid() {
        let points = compute_points(&[0.0, 1.0], &[1.0, 0.0], &[-1.0, 0.0], 1000).unwrap();
        assert_eq!(points, 0);

        // Equal positive similarity on both sides scores negative
        let points = compute_points(&[1.0, 1.0], &[1.0, 0.0], &[0.0, 1.0], 1000).unwrap();
        assert_eq!(points, -707);
    }

    #[test]
    fn test_compute_points_magnitude_ignores_cosine_sign() {
        // Both similarities negative, target less negative: still positive
        let points = compute_points(&[0.0, -1.0], &[0.6, -0.8], &[0.0, 1.0], 100).unwrap();
        assert_eq!(points, 80);

        let points = compute_points(&[1.0, 0.0], &[-1.0, 0.5], &[-1.0, 0.0], 100).unwrap();
        assert_eq!(points, 89);
    }

    #[test]
    fn test_compute_points_saturates() {
        let points = compute_points(&[1.0, 0.0], &[1.0, 0.0], &[-1.0, 0.0], i64::MAX).unwrap();
        assert_eq!(points, i64::MAX);
        let points = compute_points(&[-1.0, 0.0], &[1.0, 0.0], &[-1.0, 0.0], i64::MAX).unwrap();
        assert_eq!(points, -i64::MAX);
    }

    #[test]
    fn test_compute_points_dimension_mismatch() {
        assert!(matches!(
            compute_points(&[1.0], &[1.0, 0.0], &[0.0, 1.0], 10),
            Err(GameError::Embedding(_))
        ));
    }

    #[test]
    fn test_calculate_points() {
        let session = session();
        assert_eq!(session.calculate_points("ok").unwrap(), 994);
        assert_eq!(session.calculate_points("good").unwrap(), 1000);
        assert_eq!(session.calculate_points("bad").unwrap(), -1000);
        assert_eq!(
            session.calculate_points("nope").unwrap_err(),
            GameError::UnknownWord("nope".into())
        );
    }

    #[test]
    fn test_collect_word_scores_and_records() {
        let mut session = session();
        let outcome = session.collect_word("ok").unwrap();
        assert_eq!(outcome, CollectOutcome::Collected { points: 994 });
        assert_eq!(session.collected_words(), &["ok"]);
        assert_eq!(session.score(), 994);
    }

    #[test]
    fn test_collect_duplicate_is_noop() {
        let mut session = session();
        session.collect_word("ok").unwrap();
        let outcome = session.collect_word("ok").unwrap();
        assert_eq!(outcome, CollectOutcome::Duplicate);
        assert_eq!(session.collected_words(), &["ok"]);
        assert_eq!(session.score(), 994);
    }

    #[test]
    fn test_collect_ignored_words() {
        let mut session = session();
        assert_eq!(session.collect_word("").unwrap(), CollectOutcome::Empty);
        assert_eq!(
            session.collect_word("unicorn").unwrap(),
            CollectOutcome::Unknown
        );
        assert!(session.collected_words().is_empty());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_positive_points_recover_energy() {
        let mut session = session();
        session.tick(50.0, true);
        assert!((session.current_energy() - 50.0).abs() < 1e-4);

        session.collect_word("ok").unwrap();
        assert!((session.current_energy() - 70.0).abs() < 1e-4);

        session.collect_word("meh").unwrap();
        assert!((session.current_energy() - 70.0).abs() < 1e-4);
        assert_eq!(session.score(), 994 - 936);
    }

    #[test]
    fn test_energy_recovery_clamped_to_max() {
        let mut session = session();
        session.collect_word("good").unwrap();
        assert!((session.current_energy() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tick_outside_gameplay_does_not_drain() {
        let mut session = session();
        assert!(session.tick(500.0, false).is_none());
        assert!((session.current_energy() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut session = session();
        session.collect_word("good").unwrap();

        assert!(session.tick(99.0, true).is_none());
        let over = session.tick(5.0, true).unwrap();
        assert_eq!(session.current_energy(), 0.0);
        assert!(session.is_game_over());
        assert_eq!(over.score, 1000);
        assert_eq!(over.final_essence.as_deref(), Some("good"));
        assert_eq!(over.collected, vec!["good".to_string()]);

        assert!(session.tick(1.0, true).is_none());
        assert!(session.tick(100.0, true).is_none());
    }

    #[test]
    fn test_energy_stays_in_bounds() {
        let mut session = session();
        let words = ["ok", "good", "meh", "side", "bad"];
        for (i, word) in words.iter().enumerate() {
            session.tick(i as f32 * 13.0, true);
            session.collect_word(word).unwrap();
            let energy = session.current_energy();
            assert!((0.0..=100.0).contains(&energy), "energy {energy}");
        }
        session.tick(1_000.0, true);
        assert_eq!(session.current_energy(), 0.0);
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let mut session = session();
        session.params.max_points_per_word = i64::MAX;
        assert!(session.collect_word("good").unwrap().is_collected());
        assert!(session.collect_word("ok").unwrap().is_collected());
        assert_eq!(session.score(), i64::MAX);
    }

    #[test]
    fn test_huge_max_points_rejected_at_construction() {
        let params = GameParameters::default().with_max_points_per_word(i64::MAX);
        assert!(matches!(
            ScoringSession::with_pair(game_store(), params, WordSelector::seeded(0), good_bad()),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_tick_delta_ignored() {
        let mut session = session();
        for delta in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -10.0] {
            assert!(session.tick(delta, true).is_none());
            assert!((session.current_energy() - 100.0).abs() < f32::EPSILON);
        }

        // Still drains and ends normally afterwards
        assert!(session.tick(1_000.0, true).is_some());
        assert_eq!(session.current_energy(), 0.0);
    }

    #[test]
    fn test_unbounded_drain_empties_energy() {
        let params = GameParameters::default().with_energy_depletion_rate(f32::MAX);
        let mut session =
            ScoringSession::with_pair(game_store(), params, WordSelector::seeded(0), good_bad())
                .unwrap();
        assert!(session.tick(10.0, true).is_some());
        assert_eq!(session.current_energy(), 0.0);
    }

    #[test]
    fn test_final_essence() {
        let mut session = session();
        assert!(session.final_essence().is_none());

        session.collect_word("good").unwrap();
        assert_eq!(session.final_essence().as_deref(), Some("good"));

        session.collect_word("side").unwrap();
        let average = session.average_embedding().unwrap();
        assert_eq!(average, vec![0.5, 0.5]);
    }

    #[test]
    fn test_collected_words_text() {
        let mut session = session();
        session.collect_word("ok").unwrap();
        session.collect_word("side").unwrap();
        assert_eq!(session.collected_words_text(), "ok\nside");
    }

    #[test]
    fn test_reset_clears_state() {
        let mut session = session();
        session.collect_word("ok").unwrap();
        session.tick(1_000.0, true);
        assert!(session.is_game_over());

        session.reset().unwrap();
        assert!(session.collected_words().is_empty());
        assert_eq!(session.score(), 0);
        assert!((session.current_energy() - 100.0).abs() < f32::EPSILON);
        assert!(!session.is_game_over());
        assert_ne!(session.target_word(), session.avoid_word());

        // Latch re-arms after reset
        assert!(session.tick(1_000.0, true).is_some());
    }

    #[test]
    fn test_new_draws_pair_from_prefix() {
        let params = GameParameters::default().with_word_selection_threshold(1.0);
        let session =
            ScoringSession::new(game_store(), params, WordSelector::seeded(11)).unwrap();
        assert_ne!(session.target_word(), session.avoid_word());
        assert!(session.store().contains(session.target_word()));
        assert!(session.store().contains(session.avoid_word()));
    }

    #[test]
    fn test_new_rejects_tiny_vocabulary() {
        let store = Arc::new(VectorStore::from_entries([("solo", vec![1.0])]).unwrap());
        assert!(matches!(
            ScoringSession::new(store, GameParameters::default(), WordSelector::seeded(0)),
            Err(GameError::VocabularyTooSmall { .. })
        ));
    }

    #[test]
    fn test_with_pair_validation() {
        let same = WordPair {
            target: "good".into(),
            avoid: "good".into(),
        };
        assert!(matches!(
            ScoringSession::with_pair(
                game_store(),
                GameParameters::default(),
                WordSelector::seeded(0),
                same
            ),
            Err(GameError::InvalidPair)
        ));

        let missing = WordPair {
            target: "good".into(),
            avoid: "evil".into(),
        };
        assert!(matches!(
            ScoringSession::with_pair(
                game_store(),
                GameParameters::default(),
                WordSelector::seeded(0),
                missing
            ),
            Err(GameError::UnknownWord(w)) if w == "evil"
        ));
    }
}
