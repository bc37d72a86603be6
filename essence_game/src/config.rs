// SPDX-License-Identifier: MIT OR Apache-2.0
//! Game parameters, loadable from `GameParameters.json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, Result};

/// Largest accepted `maxPointsPerWord`.
pub const MAX_POINTS_PER_WORD_LIMIT: i64 = i32::MAX as i64;

/// File name of the parameters payload next to the corpora.
pub const PARAMETERS_FILE: &str = "GameParameters.json";

/// Tunable game parameters.
///
/// Keys are camelCase in JSON. Any key left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameParameters {
    /// Energy lost per second of gameplay.
    pub energy_depletion_rate: f32,
    /// Energy regained when a collected word scores positive.
    pub energy_recovery_per_target_fruit: f32,
    /// Light rotation in degrees per second. Only the scene layer reads this.
    pub rotation_speed: f32,
    /// Fraction of the vocabulary, in load order, that target and avoid
    /// words are drawn from.
    pub word_selection_threshold: f32,
    /// Points for a word with similarity 1.0.
    pub max_points_per_word: i64,
    pub max_energy: f32,
}

impl Default for GameParameters {
    fn default() -> Self {
        Self {
            energy_depletion_rate: 1.0,
            energy_recovery_per_target_fruit: 20.0,
            rotation_speed: 10.0,
            word_selection_threshold: 0.5,
            max_points_per_word: 1000,
            max_energy: 100.0,
        }
    }
}

impl GameParameters {
    /// Parse and validate a JSON payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read parameters from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read parameters from a JSON file, falling back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(params) => {
                info!(path = %path.display(), "game parameters loaded");
                params
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default game parameters");
                Self::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("energyDepletionRate", self.energy_depletion_rate),
            (
                "energyRecoveryPerTargetFruit",
                self.energy_recovery_per_target_fruit,
            ),
            ("rotationSpeed", self.rotation_speed),
            ("wordSelectionThreshold", self.word_selection_threshold),
            ("maxEnergy", self.max_energy),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(GameError::InvalidConfig(format!("{name} must be finite")));
            }
        }

        if self.word_selection_threshold <= 0.0 || self.word_selection_threshold > 1.0 {
            return Err(GameError::InvalidConfig(
                "wordSelectionThreshold must be in (0, 1]".to_string(),
            ));
        }
        if self.max_energy <= 0.0 {
            return Err(GameError::InvalidConfig(
                "maxEnergy must be greater than 0".to_string(),
            ));
        }
        if self.energy_depletion_rate < 0.0 {
            return Err(GameError::InvalidConfig(
                "energyDepletionRate must not be negative".to_string(),
            ));
        }
        if self.energy_recovery_per_target_fruit < 0.0 {
            return Err(GameError::InvalidConfig(
                "energyRecoveryPerTargetFruit must not be negative".to_string(),
            ));
        }
        if self.max_points_per_word < 0 {
            return Err(GameError::InvalidConfig(
                "maxPointsPerWord must not be negative".to_string(),
            ));
        }
        if self.max_points_per_word > MAX_POINTS_PER_WORD_LIMIT {
            return Err(GameError::InvalidConfig(format!(
                "maxPointsPerWord must not exceed {MAX_POINTS_PER_WORD_LIMIT}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn with_energy_depletion_rate(mut self, rate: f32) -> Self {
        self.energy_depletion_rate = rate;
        self
    }

    #[must_use]
    pub const fn with_energy_recovery(mut self, recovery: f32) -> Self {
        self.energy_recovery_per_target_fruit = recovery;
        self
    }

    #[must_use]
    pub const fn with_word_selection_threshold(mut self, threshold: f32) -> Self {
        self.word_selection_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_max_points_per_word(mut self, points: i64) -> Self {
        self.max_points_per_word = points;
        self
    }

    #[must_use]
    pub const fn with_max_energy(mut self, energy: f32) -> Self {
        self.max_energy = energy;
        self
    }
}
