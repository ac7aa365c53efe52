use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ScoringError;
use crate::model::arrow::{Arrow, ScoringSystem};

/// Supplied by round selection; the engine never mutates it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    pub round_name: String,
    pub total_arrows: usize,
    pub arrows_per_end: usize,
    #[serde(default)]
    pub use_target_face: bool,
    #[serde(default)]
    pub is_triple_spot: bool,
}

impl RoundConfig {
    #[must_use]
    pub fn new(round_name: &str, total_arrows: usize, arrows_per_end: usize) -> Self {
        Self {
            round_name: round_name.to_string(),
            total_arrows,
            arrows_per_end,
            use_target_face: false,
            is_triple_spot: false,
        }
    }

    /// Arrows are placed on a single full face instead of picked from buttons.
    #[must_use]
    pub fn single_spot(mut self) -> Self {
        self.use_target_face = true;
        self.is_triple_spot = false;
        self
    }

    /// Arrows are placed on a vertical column of three reduced faces.
    #[must_use]
    pub fn triple_spot(mut self) -> Self {
        self.use_target_face = true;
        self.is_triple_spot = true;
        self
    }

    #[must_use]
    pub fn scoring_system(&self) -> ScoringSystem {
        ScoringSystem::for_round(&self.round_name)
    }

    #[must_use]
    pub fn total_ends(&self) -> usize {
        self.total_arrows.div_ceil(self.arrows_per_end.max(1))
    }

    /// # Errors
    ///
    /// Returns `ScoringError::InvalidConfig` for empty names, zero counts or ends longer than the round.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.round_name.trim().is_empty() {
            return Err(ScoringError::InvalidConfig("round name is empty".into()));
        }
        if self.arrows_per_end == 0 || self.total_arrows == 0 {
            return Err(ScoringError::InvalidConfig(format!(
                "{}: arrow counts must be positive",
                self.round_name
            )));
        }
        if self.arrows_per_end > self.total_arrows {
            return Err(ScoringError::InvalidConfig(format!(
                "{}: {} arrows per end exceeds {} total arrows",
                self.round_name, self.arrows_per_end, self.total_arrows
            )));
        }
        if self.is_triple_spot && !self.use_target_face {
            log::warn!(
                "{}: triple spot set without a target face, positions will not be captured",
                self.round_name
            );
        }
        Ok(())
    }
}

/// An ordered batch of arrows. Closed ends always hold exactly `arrows_per_end` arrows.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct End {
    pub arrows: Vec<Arrow>,
}

impl End {
    #[must_use]
    pub fn new(arrows: Vec<Arrow>) -> Self {
        Self { arrows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }
}

/// Handed to the submission store once a session is finished.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundResult {
    pub round_name: String,
    pub total_score: u32,
    pub golds: u32,
    pub hits: u32,
    pub ends: Vec<End>,
    pub arrows_per_end: usize,
    pub is_triple_spot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_image: Option<Vec<u8>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundCatalog {
    pub rounds: Vec<RoundConfig>,
}

impl RoundCatalog {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rounds: vec![
                RoundConfig::new("Portsmouth", 60, 3).single_spot(),
                RoundConfig::new("WA 18m", 60, 3),
                RoundConfig::new("WA 18m Triple", 60, 3).triple_spot(),
                RoundConfig::new("Worcester", 60, 5),
                RoundConfig::new("Bray I", 30, 6),
                RoundConfig::new("National", 72, 6).single_spot(),
                RoundConfig::new("WA 70m", 72, 6),
            ],
        }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of round configs,
    /// or any round fails validation.
    pub fn from_json_file(path: &Path) -> Result<Self, ScoringError> {
        let contents = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        Self::from_json(value)
    }

    /// # Errors
    ///
    /// Returns an error if `value` is not an array of valid round configs.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ScoringError> {
        let rounds: Vec<RoundConfig> = serde_json::from_value(value)?;
        for round in &rounds {
            round.validate()?;
        }
        Ok(Self { rounds })
    }

    #[must_use]
    pub fn find(&self, round_name: &str) -> Option<&RoundConfig> {
        let wanted = round_name.trim();
        self.rounds
            .iter()
            .find(|r| r.round_name.eq_ignore_ascii_case(wanted))
    }
}

impl Default for RoundCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
