use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::PassageId;
use crate::model::paragraph::Paragraph;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Error returned when a difficulty label is outside the five tiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty tier: {raw}")]
pub struct DifficultyError {
    pub raw: String,
}

/// The five ordered difficulty tiers a passage can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    Easy,
    Medium,
    #[serde(rename = "Medium-Hard")]
    MediumHard,
    Hard,
}

impl Difficulty {
    /// All tiers in ascending order.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::MediumHard,
        Difficulty::Hard,
    ];

    /// Returns the label used in the catalog source and on the wire.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::MediumHard => "Medium-Hard",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|tier| tier.label() == s)
            .ok_or_else(|| DifficultyError { raw: s.to_owned() })
    }
}

//
// ─── PASSAGE ───────────────────────────────────────────────────────────────────
//

/// A multi-paragraph reading text with catalog metadata.
///
/// `paragraphs` stays `None` until the analysis gateway has processed
/// `full_text`; once populated it is treated as immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub id: PassageId,
    pub title: String,
    pub difficulty: Difficulty,
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<Paragraph>>,
}

impl Passage {
    /// Creates an unanalyzed passage.
    #[must_use]
    pub fn new(
        id: PassageId,
        title: impl Into<String>,
        difficulty: Difficulty,
        full_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            difficulty,
            full_text: full_text.into(),
            paragraphs: None,
        }
    }

    /// Attaches the analyzed paragraph breakdown.
    #[must_use]
    pub fn with_paragraphs(mut self, paragraphs: Vec<Paragraph>) -> Self {
        self.paragraphs = Some(paragraphs);
        self
    }

    /// Returns true once the analysis gateway has populated `paragraphs`.
    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        self.paragraphs.is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
