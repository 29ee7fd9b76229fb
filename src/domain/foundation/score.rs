//! Score value object for item ratings (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Rating score: 1 (worst) to 5 (best).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
#[repr(u8)]
pub enum Score {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Score {
    /// Smallest accepted score value.
    pub const MIN: i64 = 1;

    /// Largest accepted score value.
    pub const MAX: i64 = 5;

    /// All scores in ascending order, for keyboard rendering.
    pub const ALL: [Score; 5] = [Score::One, Score::Two, Score::Three, Score::Four, Score::Five];

    /// Creates a Score from an integer, returning error if out of range.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Score::One),
            2 => Ok(Score::Two),
            3 => Ok(Score::Three),
            4 => Ok(Score::Four),
            5 => Ok(Score::Five),
            _ => Err(ValidationError::out_of_range(
                "score",
                Self::MIN,
                Self::MAX,
                value,
            )),
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Returns a star string of the score's length, for prompt rendering.
    pub fn stars(&self) -> String {
        "⭐".repeat(self.value() as usize)
    }
}

impl TryFrom<i64> for Score {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::try_from_i64(value)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score.value() as i64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
