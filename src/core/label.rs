//! The five canonical mood labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of five ordered mood categories, from most negative to most positive.
///
/// The display spelling (`"Mildly Negative"`, ...) is part of the wire format
/// and of the training data contract, so it is matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Mildly Negative")]
    MildlyNegative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Mildly Positive")]
    MildlyPositive,
    #[serde(rename = "Positive")]
    Positive,
}

impl MoodLabel {
    /// All labels in canonical order. Index == class id.
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::Negative,
        MoodLabel::MildlyNegative,
        MoodLabel::Neutral,
        MoodLabel::MildlyPositive,
        MoodLabel::Positive,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Canonical class id (Negative = 0 ... Positive = 4).
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Negative => "Negative",
            MoodLabel::MildlyNegative => "Mildly Negative",
            MoodLabel::Neutral => "Neutral",
            MoodLabel::MildlyPositive => "Mildly Positive",
            MoodLabel::Positive => "Positive",
        }
    }

    /// Maps a compound polarity score onto a mood.
    ///
    /// ```text
    /// c < -0.5          Negative
    /// -0.5 <= c < -0.2  Mildly Negative
    /// -0.2 <= c <= 0.2  Neutral
    /// 0.2 < c <= 0.5    Mildly Positive
    /// c > 0.5           Positive
    /// ```
    ///
    /// NaN falls through every comparison and is reported as `Neutral`.
    pub fn from_compound(compound: f64) -> Self {
        if compound < -0.5 {
            MoodLabel::Negative
        } else if (-0.5..-0.2).contains(&compound) {
            MoodLabel::MildlyNegative
        } else if (-0.2..=0.2).contains(&compound) {
            MoodLabel::Neutral
        } else if compound > 0.2 && compound <= 0.5 {
            MoodLabel::MildlyPositive
        } else if compound > 0.5 {
            MoodLabel::Positive
        } else {
            MoodLabel::Neutral
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five canonical spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for MoodLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
