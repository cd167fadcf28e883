//! Final score computation and performance tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::AnsweredRecord;

/// Lowest percentage that earns [`Tier::Top`].
pub const TOP_TIER_MIN: u32 = 90;
/// Lowest percentage that earns [`Tier::Mid`].
pub const MID_TIER_MIN: u32 = 70;

/// Integer percentage of correct answers, truncated toward zero.
///
/// Returns 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // correct <= total, so the quotient is at most 100.
    (correct.saturating_mul(100) / total) as u32
}

/// Qualitative performance bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Top,
    Mid,
    Low,
}

impl Tier {
    /// Bracket for a percentage score. Lower bounds are inclusive.
    pub fn from_percentage(p: u32) -> Self {
        if p >= TOP_TIER_MIN {
            Tier::Top
        } else if p >= MID_TIER_MIN {
            Tier::Mid
        } else {
            Tier::Low
        }
    }

    /// Short headline shown and narrated with the result.
    pub fn headline(self) -> &'static str {
        match self {
            Tier::Top => "PERFECT!",
            Tier::Mid => "Very good!",
            Tier::Low => "Keep practicing",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Top => write!(f, "top"),
            Tier::Mid => write!(f, "mid"),
            Tier::Low => write!(f, "low"),
        }
    }
}

/// Score of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Answers that matched the bank's correct label.
    pub correct: usize,
    /// Answers given.
    pub total: usize,
    /// `floor(100 * correct / total)`.
    pub percentage: u32,
    pub tier: Tier,
    /// Wrong answers, in the order they were given.
    pub incorrect: Vec<AnsweredRecord>,
}

impl ScoreSummary {
    /// Score a list of answers.
    pub fn from_answers(answers: &[AnsweredRecord]) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let total = answers.len();
        let percentage = percentage(correct, total);

        Self {
            correct,
            total,
            percentage,
            tier: Tier::from_percentage(percentage),
            incorrect: answers.iter().filter(|a| !a.is_correct).cloned().collect(),
        }
    }
}
