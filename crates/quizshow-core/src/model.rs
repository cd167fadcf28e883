//! Core data model types for quizshow.
//!
//! These are the records the parser produces and the session consumes:
//! answer labels, questions, and answered-question snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// One of the four option labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    /// Every label in option order. Index `i` of this table is the label of
    /// option `i`; this is the only place the mapping is defined.
    pub const ALL: [Label; OPTION_COUNT] = [Label::A, Label::B, Label::C, Label::D];

    /// Zero-based option index for this label.
    pub fn index(self) -> usize {
        match self {
            Label::A => 0,
            Label::B => 1,
            Label::C => 2,
            Label::D => 3,
        }
    }

    /// Label for a zero-based option index.
    pub fn from_index(index: usize) -> Option<Label> {
        Label::ALL.get(index).copied()
    }

    /// The label's letter.
    pub fn as_char(self) -> char {
        match self {
            Label::A => 'A',
            Label::B => 'B',
            Label::C => 'C',
            Label::D => 'D',
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Label {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_char() == c)
            .ok_or_else(|| format!("unknown label: {c}"))
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Label::try_from(c),
            _ => Err(format!("unknown label: {s}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Ordinal from the bank file. Display only; not unique or contiguous.
    pub number: u32,
    /// The prompt.
    pub text: String,
    /// Option texts in A..D order.
    pub options: [String; OPTION_COUNT],
    /// The correct option.
    pub correct: Label,
}

impl Question {
    /// Text of the option with the given label.
    pub fn option(&self, label: Label) -> &str {
        &self.options[label.index()]
    }

    /// Options paired with their labels, in order.
    pub fn labeled_options(&self) -> impl Iterator<Item = (Label, &str)> {
        Label::ALL
            .into_iter()
            .zip(self.options.iter().map(String::as_str))
    }
}

/// Snapshot of a question together with the user's answer.
///
/// The question fields are copied so that the review stays stable when the
/// bank is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredRecord {
    pub number: u32,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// What the user picked.
    pub user: Label,
    /// What the bank marks as correct.
    pub correct: Label,
    pub is_correct: bool,
}

impl AnsweredRecord {
    /// Record an answer to `question`.
    pub fn new(question: &Question, user: Label) -> Self {
        Self {
            number: question.number,
            text: question.text.clone(),
            options: question.options.clone(),
            user,
            correct: question.correct,
            is_correct: user == question.correct,
        }
    }

    /// Text of the option the user chose.
    pub fn user_option(&self) -> &str {
        &self.options[self.user.index()]
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct.index()]
    }
}
