//! The quiz session state machine.
//!
//! A [`QuizSession`] owns one bank and the answers given so far. The current
//! position is always the number of answers recorded, so position and
//! answers cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::error::{BankError, SessionError};
use crate::model::{AnsweredRecord, Label, Question};
use crate::scoring::ScoreSummary;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No questions loaded; every submission is rejected.
    Empty,
    /// At least one question is unanswered.
    InProgress,
    /// Every question has been answered.
    Finished,
}

/// How far through the bank the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction answered, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }
}

/// Single-user quiz over one question bank.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    bank: Vec<Question>,
    answers: Vec<AnsweredRecord>,
}

impl QuizSession {
    /// Start a session over `bank`.
    pub fn new(bank: Vec<Question>) -> Self {
        let mut session = Self::default();
        session.load(bank);
        session
    }

    /// Replace the bank and start over.
    pub fn load(&mut self, bank: Vec<Question>) {
        tracing::debug!(questions = bank.len(), "loading bank into session");
        self.bank = bank;
        self.answers.clear();
    }

    /// Replace the bank with a freshly obtained one, keeping the current
    /// session if the new bank could not be obtained or is empty.
    ///
    /// Returns the number of questions loaded.
    pub fn replace_bank(
        &mut self,
        incoming: Result<Vec<Question>, BankError>,
    ) -> Result<usize, BankError> {
        let bank = incoming?;
        if bank.is_empty() {
            return Err(BankError::Empty);
        }
        let count = bank.len();
        self.load(bank);
        Ok(count)
    }

    /// Discard all answers and return to the first question.
    pub fn reset(&mut self) {
        self.answers.clear();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.bank.is_empty() {
            SessionState::Empty
        } else if self.answers.len() == self.bank.len() {
            SessionState::Finished
        } else {
            SessionState::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    /// Index of the next question to answer; equals [`len`](Self::len) once
    /// finished.
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.answers.len())
    }

    /// Number of questions in the bank.
    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn bank(&self) -> &[Question] {
        &self.bank
    }

    /// Answers in the order they were given.
    pub fn answers(&self) -> &[AnsweredRecord] {
        &self.answers
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.bank.len(),
        }
    }

    /// Answer the current question.
    pub fn submit_answer(&mut self, label: Label) -> Result<&AnsweredRecord, SessionError> {
        let question = match self.state() {
            SessionState::Empty => return Err(SessionError::EmptyBank),
            SessionState::Finished => return Err(SessionError::AlreadyFinished),
            SessionState::InProgress => &self.bank[self.answers.len()],
        };

        let record = AnsweredRecord::new(question, label);
        tracing::debug!(
            number = record.number,
            user = %record.user,
            correct = record.is_correct,
            "answer recorded"
        );
        self.answers.push(record);
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Answer the current question with a label given as text.
    pub fn submit_input(&mut self, input: &str) -> Result<&AnsweredRecord, SessionError> {
        let label: Label = input
            .parse()
            .map_err(|_| SessionError::InvalidLabel(input.trim().to_string()))?;
        self.submit_answer(label)
    }

    /// Score of the finished quiz.
    pub fn summary(&self) -> Result<ScoreSummary, SessionError> {
        match self.state() {
            SessionState::Finished => Ok(ScoreSummary::from_answers(&self.answers)),
            SessionState::Empty => Err(SessionError::EmptyBank),
            SessionState::InProgress => Err(SessionError::NotFinished {
                answered: self.answers.len(),
                total: self.bank.len(),
            }),
        }
    }
}
