//! quizshow-core — Question-bank parser, quiz session, and scoring.
//!
//! This crate defines the question model, the plain-text bank format, the
//! session state machine the presentation layer drives, and the traits for
//! the external collaborators (bank sources, speech synthesis).

pub mod error;
pub mod model;
pub mod narration;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;

pub use error::{BankError, SessionError};
pub use model::{AnsweredRecord, Label, Question};
pub use scoring::{ScoreSummary, Tier};
pub use session::{QuizSession, SessionState};
