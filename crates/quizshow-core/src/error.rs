//! Error types for bank loading and session operations.
//!
//! Both enums are matched on by the CLI to decide whether a failure is
//! recoverable (re-prompt) or fatal (report and exit).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while obtaining a question bank.
///
/// Per-question malformation is not an error: incomplete blocks are filtered
/// out by the parser. These variants cover the source itself being unusable.
#[derive(Debug, Error)]
pub enum BankError {
    /// The bank file could not be read.
    #[error("failed to read question bank {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bank bytes are not valid UTF-8.
    #[error("question bank is not valid UTF-8 (invalid byte at offset {offset})")]
    Encoding { offset: usize },

    /// The bank parsed to zero questions.
    #[error("question bank contains no complete questions")]
    Empty,

    /// A collaborator (remote source, upload) failed to deliver the text.
    #[error("failed to fetch question bank: {0}")]
    Source(String),
}

/// A rejected session call. The session state is unchanged when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The answer label is not one of A, B, C, D.
    #[error("invalid answer label '{0}', expected one of A, B, C, D")]
    InvalidLabel(String),

    /// No questions are loaded.
    #[error("no questions loaded")]
    EmptyBank,

    /// Every question has already been answered.
    #[error("quiz already finished")]
    AlreadyFinished,

    /// The score was requested before the last answer was submitted.
    #[error("quiz not finished: {answered} of {total} questions answered")]
    NotFinished { answered: usize, total: usize },
}
