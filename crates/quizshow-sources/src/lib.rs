//! quizshow-sources — Where question banks and narration audio come from.
//!
//! Implements the `BankSource` trait for local folders and GitHub
//! repositories, and `SpeechSynthesizer` for the Google Translate TTS
//! endpoint, plus the configuration that wires them together.

pub mod config;
pub mod error;
pub mod github;
pub mod local;
pub mod mock;
pub mod tts;

pub use config::{create_source, create_synthesizer, load_config, QuizshowConfig, SourceConfig};
pub use error::SourceError;

use quizshow_core::error::BankError;
use quizshow_core::model::Question;
use quizshow_core::parser;
use quizshow_core::traits::BankSource;

/// Fetch a bank from a source and parse it.
///
/// Source failures become [`BankError::Source`] so callers can hand the
/// result straight to `QuizSession::replace_bank`.
pub async fn fetch_bank(source: &dyn BankSource, name: &str) -> Result<Vec<Question>, BankError> {
    let text = source
        .fetch(name)
        .await
        .map_err(|e| BankError::Source(format!("{} ({}): {e:#}", name, source.name())))?;
    Ok(parser::parse(&text))
}
