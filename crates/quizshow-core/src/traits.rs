//! Collaborator traits for bank sources and speech synthesis.
//!
//! These async traits are implemented by the `quizshow-sources` crate. The
//! session never calls them; the presentation layer does, so the session
//! stays correct whatever their latency or failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bank sources
// ---------------------------------------------------------------------------

/// Somewhere question banks can be listed and fetched from.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Human-readable source name (e.g. "github").
    fn name(&self) -> &str;

    /// List the banks this source offers.
    async fn list(&self) -> anyhow::Result<Vec<BankEntry>>;

    /// Fetch the raw text of a bank by name.
    async fn fetch(&self, name: &str) -> anyhow::Result<String>;
}

/// A bank offered by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    /// File name, e.g. "CLUB ATLETICO HURACAN.txt".
    pub name: String,
    /// Size in bytes, when the source reports it.
    #[serde(default)]
    pub size: Option<u64>,
}

// ---------------------------------------------------------------------------
// Speech synthesis
// ---------------------------------------------------------------------------

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Turn text into audio.
    async fn synthesize(&self, request: &SpeechRequest) -> anyhow::Result<SpeechAudio>;
}

/// Text to speak, and the voice to speak it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    /// Language code, e.g. "es".
    pub lang: String,
    /// Accent region as a top-level domain, e.g. "com.ar".
    pub tld: String,
}

/// Synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. "audio/mpeg".
    pub mime: String,
}

impl SpeechAudio {
    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/x-wav" => "wav",
            "audio/ogg" => "ogg",
            _ => "bin",
        }
    }
}
