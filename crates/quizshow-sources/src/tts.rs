//! Speech synthesis through the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short texts, so narration is split into chunks
//! of at most [`MAX_CHUNK_CHARS`] characters on word boundaries. The MP3
//! responses are concatenated in order, which players handle as one stream.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Url;
use tracing::instrument;

use quizshow_core::traits::{SpeechAudio, SpeechRequest, SpeechSynthesizer};

use crate::error::SourceError;

/// Longest text sent in one request.
pub const MAX_CHUNK_CHARS: usize = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Google Translate text-to-speech backend.
pub struct GoogleTranslateTts {
    /// Fixed host; when unset the host follows the request's `tld`.
    base_url: Option<String>,
    client: reqwest::Client,
}

impl GoogleTranslateTts {
    pub fn new(base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            client,
        }
    }

    fn endpoint(&self, tld: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/translate_tts"),
            None => format!("https://translate.google.{tld}/translate_tts"),
        }
    }

    async fn fetch_chunk(
        &self,
        endpoint: &str,
        lang: &str,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SourceError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let url = Url::parse_with_params(
            endpoint,
            [
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| SourceError::NetworkError(format!("invalid TTS endpoint {endpoint}: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, DEFAULT_TIMEOUT_SECS))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(SourceError::RateLimited(
                "speech service refused the request".into(),
            ));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError { status, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Split text into word-aligned chunks of at most `max` characters.
///
/// Whitespace runs collapse to single spaces. A word longer than `max` is
/// cut into `max`-character pieces.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();

        while word_chars.len() > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word_chars.split_off(max);
            chunks.push(word_chars.into_iter().collect());
            word_chars = rest;
        }

        let len = word_chars.len();
        if len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + len > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word_chars);
        current_len += len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    fn name(&self) -> &str {
        "google-translate"
    }

    #[instrument(skip(self, request), fields(lang = %request.lang, chars = request.text.len()))]
    async fn synthesize(&self, request: &SpeechRequest) -> anyhow::Result<SpeechAudio> {
        let chunks = split_text(&request.text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("nothing to synthesize: text is empty");
        }

        let endpoint = self.endpoint(&request.tld);
        let total = chunks.len();
        let parts = try_join_all(
            chunks
                .iter()
                .enumerate()
                .map(|(idx, chunk)| self.fetch_chunk(&endpoint, &request.lang, chunk, idx, total)),
        )
        .await?;

        tracing::debug!(chunks = total, "speech synthesized");
        Ok(SpeechAudio {
            bytes: parts.concat(),
            mime: "audio/mpeg".into(),
        })
    }
}
