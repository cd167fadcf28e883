//! Mock source and synthesizer for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizshow_core::traits::{BankEntry, BankSource, SpeechAudio, SpeechRequest, SpeechSynthesizer};

use crate::error::SourceError;

/// An in-memory bank source.
pub struct MockSource {
    banks: BTreeMap<String, String>,
    /// When set, every call fails with this message.
    failure: Option<String>,
    call_count: AtomicU32,
}

impl MockSource {
    /// Create a source offering the given `name → text` banks.
    pub fn new<I, K, V>(banks: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            banks: banks
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            failure: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a source whose every call fails with a network error.
    pub fn failing(message: &str) -> Self {
        Self {
            banks: BTreeMap::new(),
            failure: Some(message.to_string()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), SourceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.failure {
            Some(message) => Err(SourceError::NetworkError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BankSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self) -> anyhow::Result<Vec<BankEntry>> {
        self.check()?;
        Ok(self
            .banks
            .iter()
            .map(|(name, text)| BankEntry {
                name: name.clone(),
                size: Some(text.len() as u64),
            })
            .collect())
    }

    async fn fetch(&self, name: &str) -> anyhow::Result<String> {
        self.check()?;
        self.banks
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()).into())
    }
}

/// A synthesizer that returns fixed bytes and remembers what it was asked.
pub struct MockSynthesizer {
    audio: Vec<u8>,
    fail: bool,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockSynthesizer {
    pub fn with_fixed_audio(audio: &[u8]) -> Self {
        Self {
            audio: audio.to_vec(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A synthesizer whose every call fails.
    pub fn failing() -> Self {
        Self {
            audio: Vec::new(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> anyhow::Result<SpeechAudio> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(SourceError::NetworkError("speech service unreachable".into()).into());
        }
        Ok(SpeechAudio {
            bytes: self.audio.clone(),
            mime: "audio/mpeg".into(),
        })
    }
}
