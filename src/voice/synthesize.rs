//! Text-to-speech through a network backend
//!
//! Synthesis buffers the whole result in memory and hands it back as an
//! [`AudioStream`]; nothing is written to disk and nothing is cached, so the
//! same text synthesized twice costs two round-trips by design of the caller
//! contract.

use thiserror::Error;

/// MIME-style tag for synthesized audio
const AUDIO_FORMAT: &str = "audio/mp3";

/// An in-memory synthesized audio stream, produced fresh per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
    /// MIME-style format tag
    pub format: &'static str,
}

impl AudioStream {
    /// Number of encoded bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the stream holds no audio
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Errors from the synthesis backend
///
/// A single attempt is made per call; the caller surfaces the error and may
/// retry manually.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Backend rejected the request (bad language code, text too long, ...)
    #[error("synthesis backend error: {0}")]
    Backend(String),

    /// Backend could not be reached
    #[error("synthesis transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Synthesizes speech from text at normal speaking rate
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    slow: bool,
}

impl SpeechSynthesizer {
    /// Create a synthesizer for a translate-TTS style endpoint
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            slow: false,
        }
    }

    /// Synthesize text in the given language
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the request or cannot be
    /// reached; no automatic retry is performed.
    pub async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<AudioStream, SynthesisError> {
        tracing::debug!(
            chars = text.chars().count(),
            language = language_code,
            "synthesizing speech"
        );

        let speed = if self.slow { "0.3" } else { "1" };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", text),
                ("tl", language_code),
                ("ttsspeed", speed),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis backend error");
            return Err(SynthesisError::Backend(format!(
                "synthesis error {status}: {body}"
            )));
        }

        let bytes = response.bytes().await?;
        tracing::info!(audio_bytes = bytes.len(), "synthesis complete");

        Ok(AudioStream {
            bytes: bytes.to_vec(),
            format: AUDIO_FORMAT,
        })
    }
}
