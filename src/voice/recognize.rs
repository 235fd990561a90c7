//! Speech recognition through a network backend

use std::fmt;

use crate::config::VoiceConfig;
use crate::voice::capture::{AudioCapture, CaptureError, SAMPLE_RATE, samples_to_wav};
use crate::voice::listen::ListenConfig;

/// Spoken languages supported by the capture flow
///
/// The set is closed on purpose; unknown tags fall back to English rather
/// than passing free-form strings to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpokenLanguage {
    /// English (en-IN locale)
    #[default]
    English,
    /// Hindi
    Hindi,
    /// Telugu
    Telugu,
    /// Tamil
    Tamil,
    /// Marathi
    Marathi,
}

impl SpokenLanguage {
    /// Locale code used by the recognition backend
    #[must_use]
    pub const fn locale(self) -> &'static str {
        match self {
            Self::English => "en-IN",
            Self::Hindi => "hi-IN",
            Self::Telugu => "te-IN",
            Self::Tamil => "ta-IN",
            Self::Marathi => "mr-IN",
        }
    }

    /// Two-letter code used by the synthesis backend
    #[must_use]
    pub const fn synthesis_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Telugu => "te",
            Self::Tamil => "ta",
            Self::Marathi => "mr",
        }
    }

    /// Parse a logical language tag; unknown tags map to English
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "hindi" => Self::Hindi,
            "telugu" => Self::Telugu,
            "tamil" => Self::Tamil,
            "marathi" => Self::Marathi,
            _ => Self::English,
        }
    }

    /// Logical tag for this language
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
            Self::Telugu => "telugu",
            Self::Tamil => "tamil",
            Self::Marathi => "marathi",
        }
    }
}

impl fmt::Display for SpokenLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Response from the recognition endpoint
#[derive(serde::Deserialize)]
struct RecognizeResponse {
    text: String,
}

/// Transcribes captured speech via an HTTP recognition backend
pub struct SpeechRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl SpeechRecognizer {
    /// Create a recognizer for a transcription endpoint
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
        }
    }

    /// Create a recognizer from the voice configuration
    #[must_use]
    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(
            config.recognizer_endpoint.clone(),
            config.recognizer_api_key.clone(),
            config.recognizer_model.clone(),
        )
    }

    /// Transcribe WAV audio to text
    ///
    /// One round-trip, no retry. The backend being unreachable and the audio
    /// being unintelligible are distinct outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::ServiceUnavailable`] on transport or backend
    /// failure, and [`CaptureError::UnrecognizedSpeech`] when the backend
    /// produced no transcript.
    pub async fn recognize(
        &self,
        wav: &[u8],
        locale: &str,
    ) -> std::result::Result<String, CaptureError> {
        tracing::debug!(audio_bytes = wav.len(), locale, "starting recognition");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav.to_vec())
                    .file_name("speech.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| CaptureError::ServiceUnavailable(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", locale.to_string());

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "recognition request failed");
            CaptureError::ServiceUnavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "recognition backend error");
            return Err(CaptureError::ServiceUnavailable(format!(
                "recognition error {status}: {body}"
            )));
        }

        let result: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| CaptureError::ServiceUnavailable(e.to_string()))?;

        let text = result.text.trim().to_string();
        if text.is_empty() {
            tracing::info!("empty transcript");
            return Err(CaptureError::UnrecognizedSpeech);
        }

        tracing::info!(transcript = %text, "recognition complete");
        Ok(text)
    }
}

/// Capture one spoken phrase from the microphone and recognize it
///
/// Blocks while listening (bounded by `config`'s timeouts), then performs a
/// single recognition round-trip for the configured language's locale.
///
/// # Errors
///
/// Propagates the capture conditions: no speech detected, unrecognized
/// speech, service unavailable, or a device failure.
pub async fn capture_speech(
    capture: &mut AudioCapture,
    recognizer: &SpeechRecognizer,
    config: &ListenConfig,
    language: SpokenLanguage,
) -> std::result::Result<String, CaptureError> {
    let samples = capture.listen(config)?;
    let wav = samples_to_wav(&samples, SAMPLE_RATE)
        .map_err(|e| CaptureError::Device(e.to_string()))?;
    recognizer.recognize(&wav, language.locale()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_table_is_fixed() {
        assert_eq!(SpokenLanguage::English.locale(), "en-IN");
        assert_eq!(SpokenLanguage::Hindi.locale(), "hi-IN");
        assert_eq!(SpokenLanguage::Telugu.locale(), "te-IN");
        assert_eq!(SpokenLanguage::Tamil.locale(), "ta-IN");
        assert_eq!(SpokenLanguage::Marathi.locale(), "mr-IN");
    }

    #[test]
    fn unknown_tags_default_to_english() {
        assert_eq!(SpokenLanguage::from_tag("klingon"), SpokenLanguage::English);
        assert_eq!(SpokenLanguage::from_tag(""), SpokenLanguage::English);
        assert_eq!(SpokenLanguage::from_tag("  HINDI "), SpokenLanguage::Hindi);
    }

    #[test]
    fn synthesis_codes_are_two_letter() {
        assert_eq!(SpokenLanguage::English.synthesis_code(), "en");
        assert_eq!(SpokenLanguage::Marathi.synthesis_code(), "mr");
    }
}
