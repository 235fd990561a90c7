//! Configuration for the WikiVaani pipeline

use crate::voice::{ListenConfig, SpokenLanguage};

/// Default reference source API endpoint
const DEFAULT_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Default recognition endpoint (Whisper-compatible transcription API)
const DEFAULT_RECOGNIZER_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default recognition model
const DEFAULT_RECOGNIZER_MODEL: &str = "whisper-1";

/// Default synthesis endpoint (translate-TTS style)
const DEFAULT_SYNTHESIZER_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Reference knowledge source settings
    pub source: SourceConfig,

    /// Voice backends (recognition and synthesis)
    pub voice: VoiceConfig,

    /// Microphone listening parameters
    pub listen: ListenConfig,
}

impl Config {
    /// Defaults overridden by `WIKIVAANI_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("WIKIVAANI_SOURCE_API") {
            config.source.api_endpoint = v;
        }
        if let Ok(v) = std::env::var("WIKIVAANI_USER_AGENT") {
            config.source.user_agent = v;
        }
        if let Ok(v) = std::env::var("WIKIVAANI_STT_API") {
            config.voice.recognizer_endpoint = v;
        }
        if let Ok(v) = std::env::var("WIKIVAANI_STT_KEY") {
            config.voice.recognizer_api_key = Some(v);
        }
        if let Ok(v) = std::env::var("WIKIVAANI_STT_MODEL") {
            config.voice.recognizer_model = v;
        }
        if let Ok(v) = std::env::var("WIKIVAANI_TTS_API") {
            config.voice.synthesizer_endpoint = v;
        }
        if let Ok(v) = std::env::var("WIKIVAANI_LANGUAGE") {
            config.voice.language = SpokenLanguage::from_tag(&v);
        }

        config
    }
}

/// Reference knowledge source settings
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// MediaWiki API endpoint
    pub api_endpoint: String,

    /// User agent sent with every source request
    pub user_agent: String,

    /// Maximum fallback search candidates to request
    pub search_limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            user_agent: format!("wikivaani/{}", env!("CARGO_PKG_VERSION")),
            search_limit: 3,
        }
    }
}

/// Voice backend settings
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Recognition endpoint (multipart WAV upload)
    pub recognizer_endpoint: String,

    /// Optional recognition API key
    pub recognizer_api_key: Option<String>,

    /// Recognition model identifier
    pub recognizer_model: String,

    /// Synthesis endpoint
    pub synthesizer_endpoint: String,

    /// Default spoken language for capture
    pub language: SpokenLanguage,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            recognizer_endpoint: DEFAULT_RECOGNIZER_ENDPOINT.to_string(),
            recognizer_api_key: None,
            recognizer_model: DEFAULT_RECOGNIZER_MODEL.to_string(),
            synthesizer_endpoint: DEFAULT_SYNTHESIZER_ENDPOINT.to_string(),
            language: SpokenLanguage::English,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.source.search_limit, 3);
        assert!(config.source.api_endpoint.contains("wikipedia.org"));
        assert_eq!(config.voice.language, SpokenLanguage::English);
        assert!(config.listen.dynamic_energy);
    }
}
