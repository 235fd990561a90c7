//! WikiVaani - voice-driven encyclopedia reader
//!
//! This library implements the query-resolution and audio-rendering pipeline:
//! - Article resolution (exact lookup with fallback search)
//! - Speech capture (microphone listening + recognition backend)
//! - Speech synthesis (text to in-memory audio)
//! - Session history and derived-text transforms
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Presentation / session layer            │
//! │     (owns SessionContext, displays results)          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ query string + language
//! ┌────────────────────▼────────────────────────────────┐
//! │                WikiVaani pipeline                    │
//! │  Capture │ Resolver │ Text tools │ Synthesis         │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                External backends                     │
//! │  Knowledge source │ Recognition │ Synthesis          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Each user action runs as a single logical flow: capture blocks on the
//! microphone (bounded by its timeouts), resolution and synthesis block on
//! their network round-trips, and history is appended by the caller once per
//! successful resolution. Every backend failure is converted to a typed
//! outcome at the component boundary.

pub mod article;
pub mod config;
pub mod error;
pub mod session;
pub mod text;
pub mod voice;

pub use article::{
    ArticleRecord, ArticleResolver, KnowledgeSource, ResolveError, SourceError, SourcePage,
    WikipediaSource,
};
pub use config::{Config, SourceConfig, VoiceConfig};
pub use error::{Error, Result};
pub use session::{HistoryEntry, SessionContext, SessionHistory};
pub use text::{CondenseLength, condense, relanguage, simplify};
pub use voice::{
    AudioCapture, AudioStream, CaptureError, ListenConfig, ListenOutcome, PhraseDetector,
    SAMPLE_RATE, SpeechRecognizer, SpeechSynthesizer, SpokenLanguage, SynthesisError,
    capture_speech, samples_to_wav,
};
