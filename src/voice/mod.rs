//! Voice pipeline: speech capture, recognition, and synthesis
//!
//! Capture blocks on the microphone (bounded by [`ListenConfig`] timeouts);
//! recognition and synthesis block on their network round-trips.

mod capture;
mod listen;
mod recognize;
mod synthesize;

pub use capture::{AudioCapture, CaptureError, SAMPLE_RATE, samples_to_wav};
pub use listen::{ListenConfig, ListenOutcome, PhraseDetector};
pub use recognize::{SpeechRecognizer, SpokenLanguage, capture_speech};
pub use synthesize::{AudioStream, SpeechSynthesizer, SynthesisError};
