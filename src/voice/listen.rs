//! Phrase boundary detection over captured audio
//!
//! A pure state machine fed with sample frames from the microphone. It waits
//! for speech to start (bounded by a start timeout), accumulates the
//! utterance, and ends it on a sustained pause or the utterance cap. All
//! thresholds are measured in samples so the machine is testable without
//! audio hardware.

use std::time::Duration;

/// Floor for the dynamically adapted energy threshold
const MIN_ENERGY_THRESHOLD: f32 = 0.005;

/// Weight kept from the previous threshold on each adaptation step
const ADAPT_DAMPING: f32 = 0.85;

/// Ambient-energy multiplier targeted by the adaptation
const ADAPT_NOISE_RATIO: f32 = 1.5;

/// Microphone listening parameters
#[derive(Debug, Clone)]
pub struct ListenConfig {
    /// How long to wait for speech to start
    pub start_timeout: Duration,
    /// Maximum utterance length
    pub max_phrase: Duration,
    /// Pause length that ends the phrase
    pub pause_threshold: Duration,
    /// RMS energy above which a frame counts as speech
    pub energy_threshold: f32,
    /// Adapt the threshold to ambient noise while waiting
    pub dynamic_energy: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            start_timeout: Duration::from_secs(5),
            max_phrase: Duration::from_secs(10),
            pause_threshold: Duration::from_millis(1500),
            energy_threshold: 0.03,
            dynamic_energy: true,
        }
    }
}

/// Progress reported by [`PhraseDetector::push`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Still waiting for speech to start
    Waiting,
    /// Speech in progress, accumulating
    Capturing,
    /// Phrase ended (pause reached or utterance cap hit)
    Complete,
    /// No speech started within the start timeout
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectorState {
    Waiting,
    Capturing,
}

/// Detects one spoken phrase in a stream of sample frames
pub struct PhraseDetector {
    start_timeout_samples: usize,
    max_phrase_samples: usize,
    pause_samples: usize,
    threshold: f32,
    dynamic_energy: bool,
    state: DetectorState,
    waited: usize,
    silence: usize,
    phrase: Vec<f32>,
}

impl PhraseDetector {
    /// Create a detector for the given config and capture sample rate
    #[must_use]
    pub fn new(config: &ListenConfig, sample_rate: u32) -> Self {
        let per_sec = sample_rate as usize;
        Self {
            start_timeout_samples: duration_samples(config.start_timeout, per_sec),
            max_phrase_samples: duration_samples(config.max_phrase, per_sec),
            pause_samples: duration_samples(config.pause_threshold, per_sec),
            threshold: config.energy_threshold,
            dynamic_energy: config.dynamic_energy,
            state: DetectorState::Waiting,
            waited: 0,
            silence: 0,
            phrase: Vec::new(),
        }
    }

    /// Feed one frame of samples and report progress
    pub fn push(&mut self, samples: &[f32]) -> ListenOutcome {
        if samples.is_empty() {
            return match self.state {
                DetectorState::Waiting => ListenOutcome::Waiting,
                DetectorState::Capturing => ListenOutcome::Capturing,
            };
        }

        let energy = rms_energy(samples);
        let is_speech = energy > self.threshold;

        match self.state {
            DetectorState::Waiting => {
                if is_speech {
                    self.state = DetectorState::Capturing;
                    self.phrase.clear();
                    self.phrase.extend_from_slice(samples);
                    self.silence = 0;
                    tracing::trace!(energy, "speech started");
                    return ListenOutcome::Capturing;
                }

                if self.dynamic_energy {
                    self.adapt_threshold(energy);
                }

                self.waited += samples.len();
                if self.waited >= self.start_timeout_samples {
                    tracing::debug!("no speech within start timeout");
                    return ListenOutcome::TimedOut;
                }
                ListenOutcome::Waiting
            }
            DetectorState::Capturing => {
                self.phrase.extend_from_slice(samples);

                if is_speech {
                    self.silence = 0;
                } else {
                    self.silence += samples.len();
                }

                if self.silence >= self.pause_samples {
                    tracing::debug!(samples = self.phrase.len(), "phrase ended on pause");
                    return ListenOutcome::Complete;
                }
                if self.phrase.len() >= self.max_phrase_samples {
                    tracing::debug!(samples = self.phrase.len(), "utterance cap reached");
                    return ListenOutcome::Complete;
                }
                ListenOutcome::Capturing
            }
        }
    }

    /// Take the accumulated phrase, clearing the buffer
    pub fn take_phrase(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.phrase)
    }

    /// Whether speech has started
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.state == DetectorState::Capturing
    }

    /// Current (possibly adapted) energy threshold
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Reset to the waiting state
    pub fn reset(&mut self) {
        self.state = DetectorState::Waiting;
        self.waited = 0;
        self.silence = 0;
        self.phrase.clear();
    }

    /// Drift the threshold toward a multiple of the ambient energy
    fn adapt_threshold(&mut self, ambient: f32) {
        let target = ambient * ADAPT_NOISE_RATIO;
        self.threshold = (self.threshold * ADAPT_DAMPING + target * (1.0 - ADAPT_DAMPING))
            .max(MIN_ENERGY_THRESHOLD);
    }
}

/// RMS energy of a sample frame
#[allow(clippy::cast_precision_loss)]
fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

fn duration_samples(duration: Duration, samples_per_sec: usize) -> usize {
    (duration.as_secs_f64() * samples_per_sec as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_no_energy() {
        let silence = vec![0.0f32; 100];
        assert!(rms_energy(&silence) < 0.001);

        let loud = vec![0.5f32; 100];
        assert!(rms_energy(&loud) > 0.4);
    }

    #[test]
    fn empty_frame_keeps_state() {
        let mut detector = PhraseDetector::new(&ListenConfig::default(), 16000);
        assert_eq!(detector.push(&[]), ListenOutcome::Waiting);
    }

    #[test]
    fn duration_to_samples() {
        assert_eq!(duration_samples(Duration::from_secs(5), 16000), 80000);
        assert_eq!(duration_samples(Duration::from_millis(1500), 16000), 24000);
    }
}
