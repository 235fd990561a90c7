//! Audio capture from the microphone
//!
//! The capture flow is the pipeline's only blocking boundary besides network
//! calls: [`AudioCapture::listen`] suspends the calling flow until a phrase
//! completes or the start timeout passes.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use thiserror::Error;

use crate::voice::listen::{ListenConfig, ListenOutcome, PhraseDetector};
use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Interval between buffer polls while listening
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Frequency of the start-of-listening cue
const CUE_FREQUENCY_HZ: f32 = 1000.0;

/// Duration of the start-of-listening cue
const CUE_DURATION: Duration = Duration::from_millis(200);

/// Outcomes of the speech capture flow
///
/// All variants are recoverable by user retry; none are fatal.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No speech started within the start timeout
    #[error("no speech detected; please try again")]
    NoSpeechDetected,

    /// The backend could not make sense of the audio
    #[error("couldn't understand the audio; please try again")]
    UnrecognizedSpeech,

    /// The recognition backend could not be reached
    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The microphone could not be opened or read
    #[error("audio device error: {0}")]
    Device(String),
}

/// Captures audio from the default input device
pub struct AudioCapture {
    #[allow(dead_code)]
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable input device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start capturing audio
    ///
    /// # Errors
    ///
    /// Returns an error if the input stream cannot be opened
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device".to_string()))?;

        let config = self.config.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("audio capture stopped");
        }
    }

    /// Get captured audio samples since the last call, clearing the buffer
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Clear the audio buffer
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Check if currently capturing
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// Listen for one spoken phrase
    ///
    /// Plays a short non-essential cue, then blocks until a phrase completes,
    /// the start timeout passes, or the utterance cap is reached. The cue
    /// failing never aborts capture.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoSpeechDetected`] when nothing is heard
    /// within the start timeout, or [`CaptureError::Device`] if the
    /// microphone cannot be driven.
    pub fn listen(&mut self, config: &ListenConfig) -> std::result::Result<Vec<f32>, CaptureError> {
        play_start_cue();

        self.start().map_err(|e| CaptureError::Device(e.to_string()))?;
        self.clear_buffer();

        let mut detector = PhraseDetector::new(config, SAMPLE_RATE);

        // Wall-clock guard in case the device stalls and stops delivering
        // frames; the detector's own timeouts count samples.
        let deadline =
            Instant::now() + config.start_timeout + config.max_phrase + Duration::from_secs(1);

        loop {
            std::thread::sleep(POLL_INTERVAL);
            let frames = self.take_buffer();

            match detector.push(&frames) {
                ListenOutcome::Complete => {
                    self.stop();
                    return Ok(detector.take_phrase());
                }
                ListenOutcome::TimedOut => {
                    self.stop();
                    return Err(CaptureError::NoSpeechDetected);
                }
                ListenOutcome::Waiting | ListenOutcome::Capturing => {}
            }

            if Instant::now() >= deadline {
                self.stop();
                if detector.is_capturing() {
                    return Ok(detector.take_phrase());
                }
                return Err(CaptureError::NoSpeechDetected);
            }
        }
    }
}

/// Convert f32 samples to WAV bytes for the recognition backend
///
/// # Errors
///
/// Returns an error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Emit the short start-of-listening beep; failures are logged and ignored
fn play_start_cue() {
    if let Err(e) = try_play_cue() {
        tracing::debug!(error = %e, "start cue unavailable");
    }
}

fn try_play_cue() -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".to_string()))?;

    let supported = device
        .default_output_config()
        .map_err(|e| Error::Audio(e.to_string()))?;

    if supported.sample_format() != cpal::SampleFormat::F32 {
        return Err(Error::Audio("output device is not f32".to_string()));
    }

    let config: StreamConfig = supported.config();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels as usize;

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    let total_samples = (sample_rate as f32 * CUE_DURATION.as_secs_f32()) as usize;
    let mut written = 0usize;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    #[allow(clippy::cast_precision_loss)]
                    let sample = if written < total_samples {
                        let t = written as f32 / sample_rate as f32;
                        0.2 * (2.0 * std::f32::consts::PI * CUE_FREQUENCY_HZ * t).sin()
                    } else {
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                    written += 1;
                }
            },
            |err| {
                tracing::debug!(error = %err, "cue stream error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;
    std::thread::sleep(CUE_DURATION + Duration::from_millis(50));
    drop(stream);

    Ok(())
}
