//! Microphone input via `cpal`.
//!
//! [`MicrophoneInput`] wraps the cpal host/device/stream lifecycle for the
//! speech-to-text capability.  [`MicrophoneInput::start`] begins streaming
//! [`AudioChunk`]s over an mpsc channel; the returned [`InputStreamHandle`]
//! is a RAII guard — dropping it stops the hardware stream, which is the
//! release half of the acquire-once-hold-for-lifetime model.
//!
//! The `enabled` gate passed to `start` implements the mic-mute toggle:
//! when it reads `false` the callback simply discards its buffer.  The
//! device stays acquired; muting never releases or re-acquires hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One buffer of raw microphone audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]` at the device's native
/// rate; use [`crate::audio::whisper_input`] to turn a chunk into the
/// 16 kHz mono form the transcriber expects.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate of this chunk in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// InputStreamHandle
// ---------------------------------------------------------------------------

/// RAII guard keeping the cpal input stream alive.
pub struct InputStreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors raised while acquiring or starting the microphone.
///
/// At the media boundary these collapse into the audio-denied flag — the
/// session itself never fails over a missing microphone.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// MicrophoneInput
// ---------------------------------------------------------------------------

/// Default-input-device wrapper built on `cpal`.
pub struct MicrophoneInput {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl MicrophoneInput {
    /// Open the system default input device with its preferred stream
    /// configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming chunks to `tx`.
    ///
    /// The callback runs on cpal's audio thread.  Chunks are dropped
    /// (not queued) while `enabled` reads `false`; send errors are ignored
    /// so a dropped receiver never panics the audio thread.
    pub fn start(
        &self,
        tx: mpsc::Sender<AudioChunk>,
        enabled: Arc<AtomicBool>,
    ) -> Result<InputStreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if !enabled.load(Ordering::Relaxed) {
                    return; // track disabled — device stays open, audio dropped
                }
                let _ = tx.send(AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| {
                log::error!("microphone stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(InputStreamHandle { _stream: stream })
    }

    /// Native sample rate of the device in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each chunk.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
    }

    #[test]
    fn audio_chunk_carries_device_shape() {
        let chunk = AudioChunk {
            samples: vec![0.0_f32; 960],
            sample_rate: 48_000,
            channels: 2,
        };
        assert_eq!(chunk.samples.len(), 960);
        assert_eq!(chunk.sample_rate, 48_000);
        assert_eq!(chunk.channels, 2);
    }
}
