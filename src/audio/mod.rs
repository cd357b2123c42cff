//! Microphone capture and sample-rate conversion.
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → whisper_input
//!            → 16 kHz mono f32 → WhisperTranscriber
//! ```
//!
//! The capture callback honours a shared `enabled` flag so the mic-mute
//! toggle drops audio without releasing the device.

pub mod capture;
pub mod resample;

pub use capture::{AudioChunk, CaptureError, InputStreamHandle, MicrophoneInput};
pub use resample::{downmix_mono, resample_16k, whisper_input, WHISPER_SAMPLE_RATE};
