//! Speech recognition subsystem.
//!
//! ```text
//! WhisperTranscriber ──TranscriptEvent──▶ SpeechService ──▶ VoiceMetrics
//! (or NullTranscriptSource in degraded mode)
//! ```
//!
//! The session controller constructs one [`SpeechService`] per session from
//! a [`TranscriptSource`] factory, so "reset" is a constructor call.  When
//! no model or microphone is available the factory hands out
//! [`NullTranscriptSource`] and the session runs with an empty transcript.

pub mod service;
pub mod transcript;
pub mod whisper;

pub use service::SpeechService;
pub use transcript::{NullTranscriptSource, TranscriptError, TranscriptEvent, TranscriptSource};
pub use whisper::{load_model, SttError, WhisperTranscriber};

#[cfg(test)]
pub use transcript::MockTranscriptSource;
