//! Whisper-backed transcript source.
//!
//! ```text
//!          mic-capture thread                 inference thread
//!  ┌────────────────────────────┐   audio   ┌──────────────────────────┐
//!  │ MicrophoneInput + stream   │──chunks──▶│ 16 kHz window buffer     │
//!  │ (owns the !Send handle,    │  (mpsc)   │ every N s: run Whisper,  │
//!  │  parks until stop signal)  │           │ emit final segment       │
//!  └────────────────────────────┘           └──────────┬───────────────┘
//!                                                      │ TranscriptEvent
//!                                                      ▼ (tokio mpsc)
//!                                               SpeechService
//! ```
//!
//! `cpal::Stream` is not `Send`, so the stream handle lives on a dedicated
//! capture thread for its whole life.  Stopping works by signal: the
//! capture thread drops the stream, which closes the audio channel; the
//! inference thread drains it, flushes the final partial window, and drops
//! the event sender.  Channel closure is therefore the "all events
//! delivered" signal the speech service relies on.
//!
//! Segments are emitted as **final** only.  Whisper has no streaming
//! hypothesis mode here; each window is decoded once and committed.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread;

use thiserror::Error;
use tokio::sync::mpsc;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::{whisper_input, AudioChunk, MicrophoneInput, WHISPER_SAMPLE_RATE};

use super::transcript::{TranscriptError, TranscriptEvent, TranscriptSource};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Errors from model loading and inference.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a context or per-call state.
    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The inference pass itself failed.
    #[error("transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// Model loading
// ---------------------------------------------------------------------------

/// Minimum window worth decoding: 0.5 s at 16 kHz.  Shorter remainders are
/// discarded at flush time — Whisper output on them is pure noise.
const MIN_FLUSH_SAMPLES: usize = 8_000;

/// Event channel capacity; inference is orders of magnitude slower than the
/// consumer, so this never fills in practice.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Load a GGML model and wrap it for sharing.
///
/// The context is reference-counted because it outlives any one session:
/// the session controller builds a fresh [`WhisperTranscriber`] per session
/// around the same loaded weights.
pub fn load_model(model_path: impl AsRef<Path>) -> Result<Arc<WhisperContext>, SttError> {
    let path = model_path.as_ref();

    if !path.exists() {
        return Err(SttError::ModelNotFound(path.display().to_string()));
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| SttError::ModelNotFound(path.display().to_string()))?;

    let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
        .map_err(|e| SttError::ContextInit(e.to_string()))?;

    log::info!("whisper model loaded from {}", path.display());
    Ok(Arc::new(ctx))
}

/// Threads handed to Whisper per inference call, capped at 8 where extra
/// cores stop helping.
fn inference_threads() -> i32 {
    thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

/// Number of 16 kHz samples per emission window.
fn window_samples(emit_window_secs: f64) -> usize {
    (emit_window_secs.max(0.5) * WHISPER_SAMPLE_RATE as f64) as usize
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Decode one audio window (16 kHz mono f32) into text.
///
/// A fresh `WhisperState` per call keeps the shared context lock-free.
fn transcribe_window(
    ctx: &WhisperContext,
    language: &str,
    audio: &[f32],
) -> Result<String, SttError> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

    let lang: Option<&str> = if language == "auto" {
        None
    } else {
        Some(language)
    };
    params.set_language(lang);
    params.set_n_threads(inference_threads());
    params.set_print_progress(false);
    params.set_print_realtime(false);

    let mut state = ctx
        .create_state()
        .map_err(|e| SttError::ContextInit(e.to_string()))?;

    state
        .full(params, audio)
        .map_err(|e| SttError::Transcription(e.to_string()))?;

    let n_segments = state
        .full_n_segments()
        .map_err(|e| SttError::Transcription(e.to_string()))?;

    let mut text = String::new();
    for i in 0..n_segments {
        let segment = state
            .full_get_segment_text(i)
            .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
        text.push_str(&segment);
    }

    Ok(text.trim().to_string())
}

// ---------------------------------------------------------------------------
// WhisperTranscriber
// ---------------------------------------------------------------------------

/// Production [`TranscriptSource`] running windowed Whisper inference over
/// live microphone audio.
///
/// One instance serves one session.  The shared pieces (`ctx`, the mic
/// gate) arrive from outside; everything else is built fresh in
/// [`start`](TranscriptSource::start).
pub struct WhisperTranscriber {
    ctx: Arc<WhisperContext>,
    language: String,
    emit_window_secs: f64,
    mic_enabled: Arc<AtomicBool>,
    stop_tx: Option<std_mpsc::Sender<()>>,
}

impl WhisperTranscriber {
    pub fn new(
        ctx: Arc<WhisperContext>,
        language: impl Into<String>,
        emit_window_secs: f64,
        mic_enabled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            ctx,
            language: language.into(),
            emit_window_secs,
            mic_enabled,
            stop_tx: None,
        }
    }
}

impl TranscriptSource for WhisperTranscriber {
    fn start(&mut self) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptError> {
        if self.stop_tx.is_some() {
            return Err(TranscriptError::Start("already running".into()));
        }

        let (audio_tx, audio_rx) = std_mpsc::channel::<AudioChunk>();
        let (event_tx, event_rx) = mpsc::channel::<TranscriptEvent>(EVENT_CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), TranscriptError>>();

        // Capture thread.  The cpal stream handle is not Send, so this
        // thread owns it from creation to drop and parks in between.
        let mic_enabled = Arc::clone(&self.mic_enabled);
        thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || {
                let mic = match MicrophoneInput::new() {
                    Ok(mic) => mic,
                    Err(e) => {
                        let _ = ready_tx.send(Err(TranscriptError::Unavailable(e.to_string())));
                        return;
                    }
                };
                let handle = match mic.start(audio_tx, mic_enabled) {
                    Ok(handle) => handle,
                    Err(e) => {
                        let _ = ready_tx.send(Err(TranscriptError::Start(e.to_string())));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                // Park until the stop signal (or the transcriber is dropped,
                // which closes stop_tx and errors this recv).
                let _ = stop_rx.recv();
                drop(handle); // closes the audio channel
                log::debug!("mic-capture thread exiting");
            })
            .map_err(|e| TranscriptError::Start(e.to_string()))?;

        // Surface device acquisition failures synchronously from start().
        ready_rx
            .recv()
            .map_err(|_| TranscriptError::Start("capture thread died".into()))??;

        // Inference thread.  Exits when the audio channel closes, flushing
        // the final partial window first.
        let ctx = Arc::clone(&self.ctx);
        let language = self.language.clone();
        let window = window_samples(self.emit_window_secs);
        thread::Builder::new()
            .name("whisper-inference".into())
            .spawn(move || {
                let mut buffer: Vec<f32> = Vec::with_capacity(window);

                let emit = |samples: &[f32]| {
                    match transcribe_window(&ctx, &language, samples) {
                        Ok(text) if !text.is_empty() => {
                            if event_tx
                                .blocking_send(TranscriptEvent::final_segment(text))
                                .is_err()
                            {
                                log::debug!("whisper: event receiver gone, dropping segment");
                            }
                        }
                        Ok(_) => {} // silence — nothing to report
                        Err(e) => log::warn!("whisper: window failed: {e}"),
                    }
                };

                while let Ok(chunk) = audio_rx.recv() {
                    buffer.extend(whisper_input(&chunk));
                    if buffer.len() >= window {
                        emit(&buffer);
                        buffer.clear();
                    }
                }

                if buffer.len() >= MIN_FLUSH_SAMPLES {
                    emit(&buffer);
                }
                // event_tx drops here — the closed channel tells the
                // consumer every segment has been delivered.
                log::debug!("whisper-inference thread exiting");
            })
            .map_err(|e| TranscriptError::Start(e.to_string()))?;

        self.stop_tx = Some(stop_tx);
        Ok(event_rx)
    }

    fn stop(&mut self) {
        // Signal only; the threads unwind themselves and the event-channel
        // closure marks completion.  Idempotent via take().
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

impl Drop for WhisperTranscriber {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let result = load_model("/nonexistent/ggml-base.en.bin");
        assert!(matches!(result, Err(SttError::ModelNotFound(_))));
    }

    #[test]
    fn model_not_found_display_includes_path() {
        let e = SttError::ModelNotFound("/some/model.bin".into());
        assert!(e.to_string().contains("/some/model.bin"));
    }

    #[test]
    fn window_samples_scales_with_seconds() {
        assert_eq!(window_samples(3.0), 48_000);
        assert_eq!(window_samples(1.0), 16_000);
    }

    #[test]
    fn window_samples_floors_tiny_windows() {
        // Anything under half a second decodes to noise.
        assert_eq!(window_samples(0.0), 8_000);
        assert_eq!(window_samples(0.1), 8_000);
    }

    #[test]
    fn inference_threads_is_positive_and_capped() {
        let t = inference_threads();
        assert!((1..=8).contains(&t));
    }
}
