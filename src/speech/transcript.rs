//! Transcript event stream abstraction.
//!
//! [`TranscriptSource`] is the seam between the speech service and whatever
//! produces recognition events.  The production implementation is
//! [`crate::speech::WhisperTranscriber`]; [`NullTranscriptSource`] stands in
//! when the capability is absent (no model, no microphone) so the rest of
//! the session still runs with an empty transcript.
//!
//! Events carry an `is_final` flag: interim hypotheses may be delivered and
//! revised, and only finalized segments are ever appended to the session
//! transcript.

use thiserror::Error;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// TranscriptEvent
// ---------------------------------------------------------------------------

/// One recognition event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Recognized text for this segment.
    pub text: String,
    /// `true` once the recognizer has committed to this segment.  Interim
    /// (`false`) events are informational only and never accumulated.
    pub is_final: bool,
}

impl TranscriptEvent {
    pub fn final_segment(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptError
// ---------------------------------------------------------------------------

/// Failures raised when starting a transcript source.
///
/// These never surface past the speech service: a failed start degrades to
/// an empty transcript, logged and swallowed.
#[derive(Debug, Clone, Error)]
pub enum TranscriptError {
    /// The speech capability is not available in this environment.
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),

    /// The source failed while starting event delivery.
    #[error("recognition start failed: {0}")]
    Start(String),
}

// ---------------------------------------------------------------------------
// TranscriptSource trait
// ---------------------------------------------------------------------------

/// Object-safe producer of [`TranscriptEvent`]s.
///
/// `start` begins continuous delivery and hands back the receiving end of
/// the event channel; `stop` halts delivery and closes the channel (the
/// sender side is dropped), which is how consumers learn that every
/// in-flight event has been delivered.
pub trait TranscriptSource: Send {
    /// Begin event delivery.
    fn start(&mut self) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptError>;

    /// Halt event delivery.  Idempotent; must close the event channel once
    /// all pending events are flushed.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// NullTranscriptSource
// ---------------------------------------------------------------------------

/// Degraded-mode source used when recognition is unsupported: starts
/// successfully, delivers nothing, closes immediately.
///
/// The session still "works" — the transcript simply stays empty and voice
/// metrics fall back to their formulaic defaults.
#[derive(Debug, Default)]
pub struct NullTranscriptSource;

impl TranscriptSource for NullTranscriptSource {
    fn start(&mut self) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptError> {
        let (tx, rx) = mpsc::channel(1);
        drop(tx); // channel closes right away — no events will ever arrive
        Ok(rx)
    }

    fn stop(&mut self) {}
}

// ---------------------------------------------------------------------------
// MockTranscriptSource  (test-only)
// ---------------------------------------------------------------------------

/// Test double that replays a scripted sequence of events and then closes
/// the channel.
#[cfg(test)]
pub struct MockTranscriptSource {
    events: Vec<TranscriptEvent>,
    fail_start: Option<TranscriptError>,
}

#[cfg(test)]
impl MockTranscriptSource {
    /// Replay `events` in order on `start`.
    pub fn with_events(events: Vec<TranscriptEvent>) -> Self {
        Self {
            events,
            fail_start: None,
        }
    }

    /// Fail `start` with `error`.
    pub fn failing(error: TranscriptError) -> Self {
        Self {
            events: Vec::new(),
            fail_start: Some(error),
        }
    }
}

#[cfg(test)]
impl TranscriptSource for MockTranscriptSource {
    fn start(&mut self) -> Result<mpsc::Receiver<TranscriptEvent>, TranscriptError> {
        if let Some(err) = self.fail_start.clone() {
            return Err(err);
        }

        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in self.events.drain(..) {
            // Capacity covers every scripted event, so try_send cannot fail.
            let _ = tx.try_send(event);
        }
        // tx drops here — the channel closes once the events are drained.
        Ok(rx)
    }

    fn stop(&mut self) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
