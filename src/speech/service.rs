//! Speech service — per-session transcript accumulation state machine.
//!
//! ```text
//! Idle ──start()──▶ Listening ──stop()──▶ Idle
//!                      │
//!                      └─ final TranscriptEvents append to the transcript;
//!                         interim events are ignored
//! ```
//!
//! One [`SpeechService`] is constructed per session by the session
//! controller (reset-on-start is a constructor call, not field surgery on a
//! shared singleton), but `start`/`stop` still guard against double calls.
//! Accumulated state is left readable after `stop` so [`analyze`] can be
//! called at any point in the lifecycle.
//!
//! Ordering guarantee: [`stop`] halts the source and then awaits the
//! accumulation task, which only exits once the event channel has been
//! drained — so a read after `stop` always reflects every final segment
//! that was delivered.
//!
//! [`analyze`]: SpeechService::analyze
//! [`stop`]: SpeechService::stop

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::analysis::{analyze_transcript, VoiceMetrics};

use super::transcript::TranscriptSource;

// ---------------------------------------------------------------------------
// SpeechSessionState
// ---------------------------------------------------------------------------

/// Accumulated recognition state for one session.
#[derive(Debug)]
struct SpeechSessionState {
    listening: bool,
    transcript: String,
    word_count: usize,
    started_at: Instant,
    stopped_at: Option<Instant>,
}

impl SpeechSessionState {
    fn new() -> Self {
        Self {
            listening: false,
            transcript: String::new(),
            word_count: 0,
            started_at: Instant::now(),
            stopped_at: None,
        }
    }

    fn duration_secs(&self) -> f64 {
        let end = self.stopped_at.unwrap_or_else(Instant::now);
        end.duration_since(self.started_at).as_secs_f64()
    }
}

// ---------------------------------------------------------------------------
// SpeechService
// ---------------------------------------------------------------------------

/// Owns one session's transcript source and accumulation task.
pub struct SpeechService {
    state: Arc<Mutex<SpeechSessionState>>,
    source: Box<dyn TranscriptSource>,
    accumulator: Option<JoinHandle<()>>,
}

impl SpeechService {
    /// Wrap `source`; no events flow until [`start`](Self::start).
    pub fn new(source: Box<dyn TranscriptSource>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SpeechSessionState::new())),
            source,
            accumulator: None,
        }
    }

    /// Returns `true` while the service is accepting recognition events.
    pub fn is_listening(&self) -> bool {
        self.state.lock().unwrap().listening
    }

    /// Begin listening.  No-op when already listening.
    ///
    /// State is fully reset *before* event delivery is enabled, so a
    /// restarted service can never bleed transcript text across sessions.
    /// A source that fails to start is logged and swallowed: the service
    /// still counts as listening, the transcript just stays empty.
    pub fn start(&mut self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.listening {
                log::debug!("speech: start ignored — already listening");
                return;
            }
            *state = SpeechSessionState::new();
            state.listening = true;
        }

        let mut rx = match self.source.start() {
            Ok(rx) => rx,
            Err(e) => {
                log::warn!("speech: recognition unavailable, transcript will stay empty: {e}");
                return;
            }
        };

        let state = Arc::clone(&self.state);
        self.accumulator = Some(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if !event.is_final {
                    continue;
                }

                let mut st = state.lock().unwrap();
                if !st.transcript.is_empty() {
                    st.transcript.push(' ');
                }
                st.transcript.push_str(event.text.trim());
                // Word count tracks the whitespace-tokenized length of the
                // full accumulated transcript.
                st.word_count = st.transcript.split_whitespace().count();
            }
            log::debug!("speech: event channel closed");
        }));
    }

    /// Stop listening and settle all in-flight events.  No-op when idle.
    ///
    /// Accumulated state is left in place until the next session constructs
    /// a fresh service.
    pub async fn stop(&mut self) {
        if !self.is_listening() {
            log::debug!("speech: stop ignored — not listening");
            return;
        }

        // Halting the source drops the event sender; the accumulator then
        // drains whatever is still queued and exits.
        self.source.stop();

        if let Some(handle) = self.accumulator.take() {
            if let Err(e) = handle.await {
                log::warn!("speech: accumulator task failed: {e}");
            }
        }

        let mut state = self.state.lock().unwrap();
        state.listening = false;
        state.stopped_at = Some(Instant::now());
    }

    /// Derive [`VoiceMetrics`] from the current accumulated state.
    ///
    /// Pure read — callable while listening, after stop, or before any
    /// session has run.
    pub fn analyze(&self) -> VoiceMetrics {
        let state = self.state.lock().unwrap();
        analyze_transcript(&state.transcript, state.word_count, state.duration_secs())
    }

    /// Stop, then analyze.  The stop fully settles before the read.
    pub async fn stop_and_analyze(&mut self) -> VoiceMetrics {
        self.stop().await;
        self.analyze()
    }

    /// Snapshot of the accumulated transcript (primarily for display).
    pub fn transcript(&self) -> String {
        self.state.lock().unwrap().transcript.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
