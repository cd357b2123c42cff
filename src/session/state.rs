//! Session phase, commands and the shared snapshot.

use std::sync::{Arc, Mutex};

use crate::questions::InterviewQuestion;
use crate::score::InterviewScore;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The session state machine.
///
/// ```text
///            start                 stop / last-question timeout
///   Idle ──────────▶ Recording ──────────────────────────────▶ Completed
///    ▲                   │                                        │
///    └───────reset───────┴───────────────reset────────────────────┘
///                                        start ───────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready; a question set is drawn but nothing is running.
    Idle,
    /// Sampling frames, accumulating speech, counting down.
    Recording,
    /// Scored; the snapshot carries the result.
    Completed,
}

impl SessionPhase {
    pub fn is_recording(self) -> bool {
        self == SessionPhase::Recording
    }
}

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// Commands accepted by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Begin recording (from Idle or Completed).
    Start,
    /// End recording early and score what was captured.
    Stop,
    /// Discard everything and draw a fresh question set.
    Reset,
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of the session, published by the controller after every
/// state change and polled by the frontend.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// Convenience mirror of `phase.is_recording()`.
    pub recording: bool,
    /// The question currently on screen, if a set has been drawn.
    pub question: Option<InterviewQuestion>,
    /// Zero-based index of the current question.
    pub question_index: usize,
    /// Total questions in this session's set.
    pub question_count: usize,
    /// Seconds left on the current question's timer.
    pub remaining_secs: u32,
    /// Live transcript accumulated so far.
    pub transcript: String,
    /// Final score, present once the phase reaches Completed.
    pub score: Option<InterviewScore>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            recording: false,
            question: None,
            question_index: 0,
            question_count: 0,
            remaining_secs: 0,
            transcript: String::new(),
            score: None,
        }
    }
}

/// Snapshot shared between the controller task and its observers.
///
/// Lock discipline: never hold the lock across an `.await`.
pub type SharedSnapshot = Arc<Mutex<SessionSnapshot>>;

/// Convenience constructor for a fresh shared snapshot.
pub fn new_shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(SessionSnapshot::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
