//! Session controller — drives one practice session end to end.
//!
//! ```text
//! SessionCommand::Start
//!   └─▶ clear samples/score, draw timer, fresh SpeechService  [Recording]
//!
//! while Recording:
//!   every 200 ms  → pull frame → FrameAnalyzer → sample list
//!   every 1 000 ms → remaining -= 1
//!                     0 & more questions → advance, timer back to full
//!                     0 & last question  → complete
//!
//! SessionCommand::Stop (or last-question timeout)
//!   └─▶ settle speech → aggregate face samples → score       [Completed]
//!
//! SessionCommand::Reset
//!   └─▶ discard everything, fresh random question set        [Idle]
//! ```
//!
//! The controller runs as a single tokio task.  Both intervals are reset on
//! start and their select arms are guarded by the Recording phase, so no
//! scheduled work survives a stop or reset.  There is no fatal path: a
//! denied camera means no samples (neutral fallback at scoring time) and a
//! failed speech source means an empty transcript.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::analysis::{average_metrics, FaceMetrics, FrameAnalyzer};
use crate::config::SessionConfig;
use crate::media::FrameSource;
use crate::questions::{interview_set, InterviewQuestion};
use crate::score::calculate_score;
use crate::speech::{SpeechService, TranscriptSource};

use super::state::{
    new_shared_snapshot, SessionCommand, SessionPhase, SessionSnapshot, SharedSnapshot,
};

// ---------------------------------------------------------------------------
// TranscriptSourceFactory
// ---------------------------------------------------------------------------

/// Builds a fresh [`TranscriptSource`] for each session.
///
/// Reset-on-start is a constructor call: the controller never reuses a
/// speech service across sessions, so the factory is the only thing that
/// persists.  Shared expensive state (the loaded Whisper context) lives
/// inside the closure.
pub type TranscriptSourceFactory = Box<dyn Fn() -> Box<dyn TranscriptSource> + Send>;

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Owns the full per-session state.  Create with
/// [`SessionController::new`], then call [`run`](Self::run) inside a tokio
/// task — or use [`spawn`] which does both and hands back a handle.
pub struct SessionController {
    snapshot: SharedSnapshot,
    config: SessionConfig,
    frames: Arc<dyn FrameSource>,
    analyzer: Box<dyn FrameAnalyzer>,
    source_factory: TranscriptSourceFactory,

    phase: SessionPhase,
    questions: Vec<InterviewQuestion>,
    question_index: usize,
    remaining_secs: u32,
    samples: Vec<FaceMetrics>,
    speech: Option<SpeechService>,
}

impl SessionController {
    pub fn new(
        snapshot: SharedSnapshot,
        config: SessionConfig,
        frames: Arc<dyn FrameSource>,
        analyzer: Box<dyn FrameAnalyzer>,
        source_factory: TranscriptSourceFactory,
    ) -> Self {
        let questions = interview_set(config.question_count);
        let remaining_secs = config.seconds_per_question;

        let mut controller = Self {
            snapshot,
            config,
            frames,
            analyzer,
            source_factory,
            phase: SessionPhase::Idle,
            questions,
            question_index: 0,
            remaining_secs,
            samples: Vec::new(),
            speech: None,
        };
        controller.publish();
        controller
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the controller until `commands` is closed.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        let mut sample_tick =
            tokio::time::interval(Duration::from_millis(self.config.sample_interval_ms));
        let mut countdown_tick = tokio::time::interval(Duration::from_secs(1));
        sample_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        countdown_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(SessionCommand::Start) => {
                            self.handle_start();
                            // Stale ticks from a previous session must not
                            // fire into the new one.
                            sample_tick.reset();
                            countdown_tick.reset();
                        }
                        Some(SessionCommand::Stop) => self.complete().await,
                        Some(SessionCommand::Reset) => self.handle_reset().await,
                        None => break,
                    }
                }
                _ = sample_tick.tick(), if self.phase.is_recording() => {
                    self.sample_frame();
                }
                _ = countdown_tick.tick(), if self.phase.is_recording() => {
                    self.countdown().await;
                }
            }
        }

        log::info!("session: command channel closed, controller shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    /// Idle/Completed → Recording.  No-op while already recording.
    fn handle_start(&mut self) {
        if self.phase.is_recording() {
            log::debug!("session: start ignored — already recording");
            return;
        }
        log::info!(
            "session: starting ({} questions, {} s each)",
            self.questions.len(),
            self.config.seconds_per_question
        );

        self.samples.clear();
        self.question_index = 0;
        self.remaining_secs = self.config.seconds_per_question;

        let mut speech = SpeechService::new((self.source_factory)());
        speech.start();
        self.speech = Some(speech);

        self.phase = SessionPhase::Recording;
        // A restart must not carry the previous session's score into the
        // new Recording phase.
        self.publish_with_score(None);
    }

    /// Discard everything and draw a fresh random question set.
    async fn handle_reset(&mut self) {
        log::info!("session: reset");

        if let Some(mut speech) = self.speech.take() {
            speech.stop().await;
        }

        self.samples.clear();
        self.questions = interview_set(self.config.question_count);
        self.question_index = 0;
        self.remaining_secs = self.config.seconds_per_question;
        self.phase = SessionPhase::Idle;
        self.publish_with_score(None);
    }

    // -----------------------------------------------------------------------
    // Tick handlers
    // -----------------------------------------------------------------------

    /// Pull one frame and append its analysis.  A missing frame (camera
    /// denied or disabled) appends nothing.
    fn sample_frame(&mut self) {
        if let Some(frame) = self.frames.next_frame() {
            self.samples.push(self.analyzer.analyze(&frame));
        }
        self.publish();
    }

    /// One-second countdown: at zero either advance the question or, on the
    /// last one, complete the session.
    async fn countdown(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            if self.question_index + 1 < self.questions.len() {
                self.question_index += 1;
                self.remaining_secs = self.config.seconds_per_question;
                log::debug!(
                    "session: advancing to question {}/{}",
                    self.question_index + 1,
                    self.questions.len()
                );
            } else {
                self.complete().await;
                return;
            }
        }
        self.publish();
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Recording → Completed: settle speech, aggregate face samples, score.
    /// No-op outside Recording.
    async fn complete(&mut self) {
        if !self.phase.is_recording() {
            log::debug!("session: stop ignored — not recording");
            return;
        }

        let voice = match self.speech.as_mut() {
            Some(speech) => speech.stop_and_analyze().await,
            // Unreachable in practice — Recording always has a service.
            None => crate::analysis::analyze_transcript("", 0, 0.0),
        };

        let face = if self.samples.is_empty() {
            log::warn!("session: no face samples captured, scoring with neutral defaults");
            FaceMetrics::neutral()
        } else {
            average_metrics(&self.samples)
        };

        let score = calculate_score(&face, &voice);
        log::info!(
            "session: completed — overall {:.1} from {} face samples",
            score.overall,
            self.samples.len()
        );

        self.phase = SessionPhase::Completed;
        self.publish_with_score(Some(score));
    }

    // -----------------------------------------------------------------------
    // Snapshot publishing
    // -----------------------------------------------------------------------

    fn publish(&self) {
        let score = self.snapshot.lock().unwrap().score.clone();
        self.publish_with_score(score);
    }

    fn publish_with_score(&self, score: Option<crate::score::InterviewScore>) {
        let transcript = self
            .speech
            .as_ref()
            .map(|s| s.transcript())
            .unwrap_or_default();

        *self.snapshot.lock().unwrap() = SessionSnapshot {
            phase: self.phase,
            recording: self.phase.is_recording(),
            question: self.questions.get(self.question_index).copied(),
            question_index: self.question_index,
            question_count: self.questions.len(),
            remaining_secs: self.remaining_secs,
            transcript,
            score,
        };
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Cloneable control surface over a spawned [`SessionController`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: SharedSnapshot,
}

impl SessionHandle {
    pub async fn start(&self) {
        let _ = self.commands.send(SessionCommand::Start).await;
    }

    pub async fn stop(&self) {
        let _ = self.commands.send(SessionCommand::Stop).await;
    }

    pub async fn reset(&self) {
        let _ = self.commands.send(SessionCommand::Reset).await;
    }

    /// Current read-only view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.lock().unwrap().clone()
    }
}

/// Spawn a controller task and return its handle.
pub fn spawn(
    config: SessionConfig,
    frames: Arc<dyn FrameSource>,
    analyzer: Box<dyn FrameAnalyzer>,
    source_factory: TranscriptSourceFactory,
) -> SessionHandle {
    let snapshot = new_shared_snapshot();
    let (tx, rx) = mpsc::channel(16);

    let controller = SessionController::new(
        Arc::clone(&snapshot),
        config,
        frames,
        analyzer,
        source_factory,
    );
    tokio::spawn(controller.run(rx));

    SessionHandle {
        commands: tx,
        snapshot,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_transcript;
    use crate::media::{NoCameraSource, VideoFrame};
    use crate::speech::transcript::{MockTranscriptSource, TranscriptEvent};
    use crate::speech::NullTranscriptSource;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Frame source that always has a frame available.
    struct AlwaysFrames;

    impl FrameSource for AlwaysFrames {
        fn next_frame(&self) -> Option<VideoFrame> {
            Some(VideoFrame::blank(4, 4))
        }
    }

    /// Analyzer returning a fixed, recognisable metric set.
    struct FixedAnalyzer(FaceMetrics);

    impl FrameAnalyzer for FixedAnalyzer {
        fn analyze(&self, _frame: &VideoFrame) -> FaceMetrics {
            self.0
        }
    }

    fn strong_face() -> FaceMetrics {
        FaceMetrics {
            confidence: 0.9,
            engagement: 0.9,
            nervousness: 0.1,
            smile: 0.7,
            eye_contact: 0.9,
        }
    }

    fn null_factory() -> TranscriptSourceFactory {
        Box::new(|| Box::new(NullTranscriptSource))
    }

    fn scripted_factory(events: Vec<TranscriptEvent>) -> TranscriptSourceFactory {
        Box::new(move || Box::new(MockTranscriptSource::with_events(events.clone())))
    }

    fn short_config() -> SessionConfig {
        SessionConfig {
            question_count: 2,
            seconds_per_question: 2,
            sample_interval_ms: 200,
        }
    }

    /// Voice metrics for an empty transcript (any sub-5-second duration).
    fn silent_voice() -> crate::analysis::VoiceMetrics {
        analyze_transcript("", 0, 0.0)
    }

    /// Let the controller task catch up under the paused clock.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn start_enters_recording_with_full_timer() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.start().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.phase, SessionPhase::Recording);
        assert!(snap.recording);
        assert!(snap.question.is_some());
        assert_eq!(snap.question_index, 0);
        assert_eq!(snap.question_count, 5);
        assert_eq!(snap.remaining_secs, 60);
        assert!(snap.score.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_frames_scores_with_neutral_face() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.start().await;
        settle().await;
        handle.stop().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.phase, SessionPhase::Completed);

        let expected = calculate_score(&FaceMetrics::neutral(), &silent_voice());
        assert_eq!(snap.score, Some(expected));
    }

    #[tokio::test(start_paused = true)]
    async fn sampled_frames_drive_the_score() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(AlwaysFrames),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.start().await;
        // Enough paused-clock time for several 200 ms sample ticks.
        tokio::time::sleep(Duration::from_millis(900)).await;
        handle.stop().await;
        settle().await;

        let snap = handle.snapshot();
        // Averaging identical samples yields the sample itself, so the score
        // must differ from the neutral fallback.
        let expected = calculate_score(&strong_face(), &silent_voice());
        assert_eq!(snap.score, Some(expected));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_expiry_advances_and_finally_completes() {
        let handle = spawn(
            short_config(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.start().await;
        settle().await;
        assert_eq!(handle.snapshot().question_index, 0);

        // 2 questions × 2 s each; poll until the session completes itself.
        let mut completed = false;
        for _ in 0..30 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if handle.snapshot().phase == SessionPhase::Completed {
                completed = true;
                break;
            }
        }

        assert!(completed, "session should complete on its own");
        let snap = handle.snapshot();
        assert_eq!(snap.question_index, 1, "ended on the last question");
        assert!(snap.score.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn transcript_flows_into_snapshot_and_score() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            scripted_factory(vec![
                TranscriptEvent::final_segment("um so"),
                TranscriptEvent::final_segment("basically fine"),
            ]),
        );

        handle.start().await;
        settle().await;
        handle.stop().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.transcript, "um so basically fine");

        // um, so, basically → fillers lower communication below the silent
        // baseline.
        let baseline = calculate_score(&FaceMetrics::neutral(), &silent_voice());
        let score = snap.score.expect("completed session has a score");
        assert!(score.communication < baseline.communication);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_returns_to_idle_and_clears_the_score() {
        let handle = spawn(
            short_config(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.start().await;
        settle().await;
        handle.stop().await;
        settle().await;
        assert!(handle.snapshot().score.is_some());

        handle.reset().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.phase, SessionPhase::Idle);
        assert!(snap.score.is_none());
        assert!(snap.transcript.is_empty());
        assert_eq!(snap.question_index, 0);
        assert_eq!(snap.remaining_secs, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_when_idle_is_a_no_op() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            null_factory(),
        );

        handle.stop().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.phase, SessionPhase::Idle);
        assert!(snap.score.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_completion_clears_previous_state() {
        let handle = spawn(
            SessionConfig::default(),
            Arc::new(NoCameraSource),
            Box::new(FixedAnalyzer(strong_face())),
            scripted_factory(vec![TranscriptEvent::final_segment("first answer")]),
        );

        handle.start().await;
        settle().await;
        handle.stop().await;
        settle().await;
        assert_eq!(handle.snapshot().transcript, "first answer");

        handle.start().await;
        settle().await;

        let snap = handle.snapshot();
        assert_eq!(snap.phase, SessionPhase::Recording);
        assert!(snap.score.is_none(), "old score cleared on restart");
        assert_eq!(snap.remaining_secs, 60);
        assert_eq!(snap.question_index, 0);

        // The sample ticks republish the snapshot every 200 ms; the stale
        // score must not resurface through them either.
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(handle.snapshot().score.is_none());
    }
}
