//! Per-signal analysis: face-frame metrics and transcript-derived voice
//! metrics.
//!
//! Both halves produce normalized `[0, 1]` metrics that the score engine
//! combines:
//!
//! ```text
//! VideoFrame ──▶ FrameAnalyzer ──▶ FaceMetrics ──▶ average_metrics ─┐
//!                                                                   ├─▶ score
//! transcript ──▶ analyze_transcript ──────────────▶ VoiceMetrics ───┘
//! ```

pub mod face;
pub mod voice;

pub use face::{average_metrics, FaceMetrics, FrameAnalyzer, HeuristicFrameAnalyzer};
pub use voice::{
    analyze_transcript, distinct_filler_count, normalize_pace, speaking_pace_wpm, VoiceMetrics,
    FILLER_LEXICON,
};
