//! Voice metrics derived from an accumulated session transcript.
//!
//! All of the heuristics here are pure functions of `(transcript,
//! word_count, duration)`; the stateful accumulation lives in
//! [`crate::speech::SpeechService`].  The formulas are hand-tuned:
//!
//! * filler detection counts **distinct** lexicon entries present in the
//!   transcript, not total occurrences;
//! * speaking pace is words-per-minute pushed through a piecewise
//!   normalisation with an ideal band of 100–180 WPM peaking at 140;
//! * clarity and tone confidence are linear blends of pace and filler
//!   ratio, clamped to `[0.3, 1.0]`;
//! * volume is a fixed constant — the transcription-only capability carries
//!   no amplitude information.  A reimplementation on real audio analysis
//!   should replace the constant, not tune it.

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// VoiceMetrics
// ---------------------------------------------------------------------------

/// Normalized speech metrics for one session.
///
/// Exactly one instance is produced per session, at stop time.  All `f64`
/// fields are in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceMetrics {
    /// Number of distinct filler-lexicon entries found in the transcript.
    pub filler_count: usize,
    /// `filler_count / max(word_count, 1)`.
    pub filler_ratio: f64,
    pub tone_confidence: f64,
    pub speaking_pace: f64,
    pub clarity: f64,
    pub volume: f64,
}

// ---------------------------------------------------------------------------
// Filler lexicon
// ---------------------------------------------------------------------------

/// Fixed filler vocabulary treated as a negative communication signal.
pub const FILLER_LEXICON: &[&str] = &[
    "um", "uh", "er", "ah", "like", "you know", "so", "actually",
    "basically", "literally", "I mean", "right", "kind of", "sort of",
];

/// Case-insensitive whole-word matchers, one per lexicon entry.
static FILLER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    FILLER_LEXICON
        .iter()
        .map(|entry| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(entry));
            // The lexicon is static and every pattern is a plain escaped
            // word, so compilation cannot fail.
            Regex::new(&pattern).unwrap()
        })
        .collect()
});

/// Count how many distinct filler entries appear in `transcript`.
///
/// Repeated use of the same filler counts once; the maximum possible value
/// is the lexicon size (14).
pub fn distinct_filler_count(transcript: &str) -> usize {
    FILLER_PATTERNS
        .iter()
        .filter(|re| re.is_match(transcript))
        .count()
}

// ---------------------------------------------------------------------------
// Speaking pace
// ---------------------------------------------------------------------------

/// Sessions shorter than this report a WPM of zero — too little signal.
const MIN_PACE_DURATION_SECS: f64 = 5.0;

/// Normalized pace used when no WPM could be computed.
const DEFAULT_PACE_SCORE: f64 = 0.8;

/// Words per minute, or `0.0` when the session is shorter than 5 seconds.
pub fn speaking_pace_wpm(word_count: usize, duration_secs: f64) -> f64 {
    if duration_secs < MIN_PACE_DURATION_SECS {
        return 0.0;
    }
    word_count as f64 / duration_secs * 60.0
}

/// Map raw WPM onto a `[0.4, 1.0]` score.
///
/// * `0` (duration too short) → the 0.8 default, not the piecewise curve.
/// * below 100 WPM: linear from 0.4 (at 0) up to 0.7 (at 100).
/// * 100–180 WPM: 1.0 at 140, degrading linearly to 0.7 at both edges.
/// * above 180 WPM: decays from 0.7 to a 0.4 floor over the next 60 WPM.
pub fn normalize_pace(wpm: f64) -> f64 {
    if wpm == 0.0 {
        DEFAULT_PACE_SCORE
    } else if wpm < 100.0 {
        0.4 + wpm / 100.0 * 0.3
    } else if wpm <= 180.0 {
        1.0 - (140.0 - wpm).abs() / 40.0 * 0.3
    } else {
        (0.7 - (wpm - 180.0) / 60.0 * 0.3).max(0.4)
    }
}

// ---------------------------------------------------------------------------
// Transcript analysis
// ---------------------------------------------------------------------------

/// Derive the session's [`VoiceMetrics`] from accumulated transcript state.
///
/// Pure and callable at any point in the session lifecycle; with an empty
/// transcript every metric falls back to its formulaic default, so a failed
/// or absent recognition capability still yields a scoreable result.
pub fn analyze_transcript(transcript: &str, word_count: usize, duration_secs: f64) -> VoiceMetrics {
    let filler_count = distinct_filler_count(transcript);
    let filler_ratio = filler_count as f64 / word_count.max(1) as f64;

    let wpm = speaking_pace_wpm(word_count, duration_secs);
    let speaking_pace = normalize_pace(wpm);

    let clarity =
        (0.6 * speaking_pace + 0.4 * (1.0 - (filler_ratio * 5.0).min(1.0))).clamp(0.3, 1.0);
    let tone_confidence = (0.8 - 0.5 * filler_ratio).clamp(0.3, 1.0);

    VoiceMetrics {
        filler_count,
        filler_ratio,
        tone_confidence,
        speaking_pace,
        clarity,
        volume: 0.75,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
