//! Local mock-interview practice with automated scoring.
//!
//! # Pipeline
//!
//! ```text
//!  camera frames ─▶ FrameAnalyzer ─▶ FaceMetrics ─┐
//!                                                 ├─▶ calculate_score
//!  microphone ─▶ WhisperTranscriber ─▶ transcript ┘        │
//!                  (SpeechService)  ─▶ VoiceMetrics        ▼
//!                                                  InterviewScore
//! ```
//!
//! The [`session`] controller ties it together: it draws a random question
//! set, samples face frames every 200 ms, accumulates the live transcript,
//! counts down a per-question timer and publishes an [`session::SessionSnapshot`]
//! that ends with a score.  Every capability degrades gracefully — a missing
//! camera scores against neutral defaults and a missing microphone or model
//! scores against an empty transcript — so a session always completes.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod history;
pub mod media;
pub mod questions;
pub mod score;
pub mod session;
pub mod speech;
