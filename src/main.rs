//! Application entry point — terminal runner for interview practice.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Acquire media (microphone + camera); denial becomes degraded flags.
//! 4. Load the Whisper model; fall back to the null transcript source when
//!    it is missing so sessions still run.
//! 5. Spawn the session controller.
//! 6. Read line commands from stdin until `quit`.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use interview_coach::{
    config::{AppConfig, AppPaths},
    history::sample_records,
    media::{MediaAccess, SyntheticFrameSource},
    score::{improvement_suggestions, InterviewScore, ScoreBand},
    session::{self, SessionSnapshot, TranscriptSourceFactory},
    speech::{load_model, NullTranscriptSource, WhisperTranscriber},
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Configuration (defaults on first run).
    let config = AppConfig::load()?;
    let paths = AppPaths::new();
    log::info!("config loaded; settings file at {}", paths.settings_file.display());

    // 3. Media acquisition.  Denials are flags, not failures.
    let media = MediaAccess::acquire(Box::new(SyntheticFrameSource::default()));
    let mic_gate = media.mic_gate();
    let audio_denied = media.audio_denied();
    if audio_denied {
        println!("note: microphone unavailable — voice analysis will use defaults");
    }
    if media.video_denied() {
        println!("note: camera unavailable — face analysis will use neutral defaults");
    }

    // 4. Speech capability, degraded to the null source when absent.
    let model_path = paths.model_file(&config.speech.model);
    let source_factory: TranscriptSourceFactory = if audio_denied {
        Box::new(|| Box::new(NullTranscriptSource))
    } else {
        match load_model(&model_path) {
            Ok(ctx) => {
                let language = config.speech.language.clone();
                let window = config.speech.emit_window_secs;
                Box::new(move || {
                    Box::new(WhisperTranscriber::new(
                        Arc::clone(&ctx),
                        language.clone(),
                        window,
                        Arc::clone(&mic_gate),
                    ))
                })
            }
            Err(e) => {
                log::warn!("speech recognition disabled: {e}");
                println!(
                    "note: no speech model at {} — transcripts will stay empty",
                    model_path.display()
                );
                Box::new(|| Box::new(NullTranscriptSource))
            }
        }
    };

    // 5. Session controller.
    let analyzer = Box::new(interview_coach::analysis::HeuristicFrameAnalyzer::new());
    let handle = session::spawn(config.session.clone(), Arc::new(media), analyzer, source_factory);

    // 6. Command loop.
    println!("commands: start | stop | reset | status | history | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "start" => {
                handle.start().await;
                println!("session started");
            }
            "stop" => {
                handle.stop().await;
                // Give the controller a moment to settle and score.
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                print_status(&handle.snapshot());
            }
            "reset" => {
                handle.reset().await;
                println!("session reset");
            }
            "status" => print_status(&handle.snapshot()),
            "history" => println!("{}", serde_json::to_string_pretty(&sample_records())?),
            "quit" | "exit" => break,
            "" => {}
            other => println!("unknown command: {other}"),
        }
    }

    log::info!("shutting down");
    Ok(())
}

fn print_status(snap: &SessionSnapshot) {
    println!("phase: {:?}", snap.phase);
    if let Some(q) = &snap.question {
        println!(
            "question {}/{} ({}): {}",
            snap.question_index + 1,
            snap.question_count,
            q.category.label(),
            q.question
        );
    }
    if snap.recording {
        println!("time remaining: {} s", snap.remaining_secs);
    }
    if !snap.transcript.is_empty() {
        println!("transcript: {}", snap.transcript);
    }
    if let Some(score) = &snap.score {
        print_score(score);
    }
}

fn print_score(score: &InterviewScore) {
    println!("overall: {:.1} ({:?})", score.overall, ScoreBand::from_score(score.overall));
    println!("  confidence:    {:.1}", score.confidence);
    println!("  engagement:    {:.1}", score.engagement);
    println!("  communication: {:.1}", score.communication);
    println!("  body language: {:.1}", score.body_language);
    println!("  eye contact:   {:.1}", score.eye_contact);

    for line in &score.feedback {
        println!("feedback: {line}");
    }
    for line in improvement_suggestions(score) {
        println!("suggestion: {line}");
    }
}
