//! Media capture boundary: combined microphone + camera acquisition.
//!
//! Acquisition happens once, up front; a denial is remembered as two
//! *independent* flags keyed by device kind (`audio_denied`,
//! `video_denied`) rather than a single error, because the session can run
//! usefully with either capability missing.  Recovering from a denial
//! requires user action outside the process (grant access and restart), so
//! the flags are surfaced persistently rather than raised.
//!
//! Mic/camera toggles flip track-enabled flags only.  The underlying
//! devices are never released or re-acquired by a toggle; audio is dropped
//! at the capture callback and frame pulls return `None` while disabled.
//!
//! [`FrameSource`] is the camera seam.  No real camera backend ships —
//! the face analyzer is a placeholder anyway — so [`SyntheticFrameSource`]
//! produces well-formed frames for the sampling pipeline.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::MicrophoneInput;

// ---------------------------------------------------------------------------
// VideoFrame
// ---------------------------------------------------------------------------

/// One captured video frame, 8-bit grayscale.
///
/// The placeholder analyzer ignores the pixel data; a real vision model
/// would consume it.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major luma values, `width * height` bytes.
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    /// An all-black frame of the given dimensions.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe video frame supplier.
///
/// `next_frame` must never block; `None` means no frame is currently
/// available (device denied, disabled, or not yet warmed up).
pub trait FrameSource: Send + Sync {
    fn next_frame(&self) -> Option<VideoFrame>;
}

// ---------------------------------------------------------------------------
// SyntheticFrameSource
// ---------------------------------------------------------------------------

/// Camera stand-in producing a moving gradient so successive frames differ.
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    counter: AtomicU64,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SyntheticFrameSource {
    fn default() -> Self {
        Self::new(64, 48)
    }
}

impl FrameSource for SyntheticFrameSource {
    fn next_frame(&self) -> Option<VideoFrame> {
        let tick = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut frame = VideoFrame::blank(self.width, self.height);
        for (i, px) in frame.pixels.iter_mut().enumerate() {
            *px = ((i as u64 + tick) % 256) as u8;
        }
        Some(frame)
    }
}

/// A camera that never produces frames — the video-denied stand-in.
#[derive(Debug, Default)]
pub struct NoCameraSource;

impl FrameSource for NoCameraSource {
    fn next_frame(&self) -> Option<VideoFrame> {
        None
    }
}

// ---------------------------------------------------------------------------
// MediaError
// ---------------------------------------------------------------------------

/// Device-kind-specific acquisition failures, logged at acquire time and
/// then carried as flags.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("microphone access denied or unavailable: {0}")]
    AudioDenied(String),

    #[error("camera access denied or unavailable")]
    VideoDenied,
}

// ---------------------------------------------------------------------------
// MediaAccess
// ---------------------------------------------------------------------------

/// Holds the outcome of the one-time combined audio+video acquisition and
/// the two track-enabled toggles.
pub struct MediaAccess {
    audio_denied: bool,
    video_denied: bool,
    mic_enabled: Arc<AtomicBool>,
    camera_enabled: Arc<AtomicBool>,
    camera: Box<dyn FrameSource>,
}

impl MediaAccess {
    /// Probe both capabilities.  Never fails — denial of either kind is
    /// recorded as a flag and logged once.
    pub fn acquire(camera: Box<dyn FrameSource>) -> Self {
        let audio_denied = match MicrophoneInput::new() {
            Ok(mic) => {
                log::info!(
                    "microphone acquired ({} Hz, {} ch)",
                    mic.sample_rate(),
                    mic.channels()
                );
                false
            }
            Err(e) => {
                log::warn!("{}", MediaError::AudioDenied(e.to_string()));
                true
            }
        };

        let video_denied = camera.next_frame().is_none();
        if video_denied {
            log::warn!("{}", MediaError::VideoDenied);
        }

        Self {
            audio_denied,
            video_denied,
            mic_enabled: Arc::new(AtomicBool::new(true)),
            camera_enabled: Arc::new(AtomicBool::new(true)),
            camera,
        }
    }

    /// `true` when microphone access was denied at acquisition time.
    pub fn audio_denied(&self) -> bool {
        self.audio_denied
    }

    /// `true` when camera access was denied at acquisition time.
    pub fn video_denied(&self) -> bool {
        self.video_denied
    }

    /// Shared mic gate consumed by the capture callback.
    pub fn mic_gate(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.mic_enabled)
    }

    /// Flip the microphone track without touching the device.
    pub fn set_mic_enabled(&self, enabled: bool) {
        self.mic_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn mic_enabled(&self) -> bool {
        self.mic_enabled.load(Ordering::Relaxed)
    }

    /// Flip the camera track without touching the device.
    pub fn set_camera_enabled(&self, enabled: bool) {
        self.camera_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled.load(Ordering::Relaxed)
    }
}

impl FrameSource for MediaAccess {
    /// Pull one frame, honouring the denial flag and the track toggle.
    fn next_frame(&self) -> Option<VideoFrame> {
        if self.video_denied || !self.camera_enabled() {
            return None;
        }
        self.camera.next_frame()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_have_the_right_shape() {
        let source = SyntheticFrameSource::new(8, 4);
        let frame = source.next_frame().expect("always produces a frame");
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.pixels.len(), 32);
    }

    #[test]
    fn successive_synthetic_frames_differ() {
        let source = SyntheticFrameSource::new(8, 8);
        let a = source.next_frame().unwrap();
        let b = source.next_frame().unwrap();
        assert_ne!(a.pixels, b.pixels);
    }

    #[test]
    fn no_camera_source_yields_nothing() {
        assert!(NoCameraSource.next_frame().is_none());
    }

    #[test]
    fn denied_camera_sets_only_the_video_flag() {
        let media = MediaAccess::acquire(Box::new(NoCameraSource));
        assert!(media.video_denied());
        // The audio flag is independent of the camera outcome; whatever it
        // is, pulling a frame must yield nothing.
        assert!(media.next_frame().is_none());
    }

    #[test]
    fn camera_toggle_gates_frames_without_reacquiring() {
        let media = MediaAccess::acquire(Box::new(SyntheticFrameSource::default()));
        assert!(!media.video_denied());
        assert!(media.next_frame().is_some());

        media.set_camera_enabled(false);
        assert!(media.next_frame().is_none(), "disabled track yields no frames");

        media.set_camera_enabled(true);
        assert!(media.next_frame().is_some(), "re-enable without re-acquire");
    }

    #[test]
    fn mic_gate_is_shared() {
        let media = MediaAccess::acquire(Box::new(SyntheticFrameSource::default()));
        let gate = media.mic_gate();
        assert!(gate.load(Ordering::Relaxed));

        media.set_mic_enabled(false);
        assert!(!gate.load(Ordering::Relaxed));
        assert!(!media.mic_enabled());
    }

    #[test]
    fn blank_frame_is_black() {
        let frame = VideoFrame::blank(2, 2);
        assert!(frame.pixels.iter().all(|&p| p == 0));
    }
}
