//! Per-frame facial-expression metrics.
//!
//! [`FrameAnalyzer`] is the seam where a real computer-vision model would
//! plug in.  The shipped [`HeuristicFrameAnalyzer`] is a stand-in: it draws
//! each metric from a uniform distribution and layers on a small
//! time-since-start bonus so longer sessions trend calmer.  The contract a
//! replacement must keep is the *shape*: five `[0, 1]` metrics per call, no
//! blocking, no failure path.
//!
//! [`average_metrics`] reduces a session's sample sequence to a per-field
//! mean.  It returns all-zero metrics for an empty slice; the session
//! controller applies its own all-0.5 neutral fallback when no samples were
//! captured at all.  Those are two different policies at two different
//! layers and both are covered by tests.

use std::time::Instant;

use rand::Rng;

use crate::media::VideoFrame;

// ---------------------------------------------------------------------------
// FaceMetrics
// ---------------------------------------------------------------------------

/// Normalized facial-expression metrics for a single sampled frame.
///
/// Every field is in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    pub confidence: f64,
    pub engagement: f64,
    pub nervousness: f64,
    pub smile: f64,
    pub eye_contact: f64,
}

impl FaceMetrics {
    /// Neutral metrics used by the session controller when a session ends
    /// with zero captured samples.
    pub fn neutral() -> Self {
        Self {
            confidence: 0.5,
            engagement: 0.5,
            nervousness: 0.5,
            smile: 0.5,
            eye_contact: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameAnalyzer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for per-frame face analysis.
///
/// Implementations must never block and never fail: a frame always yields
/// one [`FaceMetrics`] value.
pub trait FrameAnalyzer: Send + Sync {
    /// Analyze one video frame.
    fn analyze(&self, frame: &VideoFrame) -> FaceMetrics;
}

// ---------------------------------------------------------------------------
// HeuristicFrameAnalyzer
// ---------------------------------------------------------------------------

/// Placeholder analyzer standing in for a real vision model.
///
/// Each metric is drawn uniformly from `[0.3, 1.0]`, then a time bonus
/// (capped at 0.2, growing with elapsed time since the analyzer was
/// created) is added to confidence, engagement, and eye contact and
/// subtracted from nervousness.  Smile is scaled by 0.8 and receives no
/// bonus.  All outputs are clamped back into `[0, 1]`.
pub struct HeuristicFrameAnalyzer {
    created: Instant,
}

impl HeuristicFrameAnalyzer {
    pub fn new() -> Self {
        Self {
            created: Instant::now(),
        }
    }

    /// Bonus grows by 0.02 per second of session warm-up, capped at 0.2.
    fn time_bonus(&self) -> f64 {
        (self.created.elapsed().as_secs_f64() / 50.0).min(0.2)
    }
}

impl Default for HeuristicFrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAnalyzer for HeuristicFrameAnalyzer {
    fn analyze(&self, _frame: &VideoFrame) -> FaceMetrics {
        let mut rng = rand::thread_rng();
        let mut draw = || rng.gen_range(0.3..=1.0_f64);

        let bonus = self.time_bonus();

        FaceMetrics {
            confidence: (draw() + bonus).clamp(0.0, 1.0),
            engagement: (draw() + bonus).clamp(0.0, 1.0),
            // Nervousness trends down as the candidate warms up.
            nervousness: (draw() - bonus).clamp(0.0, 1.0),
            smile: draw() * 0.8,
            eye_contact: (draw() + bonus).clamp(0.0, 1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-field arithmetic mean over a sample sequence.
///
/// Returns all-zero metrics for an empty slice.
pub fn average_metrics(samples: &[FaceMetrics]) -> FaceMetrics {
    if samples.is_empty() {
        return FaceMetrics::default();
    }

    let n = samples.len() as f64;
    let sum = samples.iter().fold(FaceMetrics::default(), |acc, s| FaceMetrics {
        confidence: acc.confidence + s.confidence,
        engagement: acc.engagement + s.engagement,
        nervousness: acc.nervousness + s.nervousness,
        smile: acc.smile + s.smile,
        eye_contact: acc.eye_contact + s.eye_contact,
    });

    FaceMetrics {
        confidence: sum.confidence / n,
        engagement: sum.engagement / n,
        nervousness: sum.nervousness / n,
        smile: sum.smile / n,
        eye_contact: sum.eye_contact / n,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> VideoFrame {
        VideoFrame::blank(4, 4)
    }

    #[test]
    fn heuristic_metrics_stay_in_range() {
        let analyzer = HeuristicFrameAnalyzer::new();
        for _ in 0..200 {
            let m = analyzer.analyze(&frame());
            for (name, v) in [
                ("confidence", m.confidence),
                ("engagement", m.engagement),
                ("nervousness", m.nervousness),
                ("smile", m.smile),
                ("eye_contact", m.eye_contact),
            ] {
                assert!((0.0..=1.0).contains(&v), "{name} out of range: {v}");
            }
        }
    }

    /// Smile is drawn from [0.3, 1.0] then scaled by 0.8, so it can never
    /// exceed 0.8 and never drops below 0.24.
    #[test]
    fn smile_is_scaled_down() {
        let analyzer = HeuristicFrameAnalyzer::new();
        for _ in 0..200 {
            let m = analyzer.analyze(&frame());
            assert!(m.smile <= 0.8 + 1e-9);
            assert!(m.smile >= 0.24 - 1e-9);
        }
    }

    #[test]
    fn analyzer_is_object_safe() {
        let analyzer: Box<dyn FrameAnalyzer> = Box::new(HeuristicFrameAnalyzer::new());
        let _ = analyzer.analyze(&frame());
    }

    // ---- average_metrics ----

    #[test]
    fn average_of_empty_slice_is_all_zero() {
        let avg = average_metrics(&[]);
        assert_eq!(avg, FaceMetrics::default());
        assert_eq!(avg.confidence, 0.0);
    }

    /// Distinct from the empty-slice policy above: the session controller's
    /// fallback when *no* samples exist is all-0.5, provided by `neutral()`.
    #[test]
    fn neutral_fallback_is_all_half() {
        let n = FaceMetrics::neutral();
        assert_eq!(n.confidence, 0.5);
        assert_eq!(n.engagement, 0.5);
        assert_eq!(n.nervousness, 0.5);
        assert_eq!(n.smile, 0.5);
        assert_eq!(n.eye_contact, 0.5);
    }

    #[test]
    fn average_is_component_wise_mean() {
        let a = FaceMetrics {
            confidence: 0.2,
            engagement: 0.4,
            nervousness: 0.6,
            smile: 0.8,
            eye_contact: 1.0,
        };
        let b = FaceMetrics {
            confidence: 0.4,
            engagement: 0.6,
            nervousness: 0.8,
            smile: 0.0,
            eye_contact: 0.5,
        };

        let avg = average_metrics(&[a, b]);
        assert!((avg.confidence - 0.3).abs() < 1e-12);
        assert!((avg.engagement - 0.5).abs() < 1e-12);
        assert!((avg.nervousness - 0.7).abs() < 1e-12);
        assert!((avg.smile - 0.4).abs() < 1e-12);
        assert!((avg.eye_contact - 0.75).abs() < 1e-12);
    }

    #[test]
    fn average_of_single_sample_is_identity() {
        let a = FaceMetrics {
            confidence: 0.33,
            engagement: 0.44,
            nervousness: 0.55,
            smile: 0.66,
            eye_contact: 0.77,
        };
        assert_eq!(average_metrics(&[a]), a);
    }
}
