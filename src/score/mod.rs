//! Score engine — reduces aggregated face and voice metrics to a weighted
//! composite score with textual feedback.
//!
//! [`calculate_score`] is a pure function: identical inputs always produce
//! bit-identical output, and it is recomputed from scratch every time a
//! session ends.
//!
//! The sub-score formulas are fixed linear blends:
//!
//! ```text
//! confidence    = 0.6·face.confidence + 0.4·voice.tone_confidence
//! engagement    = 0.7·face.engagement + 0.3·voice.volume
//! communication = 0.5·voice.clarity + 0.3·voice.speaking_pace
//!               + 0.2·(1 − voice.filler_ratio·10)
//! body_language = 0.8·face.confidence
//! eye_contact   = face.eye_contact
//! overall       = 0.25·confidence + 0.20·engagement + 0.25·communication
//!               + 0.15·body_language + 0.15·eye_contact
//! ```
//!
//! The filler term in `communication` is deliberately left unclamped: a
//! filler ratio above 0.1 contributes negatively.  That matches the shipped
//! behaviour and is pinned by a regression test — changing it is a product
//! decision, not a cleanup.

use serde::Serialize;

use crate::analysis::{FaceMetrics, VoiceMetrics};

// ---------------------------------------------------------------------------
// InterviewScore
// ---------------------------------------------------------------------------

/// Final session score.  All numeric fields are percentages in `[0, 100]`
/// rounded to one decimal (communication may go below zero under extreme
/// filler use).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewScore {
    pub overall: f64,
    pub confidence: f64,
    pub engagement: f64,
    pub communication: f64,
    pub body_language: f64,
    pub eye_contact: f64,
    /// Human-readable feedback sentences, in fixed dimension order.
    pub feedback: Vec<String>,
}

/// Scale a `[0, 1]` value to a percentage with one decimal place.
fn to_percent(value: f64) -> f64 {
    (value * 1000.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// calculate_score
// ---------------------------------------------------------------------------

/// Combine session-averaged face metrics and the voice analysis result into
/// an [`InterviewScore`].
pub fn calculate_score(face: &FaceMetrics, voice: &VoiceMetrics) -> InterviewScore {
    let confidence = 0.6 * face.confidence + 0.4 * voice.tone_confidence;
    let engagement = 0.7 * face.engagement + 0.3 * voice.volume;
    let communication = 0.5 * voice.clarity
        + 0.3 * voice.speaking_pace
        + 0.2 * (1.0 - voice.filler_ratio * 10.0);
    let body_language = 0.8 * face.confidence;
    let eye_contact = face.eye_contact;

    let overall = 0.25 * confidence
        + 0.20 * engagement
        + 0.25 * communication
        + 0.15 * body_language
        + 0.15 * eye_contact;

    let feedback = generate_feedback(
        confidence,
        engagement,
        communication,
        body_language,
        eye_contact,
        voice.filler_count,
    );

    InterviewScore {
        overall: to_percent(overall),
        confidence: to_percent(confidence),
        engagement: to_percent(engagement),
        communication: to_percent(communication),
        body_language: to_percent(body_language),
        eye_contact: to_percent(eye_contact),
        feedback,
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// One sentence per dimension rule, in fixed order: scores below 0.6 draw
/// constructive criticism, at or above 0.8 draw praise, and the band in
/// between stays silent.  The filler rule keys off the raw count.  When no
/// rule fires at all, one generic encouragement is emitted.
fn generate_feedback(
    confidence: f64,
    engagement: f64,
    communication: f64,
    body_language: f64,
    eye_contact: f64,
    filler_count: usize,
) -> Vec<String> {
    let mut feedback = Vec::new();

    if confidence < 0.6 {
        feedback.push(
            "Work on your confidence by practicing power poses before interviews and speaking \
             with a more authoritative tone."
                .to_string(),
        );
    } else if confidence >= 0.8 {
        feedback.push(
            "Great job showing confidence! Your self-assured presence is a strong point."
                .to_string(),
        );
    }

    if engagement < 0.6 {
        feedback.push(
            "Try to appear more engaged by showing enthusiasm in your voice and facial \
             expressions."
                .to_string(),
        );
    } else if engagement >= 0.8 {
        feedback.push(
            "You demonstrated excellent engagement and enthusiasm throughout the interview."
                .to_string(),
        );
    }

    if communication < 0.6 {
        feedback.push(
            "Focus on clearer communication by speaking at a moderate pace and eliminating \
             filler words."
                .to_string(),
        );
    } else if communication >= 0.8 {
        feedback.push(
            "Your communication skills are strong, with clear articulation and good pacing."
                .to_string(),
        );
    }

    if body_language < 0.6 {
        feedback.push(
            "Be mindful of your body language by sitting up straight and using appropriate \
             hand gestures."
                .to_string(),
        );
    } else if body_language >= 0.8 {
        feedback.push(
            "Your body language effectively communicated openness and professionalism."
                .to_string(),
        );
    }

    if eye_contact < 0.6 {
        feedback.push(
            "Work on maintaining more consistent eye contact to build rapport with interviewers."
                .to_string(),
        );
    } else if eye_contact >= 0.8 {
        feedback.push(
            "Excellent eye contact throughout the interview, which helps establish trust."
                .to_string(),
        );
    }

    if filler_count > 5 {
        feedback.push(format!(
            "You used approximately {filler_count} filler words (like 'um', 'uh', 'like'). \
             Try to reduce these for clearer communication."
        ));
    } else if filler_count <= 2 {
        feedback.push(
            "You used very few filler words, which made your responses sound polished and \
             prepared."
                .to_string(),
        );
    }

    if feedback.is_empty() {
        feedback.push(
            "Overall, you performed well in this mock interview. Continue practicing to \
             enhance your skills further."
                .to_string(),
        );
    }

    feedback
}

// ---------------------------------------------------------------------------
// Improvement suggestions
// ---------------------------------------------------------------------------

/// The five named sub-score dimensions, used to rank weak areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Confidence,
    Engagement,
    Communication,
    BodyLanguage,
    EyeContact,
}

impl Dimension {
    fn suggestions(&self) -> [&'static str; 2] {
        match self {
            Dimension::Confidence => [
                "Practice power poses for 2 minutes before interviews to boost confidence",
                "Record yourself answering common questions and review to build confidence",
            ],
            Dimension::Engagement => [
                "Incorporate more vocal variety by practicing emphasizing key words",
                "Show enthusiasm by smiling appropriately and using positive language",
            ],
            Dimension::Communication => [
                "Practice speaking more slowly and deliberately to improve clarity",
                "Record yourself and count filler words to become more aware of them",
            ],
            Dimension::BodyLanguage => [
                "Practice interviews in front of a mirror to be aware of your posture and gestures",
                "Maintain an open posture with uncrossed arms and occasional hand gestures",
            ],
            Dimension::EyeContact => [
                "When practicing, place a sticker near your camera to remind you to look at it",
                "In virtual interviews, look directly at the camera instead of the screen",
            ],
        }
    }
}

/// Suggest concrete improvements for the two lowest-scoring dimensions.
///
/// A dimension only qualifies when its score (0–100 scale) is below 70;
/// when neither of the two lowest qualifies, one generic suggestion is
/// returned instead.
pub fn improvement_suggestions(score: &InterviewScore) -> Vec<String> {
    let mut areas = [
        (Dimension::Confidence, score.confidence),
        (Dimension::Engagement, score.engagement),
        (Dimension::Communication, score.communication),
        (Dimension::BodyLanguage, score.body_language),
        (Dimension::EyeContact, score.eye_contact),
    ];
    areas.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut suggestions = Vec::new();
    for (dimension, value) in areas.iter().take(2) {
        if *value < 70.0 {
            for s in dimension.suggestions() {
                suggestions.push(s.to_string());
            }
        }
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Continue building your interview skills by practicing regularly with different \
             types of questions"
                .to_string(),
        );
    }

    suggestions
}

// ---------------------------------------------------------------------------
// ScoreBand
// ---------------------------------------------------------------------------

/// Qualitative band for a 0–100 score, used by presentation layers to pick
/// a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    /// 80 and above.
    Excellent,
    /// 70 up to (but excluding) 80.
    Good,
    /// 60 up to 70.
    Fair,
    /// 50 up to 60.
    Poor,
    /// Below 50.
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 70.0 {
            ScoreBand::Good
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else if score >= 50.0 {
            ScoreBand::Poor
        } else {
            ScoreBand::Weak
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_face() -> FaceMetrics {
        FaceMetrics {
            confidence: 0.9,
            engagement: 0.9,
            nervousness: 0.1,
            smile: 0.7,
            eye_contact: 0.9,
        }
    }

    fn strong_voice() -> VoiceMetrics {
        VoiceMetrics {
            filler_count: 1,
            filler_ratio: 0.02,
            tone_confidence: 0.9,
            speaking_pace: 1.0,
            clarity: 0.95,
            volume: 0.8,
        }
    }

    /// End-to-end regression fixture: the exact one-decimal values produced
    /// by the weighted formulas for a strong session.
    #[test]
    fn strong_session_fixture_values() {
        let score = calculate_score(&strong_face(), &strong_voice());

        assert_eq!(score.confidence, 90.0);
        assert_eq!(score.engagement, 87.0);
        assert_eq!(score.communication, 93.5);
        assert_eq!(score.body_language, 72.0);
        assert_eq!(score.eye_contact, 90.0);
        assert_eq!(score.overall, 87.6);
    }

    /// Recomputation from identical inputs must be bit-identical.
    #[test]
    fn calculation_is_deterministic() {
        let a = calculate_score(&strong_face(), &strong_voice());
        let b = calculate_score(&strong_face(), &strong_voice());
        assert_eq!(a, b);
    }

    /// The filler term is unclamped: a ratio above 0.1 subtracts from
    /// communication, and extreme ratios can push it below zero.
    #[test]
    fn high_filler_ratio_drives_communication_negative() {
        let face = strong_face();
        let voice = VoiceMetrics {
            filler_count: 10,
            filler_ratio: 1.0,
            tone_confidence: 0.3,
            speaking_pace: 0.4,
            clarity: 0.3,
            volume: 0.75,
        };

        let score = calculate_score(&face, &voice);
        // 0.5·0.3 + 0.3·0.4 + 0.2·(1 − 10) = 0.27 − 1.8 = −1.53 → −153.0
        assert_eq!(score.communication, -153.0);
    }

    #[test]
    fn moderate_filler_ratio_still_subtracts() {
        let face = strong_face();
        let mut voice = strong_voice();
        voice.filler_ratio = 0.2; // term becomes 0.2·(1 − 2) = −0.2

        let with_fillers = calculate_score(&face, &voice);
        let without = calculate_score(&face, &strong_voice());
        assert!(with_fillers.communication < without.communication);
    }

    // ---- feedback ----

    #[test]
    fn strong_session_feedback_is_praise_in_dimension_order() {
        let score = calculate_score(&strong_face(), &strong_voice());

        // Confidence, engagement, communication, and eye contact all sit at
        // or above 0.8; body language lands at 0.72 — inside the silent
        // band — and the filler count of 1 draws praise.
        assert_eq!(score.feedback.len(), 5);
        assert!(score.feedback[0].contains("confidence"));
        assert!(score.feedback[1].contains("engagement"));
        assert!(score.feedback[2].contains("communication skills"));
        assert!(score.feedback[3].contains("eye contact"));
        assert!(score.feedback[4].contains("filler words"));
    }

    #[test]
    fn weak_session_feedback_is_criticism() {
        let face = FaceMetrics {
            confidence: 0.3,
            engagement: 0.3,
            nervousness: 0.9,
            smile: 0.2,
            eye_contact: 0.3,
        };
        let voice = VoiceMetrics {
            filler_count: 8,
            filler_ratio: 0.08,
            tone_confidence: 0.4,
            speaking_pace: 0.4,
            clarity: 0.4,
            volume: 0.75,
        };

        let score = calculate_score(&face, &voice);
        // All five dimensions < 0.6 plus the filler warning.
        assert_eq!(score.feedback.len(), 6);
        assert!(score.feedback[5].contains("approximately 8 filler words"));
    }

    /// The middle band [0.6, 0.8) emits nothing per dimension; with a
    /// filler count of 3–5 the filler rule stays silent too, so only the
    /// generic line fires.
    #[test]
    fn fully_silent_rules_produce_one_generic_line() {
        // Feed the rule function directly with in-band values.
        let feedback = generate_feedback(0.7, 0.7, 0.7, 0.7, 0.7, 4);
        assert_eq!(feedback.len(), 1);
        assert!(feedback[0].contains("Overall, you performed well"));
    }

    // ---- improvement suggestions ----

    #[test]
    fn two_lowest_dimensions_below_70_get_two_suggestions_each() {
        let score = InterviewScore {
            overall: 65.0,
            confidence: 55.0,
            engagement: 85.0,
            communication: 60.0,
            body_language: 80.0,
            eye_contact: 75.0,
            feedback: vec![],
        };

        let suggestions = improvement_suggestions(&score);
        assert_eq!(suggestions.len(), 4);
        // Lowest is confidence, then communication.
        assert!(suggestions[0].contains("power poses"));
        assert!(suggestions[2].contains("speaking more slowly"));
    }

    #[test]
    fn only_one_qualifying_dimension_gets_two_suggestions() {
        let score = InterviewScore {
            overall: 78.0,
            confidence: 65.0,
            engagement: 85.0,
            communication: 82.0,
            body_language: 80.0,
            eye_contact: 75.0,
            feedback: vec![],
        };

        let suggestions = improvement_suggestions(&score);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("power poses"));
    }

    #[test]
    fn no_qualifying_dimension_yields_generic_suggestion() {
        let score = InterviewScore {
            overall: 85.0,
            confidence: 85.0,
            engagement: 85.0,
            communication: 82.0,
            body_language: 80.0,
            eye_contact: 90.0,
            feedback: vec![],
        };

        let suggestions = improvement_suggestions(&score);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("practicing regularly"));
    }

    // ---- ScoreBand ----

    #[test]
    fn band_boundaries() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(70.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(49.9), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Weak);
    }
}
