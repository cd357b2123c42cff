//! Practice history fixtures.
//!
//! There is no backing store; the terminal runner's `history` command prints
//! a fixed set of past sessions so progress output has something to show.
//! Persistence of real sessions would replace [`sample_records`] wholesale.

use serde::Serialize;

use crate::questions::Category;
use crate::score::ScoreBand;

// ---------------------------------------------------------------------------
// RecordScores / PracticeRecord
// ---------------------------------------------------------------------------

/// Whole-number dimension scores of a past session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordScores {
    pub overall: u32,
    pub confidence: u32,
    pub engagement: u32,
    pub communication: u32,
    pub body_language: u32,
    pub eye_contact: u32,
}

/// One past practice session.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeRecord {
    pub id: u32,
    /// ISO-8601 calendar date.
    pub date: &'static str,
    pub category: Category,
    pub scores: RecordScores,
}

impl PracticeRecord {
    /// Band of the overall score, for display.
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.scores.overall as f64)
    }
}

/// The fixture records, newest first.
pub fn sample_records() -> Vec<PracticeRecord> {
    vec![
        PracticeRecord {
            id: 1,
            date: "2025-04-09",
            category: Category::Behavioral,
            scores: RecordScores {
                overall: 78,
                confidence: 81,
                engagement: 76,
                communication: 72,
                body_language: 80,
                eye_contact: 85,
            },
        },
        PracticeRecord {
            id: 2,
            date: "2025-04-06",
            category: Category::Technical,
            scores: RecordScores {
                overall: 72,
                confidence: 75,
                engagement: 70,
                communication: 68,
                body_language: 73,
                eye_contact: 79,
            },
        },
        PracticeRecord {
            id: 3,
            date: "2025-04-03",
            category: Category::Behavioral,
            scores: RecordScores {
                overall: 65,
                confidence: 62,
                engagement: 68,
                communication: 63,
                body_language: 67,
                eye_contact: 70,
            },
        },
        PracticeRecord {
            id: 4,
            date: "2025-03-29",
            category: Category::Situational,
            scores: RecordScores {
                overall: 61,
                confidence: 58,
                engagement: 63,
                communication: 59,
                body_language: 64,
                eye_contact: 65,
            },
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_records_newest_first() {
        let records = sample_records();
        assert_eq!(records.len(), 4);
        assert!(records.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn ids_are_unique() {
        let records = sample_records();
        let mut ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn bands_follow_the_overall_score() {
        let records = sample_records();
        assert_eq!(records[0].band(), ScoreBand::Good); // 78
        assert_eq!(records[1].band(), ScoreBand::Good); // 72
        assert_eq!(records[2].band(), ScoreBand::Fair); // 65
        assert_eq!(records[3].band(), ScoreBand::Fair); // 61
    }

    #[test]
    fn records_serialise_to_json() {
        let records = sample_records();
        let json = serde_json::to_string_pretty(&records).expect("serialise");
        assert!(json.contains("\"2025-04-09\""));
        assert!(json.contains("\"overall\": 78"));
        assert!(json.contains("Situational"));
    }
}
