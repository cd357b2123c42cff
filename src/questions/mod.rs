//! Static interview question bank and random selection helpers.
//!
//! The bank is a compile-time table of 15 questions spanning five
//! categories and three difficulty levels.  Selection is uniform via
//! `rand`; [`interview_set`] performs a full shuffle and takes a prefix so
//! a set never contains duplicates.

use rand::seq::SliceRandom;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Category / Difficulty
// ---------------------------------------------------------------------------

/// Broad question category shown alongside the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Behavioral,
    Technical,
    Experience,
    Situational,
    Personal,
}

impl Category {
    /// Display label used by the terminal runner and history records.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Behavioral => "Behavioral",
            Category::Technical => "Technical",
            Category::Experience => "Experience",
            Category::Situational => "Situational",
            Category::Personal => "Personal",
        }
    }
}

/// Rough difficulty grading of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

// ---------------------------------------------------------------------------
// InterviewQuestion
// ---------------------------------------------------------------------------

/// One entry in the static question bank.
///
/// Questions are immutable and defined at compile time; `id` is stable and
/// unique within [`QUESTION_BANK`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterviewQuestion {
    pub id: u32,
    pub question: &'static str,
    pub category: Category,
    pub difficulty: Difficulty,
}

// ---------------------------------------------------------------------------
// QUESTION_BANK
// ---------------------------------------------------------------------------

/// The full static question bank.
pub const QUESTION_BANK: &[InterviewQuestion] = &[
    InterviewQuestion {
        id: 1,
        question: "Tell me about yourself and your background.",
        category: Category::Personal,
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        id: 2,
        question: "Why do you want to work for this company?",
        category: Category::Behavioral,
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        id: 3,
        question: "Describe a time when you had to overcome a significant challenge at work.",
        category: Category::Behavioral,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 4,
        question: "What are your greatest strengths and weaknesses?",
        category: Category::Personal,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 5,
        question: "Tell me about a time you had to work with a difficult team member.",
        category: Category::Situational,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 6,
        question: "Where do you see yourself in five years?",
        category: Category::Personal,
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        id: 7,
        question: "Describe a project you're particularly proud of and your role in it.",
        category: Category::Experience,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 8,
        question: "How do you handle pressure or stressful situations?",
        category: Category::Behavioral,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 9,
        question: "Tell me about a time you failed and what you learned from it.",
        category: Category::Behavioral,
        difficulty: Difficulty::Hard,
    },
    InterviewQuestion {
        id: 10,
        question: "How do you prioritize your work when dealing with multiple deadlines?",
        category: Category::Situational,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 11,
        question: "Why are you leaving your current position?",
        category: Category::Personal,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 12,
        question: "Describe your ideal work environment.",
        category: Category::Personal,
        difficulty: Difficulty::Easy,
    },
    InterviewQuestion {
        id: 13,
        question: "How do you stay updated with industry trends and developments?",
        category: Category::Technical,
        difficulty: Difficulty::Medium,
    },
    InterviewQuestion {
        id: 14,
        question: "Tell me about a time you had to make a difficult decision with limited information.",
        category: Category::Situational,
        difficulty: Difficulty::Hard,
    },
    InterviewQuestion {
        id: 15,
        question: "What motivates you to do your best work?",
        category: Category::Personal,
        difficulty: Difficulty::Medium,
    },
];

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

/// Draw one question uniformly from the full bank.
pub fn random_question() -> InterviewQuestion {
    let mut rng = rand::thread_rng();
    // The bank is a non-empty compile-time table, so choose cannot fail.
    *QUESTION_BANK.choose(&mut rng).unwrap_or(&QUESTION_BANK[0])
}

/// Draw one question uniformly from `category`, falling back to an
/// unfiltered draw when the category has no entries.
pub fn random_question_by_category(category: Category) -> InterviewQuestion {
    let filtered: Vec<&InterviewQuestion> = QUESTION_BANK
        .iter()
        .filter(|q| q.category == category)
        .collect();

    let mut rng = rand::thread_rng();
    match filtered.choose(&mut rng) {
        Some(q) => **q,
        None => random_question(),
    }
}

/// Build an ordered set of `count` distinct questions for one session.
///
/// `count` is clamped to the bank size.  The whole bank is shuffled
/// (Fisher-Yates via `SliceRandom::shuffle`) and the prefix taken, so the
/// result never contains duplicates.
pub fn interview_set(count: usize) -> Vec<InterviewQuestion> {
    let count = count.min(QUESTION_BANK.len());

    let mut shuffled: Vec<InterviewQuestion> = QUESTION_BANK.to_vec();
    shuffled.shuffle(&mut rand::thread_rng());
    shuffled.truncate(count);
    shuffled
}

/// Look up a question by its stable id.
pub fn question_by_id(id: u32) -> Option<InterviewQuestion> {
    QUESTION_BANK.iter().find(|q| q.id == id).copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bank_has_fifteen_questions_with_unique_ids() {
        assert_eq!(QUESTION_BANK.len(), 15);
        let ids: HashSet<u32> = QUESTION_BANK.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), QUESTION_BANK.len());
    }

    #[test]
    fn random_question_comes_from_the_bank() {
        for _ in 0..50 {
            let q = random_question();
            assert!(QUESTION_BANK.iter().any(|b| b.id == q.id));
        }
    }

    #[test]
    fn category_draw_respects_the_filter() {
        for _ in 0..50 {
            let q = random_question_by_category(Category::Behavioral);
            assert_eq!(q.category, Category::Behavioral);
        }
    }

    /// Every category in the enum has at least one bank entry, so the
    /// fallback path never fires for real categories — but the filtered
    /// draw must still return a valid bank question for each of them.
    #[test]
    fn category_draw_covers_all_categories() {
        for cat in [
            Category::Behavioral,
            Category::Technical,
            Category::Experience,
            Category::Situational,
            Category::Personal,
        ] {
            let q = random_question_by_category(cat);
            assert!(QUESTION_BANK.iter().any(|b| b.id == q.id));
        }
    }

    /// 100 random trials: a set of 5 from the 15-question bank must always
    /// contain 5 distinct questions.
    #[test]
    fn interview_set_has_no_duplicates() {
        for _ in 0..100 {
            let set = interview_set(5);
            assert_eq!(set.len(), 5);
            let ids: HashSet<u32> = set.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 5, "duplicate question in set: {set:?}");
        }
    }

    #[test]
    fn interview_set_clamps_to_bank_size() {
        let set = interview_set(100);
        assert_eq!(set.len(), QUESTION_BANK.len());

        let set = interview_set(0);
        assert!(set.is_empty());
    }

    #[test]
    fn question_by_id_round_trips() {
        let q = question_by_id(9).expect("id 9 exists");
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert!(question_by_id(999).is_none());
    }
}
