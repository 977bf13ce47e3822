use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum score the backend treats as a pass; shown to the learner up front.
pub const PASS_THRESHOLD: f64 = 0.75;

/// A multiple-choice question for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub tested_concept: Option<String>,
}

/// Outcome of a quiz submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub passed: bool,
    #[serde(default)]
    pub xp_earned: u32,
    #[serde(default)]
    pub weak_areas: Vec<String>,
}

impl QuizResult {
    /// Score rounded to a whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u32 {
        // clamped to 0..=100 before the cast
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerSheetError {
    #[error("question {index} has no answer")]
    Unanswered { index: usize },
}

/// Answers collected for a quiz, one slot per question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: Vec<String>,
}

impl AnswerSheet {
    #[must_use]
    pub fn for_questions(count: usize) -> Self {
        Self {
            answers: vec![String::new(); count],
        }
    }

    /// Record an answer; out-of-range slots are ignored.
    pub fn answer(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = value.into();
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.trim().is_empty()).count()
    }

    /// Returns the answers once every slot is filled.
    ///
    /// # Errors
    ///
    /// Returns `AnswerSheetError::Unanswered` for the first blank slot.
    pub fn complete(&self) -> Result<Vec<String>, AnswerSheetError> {
        if let Some(index) = self.answers.iter().position(|a| a.trim().is_empty()) {
            return Err(AnswerSheetError::Unanswered { index });
        }
        Ok(self.answers.clone())
    }
}
