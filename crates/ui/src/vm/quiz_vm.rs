use conceptly_core::model::{PASS_THRESHOLD, QuizQuestion, QuizResult};
use services::{QuizError, QuizNextStep};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub label: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub concept: Option<String>,
}

#[must_use]
pub fn map_questions(questions: &[QuizQuestion]) -> Vec<QuestionVm> {
    let total = questions.len();
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionVm {
            index,
            label: format!("Question {} of {total}", index + 1),
            prompt: question.question.clone(),
            options: question.options.clone(),
            concept: question.tested_concept.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultVm {
    pub passed: bool,
    pub headline: &'static str,
    pub score_label: String,
    pub xp_label: Option<String>,
    pub weak_areas: Vec<String>,
    pub offer_simplified: bool,
}

#[must_use]
pub fn map_quiz_result(result: &QuizResult, next: QuizNextStep) -> QuizResultVm {
    QuizResultVm {
        passed: result.passed,
        headline: if result.passed {
            "Checkpoint passed!"
        } else {
            "Not quite yet"
        },
        score_label: format!(
            "{}% ({} of {} correct)",
            result.percent(),
            result.correct_count,
            result.total_questions
        ),
        xp_label: (result.xp_earned > 0).then(|| format!("+{} XP", result.xp_earned)),
        weak_areas: result.weak_areas.clone(),
        offer_simplified: next == QuizNextStep::OfferSimplifiedExplanation,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn pass_threshold_label() -> String {
    format!("You need {}% to pass.", (PASS_THRESHOLD * 100.0).round() as u32)
}

/// Text shown above the submit button when loading or submitting fails.
#[must_use]
pub fn quiz_error_message(err: &QuizError) -> &'static str {
    match err {
        QuizError::NoQuestions => "This checkpoint has no quiz yet.",
        QuizError::Answers(_) => "Please answer every question before submitting.",
        _ => "Failed to submit answers. Please try again.",
    }
}
