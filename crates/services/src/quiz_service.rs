use std::sync::Arc;

use tracing::info;

use conceptly_core::model::{AnswerSheet, CheckpointId, QuizQuestion, QuizResult, SessionId};

use crate::api::ConceptlyApi;
use crate::error::QuizError;

/// What the quiz screen should offer after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizNextStep {
    ReturnToSession,
    OfferSimplifiedExplanation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub next: QuizNextStep,
}

/// Loads checkpoint quizzes and submits answers.
#[derive(Clone)]
pub struct QuizService {
    api: Arc<dyn ConceptlyApi>,
}

impl QuizService {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz and `QuizError::Api`
    /// if the request fails.
    pub async fn load_questions(
        &self,
        session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<Vec<QuizQuestion>, QuizError> {
        let questions = self
            .api
            .checkpoint_questions(session_id, checkpoint_id)
            .await?;
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(questions)
    }

    /// Submit a fully answered sheet.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Answers` without contacting the backend when a
    /// question is unanswered, and `QuizError::Api` if the request fails.
    pub async fn submit(
        &self,
        checkpoint_id: CheckpointId,
        sheet: &AnswerSheet,
    ) -> Result<QuizOutcome, QuizError> {
        let answers = sheet.complete()?;
        let result = self.api.submit_answers(checkpoint_id, &answers).await?;
        info!(
            %checkpoint_id,
            score = result.score,
            passed = result.passed,
            "quiz submitted"
        );
        let next = if result.passed {
            QuizNextStep::ReturnToSession
        } else {
            QuizNextStep::OfferSimplifiedExplanation
        };
        Ok(QuizOutcome { result, next })
    }
}
