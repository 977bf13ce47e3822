use std::sync::Arc;

use tracing::debug;

use conceptly_core::format::{Block, extract_mnemonics, format};
use conceptly_core::model::{CheckpointId, SimplifiedExplanation};

use crate::api::ConceptlyApi;
use crate::error::ApiError;

/// Entry point for simplified explanations after a failed quiz.
#[derive(Clone)]
pub struct ExplanationService {
    api: Arc<dyn ConceptlyApi>,
}

impl ExplanationService {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn flow(&self, checkpoint_id: CheckpointId) -> SimplifiedExplanationFlow {
        SimplifiedExplanationFlow {
            api: Arc::clone(&self.api),
            checkpoint_id,
            attempt: 0,
            current: None,
        }
    }
}

/// Successive simplified takes on one checkpoint. Attempts start at 0.
pub struct SimplifiedExplanationFlow {
    api: Arc<dyn ConceptlyApi>,
    checkpoint_id: CheckpointId,
    attempt: u32,
    current: Option<SimplifiedExplanation>,
}

impl SimplifiedExplanationFlow {
    /// Fetch the explanation for the current attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails; the previous explanation is kept.
    pub async fn load(&mut self) -> Result<&SimplifiedExplanation, ApiError> {
        self.fetch(self.attempt).await
    }

    /// Ask for a different explanation. The attempt only advances on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn different_approach(&mut self) -> Result<&SimplifiedExplanation, ApiError> {
        self.fetch(self.attempt.saturating_add(1)).await
    }

    async fn fetch(&mut self, attempt: u32) -> Result<&SimplifiedExplanation, ApiError> {
        debug!(checkpoint_id = %self.checkpoint_id, attempt, "fetching simplified explanation");
        let explanation = self
            .api
            .simplified_explanation(self.checkpoint_id, attempt)
            .await?;
        self.attempt = attempt;
        Ok(self.current.insert(explanation))
    }

    #[must_use]
    pub fn checkpoint_id(&self) -> CheckpointId {
        self.checkpoint_id
    }

    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn current(&self) -> Option<&SimplifiedExplanation> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn blocks(&self) -> Vec<Block> {
        self.current
            .as_ref()
            .map(|current| format(&current.explanation))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn mnemonics(&self) -> Vec<String> {
        self.current
            .as_ref()
            .map(|current| extract_mnemonics(&current.explanation))
            .unwrap_or_default()
    }
}
