use crate::model::CheckpointId;

/// Explanation text fetched for one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointContent {
    checkpoint_id: CheckpointId,
    explanation: String,
}

impl CheckpointContent {
    #[must_use]
    pub fn new(checkpoint_id: CheckpointId, explanation: impl Into<String>) -> Self {
        Self {
            checkpoint_id,
            explanation: explanation.into(),
        }
    }

    #[must_use]
    pub fn checkpoint_id(&self) -> CheckpointId {
        self.checkpoint_id
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Simplified ("explain it like I'm new") take on a checkpoint after a failed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifiedExplanation {
    pub checkpoint_id: CheckpointId,
    pub attempt: u32,
    pub explanation: String,
    pub weak_areas: Vec<String>,
}
