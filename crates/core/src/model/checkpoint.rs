use serde::{Deserialize, Serialize};

use crate::model::{CheckpointId, SessionId};

/// Progress status of a single checkpoint.
///
/// Anything other than `completed` on the wire counts as pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckpointStatus {
    Pending,
    Completed,
}

impl From<String> for CheckpointStatus {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("completed") {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

impl From<CheckpointStatus> for String {
    fn from(status: CheckpointStatus) -> Self {
        match status {
            CheckpointStatus::Pending => "pending".to_string(),
            CheckpointStatus::Completed => "completed".to_string(),
        }
    }
}

/// One unit of learning content within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    id: CheckpointId,
    session_id: SessionId,
    index: u32,
    topic: String,
    objectives: Vec<String>,
    status: CheckpointStatus,
    understanding_score: Option<f64>,
    attempts: u32,
    xp_earned: u32,
}

impl Checkpoint {
    #[must_use]
    pub fn new(
        id: CheckpointId,
        session_id: SessionId,
        index: u32,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id,
            session_id,
            index,
            topic: topic.into(),
            objectives: Vec::new(),
            status: CheckpointStatus::Pending,
            understanding_score: None,
            attempts: 0,
            xp_earned: 0,
        }
    }

    #[must_use]
    pub fn with_objectives(mut self, objectives: Vec<String>) -> Self {
        self.objectives = objectives;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CheckpointStatus) -> Self {
        self.status = status;
        self
    }

    /// Scores outside `0.0..=1.0` are clamped; NaN is dropped.
    #[must_use]
    pub fn with_understanding_score(mut self, score: Option<f64>) -> Self {
        self.understanding_score = score
            .filter(|value| !value.is_nan())
            .map(|value| value.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_xp_earned(mut self, xp_earned: u32) -> Self {
        self.xp_earned = xp_earned;
        self
    }

    #[must_use]
    pub fn id(&self) -> CheckpointId {
        self.id
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    #[must_use]
    pub fn status(&self) -> CheckpointStatus {
        self.status
    }

    #[must_use]
    pub fn understanding_score(&self) -> Option<f64> {
        self.understanding_score
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == CheckpointStatus::Completed
    }
}

/// Ordered checkpoints of one session with the sequential-unlock rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningPath {
    checkpoints: Vec<Checkpoint>,
}

impl LearningPath {
    /// Builds a path ordered by checkpoint index.
    #[must_use]
    pub fn new(mut checkpoints: Vec<Checkpoint>) -> Self {
        checkpoints.sort_by_key(Checkpoint::index);
        Self { checkpoints }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    #[must_use]
    pub fn get(&self, id: CheckpointId) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| cp.id() == id)
    }

    #[must_use]
    pub fn position(&self, id: CheckpointId) -> Option<usize> {
        self.checkpoints.iter().position(|cp| cp.id() == id)
    }

    /// A checkpoint is unlocked when it is first or its predecessor is completed.
    /// Unknown ids are never unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: CheckpointId) -> bool {
        self.position(id).is_some_and(|pos| self.is_unlocked_at(pos))
    }

    #[must_use]
    pub fn is_unlocked_at(&self, position: usize) -> bool {
        match position {
            0 => !self.checkpoints.is_empty(),
            n if n < self.checkpoints.len() => self.checkpoints[n - 1].is_completed(),
            _ => false,
        }
    }

    /// First pending checkpoint, or the first checkpoint when none is pending.
    #[must_use]
    pub fn first_focus(&self) -> Option<&Checkpoint> {
        self.checkpoints
            .iter()
            .find(|cp| !cp.is_completed())
            .or_else(|| self.checkpoints.first())
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.checkpoints.iter().filter(|cp| cp.is_completed()).count()
    }

    /// True only for a non-empty path whose checkpoints are all completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.checkpoints.is_empty() && self.checkpoints.iter().all(Checkpoint::is_completed)
    }

    /// Completed share in percent, 0 for an empty path.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.checkpoints.is_empty() {
            return 0;
        }
        let pct = self.completed_count() * 100 / self.checkpoints.len();
        u8::try_from(pct).unwrap_or(100)
    }
}
