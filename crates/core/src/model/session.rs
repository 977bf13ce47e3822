use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{LearningPath, SessionId};

/// Upper bound for a session topic, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic is empty")]
    Empty,

    #[error("topic is too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
}

/// Validate a user-entered topic for a new session.
///
/// # Errors
///
/// Returns `TopicError::Empty` for blank input and `TopicError::TooLong` when
/// the trimmed topic exceeds `MAX_TOPIC_CHARS`.
pub fn validate_topic(raw: &str) -> Result<String, TopicError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TopicError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_TOPIC_CHARS {
        return Err(TopicError::TooLong {
            len,
            max: MAX_TOPIC_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Lifecycle status of a learning session, as reported by the backend.
///
/// Unknown values from the wire are read as `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Pending,
    InProgress,
    Completed,
}

impl From<String> for SessionStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }
}

/// Read-only client copy of a learning session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    topic: String,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    xp_earned: u32,
}

impl Session {
    #[must_use]
    pub fn new(
        id: SessionId,
        topic: impl Into<String>,
        status: SessionStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            topic: topic.into(),
            status,
            created_at,
            completed_at: None,
            xp_earned: 0,
        }
    }

    #[must_use]
    pub fn with_completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = completed_at;
        self
    }

    #[must_use]
    pub fn with_xp_earned(mut self, xp_earned: u32) -> Self {
        self.xp_earned = xp_earned;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// True iff the path is non-empty, every checkpoint is completed, and the
    /// session itself has not been completed yet.
    #[must_use]
    pub fn can_complete(&self, path: &LearningPath) -> bool {
        !self.is_completed() && path.all_completed()
    }

    /// Apply a completion the backend has confirmed.
    pub fn mark_completed(&mut self, at: DateTime<Utc>, total_xp: u32) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
        self.xp_earned = total_xp;
    }
}

/// Backend acknowledgement of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompletion {
    pub message: String,
    pub total_xp_earned: u32,
    pub level_up: bool,
    pub new_level: u32,
}

impl SessionCompletion {
    /// Short human-readable summary, e.g. for a toast after navigation.
    #[must_use]
    pub fn summary_line(&self) -> String {
        if self.level_up {
            format!(
                "{} XP earned: {}. Level up! You're now level {}.",
                self.message, self.total_xp_earned, self.new_level
            )
        } else {
            format!("{} XP earned: {}.", self.message, self.total_xp_earned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Checkpoint, CheckpointId, CheckpointStatus};
    use crate::time::fixed_now;

    fn session(status: SessionStatus) -> Session {
        Session::new(SessionId::new(1), "Gravity", status, fixed_now())
    }

    fn path(statuses: &[CheckpointStatus]) -> LearningPath {
        LearningPath::new(
            statuses
                .iter()
                .enumerate()
                .map(|(idx, status)| {
                    Checkpoint::new(
                        CheckpointId::new(idx as u64 + 10),
                        SessionId::new(1),
                        idx as u32,
                        format!("Step {idx}"),
                    )
                    .with_status(*status)
                })
                .collect(),
        )
    }

    #[test]
    fn completion_requires_every_checkpoint_completed() {
        let s = session(SessionStatus::InProgress);
        assert!(s.can_complete(&path(&[CheckpointStatus::Completed, CheckpointStatus::Completed])));
        assert!(!s.can_complete(&path(&[CheckpointStatus::Completed, CheckpointStatus::Pending])));
    }

    #[test]
    fn completion_is_false_for_empty_path() {
        let s = session(SessionStatus::InProgress);
        assert!(!s.can_complete(&LearningPath::default()));
    }

    #[test]
    fn completion_is_false_for_completed_session() {
        let s = session(SessionStatus::Completed);
        assert!(!s.can_complete(&path(&[CheckpointStatus::Completed])));
    }

    #[test]
    fn mark_completed_updates_status_and_xp() {
        let mut s = session(SessionStatus::InProgress);
        s.mark_completed(fixed_now(), 26);
        assert!(s.is_completed());
        assert_eq!(s.completed_at(), Some(fixed_now()));
        assert_eq!(s.xp_earned(), 26);
    }

    #[test]
    fn topic_validation_trims_and_rejects_blank() {
        assert_eq!(validate_topic("  Photosynthesis ").unwrap(), "Photosynthesis");
        assert_eq!(validate_topic("   "), Err(TopicError::Empty));
        let long = "x".repeat(MAX_TOPIC_CHARS + 1);
        assert!(matches!(
            validate_topic(&long),
            Err(TopicError::TooLong { .. })
        ));
    }

    #[test]
    fn unknown_status_falls_back_to_pending() {
        let status: SessionStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, SessionStatus::Pending);
        let status: SessionStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, SessionStatus::InProgress);
    }

    #[test]
    fn completion_summary_mentions_level_up() {
        let completion = SessionCompletion {
            message: "Session completed!".into(),
            total_xp_earned: 26,
            level_up: true,
            new_level: 3,
        };
        assert!(completion.summary_line().contains("level 3"));
    }
}
