use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Checkpoint, Session};

/// Tutor personality the backend writes explanations in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TutorMode {
    ChillFriend,
    StrictMentor,
    SupportiveBuddy,
    ExamMode,
}

impl TutorMode {
    pub const ALL: [Self; 4] = [
        Self::ChillFriend,
        Self::StrictMentor,
        Self::SupportiveBuddy,
        Self::ExamMode,
    ];

    /// Mode assumed when the profile carries none.
    pub const DEFAULT: Self = Self::SupportiveBuddy;

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChillFriend => "chill_friend",
            Self::StrictMentor => "strict_mentor",
            Self::SupportiveBuddy => "supportive_buddy",
            Self::ExamMode => "exam_mode",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ChillFriend => "Chill Friend",
            Self::StrictMentor => "Strict Mentor",
            Self::SupportiveBuddy => "Supportive Buddy",
            Self::ExamMode => "Exam Mode",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ChillFriend => "Casual and fun",
            Self::StrictMentor => "Thorough and precise",
            Self::SupportiveBuddy => "Encouraging and positive",
            Self::ExamMode => "Focused on assessments",
        }
    }
}

impl fmt::Display for TutorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown tutor mode {0:?}")]
pub struct ParseTutorModeError(pub String);

impl FromStr for TutorMode {
    type Err = ParseTutorModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw.trim())
            .ok_or_else(|| ParseTutorModeError(raw.to_string()))
    }
}

/// Lifetime counters from the analytics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningOverview {
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub total_checkpoints: u32,
    pub avg_score: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Aggregated progress across every session of the learner.
///
/// `avg_score` is a fraction in `0.0..=1.0`, `completion_rate` a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressStats {
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub total_checkpoints: u32,
    pub completed_checkpoints: u32,
    pub avg_score: f64,
    pub completion_rate: f64,
}

fn rounded_percent(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        // clamped to 0..=100 before the cast
        value.min(100.0).round() as u32
    } else {
        0
    }
}

impl ProgressStats {
    #[must_use]
    pub fn avg_score_percent(&self) -> u32 {
        rounded_percent(self.avg_score * 100.0)
    }

    #[must_use]
    pub fn completion_percent(&self) -> u32 {
        rounded_percent(self.completion_rate)
    }

    #[must_use]
    pub fn in_progress_sessions(&self) -> u32 {
        self.total_sessions.saturating_sub(self.completed_sessions)
    }
}

/// One checkpoint with its quiz attempt history.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointAttempts {
    pub checkpoint: Checkpoint,
    pub attempts: u32,
    pub scores: Vec<f64>,
}

impl CheckpointAttempts {
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.scores.iter().copied().reduce(f64::max)
    }
}

/// A past session with per-checkpoint attempts, for the history drill-down.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetails {
    pub session: Session,
    pub checkpoints: Vec<CheckpointAttempts>,
}

impl SessionDetails {
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.checkpoints.iter().map(|entry| entry.attempts).sum()
    }
}

/// Achievement the learner has earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
}

impl Badge {
    #[must_use]
    pub fn display_name(&self) -> String {
        badge_display_name(&self.name)
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        badge_icon(&self.name)
    }
}

/// Badge granted by the most recent award check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardedBadge {
    #[serde(rename = "badge_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl AwardedBadge {
    #[must_use]
    pub fn display_name(&self) -> String {
        badge_display_name(&self.name)
    }
}

/// `first_topic` -> `First Topic`.
#[must_use]
pub fn badge_display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn badge_icon(name: &str) -> &'static str {
    match name {
        "first_topic" => "🎯",
        "dedicated_learner" => "📚",
        "high_achiever" => "🌟",
        "level_5_master" => "👑",
        _ => "🏆",
    }
}
