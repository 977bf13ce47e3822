//! Request and response bodies exchanged with the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use conceptly_core::model::{
    AuthTokens, AwardedBadge, Badge, Checkpoint, CheckpointAttempts, CheckpointContent,
    CheckpointId, CheckpointStatus, QuizQuestion, Session, SessionCompletion, SessionDetails,
    SessionId, SessionStatus, SimplifiedExplanation,
};

use super::CompletionStatus;

/// Accepts RFC 3339 and offset-less ISO timestamps; the latter are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc()))
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}"))),
        None => Ok(None),
    }
}

#[derive(Serialize)]
pub(super) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(super) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl From<TokenResponse> for AuthTokens {
    fn from(body: TokenResponse) -> Self {
        Self::new(body.access_token, body.refresh_token)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateSessionRequest<'a> {
    pub topic: &'a str,
    pub user_notes: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionBody {
    id: u64,
    topic: String,
    #[serde(default)]
    status: Option<SessionStatus>,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    xp_earned: Option<u32>,
}

impl From<SessionBody> for Session {
    fn from(body: SessionBody) -> Self {
        Session::new(
            SessionId::new(body.id),
            body.topic,
            body.status.unwrap_or(SessionStatus::InProgress),
            body.created_at,
        )
        .with_completed_at(body.completed_at)
        .with_xp_earned(body.xp_earned.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckpointBody {
    id: u64,
    #[serde(default)]
    session_id: Option<u64>,
    checkpoint_index: u32,
    topic: String,
    #[serde(default)]
    objectives: Vec<Value>,
    #[serde(default)]
    status: Option<CheckpointStatus>,
    #[serde(default)]
    understanding_score: Option<f64>,
    #[serde(default)]
    attempts: Option<u32>,
    #[serde(default)]
    xp_earned: Option<u32>,
}

impl CheckpointBody {
    pub(super) fn into_checkpoint(self, session_id: SessionId) -> Checkpoint {
        let objectives = self
            .objectives
            .into_iter()
            .map(|value| match value {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect();
        Checkpoint::new(
            CheckpointId::new(self.id),
            session_id,
            self.checkpoint_index,
            self.topic,
        )
        .with_objectives(objectives)
        .with_status(self.status.unwrap_or(CheckpointStatus::Pending))
        .with_understanding_score(self.understanding_score)
        .with_attempts(self.attempts.unwrap_or(0))
        .with_xp_earned(self.xp_earned.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentBody {
    explanation: String,
}

impl ContentBody {
    pub(super) fn into_content(self, checkpoint_id: CheckpointId) -> CheckpointContent {
        CheckpointContent::new(checkpoint_id, self.explanation)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct QuestionsBody {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitRequest<'a> {
    pub answers: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(super) struct SimplifiedBody {
    explanation: String,
    #[serde(default)]
    weak_areas: Vec<String>,
}

impl SimplifiedBody {
    pub(super) fn into_explanation(
        self,
        checkpoint_id: CheckpointId,
        attempt: u32,
    ) -> SimplifiedExplanation {
        SimplifiedExplanation {
            checkpoint_id,
            attempt,
            explanation: self.explanation,
            weak_areas: self.weak_areas,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    total_xp_earned: u32,
    #[serde(default)]
    level_up: bool,
    #[serde(default)]
    new_level: u32,
}

impl From<CompletionBody> for SessionCompletion {
    fn from(body: CompletionBody) -> Self {
        Self {
            message: body.message,
            total_xp_earned: body.total_xp_earned,
            level_up: body.level_up,
            new_level: body.new_level,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionStatusBody {
    can_complete: bool,
    #[serde(default)]
    completed_count: u32,
    #[serde(default)]
    total_count: u32,
}

impl From<CompletionStatusBody> for CompletionStatus {
    fn from(body: CompletionStatusBody) -> Self {
        Self {
            can_complete: body.can_complete,
            completed_count: body.completed_count,
            total_count: body.total_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckpointAttemptsBody {
    checkpoint: CheckpointBody,
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    scores: Vec<f64>,
}

/// The details endpoint answers a missing session with `{"error": ...}` and a 200.
#[derive(Debug, Deserialize)]
pub(super) struct SessionDetailsBody {
    #[serde(default)]
    session: Option<SessionBody>,
    #[serde(default)]
    checkpoints: Vec<CheckpointAttemptsBody>,
    #[serde(default)]
    error: Option<String>,
}

impl SessionDetailsBody {
    pub(super) fn into_details(self) -> Result<SessionDetails, String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let session = Session::from(self.session.ok_or("Session not found")?);
        let session_id = session.id();
        let mut checkpoints: Vec<CheckpointAttempts> = self
            .checkpoints
            .into_iter()
            .map(|entry| {
                let owner = entry.checkpoint.session_id.map_or(session_id, SessionId::new);
                CheckpointAttempts {
                    checkpoint: entry.checkpoint.into_checkpoint(owner),
                    attempts: entry.attempts,
                    scores: entry.scores,
                }
            })
            .collect();
        checkpoints.sort_by_key(|entry| entry.checkpoint.index());
        Ok(SessionDetails {
            session,
            checkpoints,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BadgeBody {
    id: u64,
    badge_name: String,
    #[serde(default)]
    badge_type: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "timestamp")]
    earned_at: DateTime<Utc>,
}

impl From<BadgeBody> for Badge {
    fn from(body: BadgeBody) -> Self {
        Self {
            id: body.id,
            name: body.badge_name,
            kind: body.badge_type,
            description: body.description,
            earned_at: body.earned_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BadgeCheckBody {
    #[serde(default)]
    pub newly_awarded: Vec<AwardedBadge>,
}

#[derive(Debug, Serialize)]
pub(super) struct TutorModeRequest<'a> {
    pub tutor_mode: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    detail: Value,
}

impl ErrorBody {
    /// `detail` is a string for handled errors and a list of objects for
    /// request validation failures.
    pub(super) fn into_detail(self) -> Option<String> {
        match self.detail {
            Value::String(text) if !text.trim().is_empty() => Some(text),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string),
            _ => None,
        }
    }
}
