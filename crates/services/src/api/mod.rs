//! Typed contract of the tutoring backend.

mod config;
mod http;
mod wire;

use async_trait::async_trait;

use conceptly_core::model::{
    AuthTokens, AwardedBadge, Badge, Checkpoint, CheckpointContent, CheckpointId, Credentials,
    LearningOverview, ProgressStats, QuizQuestion, QuizResult, Registration, Session,
    SessionCompletion, SessionDetails, SessionId, SimplifiedExplanation, TutorMode, UserProfile,
};

use crate::error::ApiError;

pub use config::ApiConfig;
pub use http::HttpApi;

/// Server-side view of whether a session may be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStatus {
    pub can_complete: bool,
    pub completed_count: u32,
    pub total_count: u32,
}

/// Every backend call the client makes.
///
/// Implementations attach the installed access token to each request.
#[async_trait]
pub trait ConceptlyApi: Send + Sync {
    /// Install or remove the bearer token sent with subsequent requests.
    fn set_access_token(&self, token: Option<String>);

    async fn login(&self, credentials: &Credentials) -> Result<AuthTokens, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    async fn profile(&self) -> Result<UserProfile, ApiError>;

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError>;

    async fn create_session(
        &self,
        topic: &str,
        user_notes: Option<&str>,
    ) -> Result<Session, ApiError>;

    async fn get_session(&self, session_id: SessionId) -> Result<Session, ApiError>;

    async fn list_checkpoints(&self, session_id: SessionId) -> Result<Vec<Checkpoint>, ApiError>;

    /// Ask the backend to build the learning path. The response body is ignored.
    async fn generate_checkpoints(&self, session_id: SessionId) -> Result<(), ApiError>;

    async fn checkpoint_content(
        &self,
        session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<CheckpointContent, ApiError>;

    async fn checkpoint_questions(
        &self,
        session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<Vec<QuizQuestion>, ApiError>;

    async fn submit_answers(
        &self,
        checkpoint_id: CheckpointId,
        answers: &[String],
    ) -> Result<QuizResult, ApiError>;

    async fn simplified_explanation(
        &self,
        checkpoint_id: CheckpointId,
        attempt: u32,
    ) -> Result<SimplifiedExplanation, ApiError>;

    async fn complete_session(&self, session_id: SessionId)
    -> Result<SessionCompletion, ApiError>;

    async fn completion_status(&self, session_id: SessionId)
    -> Result<CompletionStatus, ApiError>;

    /// Every session of the learner, newest first.
    async fn history(&self) -> Result<Vec<Session>, ApiError>;

    async fn learning_overview(&self) -> Result<LearningOverview, ApiError>;

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError>;

    async fn session_details(&self, session_id: SessionId) -> Result<SessionDetails, ApiError>;

    /// Earned badges, most recent first.
    async fn badges(&self) -> Result<Vec<Badge>, ApiError>;

    /// Ask the backend to award any badges now due. Returns only the new ones.
    async fn check_badges(&self) -> Result<Vec<AwardedBadge>, ApiError>;

    async fn set_tutor_mode(&self, mode: TutorMode) -> Result<UserProfile, ApiError>;
}
