use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use conceptly_core::model::{
    AuthTokens, AwardedBadge, Badge, Checkpoint, CheckpointContent, CheckpointId, Credentials,
    LearningOverview, ProgressStats, QuizQuestion, QuizResult, Registration, Session,
    SessionCompletion, SessionDetails, SessionId, SimplifiedExplanation, TutorMode, UserProfile,
};

use super::wire::{
    BadgeBody, BadgeCheckBody, CheckpointBody, CompletionBody, CompletionStatusBody, ContentBody,
    CreateSessionRequest, ErrorBody, LoginRequest, QuestionsBody, RegisterRequest, SessionBody,
    SessionDetailsBody, SimplifiedBody, SubmitRequest, TokenResponse, TutorModeRequest,
};
use super::{ApiConfig, CompletionStatus, ConceptlyApi};
use crate::error::ApiError;

/// `reqwest`-backed client for the tutoring backend.
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.endpoint(path));
        match self.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|err| {
            warn!(path, error = %err, "request did not complete");
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(path, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        warn!(path, status = status.as_u16(), detail = ?detail, "request rejected");
        Err(ApiError::rejected(status.as_u16(), detail))
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(path, error = %err, "response did not match the contract");
            ApiError::from(err)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(path, self.request(Method::GET, path)).await?;
        Self::decode(path, response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path).json(body);
        let response = self.execute(path, builder).await?;
        Self::decode(path, response).await
    }
}

#[async_trait]
impl ConceptlyApi for HttpApi {
    fn set_access_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthTokens, ApiError> {
        let body: TokenResponse = self
            .post(
                "auth/login",
                &LoginRequest {
                    email: credentials.email(),
                    password: credentials.password(),
                },
            )
            .await?;
        Ok(body.into())
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let credentials = registration.credentials();
        let _: serde_json::Value = self
            .post(
                "auth/register",
                &RegisterRequest {
                    name: registration.name(),
                    email: credentials.email(),
                    password: credentials.password(),
                },
            )
            .await?;
        Ok(())
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("gamification/profile").await
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let bodies: Vec<SessionBody> = self.get("sessions/").await?;
        Ok(bodies.into_iter().map(Session::from).collect())
    }

    async fn create_session(
        &self,
        topic: &str,
        user_notes: Option<&str>,
    ) -> Result<Session, ApiError> {
        let body: SessionBody = self
            .post("sessions/", &CreateSessionRequest { topic, user_notes })
            .await?;
        Ok(body.into())
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Session, ApiError> {
        let body: SessionBody = self.get(&format!("sessions/{session_id}")).await?;
        Ok(body.into())
    }

    async fn list_checkpoints(&self, session_id: SessionId) -> Result<Vec<Checkpoint>, ApiError> {
        let bodies: Vec<CheckpointBody> = self
            .get(&format!("sessions/{session_id}/checkpoints"))
            .await?;
        Ok(bodies
            .into_iter()
            .map(|body| body.into_checkpoint(session_id))
            .collect())
    }

    async fn generate_checkpoints(&self, session_id: SessionId) -> Result<(), ApiError> {
        let path = format!("sessions/{session_id}/checkpoints");
        self.execute(&path, self.request(Method::POST, &path))
            .await?;
        Ok(())
    }

    async fn checkpoint_content(
        &self,
        session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<CheckpointContent, ApiError> {
        let body: ContentBody = self
            .get(&format!(
                "sessions/{session_id}/checkpoints/{checkpoint_id}/content"
            ))
            .await?;
        Ok(body.into_content(checkpoint_id))
    }

    async fn checkpoint_questions(
        &self,
        session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<Vec<QuizQuestion>, ApiError> {
        let body: QuestionsBody = self
            .get(&format!(
                "sessions/{session_id}/checkpoints/{checkpoint_id}/questions"
            ))
            .await?;
        Ok(body.questions)
    }

    async fn submit_answers(
        &self,
        checkpoint_id: CheckpointId,
        answers: &[String],
    ) -> Result<QuizResult, ApiError> {
        self.post(
            &format!("checkpoints/{checkpoint_id}/submit"),
            &SubmitRequest { answers },
        )
        .await
    }

    async fn simplified_explanation(
        &self,
        checkpoint_id: CheckpointId,
        attempt: u32,
    ) -> Result<SimplifiedExplanation, ApiError> {
        let body: SimplifiedBody = self
            .get(&format!("checkpoints/{checkpoint_id}/feynman?attempt={attempt}"))
            .await?;
        Ok(body.into_explanation(checkpoint_id, attempt))
    }

    async fn complete_session(
        &self,
        session_id: SessionId,
    ) -> Result<SessionCompletion, ApiError> {
        let path = format!("sessions/{session_id}/complete");
        let response = self
            .execute(&path, self.request(Method::POST, &path))
            .await?;
        let body: CompletionBody = Self::decode(&path, response).await?;
        Ok(body.into())
    }

    async fn completion_status(
        &self,
        session_id: SessionId,
    ) -> Result<CompletionStatus, ApiError> {
        let body: CompletionStatusBody = self
            .get(&format!("sessions/{session_id}/can-complete"))
            .await?;
        Ok(body.into())
    }

    async fn history(&self) -> Result<Vec<Session>, ApiError> {
        let bodies: Vec<SessionBody> = self.get("analytics/history").await?;
        Ok(bodies.into_iter().map(Session::from).collect())
    }

    async fn learning_overview(&self) -> Result<LearningOverview, ApiError> {
        self.get("analytics/").await
    }

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError> {
        self.get("analytics/progress").await
    }

    async fn session_details(&self, session_id: SessionId) -> Result<SessionDetails, ApiError> {
        let body: SessionDetailsBody = self
            .get(&format!("analytics/sessions/{session_id}/details"))
            .await?;
        body.into_details().map_err(|error| {
            warn!(%session_id, error = %error, "session details unavailable");
            ApiError::rejected(404, Some(error))
        })
    }

    async fn badges(&self) -> Result<Vec<Badge>, ApiError> {
        let bodies: Vec<BadgeBody> = self.get("gamification/badges").await?;
        Ok(bodies.into_iter().map(Badge::from).collect())
    }

    async fn check_badges(&self) -> Result<Vec<AwardedBadge>, ApiError> {
        let path = "gamification/badges/check";
        let response = self
            .execute(path, self.request(Method::POST, path))
            .await?;
        let body: BadgeCheckBody = Self::decode(path, response).await?;
        Ok(body.newly_awarded)
    }

    async fn set_tutor_mode(&self, mode: TutorMode) -> Result<UserProfile, ApiError> {
        self.patch(
            "gamification/tutor-mode",
            &TutorModeRequest {
                tutor_mode: mode.as_str(),
            },
        )
        .await
    }
}
