use std::sync::Arc;

use tracing::info;

use conceptly_core::model::{Session, validate_topic};

use crate::api::ConceptlyApi;
use crate::error::SessionError;

/// Number of sessions the dashboard lists.
pub const RECENT_SESSIONS: usize = 5;

/// Listing and creation of learning sessions for the dashboard.
#[derive(Clone)]
pub struct SessionsService {
    api: Arc<dyn ConceptlyApi>,
}

impl SessionsService {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>) -> Self {
        Self { api }
    }

    /// All sessions of the signed-in user, in backend order (newest first).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the request fails.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.api.list_sessions().await?)
    }

    /// The most recent `limit` sessions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the request fails.
    pub async fn recent_sessions(&self, limit: usize) -> Result<Vec<Session>, SessionError> {
        let mut sessions = self.list_sessions().await?;
        sessions.truncate(limit);
        Ok(sessions)
    }

    /// Start a session on `topic`. Blank topics are rejected before any request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Topic` for invalid topics and `SessionError::Api`
    /// if the request fails.
    pub async fn create_session(
        &self,
        topic: &str,
        user_notes: Option<&str>,
    ) -> Result<Session, SessionError> {
        let topic = validate_topic(topic)?;
        let notes = user_notes.map(str::trim).filter(|notes| !notes.is_empty());
        let session = self.api.create_session(&topic, notes).await?;
        info!(session_id = %session.id(), topic = %topic, "session created");
        Ok(session)
    }
}
