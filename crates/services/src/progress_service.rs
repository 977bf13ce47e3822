use std::sync::Arc;

use tracing::{debug, warn};

use conceptly_core::model::{Badge, LearningOverview, ProgressStats, Session, SessionDetails, SessionId};

use crate::api::ConceptlyApi;
use crate::error::ApiError;

/// Everything the analytics page shows, fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub overview: LearningOverview,
    pub progress: ProgressStats,
    pub badges: Vec<Badge>,
}

/// Read-only views over the learner's past work: history and analytics.
#[derive(Clone)]
pub struct ProgressService {
    api: Arc<dyn ConceptlyApi>,
}

impl ProgressService {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>) -> Self {
        Self { api }
    }

    /// Every session of the learner, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn history(&self) -> Result<Vec<Session>, ApiError> {
        let sessions = self.api.history().await?;
        debug!(sessions = sessions.len(), "history loaded");
        Ok(sessions)
    }

    /// Overview, progress counters and badges, requested concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `ApiError` among the three requests.
    pub async fn report(&self) -> Result<AnalyticsReport, ApiError> {
        let (overview, progress, badges) = tokio::join!(
            self.api.learning_overview(),
            self.api.progress_stats(),
            self.api.badges()
        );
        let report = AnalyticsReport {
            overview: overview?,
            progress: progress?,
            badges: badges?,
        };
        debug!(
            sessions = report.progress.total_sessions,
            badges = report.badges.len(),
            "analytics loaded"
        );
        Ok(report)
    }

    /// Per-checkpoint attempts for one past session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the session is unknown.
    pub async fn session_details(&self, session_id: SessionId) -> Result<SessionDetails, ApiError> {
        self.api.session_details(session_id).await.inspect_err(|err| {
            warn!(%session_id, error = %err, "failed to load session details");
        })
    }
}
