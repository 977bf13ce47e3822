use std::sync::Arc;

use tracing::{info, warn};

use conceptly_core::model::{AwardedBadge, Badge, TutorMode, UserProfile};

use crate::api::ConceptlyApi;
use crate::error::ApiError;

/// Badges the dashboard shows.
pub const RECENT_BADGES: usize = 6;

/// Badges and tutor personality of the signed-in learner.
#[derive(Clone)]
pub struct GamificationService {
    api: Arc<dyn ConceptlyApi>,
}

impl GamificationService {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>) -> Self {
        Self { api }
    }

    /// The most recent `limit` badges.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn recent_badges(&self, limit: usize) -> Result<Vec<Badge>, ApiError> {
        let mut badges = self.api.badges().await?;
        badges.truncate(limit);
        Ok(badges)
    }

    /// Let the backend grant badges that became due, e.g. after a completed
    /// session. A failed check only loses the announcement, so it is logged
    /// and reported as nothing new.
    pub async fn award_due_badges(&self) -> Vec<AwardedBadge> {
        match self.api.check_badges().await {
            Ok(awarded) => {
                if !awarded.is_empty() {
                    info!(
                        badges = ?awarded.iter().map(|badge| badge.name.as_str()).collect::<Vec<_>>(),
                        "badges awarded"
                    );
                }
                awarded
            }
            Err(err) => {
                warn!(error = %err, "badge check failed");
                Vec::new()
            }
        }
    }

    /// Switch the tutor personality. Returns the updated profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn set_tutor_mode(&self, mode: TutorMode) -> Result<UserProfile, ApiError> {
        let profile = self.api.set_tutor_mode(mode).await?;
        info!(mode = %mode, "tutor mode updated");
        Ok(profile)
    }
}
