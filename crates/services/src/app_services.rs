use std::sync::Arc;

use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::api::{ApiConfig, ConceptlyApi, HttpApi};
use crate::auth_service::AuthService;
use crate::controller::SessionController;
use crate::error::AppServicesError;
use crate::explanation_service::ExplanationService;
use crate::gamification_service::GamificationService;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::sessions_service::SessionsService;

/// Assembles app-facing services around one shared API client.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    api: Arc<dyn ConceptlyApi>,
    auth: Arc<AuthService>,
    sessions: Arc<SessionsService>,
    quiz: Arc<QuizService>,
    explanations: Arc<ExplanationService>,
    progress: Arc<ProgressService>,
    gamification: Arc<GamificationService>,
}

impl AppServices {
    /// Build services talking to the backend over HTTP, with tokens kept in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!(api = %config.base_url, "using backend");
        let api: Arc<dyn ConceptlyApi> = Arc::new(HttpApi::new(config)?);
        Ok(Self::from_parts(clock, api, &storage))
    }

    /// Build services from an existing client and storage.
    #[must_use]
    pub fn from_parts(clock: Clock, api: Arc<dyn ConceptlyApi>, storage: &Storage) -> Self {
        let auth = Arc::new(AuthService::new(
            clock,
            Arc::clone(&api),
            Arc::clone(&storage.tokens),
        ));
        let sessions = Arc::new(SessionsService::new(Arc::clone(&api)));
        let quiz = Arc::new(QuizService::new(Arc::clone(&api)));
        let explanations = Arc::new(ExplanationService::new(Arc::clone(&api)));
        let progress = Arc::new(ProgressService::new(Arc::clone(&api)));
        let gamification = Arc::new(GamificationService::new(Arc::clone(&api)));
        Self {
            clock,
            api,
            auth,
            sessions,
            quiz,
            explanations,
            progress,
            gamification,
        }
    }

    /// Fresh controller for one visit of the session view.
    #[must_use]
    pub fn session_controller(&self) -> SessionController {
        SessionController::new(Arc::clone(&self.api), self.clock)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionsService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn explanations(&self) -> Arc<ExplanationService> {
        Arc::clone(&self.explanations)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn gamification(&self) -> Arc<GamificationService> {
        Arc::clone(&self.gamification)
    }
}
