use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use conceptly_core::model::UserProfile;
use services::{
    AuthService, ExplanationService, GamificationService, ProgressService, QuizService,
    SessionController, SessionsService,
};

pub trait UiApp: Send + Sync {
    /// Profile restored from a stored token at start-up, if any.
    fn restored_profile(&self) -> Option<UserProfile>;

    fn auth(&self) -> Arc<AuthService>;
    fn sessions(&self) -> Arc<SessionsService>;
    fn quiz(&self) -> Arc<QuizService>;
    fn explanations(&self) -> Arc<ExplanationService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn gamification(&self) -> Arc<GamificationService>;

    /// Fresh controller for one visit of the session view.
    fn session_controller(&self) -> SessionController;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    restored_profile: Option<UserProfile>,
    signed_in_on_launch_once: Arc<AtomicBool>,

    auth: Arc<AuthService>,
    sessions: Arc<SessionsService>,
    quiz: Arc<QuizService>,
    explanations: Arc<ExplanationService>,
    progress: Arc<ProgressService>,
    gamification: Arc<GamificationService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let restored_profile = app.restored_profile();
        let signed_in = restored_profile.is_some();

        Self {
            app: Arc::clone(app),
            restored_profile,
            signed_in_on_launch_once: Arc::new(AtomicBool::new(signed_in)),
            auth: app.auth(),
            sessions: app.sessions(),
            quiz: app.quiz(),
            explanations: app.explanations(),
            progress: app.progress(),
            gamification: app.gamification(),
        }
    }

    /// True once if a stored session was restored at launch.
    #[must_use]
    pub fn take_signed_in_on_launch(&self) -> bool {
        self.signed_in_on_launch_once
            .swap(false, Ordering::AcqRel)
    }

    #[must_use]
    pub fn restored_profile(&self) -> Option<&UserProfile> {
        self.restored_profile.as_ref()
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

    #[must_use]
    pub fn session_controller(&self) -> SessionController {
        self.app.session_controller()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
