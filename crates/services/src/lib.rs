#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod controller;
pub mod error;
pub mod explanation_service;
pub mod gamification_service;
pub mod progress_service;
pub mod quiz_service;
pub mod sessions_service;
pub mod testing;

pub use conceptly_core::Clock;

pub use api::{ApiConfig, CompletionStatus, ConceptlyApi, HttpApi};
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use controller::{
    CompletionOutcome, ContentRequest, ContentResponse, Destination, LoadPhase, RevealProgress,
    RevealTimer, SessionController, ViewMessage,
};
pub use error::{ApiError, AppServicesError, AuthError, ConfigError, QuizError, SessionError};
pub use explanation_service::{ExplanationService, SimplifiedExplanationFlow};
pub use gamification_service::{GamificationService, RECENT_BADGES};
pub use progress_service::{AnalyticsReport, ProgressService};
pub use quiz_service::{QuizNextStep, QuizOutcome, QuizService};
pub use sessions_service::{RECENT_SESSIONS, SessionsService};
