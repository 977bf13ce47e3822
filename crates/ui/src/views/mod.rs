mod analytics;
mod auth;
mod content;
mod dashboard;
mod explanation;
mod history;
mod quiz;
mod session;
mod start;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analytics::AnalyticsView;
pub use auth::{LoginView, RegisterView};
pub use dashboard::DashboardView;
pub use explanation::ExplanationView;
pub use history::{HistoryView, SessionDetailsView};
pub use quiz::QuizView;
pub use session::SessionView;
pub use start::StartView;
pub use state::{ViewError, ViewState, view_state_from_resource};
