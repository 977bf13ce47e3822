use conceptly_core::model::{Session, SessionStatus, TopicError, UserProfile};
use services::SessionError;

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileVm {
    pub greeting: String,
    pub level_label: String,
    pub xp_label: String,
    pub level_progress: u32,
}

#[must_use]
pub fn map_profile(profile: &UserProfile) -> ProfileVm {
    let first_name = profile
        .name
        .split_whitespace()
        .next()
        .unwrap_or("there");
    ProfileVm {
        greeting: format!("Welcome back, {first_name}"),
        level_label: format!("Level {}", profile.level),
        xp_label: format!("{} / {} XP", profile.xp, profile.xp_for_next_level()),
        level_progress: profile.level_progress_percent(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCardVm {
    pub id: u64,
    pub topic: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub created_at_str: String,
    pub xp_label: Option<String>,
}

impl From<&Session> for SessionCardVm {
    fn from(session: &Session) -> Self {
        let status_class = match session.status() {
            SessionStatus::Pending => "status status--pending",
            SessionStatus::InProgress => "status status--active",
            SessionStatus::Completed => "status status--done",
        };
        let xp_label = (session.xp_earned() > 0).then(|| format!("+{} XP", session.xp_earned()));
        Self {
            id: session.id().value(),
            topic: session.topic().to_string(),
            status_label: session.status().label(),
            status_class,
            created_at_str: format_date(session.created_at()),
            xp_label,
        }
    }
}

#[must_use]
pub fn map_session_cards(sessions: &[Session]) -> Vec<SessionCardVm> {
    sessions.iter().map(SessionCardVm::from).collect()
}

/// Text shown under the new-session form.
#[must_use]
pub fn create_session_error_message(err: &SessionError) -> String {
    match err {
        SessionError::Topic(TopicError::Empty) => "Please enter a topic to learn.".to_string(),
        SessionError::Topic(err) => format!("Please shorten the topic: {err}."),
        _ => "Failed to create session. Please try again.".to_string(),
    }
}
