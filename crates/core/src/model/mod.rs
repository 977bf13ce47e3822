mod auth;
mod checkpoint;
mod content;
mod ids;
mod progress;
mod quiz;
mod session;

pub use ids::{CheckpointId, ParseIdError, SessionId};

pub use auth::{AuthTokens, Credentials, CredentialsError, Registration, UserProfile};
pub use checkpoint::{Checkpoint, CheckpointStatus, LearningPath};
pub use content::{CheckpointContent, SimplifiedExplanation};
pub use progress::{
    AwardedBadge, Badge, CheckpointAttempts, LearningOverview, ParseTutorModeError, ProgressStats,
    SessionDetails, TutorMode, badge_display_name, badge_icon,
};
pub use quiz::{AnswerSheet, AnswerSheetError, PASS_THRESHOLD, QuizQuestion, QuizResult};
pub use session::{
    MAX_TOPIC_CHARS, Session, SessionCompletion, SessionStatus, TopicError, validate_topic,
};
