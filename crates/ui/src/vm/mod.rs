mod auth_vm;
mod content_vm;
mod dashboard_vm;
mod progress_vm;
mod quiz_vm;
mod session_vm;
mod time_fmt;

pub use auth_vm::auth_error_message;
pub use content_vm::{BlockVm, SpanVm, map_blocks};
pub use dashboard_vm::{
    ProfileVm, SessionCardVm, create_session_error_message, map_profile, map_session_cards,
};
pub use progress_vm::{
    AnalyticsVm, AttemptRowVm, BadgeVm, CompletionSummaryVm, MetricTone, MetricVm,
    SessionDetailsVm, TutorModeOptionVm, map_analytics, map_badges, map_completion,
    map_session_details, tutor_mode_options,
};
pub use quiz_vm::{
    QuestionVm, QuizResultVm, map_questions, map_quiz_result, pass_threshold_label,
    quiz_error_message,
};
pub use session_vm::{
    ActiveCheckpointVm, CheckpointItemVm, CheckpointState, SessionScreenVm, map_active_checkpoint,
    map_checkpoint_items, map_session_screen, progress_label,
};
