use conceptly_core::model::{AwardedBadge, Badge, CheckpointAttempts, SessionDetails, TutorMode};
use services::{AnalyticsReport, CompletionOutcome};

use crate::vm::SessionCardVm;
use crate::vm::time_fmt::format_date;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricTone {
    Neutral,
    Good,
    Fair,
    Poor,
}

impl MetricTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Neutral => "metric",
            Self::Good => "metric metric--good",
            Self::Fair => "metric metric--fair",
            Self::Poor => "metric metric--poor",
        }
    }

    fn for_percent(value: u32, good: u32, fair: u32) -> Self {
        if value >= good {
            Self::Good
        } else if value >= fair {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricVm {
    pub label: &'static str,
    pub value: String,
    pub tone: MetricTone,
}

impl MetricVm {
    fn count(label: &'static str, value: u32) -> Self {
        Self {
            label,
            value: value.to_string(),
            tone: MetricTone::Neutral,
        }
    }

    fn percent(label: &'static str, value: u32, tone: MetricTone) -> Self {
        Self {
            label,
            value: format!("{value}%"),
            tone,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeVm {
    pub id: u64,
    pub icon: &'static str,
    pub title: String,
    pub description: String,
    pub earned_on: String,
}

impl From<&Badge> for BadgeVm {
    fn from(badge: &Badge) -> Self {
        Self {
            id: badge.id,
            icon: badge.icon(),
            title: badge.display_name(),
            description: badge.description.clone(),
            earned_on: format_date(badge.earned_at),
        }
    }
}

#[must_use]
pub fn map_badges(badges: &[Badge]) -> Vec<BadgeVm> {
    badges.iter().map(BadgeVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsVm {
    pub metrics: Vec<MetricVm>,
    pub streak_label: String,
    pub longest_streak_label: String,
    pub badges_label: String,
    pub badges: Vec<BadgeVm>,
}

fn days(count: u32) -> String {
    if count == 1 {
        "1 day".to_string()
    } else {
        format!("{count} days")
    }
}

#[must_use]
pub fn map_analytics(report: &AnalyticsReport) -> AnalyticsVm {
    let progress = &report.progress;
    let avg = progress.avg_score_percent();
    let completion = progress.completion_percent();
    AnalyticsVm {
        metrics: vec![
            MetricVm::count("Total sessions", progress.total_sessions),
            MetricVm::count("Completed sessions", progress.completed_sessions),
            MetricVm::count("In progress", progress.in_progress_sessions()),
            MetricVm::percent("Avg quiz score", avg, MetricTone::for_percent(avg, 70, 50)),
            MetricVm::count("Total checkpoints", progress.total_checkpoints),
            MetricVm::count("Done checkpoints", progress.completed_checkpoints),
            MetricVm::percent(
                "Completion rate",
                completion,
                MetricTone::for_percent(completion, 70, 40),
            ),
        ],
        streak_label: format!("Current streak: {}", days(report.overview.current_streak)),
        longest_streak_label: format!("Longest streak: {}", days(report.overview.longest_streak)),
        badges_label: format!("Badges earned: {}", report.badges.len()),
        badges: map_badges(&report.badges),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub number: usize,
    pub topic: String,
    pub attempts_label: String,
    pub best_label: Option<String>,
    pub scores_label: Option<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn score_percent(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

impl AttemptRowVm {
    fn new(number: usize, entry: &CheckpointAttempts) -> Self {
        let attempts_label = match entry.attempts {
            0 => "Not attempted".to_string(),
            1 => "1 attempt".to_string(),
            n => format!("{n} attempts"),
        };
        let scores_label = (!entry.scores.is_empty()).then(|| {
            entry
                .scores
                .iter()
                .map(|score| format!("{}%", score_percent(*score)))
                .collect::<Vec<_>>()
                .join(" → ")
        });
        Self {
            number,
            topic: entry.checkpoint.topic().to_string(),
            attempts_label,
            best_label: entry
                .best_score()
                .map(|best| format!("Best {}%", score_percent(best))),
            scores_label,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDetailsVm {
    pub topic: String,
    pub completed: bool,
    pub card: SessionCardVm,
    pub completed_label: Option<String>,
    pub attempts_label: String,
    pub rows: Vec<AttemptRowVm>,
}

#[must_use]
pub fn map_session_details(details: &SessionDetails) -> SessionDetailsVm {
    SessionDetailsVm {
        topic: details.session.topic().to_string(),
        completed: details.session.is_completed(),
        card: SessionCardVm::from(&details.session),
        completed_label: details
            .session
            .completed_at()
            .map(|at| format!("Completed {}", format_date(at))),
        attempts_label: format!("{} quiz attempts in total", details.total_attempts()),
        rows: details
            .checkpoints
            .iter()
            .enumerate()
            .map(|(position, entry)| AttemptRowVm::new(position + 1, entry))
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TutorModeOptionVm {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

#[must_use]
pub fn tutor_mode_options(selected: TutorMode) -> Vec<TutorModeOptionVm> {
    TutorMode::ALL
        .into_iter()
        .map(|mode| TutorModeOptionVm {
            value: mode.as_str(),
            label: format!("{} - {}", mode.label(), mode.description()),
            selected: mode == selected,
        })
        .collect()
}

/// Announcement shown once a session is completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionSummaryVm {
    pub message: String,
    pub xp_label: String,
    pub level_up_label: Option<String>,
    pub badges: Vec<String>,
}

#[must_use]
pub fn map_completion(outcome: &CompletionOutcome) -> CompletionSummaryVm {
    let completion = &outcome.completion;
    let message = if completion.message.trim().is_empty() {
        "Session completed!".to_string()
    } else {
        completion.message.clone()
    };
    CompletionSummaryVm {
        message,
        xp_label: format!("+{} XP earned", completion.total_xp_earned),
        level_up_label: completion
            .level_up
            .then(|| format!("Level up! You're now Level {}!", completion.new_level)),
        badges: outcome
            .new_badges
            .iter()
            .map(AwardedBadge::display_name)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use conceptly_core::model::{
        Checkpoint, CheckpointId, LearningOverview, ProgressStats, Session, SessionCompletion,
        SessionId, SessionStatus,
    };
    use conceptly_core::time::fixed_now;
    use services::Destination;

    #[test]
    fn analytics_metrics_follow_score_thresholds() {
        let report = AnalyticsReport {
            overview: LearningOverview {
                current_streak: 1,
                longest_streak: 4,
                ..LearningOverview::default()
            },
            progress: ProgressStats {
                total_sessions: 5,
                completed_sessions: 2,
                total_checkpoints: 20,
                completed_checkpoints: 9,
                avg_score: 0.55,
                completion_rate: 45.0,
            },
            badges: Vec::new(),
        };
        let vm = map_analytics(&report);
        let avg = vm.metrics.iter().find(|m| m.label == "Avg quiz score").unwrap();
        assert_eq!(avg.value, "55%");
        assert_eq!(avg.tone, MetricTone::Fair);
        let rate = vm.metrics.iter().find(|m| m.label == "Completion rate").unwrap();
        assert_eq!(rate.tone, MetricTone::Fair);
        let open = vm.metrics.iter().find(|m| m.label == "In progress").unwrap();
        assert_eq!(open.value, "3");
        assert_eq!(vm.streak_label, "Current streak: 1 day");
        assert_eq!(vm.longest_streak_label, "Longest streak: 4 days");
    }

    #[test]
    fn attempt_rows_show_score_trail() {
        let session_id = SessionId::new(2);
        let details = SessionDetails {
            session: Session::new(session_id, "Tides", SessionStatus::Completed, fixed_now())
                .with_completed_at(Some(fixed_now() + Duration::days(1))),
            checkpoints: vec![
                CheckpointAttempts {
                    checkpoint: Checkpoint::new(CheckpointId::new(1), session_id, 0, "Moon"),
                    attempts: 2,
                    scores: vec![0.5, 0.75],
                },
                CheckpointAttempts {
                    checkpoint: Checkpoint::new(CheckpointId::new(2), session_id, 1, "Sun"),
                    attempts: 0,
                    scores: Vec::new(),
                },
            ],
        };
        let vm = map_session_details(&details);
        assert_eq!(vm.completed_label.as_deref(), Some("Completed Nov 15, 2023"));
        assert_eq!(vm.rows[0].scores_label.as_deref(), Some("50% → 75%"));
        assert_eq!(vm.rows[0].best_label.as_deref(), Some("Best 75%"));
        assert_eq!(vm.rows[1].attempts_label, "Not attempted");
        assert!(vm.rows[1].best_label.is_none());
        assert_eq!(vm.attempts_label, "2 quiz attempts in total");
    }

    #[test]
    fn tutor_mode_options_mark_the_selection() {
        let options = tutor_mode_options(TutorMode::ExamMode);
        assert_eq!(options.len(), 4);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "exam_mode");
        assert_eq!(selected[0].label, "Exam Mode - Focused on assessments");
    }

    #[test]
    fn completion_summary_announces_level_and_badges() {
        let outcome = CompletionOutcome {
            completion: SessionCompletion {
                message: String::new(),
                total_xp_earned: 60,
                level_up: true,
                new_level: 3,
            },
            new_badges: vec![AwardedBadge {
                name: "dedicated_learner".into(),
                description: "Completed 5 learning sessions!".into(),
            }],
            navigate_to: Destination::Dashboard,
        };
        let vm = map_completion(&outcome);
        assert_eq!(vm.message, "Session completed!");
        assert_eq!(vm.xp_label, "+60 XP earned");
        assert_eq!(vm.level_up_label.as_deref(), Some("Level up! You're now Level 3!"));
        assert_eq!(vm.badges, ["Dedicated Learner"]);
    }
}
