use chrono::Duration;
use conceptly_core::model::{
    AuthTokens, Badge, Checkpoint, CheckpointId, CheckpointStatus, LearningOverview,
    ProgressStats, QuizQuestion, Session, SessionCompletion, SessionId, SessionStatus,
    UserProfile,
};
use conceptly_core::time::fixed_now;
use services::ConceptlyApi;
use services::testing::{Endpoint, FakeApi};

use super::ViewError;
use super::test_harness::{ViewKind, setup_view_harness};

const SESSION: SessionId = SessionId::new(1);

fn signed_in_api() -> FakeApi {
    let api = FakeApi::new()
        .with_user("ada@example.com", "hunter22", AuthTokens::new("acc", "ref"))
        .with_profile(UserProfile {
            id: 7,
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            tutor_mode: "feynman".into(),
            xp: 150,
            level: 2,
        });
    api.set_access_token(Some("acc".into()));
    api
}

fn learning_path_api() -> FakeApi {
    let step = |id: u64, index: u32| {
        Checkpoint::new(CheckpointId::new(id), SESSION, index, format!("Step {index}"))
            .with_status(CheckpointStatus::Pending)
    };
    FakeApi::new()
        .with_session(Session::new(
            SESSION,
            "Gravity",
            SessionStatus::InProgress,
            fixed_now(),
        ))
        .with_checkpoints(SESSION, vec![step(10, 0), step(11, 1)])
        .with_content(CheckpointId::new(10), "Mass **attracts** mass.")
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, FakeApi::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("login-email"), "missing email field in {html}");
    assert!(html.contains("Create one"), "missing register link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_profile_and_sessions() {
    let api = signed_in_api().with_session(Session::new(
        SessionId::new(3),
        "Black holes",
        SessionStatus::InProgress,
        fixed_now(),
    ));
    let mut harness = setup_view_harness(ViewKind::Dashboard, api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("Welcome back, Ada"))
        .await;
    assert!(html.contains("Welcome back, Ada"), "missing greeting in {html}");
    assert!(html.contains("150 / 200 XP"), "missing xp in {html}");
    assert!(html.contains("Black holes"), "missing session card in {html}");
    assert!(html.contains("Started Nov 14, 2023"), "missing date in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_without_token_asks_to_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, FakeApi::new());
    harness.rebuild();

    let expected = ViewError::SignedOut.message();
    let html = harness.drive_until(|html| html.contains(expected)).await;
    assert!(html.contains(expected), "missing {expected} in {html}");
    assert_eq!(harness.api.calls(Endpoint::ListSessions), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_reveals_first_checkpoint() {
    let mut harness = setup_view_harness(ViewKind::Session(SESSION.value()), learning_path_api());
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("mass."))
        .await;
    assert!(html.contains("Gravity"), "missing topic in {html}");
    assert!(html.contains("1. Step 0"), "missing active title in {html}");
    assert!(html.contains("Step 1"), "missing second checkpoint in {html}");
    assert!(html.contains("Locked"), "second checkpoint should be locked in {html}");
    assert!(html.contains("mass."), "content not fully revealed in {html}");
    assert!(html.contains("<strong>attracts</strong>"), "missing strong span in {html}");
    assert!(html.contains("0 of 2 checkpoints completed"), "missing progress in {html}");
    assert!(!html.contains("session-complete"), "completion offered early in {html}");
    assert_eq!(harness.api.calls(Endpoint::Content), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_shows_retry_when_load_fails() {
    let api = FakeApi::new().failing(Endpoint::GetSession, 404, Some("Session not found"));
    let mut harness = setup_view_harness(ViewKind::Session(SESSION.value()), api);
    harness.rebuild();

    let html = harness.drive_until(|html| html.contains("Retry")).await;
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(html.contains("Back to dashboard"), "missing dashboard link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_questions() {
    let api = FakeApi::new().with_questions(
        CheckpointId::new(10),
        vec![
            QuizQuestion {
                question: "What pulls the moon?".into(),
                options: vec!["Gravity".into(), "Magnetism".into()],
                tested_concept: Some("gravity".into()),
            },
            QuizQuestion {
                question: "Explain orbits.".into(),
                options: Vec::new(),
                tested_concept: None,
            },
        ],
    );
    let mut harness = setup_view_harness(ViewKind::Quiz(1, 10), api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("Question 1 of 2"))
        .await;
    assert!(html.contains("What pulls the moon?"), "missing prompt in {html}");
    assert!(html.contains("Magnetism"), "missing option in {html}");
    assert!(html.contains("Question 2 of 2"), "missing second question in {html}");
    assert!(html.contains("You need 75% to pass."), "missing threshold in {html}");
    assert!(html.contains("0 of 2 answered"), "missing answer count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_missing_quiz() {
    let mut harness = setup_view_harness(ViewKind::Quiz(1, 10), FakeApi::new());
    harness.rebuild();

    let expected = ViewError::NotFound.message();
    let html = harness.drive_until(|html| html.contains(expected)).await;
    assert!(html.contains(expected), "missing {expected} in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn explanation_view_smoke_renders_mnemonics() {
    let api = FakeApi::new().with_simplified(
        CheckpointId::new(10),
        "## Falling around\nOrbits are sideways falls. Remember: the moon never stops falling.",
    );
    let mut harness = setup_view_harness(ViewKind::Explanation(1, 10), api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("Memory hooks"))
        .await;
    assert!(html.contains("Falling around"), "missing heading in {html}");
    assert!(
        html.contains("the moon never stops falling."),
        "missing mnemonic in {html}"
    );
    assert!(html.contains("Try a different approach"), "missing retry in {html}");
    assert_eq!(harness.api.calls(Endpoint::Simplified), 1);
}

fn badge(id: u64, name: &str) -> Badge {
    Badge {
        id,
        name: name.into(),
        kind: "milestone".into(),
        description: "Started your first learning session!".into(),
        earned_at: fixed_now(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_offers_tutor_modes_and_badges() {
    let api = signed_in_api().with_badge(badge(1, "first_topic"));
    let mut harness = setup_view_harness(ViewKind::Dashboard, api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("Recent badges"))
        .await;
    assert!(html.contains("tutor-mode"), "missing tutor select in {html}");
    assert!(
        html.contains("Supportive Buddy - Encouraging and positive"),
        "missing default mode in {html}"
    );
    assert!(html.contains("Exam Mode - Focused on assessments"), "missing option in {html}");
    assert!(html.contains("First Topic"), "missing badge in {html}");
    assert_eq!(harness.api.calls(Endpoint::Badges), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_lists_sessions_with_details_links() {
    let api = FakeApi::new()
        .with_session(Session::new(
            SessionId::new(1),
            "Optics",
            SessionStatus::Completed,
            fixed_now() - Duration::days(2),
        ))
        .with_session(Session::new(
            SessionId::new(2),
            "Tides",
            SessionStatus::InProgress,
            fixed_now(),
        ));
    let mut harness = setup_view_harness(ViewKind::History, api);
    harness.rebuild();

    let html = harness.drive_until(|html| html.contains("Optics")).await;
    let tides = html.find("Tides").expect("tides listed");
    let optics = html.find("Optics").expect("optics listed");
    assert!(tides < optics, "history not newest first in {html}");
    assert!(html.contains("Details"), "missing details link in {html}");
    assert_eq!(harness.api.calls(Endpoint::History), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_shows_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History, FakeApi::new());
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("No sessions yet"))
        .await;
    assert!(html.contains("No sessions yet"), "missing empty state in {html}");
    assert!(html.contains("Pick a topic"), "missing call to action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_details_view_smoke_lists_attempts() {
    let api = learning_path_api().with_scores(CheckpointId::new(10), vec![0.5, 0.75]);
    let mut harness = setup_view_harness(ViewKind::SessionDetails(SESSION.value()), api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("quiz attempts in total"))
        .await;
    assert!(html.contains("Gravity"), "missing topic in {html}");
    assert!(html.contains("2 attempts"), "missing attempt count in {html}");
    assert!(html.contains("Best 75%"), "missing best score in {html}");
    assert!(html.contains("Not attempted"), "missing untouched checkpoint in {html}");
    assert!(html.contains("Continue learning"), "missing resume link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_details_view_smoke_reports_unknown_session() {
    let mut harness = setup_view_harness(ViewKind::SessionDetails(99), FakeApi::new());
    harness.rebuild();

    let expected = ViewError::NotFound.message();
    let html = harness.drive_until(|html| html.contains(expected)).await;
    assert!(html.contains(expected), "missing {expected} in {html}");
    assert!(html.contains("Back to history"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_renders_metrics_and_badges() {
    let api = FakeApi::new()
        .with_overview(LearningOverview {
            current_streak: 3,
            longest_streak: 5,
            ..LearningOverview::default()
        })
        .with_progress(ProgressStats {
            total_sessions: 4,
            completed_sessions: 3,
            total_checkpoints: 12,
            completed_checkpoints: 10,
            avg_score: 0.82,
            completion_rate: 83.3,
        })
        .with_badge(badge(1, "dedicated_learner"));
    let mut harness = setup_view_harness(ViewKind::Analytics, api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("Avg quiz score"))
        .await;
    assert!(html.contains("82%"), "missing average in {html}");
    assert!(html.contains("metric--good"), "missing score tone in {html}");
    assert!(html.contains("Current streak: 3 days"), "missing streak in {html}");
    assert!(html.contains("Badges earned: 1"), "missing badge count in {html}");
    assert!(html.contains("Dedicated Learner"), "missing badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_offers_retry_on_failure() {
    let api = FakeApi::new().failing(Endpoint::Progress, 500, None);
    let mut harness = setup_view_harness(ViewKind::Analytics, api);
    harness.rebuild();

    let html = harness.drive_until(|html| html.contains("Retry")).await;
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_shows_completion_summary() {
    let done = |id: u64, index: u32| {
        Checkpoint::new(CheckpointId::new(id), SESSION, index, format!("Step {index}"))
            .with_status(CheckpointStatus::Completed)
    };
    let api = FakeApi::new()
        .with_session(Session::new(
            SESSION,
            "Gravity",
            SessionStatus::InProgress,
            fixed_now(),
        ))
        .with_checkpoints(SESSION, vec![done(10, 0), done(11, 1)])
        .with_content(CheckpointId::new(10), "Mass attracts mass.")
        .with_content(CheckpointId::new(11), "Orbits are falls.")
        .with_completion(SessionCompletion {
            message: "Session completed successfully!".into(),
            total_xp_earned: 60,
            level_up: true,
            new_level: 3,
        })
        .with_due_badge("first_topic", "Started your first learning session!");
    let mut harness = setup_view_harness(ViewKind::Session(SESSION.value()), api);
    harness.rebuild();

    let html = harness
        .drive_until(|html| html.contains("session-complete"))
        .await;
    assert!(html.contains("session-complete"), "completion not offered in {html}");

    let handles = harness.session_handles.clone().expect("session handles");
    handles.complete().call(());
    let html = harness
        .drive_until(|html| html.contains("XP earned"))
        .await;
    assert!(
        html.contains("Session completed successfully!"),
        "missing completion message in {html}"
    );
    assert!(html.contains("+60 XP earned"), "missing xp in {html}");
    assert!(html.contains("now Level 3!"), "missing level up in {html}");
    assert!(html.contains("First Topic"), "missing new badge in {html}");
    assert!(html.contains("session-leave"), "missing dashboard button in {html}");
    assert_eq!(harness.api.calls(Endpoint::CompleteSession), 1);
    assert_eq!(harness.api.calls(Endpoint::CheckBadges), 1);
}
