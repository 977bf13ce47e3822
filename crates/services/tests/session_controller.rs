use std::sync::Arc;
use std::time::Duration;

use conceptly_core::format::Block;
use conceptly_core::model::{
    Checkpoint, CheckpointId, CheckpointStatus, Session, SessionCompletion, SessionId,
    SessionStatus,
};
use conceptly_core::reveal::{REVEAL_TICK, RevealPhase};
use conceptly_core::time::{fixed_clock, fixed_now};
use services::testing::{Endpoint, FakeApi};
use services::{Destination, LoadPhase, SessionController, SessionError, ViewMessage};

const SESSION: SessionId = SessionId::new(1);
const HALF_TICK: Duration = Duration::from_millis(7);

fn session(status: SessionStatus) -> Session {
    Session::new(SESSION, "Gravity", status, fixed_now())
}

fn checkpoint(id: u64, index: u32, status: CheckpointStatus) -> Checkpoint {
    Checkpoint::new(CheckpointId::new(id), SESSION, index, format!("Step {index}"))
        .with_status(status)
}

fn three_step_api(statuses: [CheckpointStatus; 3]) -> FakeApi {
    FakeApi::new()
        .with_session(session(SessionStatus::InProgress))
        .with_checkpoints(
            SESSION,
            vec![
                checkpoint(10, 0, statuses[0]),
                checkpoint(11, 1, statuses[1]),
                checkpoint(12, 2, statuses[2]),
            ],
        )
        .with_content(CheckpointId::new(10), "First explanation.")
        .with_content(CheckpointId::new(11), "Second explanation.")
        .with_content(CheckpointId::new(12), "Third explanation.")
}

fn controller(api: &FakeApi) -> SessionController {
    SessionController::new(Arc::new(api.clone()), fixed_clock())
}

async fn finish_reveal(controller: &SessionController) {
    let total = u32::try_from(controller.reveal_progress().total).unwrap();
    tokio::time::sleep(REVEAL_TICK * (total + 1)).await;
}

#[tokio::test(start_paused = true)]
async fn load_focuses_first_pending_checkpoint() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(11))
    );
    assert_eq!(controller.progress(), (1, 3));
    assert!(!controller.can_complete());
    assert_eq!(api.calls(Endpoint::GetSession), 1);
    assert_eq!(api.calls(Endpoint::ListCheckpoints), 1);
    assert_eq!(api.calls(Endpoint::Content), 1);
}

#[tokio::test(start_paused = true)]
async fn all_completed_focuses_first_checkpoint() {
    use CheckpointStatus::Completed;
    let api = three_step_api([Completed, Completed, Completed]);
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(10))
    );
    assert!(controller.can_complete());
}

#[tokio::test(start_paused = true)]
async fn locked_checkpoint_selection_is_a_no_op() {
    use CheckpointStatus::Pending;
    let api = three_step_api([Pending, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    let calls_before = api.total_calls();

    controller.select_checkpoint(CheckpointId::new(12)).await;
    controller.select_checkpoint(CheckpointId::new(99)).await;

    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(10))
    );
    assert!(!controller.is_unlocked(CheckpointId::new(11)));
    assert_eq!(api.total_calls(), calls_before);
}

#[tokio::test(start_paused = true)]
async fn content_is_fetched_once_per_checkpoint() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    controller.select_checkpoint(CheckpointId::new(10)).await;
    controller.select_checkpoint(CheckpointId::new(11)).await;
    controller.select_checkpoint(CheckpointId::new(10)).await;
    controller.load_content(CheckpointId::new(10)).await;

    assert_eq!(api.calls(Endpoint::Content), 2);
    assert!(controller.is_cached(CheckpointId::new(10)));
    assert!(controller.is_cached(CheckpointId::new(11)));
}

#[tokio::test(start_paused = true)]
async fn in_flight_request_is_not_duplicated() {
    use CheckpointStatus::Pending;
    let api = FakeApi::new()
        .with_session(session(SessionStatus::InProgress))
        .with_checkpoints(SESSION, vec![checkpoint(10, 0, Pending)])
        .with_content(CheckpointId::new(10), "Text.")
        .failing(Endpoint::Content, 503, None);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    api.recover(Endpoint::Content);

    let first = controller.begin_content_request(CheckpointId::new(10));
    let second = controller.begin_content_request(CheckpointId::new(10));
    assert!(first.is_some());
    assert!(second.is_none());

    let response = first.unwrap().send().await;
    controller.apply_content(response);
    assert!(controller.is_cached(CheckpointId::new(10)));
}

#[tokio::test(start_paused = true)]
async fn reveal_advances_one_char_per_tick() {
    use CheckpointStatus::Pending;
    let api = FakeApi::new()
        .with_session(session(SessionStatus::InProgress))
        .with_checkpoints(SESSION, vec![checkpoint(10, 0, Pending)])
        .with_content(CheckpointId::new(10), "## Title\nBody");
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    assert_eq!(controller.reveal_phase(), RevealPhase::Revealing);
    assert_eq!(controller.displayed_text(), "");

    let mut seen = Vec::new();
    for _ in 0..4 {
        tokio::time::sleep(REVEAL_TICK).await;
        seen.push(controller.displayed_text().chars().count());
    }
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));

    tokio::time::sleep(HALF_TICK).await;
    let shown = controller.displayed_text().chars().count();
    tokio::time::sleep(REVEAL_TICK * 3).await;
    assert_eq!(controller.displayed_text().chars().count(), shown + 3);

    finish_reveal(&controller).await;
    assert_eq!(controller.displayed_text(), "## Title\nBody");
    assert_eq!(controller.reveal_phase(), RevealPhase::Complete);
    assert_eq!(
        controller.displayed_blocks(),
        vec![
            Block::Heading {
                level: 2,
                text: "Title".into()
            },
            Block::Paragraph {
                text: "Body".into()
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn switching_checkpoint_cancels_running_reveal() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    tokio::time::sleep(REVEAL_TICK * 3 + HALF_TICK).await;
    assert_eq!(controller.displayed_text(), "Sec");

    controller.select_checkpoint(CheckpointId::new(10)).await;
    assert_eq!(controller.displayed_text(), "");
    tokio::time::sleep(REVEAL_TICK * 2 + HALF_TICK).await;
    assert_eq!(controller.displayed_text(), "Fi");

    finish_reveal(&controller).await;
    assert_eq!(controller.displayed_text(), "First explanation.");
}

#[tokio::test(start_paused = true)]
async fn skip_shows_full_text() {
    use CheckpointStatus::Pending;
    let api = three_step_api([Pending, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    controller.skip_reveal();

    assert_eq!(controller.displayed_text(), "First explanation.");
    assert_eq!(controller.reveal_phase(), RevealPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn stale_content_is_cached_but_not_revealed() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    controller.close();

    let stale = controller
        .begin_select(CheckpointId::new(10))
        .expect("first checkpoint not cached yet");
    let cached = controller.begin_select(CheckpointId::new(11));
    assert!(cached.is_none());

    let response = stale.send().await;
    controller.apply_content(response);

    assert!(controller.is_cached(CheckpointId::new(10)));
    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(11))
    );
    controller.skip_reveal();
    assert_eq!(controller.displayed_text(), "Second explanation.");
}

#[tokio::test(start_paused = true)]
async fn empty_session_triggers_generation() {
    use CheckpointStatus::Pending;
    let api = FakeApi::new()
        .with_session(session(SessionStatus::InProgress))
        .with_generated_checkpoints(
            SESSION,
            vec![checkpoint(20, 0, Pending), checkpoint(21, 1, Pending)],
        )
        .with_content(CheckpointId::new(20), "Generated.");
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(api.calls(Endpoint::GenerateCheckpoints), 1);
    assert_eq!(api.calls(Endpoint::ListCheckpoints), 2);
    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(controller.checkpoints().len(), 2);
    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(20))
    );
}

#[tokio::test(start_paused = true)]
async fn generation_failure_surfaces_message_without_retry() {
    let api = FakeApi::new()
        .with_session(session(SessionStatus::InProgress))
        .failing(Endpoint::GenerateCheckpoints, 500, None);
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(controller.phase(), LoadPhase::Failed);
    assert_eq!(
        controller.message().map(ViewMessage::text),
        Some("Failed to generate checkpoints.")
    );
    assert_eq!(api.calls(Endpoint::GenerateCheckpoints), 1);
}

#[tokio::test(start_paused = true)]
async fn load_failure_surfaces_message() {
    let api = FakeApi::new().failing(Endpoint::GetSession, 404, Some("Session not found"));
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(controller.phase(), LoadPhase::Failed);
    assert_eq!(controller.message(), Some(&ViewMessage::LoadFailed));
    assert!(controller.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn content_failure_keeps_view_usable() {
    use CheckpointStatus::Pending;
    let api = three_step_api([Pending, Pending, Pending]).failing(Endpoint::Content, 500, None);
    let mut controller = controller(&api);

    controller.load_session(SESSION).await;

    assert_eq!(controller.phase(), LoadPhase::Ready);
    assert_eq!(
        controller.message().map(ViewMessage::text),
        Some("Failed to load explanation. Please try again.")
    );
    assert!(!controller.is_cached(CheckpointId::new(10)));

    api.recover(Endpoint::Content);
    controller.load_content(CheckpointId::new(10)).await;
    assert!(controller.message().is_none());
    assert!(controller.is_cached(CheckpointId::new(10)));
}

#[tokio::test(start_paused = true)]
async fn completion_is_rejected_locally_when_not_eligible() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Completed, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let result = controller.complete_session().await;

    assert!(matches!(result, Err(SessionError::NotEligible)));
    assert_eq!(api.calls(Endpoint::CompleteSession), 0);
}

#[tokio::test(start_paused = true)]
async fn refresh_picks_up_passed_quiz() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Completed, Pending]).with_completion(SessionCompletion {
        message: "Session completed!".into(),
        total_xp_earned: 40,
        level_up: true,
        new_level: 2,
    });
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    assert!(!controller.can_complete());

    api.complete_checkpoint(CheckpointId::new(12));
    controller.refresh_completion_eligibility().await;
    assert!(controller.can_complete());

    let outcome = controller.complete_session().await.expect("completion");
    assert_eq!(outcome.navigate_to, Destination::Dashboard);
    assert_eq!(outcome.completion.total_xp_earned, 40);
    assert!(controller.session().unwrap().is_completed());
    assert_eq!(controller.session().unwrap().xp_earned(), 40);
    assert!(!controller.can_complete());
    assert_eq!(api.calls(Endpoint::CheckBadges), 1);
    assert!(outcome.new_badges.is_empty());
}

#[tokio::test(start_paused = true)]
async fn completion_announces_newly_awarded_badges() {
    use CheckpointStatus::Completed;
    let api = three_step_api([Completed, Completed, Completed])
        .with_completion(SessionCompletion {
            message: "Session completed!".into(),
            total_xp_earned: 60,
            level_up: false,
            new_level: 1,
        })
        .with_due_badge("first_topic", "Completed your first learning topic!");
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let outcome = controller.complete_session().await.expect("completion");

    assert_eq!(outcome.new_badges.len(), 1);
    assert_eq!(outcome.new_badges[0].display_name(), "First Topic");
    assert_eq!(api.calls(Endpoint::CheckBadges), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_badge_check_does_not_undo_completion() {
    use CheckpointStatus::Completed;
    let api = three_step_api([Completed, Completed, Completed])
        .with_completion(SessionCompletion {
            message: "Session completed!".into(),
            total_xp_earned: 60,
            level_up: false,
            new_level: 1,
        })
        .failing(Endpoint::CheckBadges, 500, None);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let outcome = controller.complete_session().await.expect("completion");

    assert!(outcome.new_badges.is_empty());
    assert!(controller.session().unwrap().is_completed());
    assert!(controller.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn completion_failure_surfaces_backend_detail() {
    use CheckpointStatus::Completed;
    let api = three_step_api([Completed, Completed, Completed]).failing(
        Endpoint::CompleteSession,
        400,
        Some("Not all checkpoints completed. 1 checkpoint(s) remaining."),
    );
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let err = controller.complete_session().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Not all checkpoints completed. 1 checkpoint(s) remaining."
    );
    assert!(!controller.session().unwrap().is_completed());
    assert!(controller.can_complete());
    assert_eq!(api.calls(Endpoint::CheckBadges), 0);
    assert_eq!(
        controller.message().map(ViewMessage::text),
        Some("Not all checkpoints completed. 1 checkpoint(s) remaining.")
    );
}

#[tokio::test(start_paused = true)]
async fn completion_failure_without_detail_uses_fallback() {
    use CheckpointStatus::Completed;
    let api = three_step_api([Completed, Completed, Completed]).failing(
        Endpoint::CompleteSession,
        502,
        None,
    );
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let err = controller.complete_session().await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to complete session");
}

#[tokio::test(start_paused = true)]
async fn completed_session_is_never_eligible() {
    use CheckpointStatus::Completed;
    let api = FakeApi::new()
        .with_session(session(SessionStatus::Completed))
        .with_checkpoints(SESSION, vec![checkpoint(10, 0, Completed)])
        .with_content(CheckpointId::new(10), "Done.");
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    assert!(!controller.can_complete());
    let status = controller.poll_completion_status().await.expect("status");
    assert!(status.can_complete);
    assert!(!controller.can_complete());
}

#[tokio::test(start_paused = true)]
async fn lost_response_does_not_block_reselect_after_refresh() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    let fetches = api.calls(Endpoint::Content);

    let lost = controller
        .begin_select(CheckpointId::new(10))
        .expect("first checkpoint not cached yet");
    drop(lost.send().await);
    controller.refresh_completion_eligibility().await;

    let again = controller
        .begin_select(CheckpointId::new(10))
        .expect("a lost request must not wedge the checkpoint");
    let response = again.send().await;
    controller.apply_content(response);

    assert_eq!(api.calls(Endpoint::Content), fetches + 2);
    assert!(controller.is_cached(CheckpointId::new(10)));
    assert_eq!(controller.reveal_phase(), RevealPhase::Revealing);
}

#[tokio::test(start_paused = true)]
async fn abandoned_request_surfaces_retry_and_refetches() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    let fetches = api.calls(Endpoint::Content);

    let abandoned = controller
        .begin_select(CheckpointId::new(10))
        .expect("first checkpoint not cached yet");
    drop(abandoned);
    controller.abandon_content(CheckpointId::new(10));

    assert_eq!(controller.message(), Some(&ViewMessage::ContentFailed));
    assert_eq!(controller.reveal_phase(), RevealPhase::Idle);

    let retry = controller
        .retry_content(CheckpointId::new(10))
        .expect("retry issues a new fetch");
    let response = retry.send().await;
    controller.apply_content(response);

    assert_eq!(api.calls(Endpoint::Content), fetches + 1);
    assert!(controller.message().is_none());
    controller.skip_reveal();
    assert_eq!(controller.displayed_text(), "First explanation.");
}

#[tokio::test(start_paused = true)]
async fn abandoning_an_unknown_request_changes_nothing() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    controller.abandon_content(CheckpointId::new(11));

    assert!(controller.message().is_none());
    assert!(controller.is_cached(CheckpointId::new(11)));
}

#[tokio::test(start_paused = true)]
async fn late_response_after_close_does_not_start_reveal() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;
    controller.skip_reveal();

    let pending = controller
        .begin_select(CheckpointId::new(10))
        .expect("first checkpoint not cached yet");
    controller.close();
    let response = pending.send().await;
    controller.apply_content(response);
    tokio::time::sleep(REVEAL_TICK * 4).await;

    assert_eq!(controller.reveal_phase(), RevealPhase::Idle);
    assert_eq!(controller.displayed_text(), "");
    assert!(!controller.is_cached(CheckpointId::new(10)));
    assert!(controller.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn response_from_previous_load_is_ignored() {
    use CheckpointStatus::{Completed, Pending};
    let api = three_step_api([Completed, Pending, Pending]);
    let mut controller = controller(&api);
    controller.load_session(SESSION).await;

    let previous = controller
        .begin_select(CheckpointId::new(10))
        .expect("first checkpoint not cached yet");
    controller.load_session(SESSION).await;
    let response = previous.send().await;
    controller.apply_content(response);

    assert!(!controller.is_cached(CheckpointId::new(10)));
    assert_eq!(
        controller.active_checkpoint().map(Checkpoint::id),
        Some(CheckpointId::new(11))
    );
    controller.skip_reveal();
    assert_eq!(controller.displayed_text(), "Second explanation.");
}
