use conceptly_core::model::{Checkpoint, CheckpointId, LearningPath};
use conceptly_core::reveal::RevealPhase;
use services::{SessionController, ViewMessage};

use crate::vm::{BlockVm, map_blocks};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointState {
    Completed,
    Active,
    Available,
    Locked,
}

impl CheckpointState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Completed => "checkpoint checkpoint--done",
            Self::Active => "checkpoint checkpoint--active",
            Self::Available => "checkpoint",
            Self::Locked => "checkpoint checkpoint--locked",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointItemVm {
    pub id: u64,
    pub number: usize,
    pub topic: String,
    pub state: CheckpointState,
    pub score_label: Option<String>,
}

#[must_use]
pub fn map_checkpoint_items(
    path: &LearningPath,
    active: Option<CheckpointId>,
) -> Vec<CheckpointItemVm> {
    path.iter()
        .enumerate()
        .map(|(position, checkpoint)| {
            let state = if active == Some(checkpoint.id()) {
                CheckpointState::Active
            } else if checkpoint.is_completed() {
                CheckpointState::Completed
            } else if path.is_unlocked_at(position) {
                CheckpointState::Available
            } else {
                CheckpointState::Locked
            };
            CheckpointItemVm {
                id: checkpoint.id().value(),
                number: position + 1,
                topic: checkpoint.topic().to_string(),
                state,
                score_label: score_label(checkpoint),
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn score_label(checkpoint: &Checkpoint) -> Option<String> {
    checkpoint
        .understanding_score()
        // clamped to 0..=100 before the cast
        .map(|score| format!("{}%", (score.clamp(0.0, 1.0) * 100.0).round() as u32))
}

/// Header data of the active checkpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveCheckpointVm {
    pub id: u64,
    pub title: String,
    pub objectives: Vec<String>,
    pub completed: bool,
}

#[must_use]
pub fn map_active_checkpoint(controller: &SessionController) -> Option<ActiveCheckpointVm> {
    controller.active_checkpoint().map(|checkpoint| ActiveCheckpointVm {
        id: checkpoint.id().value(),
        title: format!("{}. {}", checkpoint.index() + 1, checkpoint.topic()),
        objectives: checkpoint.objectives().to_vec(),
        completed: checkpoint.is_completed(),
    })
}

#[must_use]
pub fn progress_label(controller: &SessionController) -> String {
    let (completed, total) = controller.progress();
    format!("{completed} of {total} checkpoints completed")
}

/// Everything the session page renders, read from the controller in one go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionScreenVm {
    pub topic: String,
    pub completed: bool,
    pub progress_label: String,
    pub progress_percent: u8,
    pub items: Vec<CheckpointItemVm>,
    pub active: Option<ActiveCheckpointVm>,
    pub blocks: Vec<BlockVm>,
    pub revealing: bool,
    pub message: Option<String>,
    pub content_failed: bool,
    pub can_complete: bool,
}

/// `None` until the session itself has been loaded.
#[must_use]
pub fn map_session_screen(controller: &SessionController) -> Option<SessionScreenVm> {
    let session = controller.session()?;
    let message = controller.message();
    Some(SessionScreenVm {
        topic: session.topic().to_string(),
        completed: session.is_completed(),
        progress_label: progress_label(controller),
        progress_percent: controller.checkpoints().progress_percent(),
        items: map_checkpoint_items(
            controller.checkpoints(),
            controller.active_checkpoint().map(Checkpoint::id),
        ),
        active: map_active_checkpoint(controller),
        blocks: map_blocks(&controller.displayed_blocks()),
        revealing: controller.reveal_phase() == RevealPhase::Revealing,
        message: message.map(ViewMessage::to_string),
        content_failed: message == Some(&ViewMessage::ContentFailed),
        can_complete: controller.can_complete(),
    })
}
