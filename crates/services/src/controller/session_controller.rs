use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use conceptly_core::format::{Block, format};
use conceptly_core::model::{
    AwardedBadge, Checkpoint, CheckpointContent, CheckpointId, LearningPath, Session,
    SessionCompletion, SessionId,
};
use conceptly_core::reveal::RevealPhase;

use super::reveal_timer::{RevealProgress, RevealTimer};
use crate::Clock;
use crate::api::{ConceptlyApi, CompletionStatus};
use crate::error::{ApiError, SessionError};
use crate::gamification_service::GamificationService;

const COMPLETION_FALLBACK: &str = "Failed to complete session";

/// Where the session view stands in its initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Generating,
    Ready,
    Failed,
}

/// User-visible message shown by the session view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMessage {
    LoadFailed,
    GenerationFailed,
    ContentFailed,
    CompletionFailed(String),
}

impl ViewMessage {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::LoadFailed => "Failed to load session.",
            Self::GenerationFailed => "Failed to generate checkpoints.",
            Self::ContentFailed => "Failed to load explanation. Please try again.",
            Self::CompletionFailed(detail) => detail,
        }
    }
}

impl fmt::Display for ViewMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Screen the caller should show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Dashboard,
}

/// Result of a successful `complete_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub completion: SessionCompletion,
    /// Badges granted by the award check that follows completion.
    pub new_badges: Vec<AwardedBadge>,
    pub navigate_to: Destination,
}

/// A content fetch detached from the controller, tagged with what it was for.
pub struct ContentRequest {
    api: Arc<dyn ConceptlyApi>,
    session_id: SessionId,
    epoch: u64,
    checkpoint_id: CheckpointId,
}

impl ContentRequest {
    #[must_use]
    pub fn checkpoint_id(&self) -> CheckpointId {
        self.checkpoint_id
    }

    pub async fn send(self) -> ContentResponse {
        let result = self
            .api
            .checkpoint_content(self.session_id, self.checkpoint_id)
            .await;
        ContentResponse {
            session_id: self.session_id,
            epoch: self.epoch,
            checkpoint_id: self.checkpoint_id,
            result,
        }
    }
}

/// Answer to a `ContentRequest`, to be applied with `apply_content`.
pub struct ContentResponse {
    session_id: SessionId,
    epoch: u64,
    checkpoint_id: CheckpointId,
    result: Result<CheckpointContent, ApiError>,
}

impl ContentResponse {
    #[must_use]
    pub fn checkpoint_id(&self) -> CheckpointId {
        self.checkpoint_id
    }
}

/// State and orchestration behind the session view.
///
/// Holds the cached session, its ordered checkpoints, the active checkpoint,
/// fetched explanations and the running reveal. All mutation goes through
/// `&mut self`; network calls go through the injected `ConceptlyApi`.
///
/// Every load and every `close` starts a new epoch. Content requests carry
/// the epoch they were issued in and answers from an older one are dropped.
pub struct SessionController {
    api: Arc<dyn ConceptlyApi>,
    gamification: GamificationService,
    clock: Clock,
    epoch: u64,
    session_id: Option<SessionId>,
    session: Option<Session>,
    path: LearningPath,
    active: Option<CheckpointId>,
    contents: HashMap<CheckpointId, CheckpointContent>,
    in_flight: HashSet<CheckpointId>,
    can_complete: bool,
    message: Option<ViewMessage>,
    phase: LoadPhase,
    reveal: RevealTimer,
}

impl SessionController {
    #[must_use]
    pub fn new(api: Arc<dyn ConceptlyApi>, clock: Clock) -> Self {
        Self::with_reveal_timer(api, clock, RevealTimer::new())
    }

    #[must_use]
    pub fn with_reveal_timer(api: Arc<dyn ConceptlyApi>, clock: Clock, reveal: RevealTimer) -> Self {
        Self {
            gamification: GamificationService::new(Arc::clone(&api)),
            api,
            clock,
            epoch: 0,
            session_id: None,
            session: None,
            path: LearningPath::default(),
            active: None,
            contents: HashMap::new(),
            in_flight: HashSet::new(),
            can_complete: false,
            message: None,
            phase: LoadPhase::Loading,
            reveal,
        }
    }

    /// Load session metadata and checkpoints, generating the checkpoints when
    /// none exist yet, then focus the first pending checkpoint.
    pub async fn load_session(&mut self, session_id: SessionId) {
        self.reset_for(session_id);
        info!(%session_id, "loading session");

        let (session, checkpoints) = tokio::join!(
            self.api.get_session(session_id),
            self.api.list_checkpoints(session_id)
        );
        let (session, mut checkpoints) = match (session, checkpoints) {
            (Ok(session), Ok(checkpoints)) => (session, checkpoints),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%session_id, error = %err, "failed to load session");
                self.fail(ViewMessage::LoadFailed);
                return;
            }
        };
        self.session = Some(session);

        if checkpoints.is_empty() {
            self.phase = LoadPhase::Generating;
            info!(%session_id, "no checkpoints yet, requesting generation");
            if let Err(err) = self.api.generate_checkpoints(session_id).await {
                warn!(%session_id, error = %err, "checkpoint generation failed");
                self.fail(ViewMessage::GenerationFailed);
                return;
            }
            checkpoints = match self.api.list_checkpoints(session_id).await {
                Ok(checkpoints) => checkpoints,
                Err(err) => {
                    warn!(%session_id, error = %err, "failed to reload generated checkpoints");
                    self.fail(ViewMessage::LoadFailed);
                    return;
                }
            };
        }

        self.path = LearningPath::new(checkpoints);
        self.recompute_eligibility();
        self.phase = LoadPhase::Ready;
        debug!(%session_id, checkpoints = self.path.len(), "session ready");

        if let Some(focus) = self.path.first_focus().map(Checkpoint::id) {
            self.select_checkpoint(focus).await;
        }
    }

    /// Make `checkpoint_id` active and show its explanation, fetching it if needed.
    /// Locked or unknown checkpoints are ignored.
    pub async fn select_checkpoint(&mut self, checkpoint_id: CheckpointId) {
        if let Some(request) = self.begin_select(checkpoint_id) {
            let response = request.send().await;
            self.apply_content(response);
        }
    }

    /// Synchronous half of `select_checkpoint`. Returns the fetch the caller
    /// must run when the explanation is not cached or already requested.
    pub fn begin_select(&mut self, checkpoint_id: CheckpointId) -> Option<ContentRequest> {
        if !self.path.is_unlocked(checkpoint_id) {
            debug!(%checkpoint_id, "ignoring locked checkpoint");
            return None;
        }
        self.active = Some(checkpoint_id);
        self.reveal.reset();
        if let Some(content) = self.contents.get(&checkpoint_id) {
            self.reveal.start(content.explanation());
            return None;
        }
        self.begin_content_request(checkpoint_id)
    }

    /// Fetch the explanation for `checkpoint_id` unless it is cached or in flight.
    pub async fn load_content(&mut self, checkpoint_id: CheckpointId) {
        if let Some(request) = self.begin_content_request(checkpoint_id) {
            let response = request.send().await;
            self.apply_content(response);
        }
    }

    /// Register a fetch for `checkpoint_id`. `None` when nothing needs fetching.
    pub fn begin_content_request(&mut self, checkpoint_id: CheckpointId) -> Option<ContentRequest> {
        let session_id = self.session_id?;
        if self.contents.contains_key(&checkpoint_id) || self.in_flight.contains(&checkpoint_id) {
            return None;
        }
        self.in_flight.insert(checkpoint_id);
        debug!(%checkpoint_id, "fetching explanation");
        Some(ContentRequest {
            api: Arc::clone(&self.api),
            session_id,
            epoch: self.epoch,
            checkpoint_id,
        })
    }

    /// Release a request whose answer will never arrive, e.g. because the
    /// task running it was dropped. The active checkpoint shows the content
    /// error so the user can ask again.
    pub fn abandon_content(&mut self, checkpoint_id: CheckpointId) {
        if !self.in_flight.remove(&checkpoint_id) {
            return;
        }
        debug!(%checkpoint_id, "explanation request abandoned");
        if self.active == Some(checkpoint_id) && !self.contents.contains_key(&checkpoint_id) {
            self.message = Some(ViewMessage::ContentFailed);
        }
    }

    /// User-initiated retry: clear the error and fetch again, even when an
    /// earlier request for the same checkpoint never came back.
    pub fn retry_content(&mut self, checkpoint_id: CheckpointId) -> Option<ContentRequest> {
        self.dismiss_message();
        self.in_flight.remove(&checkpoint_id);
        self.begin_content_request(checkpoint_id)
    }

    /// Store a fetched explanation. The reveal only starts when the response
    /// still belongs to the active checkpoint. Answers from another session or
    /// an earlier epoch are dropped.
    pub fn apply_content(&mut self, response: ContentResponse) {
        if Some(response.session_id) != self.session_id || response.epoch != self.epoch {
            debug!(
                checkpoint_id = %response.checkpoint_id,
                epoch = response.epoch,
                current = self.epoch,
                "dropping stale explanation response"
            );
            return;
        }
        let checkpoint_id = response.checkpoint_id;
        self.in_flight.remove(&checkpoint_id);
        let is_active = self.active == Some(checkpoint_id);

        match response.result {
            Ok(content) => {
                let content = self.contents.entry(checkpoint_id).or_insert(content);
                if is_active {
                    if self.message == Some(ViewMessage::ContentFailed) {
                        self.message = None;
                    }
                    self.reveal.start(content.explanation());
                } else {
                    debug!(%checkpoint_id, "cached explanation for inactive checkpoint");
                }
            }
            Err(err) => {
                warn!(%checkpoint_id, error = %err, "failed to load explanation");
                if is_active {
                    self.message = Some(ViewMessage::ContentFailed);
                }
            }
        }
    }

    /// Re-read checkpoints and session from the backend and recompute eligibility.
    ///
    /// Outstanding fetch markers are released so a checkpoint whose answer got
    /// lost can be fetched again. An answer that still arrives is applied.
    pub async fn refresh_completion_eligibility(&mut self) {
        let Some(session_id) = self.session_id else {
            return;
        };
        self.in_flight.clear();
        let (session, checkpoints) = tokio::join!(
            self.api.get_session(session_id),
            self.api.list_checkpoints(session_id)
        );
        match session {
            Ok(session) => self.session = Some(session),
            Err(err) => warn!(%session_id, error = %err, "failed to refresh session"),
        }
        match checkpoints {
            Ok(checkpoints) => self.path = LearningPath::new(checkpoints),
            Err(err) => warn!(%session_id, error = %err, "failed to refresh checkpoints"),
        }
        self.recompute_eligibility();
        debug!(%session_id, can_complete = self.can_complete, "eligibility refreshed");
    }

    /// Ask the backend's `can-complete` endpoint instead of recomputing locally.
    /// A completed session stays ineligible whatever the backend says.
    pub async fn poll_completion_status(&mut self) -> Option<CompletionStatus> {
        let session_id = self.session_id?;
        match self.api.completion_status(session_id).await {
            Ok(status) => {
                let completed = self.session.as_ref().is_some_and(Session::is_completed);
                self.can_complete = status.can_complete && !completed;
                Some(status)
            }
            Err(err) => {
                warn!(%session_id, error = %err, "completion status request failed");
                None
            }
        }
    }

    /// Complete the session, then run the badge award check. Rejected
    /// without a network call unless eligible.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoaded` or `SessionError::NotEligible` when
    /// rejected locally and `SessionError::Completion` with the backend's
    /// message when the request fails.
    pub async fn complete_session(&mut self) -> Result<CompletionOutcome, SessionError> {
        let session_id = self.session_id.ok_or(SessionError::NotLoaded)?;
        if !self.can_complete {
            debug!(%session_id, "completion rejected locally");
            return Err(SessionError::NotEligible);
        }

        match self.api.complete_session(session_id).await {
            Ok(completion) => {
                info!(
                    %session_id,
                    xp = completion.total_xp_earned,
                    level_up = completion.level_up,
                    "session completed"
                );
                if let Some(session) = self.session.as_mut() {
                    session.mark_completed(self.clock.now(), completion.total_xp_earned);
                }
                self.can_complete = false;
                self.message = None;
                let new_badges = self.gamification.award_due_badges().await;
                Ok(CompletionOutcome {
                    completion,
                    new_badges,
                    navigate_to: Destination::Dashboard,
                })
            }
            Err(err) => {
                warn!(%session_id, error = %err, "session completion failed");
                let text = err
                    .detail()
                    .map_or_else(|| COMPLETION_FALLBACK.to_string(), str::to_string);
                self.message = Some(ViewMessage::CompletionFailed(text.clone()));
                Err(SessionError::Completion(text))
            }
        }
    }

    /// Show the whole explanation without waiting for the reveal.
    pub fn skip_reveal(&mut self) {
        self.reveal.skip();
    }

    /// Tear down the view: stop the reveal and drop pending work. Answers to
    /// requests issued before this call are ignored.
    pub fn close(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.reveal.reset();
        self.in_flight.clear();
        self.active = None;
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn checkpoints(&self) -> &LearningPath {
        &self.path
    }

    #[must_use]
    pub fn active_checkpoint(&self) -> Option<&Checkpoint> {
        self.active.and_then(|id| self.path.get(id))
    }

    #[must_use]
    pub fn is_unlocked(&self, checkpoint_id: CheckpointId) -> bool {
        self.path.is_unlocked(checkpoint_id)
    }

    #[must_use]
    pub fn is_cached(&self, checkpoint_id: CheckpointId) -> bool {
        self.contents.contains_key(&checkpoint_id)
    }

    /// Completed and total checkpoint counts.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.path.completed_count(), self.path.len())
    }

    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.can_complete
    }

    #[must_use]
    pub fn message(&self) -> Option<&ViewMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    #[must_use]
    pub fn reveal_progress(&self) -> RevealProgress {
        self.reveal.progress()
    }

    #[must_use]
    pub fn subscribe_reveal(&self) -> watch::Receiver<RevealProgress> {
        self.reveal.subscribe()
    }

    /// Explanation text revealed so far.
    #[must_use]
    pub fn displayed_text(&self) -> String {
        self.reveal.displayed()
    }

    /// Revealed text run through the content formatter.
    #[must_use]
    pub fn displayed_blocks(&self) -> Vec<Block> {
        format(&self.reveal.displayed())
    }

    fn reset_for(&mut self, session_id: SessionId) {
        self.epoch = self.epoch.wrapping_add(1);
        self.reveal.reset();
        self.session_id = Some(session_id);
        self.session = None;
        self.path = LearningPath::default();
        self.active = None;
        self.contents.clear();
        self.in_flight.clear();
        self.can_complete = false;
        self.message = None;
        self.phase = LoadPhase::Loading;
    }

    fn fail(&mut self, message: ViewMessage) {
        self.phase = LoadPhase::Failed;
        self.message = Some(message);
    }

    fn recompute_eligibility(&mut self) {
        self.can_complete = self
            .session
            .as_ref()
            .is_some_and(|session| session.can_complete(&self.path));
    }
}
