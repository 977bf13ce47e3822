//! Scripted in-memory `ConceptlyApi` for tests of services and views.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use conceptly_core::model::{
    AuthTokens, AwardedBadge, Badge, Checkpoint, CheckpointAttempts, CheckpointContent,
    CheckpointId, CheckpointStatus, Credentials, LearningOverview, ProgressStats, QuizQuestion,
    QuizResult, Registration, Session, SessionCompletion, SessionDetails, SessionId,
    SessionStatus, SimplifiedExplanation, TutorMode, UserProfile,
};
use conceptly_core::time::fixed_now;

use crate::api::{CompletionStatus, ConceptlyApi};
use crate::error::ApiError;

/// Backend operation, used to script failures and count calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Register,
    Profile,
    ListSessions,
    CreateSession,
    GetSession,
    ListCheckpoints,
    GenerateCheckpoints,
    Content,
    Questions,
    Submit,
    Simplified,
    CompleteSession,
    CompletionStatus,
    History,
    Overview,
    Progress,
    SessionDetails,
    Badges,
    CheckBadges,
    TutorMode,
}

#[derive(Default)]
struct FakeState {
    sessions: Vec<Session>,
    checkpoints: HashMap<SessionId, Vec<Checkpoint>>,
    generated: HashMap<SessionId, Vec<Checkpoint>>,
    contents: HashMap<CheckpointId, String>,
    questions: HashMap<CheckpointId, Vec<QuizQuestion>>,
    quiz_results: HashMap<CheckpointId, QuizResult>,
    simplified: HashMap<CheckpointId, String>,
    completion: Option<SessionCompletion>,
    users: HashMap<String, (String, AuthTokens)>,
    profile: Option<UserProfile>,
    valid_tokens: HashSet<String>,
    failures: HashMap<Endpoint, (u16, Option<String>)>,
    calls: HashMap<Endpoint, usize>,
    submitted: Vec<Vec<String>>,
    overview: LearningOverview,
    progress: ProgressStats,
    scores: HashMap<CheckpointId, Vec<f64>>,
    badges: Vec<Badge>,
    due_badges: Vec<AwardedBadge>,
    token: Option<String>,
    next_session_id: u64,
}

/// In-memory backend double. Clones share state.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_session(self, session: Session) -> Self {
        {
            let mut state = self.state();
            state.next_session_id = state.next_session_id.max(session.id().value());
            state.sessions.retain(|existing| existing.id() != session.id());
            state.sessions.push(session);
        }
        self
    }

    #[must_use]
    pub fn with_checkpoints(self, session_id: SessionId, checkpoints: Vec<Checkpoint>) -> Self {
        self.state().checkpoints.insert(session_id, checkpoints);
        self
    }

    /// Checkpoints that appear once generation is requested for `session_id`.
    #[must_use]
    pub fn with_generated_checkpoints(
        self,
        session_id: SessionId,
        checkpoints: Vec<Checkpoint>,
    ) -> Self {
        self.state().generated.insert(session_id, checkpoints);
        self
    }

    #[must_use]
    pub fn with_content(self, checkpoint_id: CheckpointId, explanation: &str) -> Self {
        self.state()
            .contents
            .insert(checkpoint_id, explanation.to_string());
        self
    }

    #[must_use]
    pub fn with_questions(self, checkpoint_id: CheckpointId, questions: Vec<QuizQuestion>) -> Self {
        self.state().questions.insert(checkpoint_id, questions);
        self
    }

    #[must_use]
    pub fn with_quiz_result(self, checkpoint_id: CheckpointId, result: QuizResult) -> Self {
        self.state().quiz_results.insert(checkpoint_id, result);
        self
    }

    /// Base text of the simplified explanation; the attempt number is appended.
    #[must_use]
    pub fn with_simplified(self, checkpoint_id: CheckpointId, explanation: &str) -> Self {
        self.state()
            .simplified
            .insert(checkpoint_id, explanation.to_string());
        self
    }

    #[must_use]
    pub fn with_completion(self, completion: SessionCompletion) -> Self {
        self.state().completion = Some(completion);
        self
    }

    /// Register an account; a login with these credentials yields `tokens`.
    #[must_use]
    pub fn with_user(self, email: &str, password: &str, tokens: AuthTokens) -> Self {
        {
            let mut state = self.state();
            state.valid_tokens.insert(tokens.access_token.clone());
            state
                .users
                .insert(email.to_string(), (password.to_string(), tokens));
        }
        self
    }

    #[must_use]
    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.state().profile = Some(profile);
        self
    }

    #[must_use]
    pub fn with_overview(self, overview: LearningOverview) -> Self {
        self.state().overview = overview;
        self
    }

    #[must_use]
    pub fn with_progress(self, progress: ProgressStats) -> Self {
        self.state().progress = progress;
        self
    }

    /// Quiz scores recorded for `checkpoint_id`, one per attempt.
    #[must_use]
    pub fn with_scores(self, checkpoint_id: CheckpointId, scores: Vec<f64>) -> Self {
        self.state().scores.insert(checkpoint_id, scores);
        self
    }

    #[must_use]
    pub fn with_badge(self, badge: Badge) -> Self {
        self.state().badges.push(badge);
        self
    }

    /// Badge the next award check grants.
    #[must_use]
    pub fn with_due_badge(self, name: &str, description: &str) -> Self {
        self.state().due_badges.push(AwardedBadge {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Make every call to `endpoint` fail with `status` and optional `detail`.
    #[must_use]
    pub fn failing(self, endpoint: Endpoint, status: u16, detail: Option<&str>) -> Self {
        self.fail(endpoint, status, detail);
        self
    }

    pub fn fail(&self, endpoint: Endpoint, status: u16, detail: Option<&str>) {
        self.state()
            .failures
            .insert(endpoint, (status, detail.map(str::to_string)));
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state().failures.remove(&endpoint);
    }

    /// Flip a checkpoint to completed, as a passed quiz would.
    pub fn complete_checkpoint(&self, checkpoint_id: CheckpointId) {
        let mut state = self.state();
        for checkpoints in state.checkpoints.values_mut() {
            for checkpoint in checkpoints.iter_mut() {
                if checkpoint.id() == checkpoint_id {
                    *checkpoint = checkpoint.clone().with_status(CheckpointStatus::Completed);
                }
            }
        }
    }

    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state().calls.get(&endpoint).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    #[must_use]
    pub fn submitted_answers(&self) -> Vec<Vec<String>> {
        self.state().submitted.clone()
    }

    fn enter(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, FakeState>, ApiError> {
        let mut state = self.state();
        *state.calls.entry(endpoint).or_insert(0) += 1;
        if let Some((status, detail)) = state.failures.get(&endpoint).cloned() {
            return Err(ApiError::rejected(status, detail));
        }
        Ok(state)
    }

    fn require_token(state: &FakeState) -> Result<(), ApiError> {
        match state.token.as_ref() {
            Some(token) if state.valid_tokens.contains(token) => Ok(()),
            _ => Err(ApiError::rejected(
                401,
                Some("Could not validate credentials".to_string()),
            )),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::rejected(404, Some(format!("{what} not found")))
}

#[async_trait]
impl ConceptlyApi for FakeApi {
    fn set_access_token(&self, token: Option<String>) {
        self.state().token = token;
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthTokens, ApiError> {
        let state = self.enter(Endpoint::Login)?;
        match state.users.get(credentials.email()) {
            Some((password, tokens)) if password == credentials.password() => Ok(tokens.clone()),
            _ => Err(ApiError::rejected(
                401,
                Some("Incorrect email or password".to_string()),
            )),
        }
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let mut state = self.enter(Endpoint::Register)?;
        let email = registration.credentials().email().to_string();
        if state.users.contains_key(&email) {
            return Err(ApiError::rejected(
                400,
                Some("Email already registered".to_string()),
            ));
        }
        let tokens = AuthTokens::new(format!("access-{email}"), format!("refresh-{email}"));
        state.valid_tokens.insert(tokens.access_token.clone());
        let password = registration.credentials().password().to_string();
        state.users.insert(email, (password, tokens));
        Ok(())
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        let state = self.enter(Endpoint::Profile)?;
        Self::require_token(&state)?;
        state.profile.clone().ok_or_else(|| not_found("User"))
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let state = self.enter(Endpoint::ListSessions)?;
        let mut sessions = state.sessions.clone();
        sessions.sort_by_key(|session| std::cmp::Reverse(session.created_at()));
        Ok(sessions)
    }

    async fn create_session(
        &self,
        topic: &str,
        _user_notes: Option<&str>,
    ) -> Result<Session, ApiError> {
        let mut state = self.enter(Endpoint::CreateSession)?;
        state.next_session_id += 1;
        let session = Session::new(
            SessionId::new(state.next_session_id),
            topic,
            SessionStatus::InProgress,
            fixed_now(),
        );
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, session_id: SessionId) -> Result<Session, ApiError> {
        let state = self.enter(Endpoint::GetSession)?;
        state
            .sessions
            .iter()
            .find(|session| session.id() == session_id)
            .cloned()
            .ok_or_else(|| not_found("Session"))
    }

    async fn list_checkpoints(&self, session_id: SessionId) -> Result<Vec<Checkpoint>, ApiError> {
        let state = self.enter(Endpoint::ListCheckpoints)?;
        Ok(state
            .checkpoints
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn generate_checkpoints(&self, session_id: SessionId) -> Result<(), ApiError> {
        let mut state = self.enter(Endpoint::GenerateCheckpoints)?;
        let generated = state.generated.remove(&session_id).unwrap_or_default();
        state.checkpoints.insert(session_id, generated);
        Ok(())
    }

    async fn checkpoint_content(
        &self,
        _session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<CheckpointContent, ApiError> {
        let state = self.enter(Endpoint::Content)?;
        state
            .contents
            .get(&checkpoint_id)
            .map(|text| CheckpointContent::new(checkpoint_id, text.clone()))
            .ok_or_else(|| not_found("Checkpoint"))
    }

    async fn checkpoint_questions(
        &self,
        _session_id: SessionId,
        checkpoint_id: CheckpointId,
    ) -> Result<Vec<QuizQuestion>, ApiError> {
        let state = self.enter(Endpoint::Questions)?;
        Ok(state
            .questions
            .get(&checkpoint_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_answers(
        &self,
        checkpoint_id: CheckpointId,
        answers: &[String],
    ) -> Result<QuizResult, ApiError> {
        let mut state = self.enter(Endpoint::Submit)?;
        state.submitted.push(answers.to_vec());
        state
            .quiz_results
            .get(&checkpoint_id)
            .cloned()
            .ok_or_else(|| not_found("Checkpoint"))
    }

    async fn simplified_explanation(
        &self,
        checkpoint_id: CheckpointId,
        attempt: u32,
    ) -> Result<SimplifiedExplanation, ApiError> {
        let state = self.enter(Endpoint::Simplified)?;
        let base = state
            .simplified
            .get(&checkpoint_id)
            .ok_or_else(|| not_found("Checkpoint"))?;
        Ok(SimplifiedExplanation {
            checkpoint_id,
            attempt,
            explanation: format!("{base} (attempt {attempt})"),
            weak_areas: Vec::new(),
        })
    }

    async fn complete_session(
        &self,
        session_id: SessionId,
    ) -> Result<SessionCompletion, ApiError> {
        let mut state = self.enter(Endpoint::CompleteSession)?;
        let completion = state
            .completion
            .clone()
            .ok_or_else(|| ApiError::rejected(500, None))?;
        let now = fixed_now();
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|session| session.id() == session_id)
        {
            session.mark_completed(now, completion.total_xp_earned);
        }
        Ok(completion)
    }

    async fn completion_status(
        &self,
        session_id: SessionId,
    ) -> Result<CompletionStatus, ApiError> {
        let state = self.enter(Endpoint::CompletionStatus)?;
        let checkpoints = state
            .checkpoints
            .get(&session_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let total = checkpoints.len();
        let completed = checkpoints.iter().filter(|cp| cp.is_completed()).count();
        Ok(CompletionStatus {
            can_complete: total > 0 && completed == total,
            completed_count: u32::try_from(completed).unwrap_or(u32::MAX),
            total_count: u32::try_from(total).unwrap_or(u32::MAX),
        })
    }

    async fn history(&self) -> Result<Vec<Session>, ApiError> {
        let state = self.enter(Endpoint::History)?;
        let mut sessions = state.sessions.clone();
        sessions.sort_by_key(|session| std::cmp::Reverse(session.created_at()));
        Ok(sessions)
    }

    async fn learning_overview(&self) -> Result<LearningOverview, ApiError> {
        let state = self.enter(Endpoint::Overview)?;
        Ok(state.overview.clone())
    }

    async fn progress_stats(&self) -> Result<ProgressStats, ApiError> {
        let state = self.enter(Endpoint::Progress)?;
        Ok(state.progress.clone())
    }

    async fn session_details(&self, session_id: SessionId) -> Result<SessionDetails, ApiError> {
        let state = self.enter(Endpoint::SessionDetails)?;
        let session = state
            .sessions
            .iter()
            .find(|session| session.id() == session_id)
            .cloned()
            .ok_or_else(|| not_found("Session"))?;
        let checkpoints = state
            .checkpoints
            .get(&session_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|checkpoint| {
                let scores = state
                    .scores
                    .get(&checkpoint.id())
                    .cloned()
                    .unwrap_or_default();
                CheckpointAttempts {
                    checkpoint: checkpoint.clone(),
                    attempts: u32::try_from(scores.len()).unwrap_or(u32::MAX),
                    scores,
                }
            })
            .collect();
        Ok(SessionDetails {
            session,
            checkpoints,
        })
    }

    async fn badges(&self) -> Result<Vec<Badge>, ApiError> {
        let state = self.enter(Endpoint::Badges)?;
        let mut badges = state.badges.clone();
        badges.sort_by_key(|badge| std::cmp::Reverse(badge.earned_at));
        Ok(badges)
    }

    async fn check_badges(&self) -> Result<Vec<AwardedBadge>, ApiError> {
        let mut state = self.enter(Endpoint::CheckBadges)?;
        let awarded = std::mem::take(&mut state.due_badges);
        let next_id = state.badges.iter().map(|badge| badge.id).max().unwrap_or(0);
        for (offset, badge) in (1..).zip(&awarded) {
            let badge = Badge {
                id: next_id + offset,
                name: badge.name.clone(),
                kind: "milestone".to_string(),
                description: badge.description.clone(),
                earned_at: fixed_now(),
            };
            state.badges.push(badge);
        }
        Ok(awarded)
    }

    async fn set_tutor_mode(&self, mode: TutorMode) -> Result<UserProfile, ApiError> {
        let mut state = self.enter(Endpoint::TutorMode)?;
        Self::require_token(&state)?;
        let profile = state.profile.as_mut().ok_or_else(|| not_found("User"))?;
        profile.tutor_mode = mode.as_str().to_string();
        Ok(profile.clone())
    }
}
