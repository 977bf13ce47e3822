use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use conceptly_core::reveal::{REVEAL_TICK, RevealPhase, RevealState, TickOutcome};

/// Snapshot published to renderers after every change of the reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealProgress {
    pub generation: u64,
    pub phase: RevealPhase,
    pub shown: usize,
    pub total: usize,
}

impl RevealProgress {
    fn of(state: &RevealState) -> Self {
        let (shown, total) = state.progress();
        Self {
            generation: state.generation(),
            phase: state.phase(),
            shown,
            total,
        }
    }
}

fn lock(state: &Mutex<RevealState>) -> MutexGuard<'_, RevealState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives a `RevealState` with a tokio task, one character per period.
///
/// At most one task is live. Starting, resetting or dropping the timer aborts
/// the running task.
pub struct RevealTimer {
    state: Arc<Mutex<RevealState>>,
    progress: Arc<watch::Sender<RevealProgress>>,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl Default for RevealTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(REVEAL_TICK)
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let state = RevealState::new();
        let (progress, _) = watch::channel(RevealProgress::of(&state));
        Self {
            state: Arc::new(Mutex::new(state)),
            progress: Arc::new(progress),
            task: None,
            period,
        }
    }

    /// Receiver that changes whenever the displayed prefix changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RevealProgress> {
        self.progress.subscribe()
    }

    #[must_use]
    pub fn progress(&self) -> RevealProgress {
        RevealProgress::of(&lock(&self.state))
    }

    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        lock(&self.state).phase()
    }

    #[must_use]
    pub fn displayed(&self) -> String {
        lock(&self.state).displayed().to_string()
    }

    /// Reveal `text` from the start, replacing whatever was revealing.
    pub fn start(&mut self, text: &str) {
        self.cancel();
        let snapshot = {
            let mut state = lock(&self.state);
            state.start(text);
            RevealProgress::of(&state)
        };
        self.progress.send_replace(snapshot);
        if snapshot.phase != RevealPhase::Revealing {
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!("no async runtime available, showing text at once");
            self.skip();
            return;
        };

        let state = Arc::clone(&self.state);
        let progress = Arc::clone(&self.progress);
        let period = self.period;
        let generation = snapshot.generation;
        self.task = Some(handle.spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let (outcome, snapshot) = {
                    let mut state = lock(&state);
                    let outcome = state.tick(generation);
                    (outcome, RevealProgress::of(&state))
                };
                match outcome {
                    TickOutcome::Advanced => {
                        progress.send_replace(snapshot);
                    }
                    TickOutcome::Finished => {
                        progress.send_replace(snapshot);
                        break;
                    }
                    TickOutcome::Ignored => break,
                }
            }
        }));
    }

    /// Show the full text immediately.
    pub fn skip(&mut self) {
        self.cancel();
        let snapshot = {
            let mut state = lock(&self.state);
            if !state.skip() {
                return;
            }
            RevealProgress::of(&state)
        };
        self.progress.send_replace(snapshot);
    }

    /// Stop revealing and clear the text.
    pub fn reset(&mut self) {
        self.cancel();
        let snapshot = {
            let mut state = lock(&self.state);
            state.reset();
            RevealProgress::of(&state)
        };
        self.progress.send_replace(snapshot);
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_TICK: Duration = Duration::from_millis(7);

    #[tokio::test(start_paused = true)]
    async fn reveals_one_char_per_tick() {
        let mut timer = RevealTimer::new();
        timer.start("abcd");
        assert_eq!(timer.displayed(), "");

        tokio::time::sleep(REVEAL_TICK * 2 + HALF_TICK).await;
        assert_eq!(timer.displayed(), "ab");
        assert_eq!(timer.phase(), RevealPhase::Revealing);

        tokio::time::sleep(REVEAL_TICK * 2).await;
        assert_eq!(timer.displayed(), "abcd");
        assert_eq!(timer.phase(), RevealPhase::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_discards_previous_text() {
        let mut timer = RevealTimer::new();
        timer.start("first text");
        tokio::time::sleep(REVEAL_TICK * 3 + HALF_TICK).await;
        timer.start("xy");
        assert_eq!(timer.displayed(), "");
        tokio::time::sleep(REVEAL_TICK * 10).await;
        assert_eq!(timer.displayed(), "xy");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_the_task() {
        let mut timer = RevealTimer::new();
        timer.start("abc");
        tokio::time::sleep(REVEAL_TICK + HALF_TICK).await;
        timer.reset();
        tokio::time::sleep(REVEAL_TICK * 5).await;
        assert_eq!(timer.displayed(), "");
        assert_eq!(timer.phase(), RevealPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_progress() {
        let mut timer = RevealTimer::new();
        let mut rx = timer.subscribe();
        timer.start("ab");
        rx.changed().await.unwrap();
        let mut last = *rx.borrow_and_update();
        while last.phase != RevealPhase::Complete {
            rx.changed().await.unwrap();
            last = *rx.borrow_and_update();
        }
        assert_eq!((last.shown, last.total), (2, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_completes_at_once() {
        let mut timer = RevealTimer::new();
        timer.start("hello");
        timer.skip();
        assert_eq!(timer.displayed(), "hello");
        assert_eq!(timer.phase(), RevealPhase::Complete);
    }

    #[test]
    fn without_runtime_text_is_shown_at_once() {
        let mut timer = RevealTimer::new();
        timer.start("offline");
        assert_eq!(timer.displayed(), "offline");
    }
}
