//! Typewriter reveal of already-fetched text.
//!
//! `RevealState` is the pure state machine; scheduling ticks is left to the
//! caller. Every (re)start bumps a generation counter and ticks carry the
//! generation they were scheduled for, so a tick from a cancelled timer can
//! never write into a newer reveal.

use std::time::Duration;

/// Period between two revealed characters.
pub const REVEAL_TICK: Duration = Duration::from_millis(15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Revealing,
    Complete,
}

/// Result of applying one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more character is visible; keep ticking.
    Advanced,
    /// The last character became visible with this tick.
    Finished,
    /// The tick belongs to an older generation or the reveal is not running.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    target: String,
    // byte offset into `target`, always on a char boundary
    shown: usize,
    phase: RevealPhase,
    generation: u64,
}

impl Default for RevealState {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: String::new(),
            shown: 0,
            phase: RevealPhase::Idle,
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.phase == RevealPhase::Revealing
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Currently visible prefix of the target text.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.target[..self.shown]
    }

    /// Visible and total length, in characters.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (
            self.displayed().chars().count(),
            self.target.chars().count(),
        )
    }

    /// Drop any text and return to idle. Outstanding ticks become stale.
    pub fn reset(&mut self) -> u64 {
        self.target.clear();
        self.shown = 0;
        self.phase = RevealPhase::Idle;
        self.generation += 1;
        self.generation
    }

    /// Begin revealing `text` from an empty prefix and return the generation
    /// the ticks must carry. Empty text completes immediately.
    pub fn start(&mut self, text: impl Into<String>) -> u64 {
        self.target = text.into();
        self.shown = 0;
        self.generation += 1;
        self.phase = if self.target.is_empty() {
            RevealPhase::Complete
        } else {
            RevealPhase::Revealing
        };
        self.generation
    }

    /// Reveal the next character if `generation` is still current.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || self.phase != RevealPhase::Revealing {
            return TickOutcome::Ignored;
        }
        let step = self.target[self.shown..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        self.shown += step;
        if self.shown >= self.target.len() {
            self.shown = self.target.len();
            self.phase = RevealPhase::Complete;
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        }
    }

    /// Show the full text at once. Returns false when nothing was revealing.
    pub fn skip(&mut self) -> bool {
        if self.phase != RevealPhase::Revealing {
            return false;
        }
        self.shown = self.target.len();
        self.phase = RevealPhase::Complete;
        true
    }
}
