//! Checkpoint progression behind the session view.

mod reveal_timer;
mod session_controller;

pub use reveal_timer::{RevealProgress, RevealTimer};
pub use session_controller::{
    CompletionOutcome, ContentRequest, ContentResponse, Destination, LoadPhase, SessionController,
    ViewMessage,
};
