//! Lightweight markup used by tutor explanations.
//!
//! The backend writes explanations in a small Markdown subset. This module turns
//! that text into typed blocks so any renderer (desktop, terminal, web) can
//! display it without re-parsing, and pulls out memory-aid sentences.

mod blocks;
mod inline;
mod mnemonics;

pub use blocks::{Block, format};
pub use inline::{Span, inline_spans, plain_text};
pub use mnemonics::{MNEMONIC_CUES, extract_mnemonics};
