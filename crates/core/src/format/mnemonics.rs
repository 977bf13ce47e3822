/// Phrases that introduce a memory aid, matched case-insensitively.
///
/// Longer cues come first so "to help you remember:" wins over "remember:".
pub const MNEMONIC_CUES: [&str; 4] = [
    "to help you remember:",
    "think of it as:",
    "mnemonic:",
    "remember:",
];

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Collect memory-aid clauses in order of appearance, duplicates included.
///
/// Each clause runs from just after a cue up to and including the next
/// sentence terminator (or the end of the text).
#[must_use]
pub fn extract_mnemonics(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(cue) = cue_at(bytes, pos) else {
            pos += 1;
            continue;
        };
        // Cues are ASCII, so both ends of a match are char boundaries.
        let start = pos + cue.len();
        let tail = &text[start..];
        let end = tail
            .find(TERMINATORS)
            .map_or(tail.len(), |idx| idx + 1);
        let clause = tail[..end].trim();
        if !clause.is_empty() {
            found.push(clause.to_string());
        }
        pos = start + end;
    }

    found
}

fn cue_at(bytes: &[u8], pos: usize) -> Option<&'static str> {
    if pos > 0 && bytes[pos - 1].is_ascii_alphanumeric() {
        return None;
    }
    MNEMONIC_CUES.into_iter().find(|cue| {
        bytes
            .get(pos..pos + cue.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(cue.as_bytes()))
    })
}
