use serde::Serialize;

/// Inline run inside a block's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Plain(String),
    Strong(String),
}

impl Span {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Strong(text) => text,
        }
    }
}

const STRONG: &str = "**";

/// Split text on paired `**` markers. An unpaired marker is kept as plain text.
#[must_use]
pub fn inline_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(STRONG) {
        let after_open = &rest[open + STRONG.len()..];
        let Some(close) = after_open.find(STRONG) else {
            break;
        };
        if close == 0 {
            // "****" carries no text; keep it literal and move on.
            push_plain(&mut spans, &rest[..open + 2 * STRONG.len()]);
            rest = &after_open[STRONG.len()..];
            continue;
        }
        push_plain(&mut spans, &rest[..open]);
        spans.push(Span::Strong(after_open[..close].to_string()));
        rest = &after_open[close + STRONG.len()..];
    }

    push_plain(&mut spans, rest);
    spans
}

/// Text with strong markers removed.
#[must_use]
pub fn plain_text(text: &str) -> String {
    inline_spans(text).iter().map(Span::text).collect()
}

fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Span::Plain(prev)) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(Span::Plain(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_strong_runs() {
        assert_eq!(
            inline_spans("a **b** c **d**"),
            vec![
                Span::Plain("a ".into()),
                Span::Strong("b".into()),
                Span::Plain(" c ".into()),
                Span::Strong("d".into()),
            ]
        );
    }

    #[test]
    fn unpaired_marker_stays_plain() {
        assert_eq!(
            inline_spans("x **y"),
            vec![Span::Plain("x **y".into())]
        );
    }

    #[test]
    fn empty_pair_is_literal() {
        assert_eq!(inline_spans("a****b"), vec![Span::Plain("a****b".into())]);
    }

    #[test]
    fn plain_text_drops_markers() {
        assert_eq!(plain_text("**Key** idea"), "Key idea");
        assert!(inline_spans("").is_empty());
    }
}
