use conceptly_core::format::{Block, Span, inline_spans};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanVm {
    pub text: String,
    pub strong: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockVm {
    Heading { level: u8, spans: Vec<SpanVm> },
    Paragraph { spans: Vec<SpanVm> },
    List { items: Vec<Vec<SpanVm>> },
}

fn map_spans(text: &str) -> Vec<SpanVm> {
    inline_spans(text)
        .into_iter()
        .map(|span| match span {
            Span::Plain(text) => SpanVm {
                text,
                strong: false,
            },
            Span::Strong(text) => SpanVm { text, strong: true },
        })
        .collect()
}

#[must_use]
pub fn map_blocks(blocks: &[Block]) -> Vec<BlockVm> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Heading { level, text } => BlockVm::Heading {
                level: *level,
                spans: map_spans(text),
            },
            Block::Paragraph { text } => BlockVm::Paragraph {
                spans: map_spans(text),
            },
            Block::List { items } => BlockVm::List {
                items: items.iter().map(|item| map_spans(item)).collect(),
            },
        })
        .collect()
}
