use dioxus::prelude::*;

use crate::vm::{BlockVm, SpanVm};

/// Formatted explanation text.
#[component]
pub(crate) fn ContentBlocks(blocks: Vec<BlockVm>) -> Element {
    rsx! {
        div { class: "content-blocks",
            for (index, block) in blocks.into_iter().enumerate() {
                match block {
                    BlockVm::Heading { level: 1, spans } => rsx! {
                        h2 { key: "{index}", class: "content-heading", Spans { spans } }
                    },
                    BlockVm::Heading { level: 2, spans } => rsx! {
                        h3 { key: "{index}", class: "content-heading", Spans { spans } }
                    },
                    BlockVm::Heading { spans, .. } => rsx! {
                        h4 { key: "{index}", class: "content-heading", Spans { spans } }
                    },
                    BlockVm::Paragraph { spans } => rsx! {
                        p { key: "{index}", class: "content-paragraph",
                            Spans { spans }
                        }
                    },
                    BlockVm::List { items } => rsx! {
                        ul { key: "{index}", class: "content-list",
                            for item in items {
                                li { Spans { spans: item } }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn Spans(spans: Vec<SpanVm>) -> Element {
    rsx! {
        for part in spans {
            if part.strong {
                strong { "{part.text}" }
            } else {
                "{part.text}"
            }
        }
    }
}
