use dioxus::prelude::*;
use dioxus_router::Link;

use conceptly_core::model::CheckpointId;
use services::{ApiError, SimplifiedExplanationFlow};

use super::content::ContentBlocks;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_blocks;

const RETRY_FAILED: &str = "Could not load another explanation. Please try again.";

fn load_error(err: &ApiError) -> ViewError {
    if err.is_unauthorized() {
        ViewError::SignedOut
    } else {
        ViewError::Unknown
    }
}

#[component]
pub fn ExplanationView(session_id: u64, checkpoint_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let checkpoint = CheckpointId::new(checkpoint_id);
    let flow = use_signal(|| Some(ctx.explanations().flow(checkpoint)));
    let mut error = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let resource = use_resource(move || {
        let mut flow = flow;
        async move {
            let Some(mut current) = flow.write().take() else {
                return Err(ViewError::Unknown);
            };
            let result = current.load().await.map(|_| ()).map_err(|err| load_error(&err));
            flow.set(Some(current));
            result
        }
    });
    let state = view_state_from_resource(&resource);

    let on_different = move |_: MouseEvent| {
        if busy() {
            return;
        }
        busy.set(true);
        let mut flow = flow;
        spawn(async move {
            let Some(mut current) = flow.write().take() else {
                busy.set(false);
                return;
            };
            let failed = current.different_approach().await.is_err();
            flow.set(Some(current));
            busy.set(false);
            error.set(failed.then_some(RETRY_FAILED));
        });
    };

    let (blocks, mnemonics, weak_areas) = flow
        .read()
        .as_ref()
        .map(|current: &SimplifiedExplanationFlow| {
            let weak_areas = current
                .current()
                .map(|explanation| explanation.weak_areas.clone())
                .unwrap_or_default();
            (map_blocks(&current.blocks()), current.mnemonics(), weak_areas)
        })
        .unwrap_or_default();

    rsx! {
        div { class: "page explanation-page",
            h2 { "Let's try that another way" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Finding a simpler explanation..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if !weak_areas.is_empty() {
                        p { class: "explanation__focus",
                            "Focusing on: "
                            for (i, area) in weak_areas.iter().enumerate() {
                                if i > 0 {
                                    ", "
                                }
                                strong { "{area}" }
                            }
                        }
                    }
                    ContentBlocks { blocks }
                    if !mnemonics.is_empty() {
                        aside { class: "mnemonics",
                            h3 { "Memory hooks" }
                            ul {
                                for mnemonic in mnemonics {
                                    li { "{mnemonic}" }
                                }
                            }
                        }
                    }
                    if let Some(message) = error() {
                        p { class: "form-error", role: "alert", "{message}" }
                    }
                    div { class: "explanation__actions",
                        button {
                            class: "btn btn-secondary",
                            id: "explanation-different",
                            r#type: "button",
                            disabled: busy(),
                            onclick: on_different,
                            if busy() { "Thinking..." } else { "Try a different approach" }
                        }
                        Link {
                            class: "btn btn-primary",
                            to: Route::Quiz { session_id, checkpoint_id },
                            "Retake quiz"
                        }
                        Link { class: "btn btn-ghost", to: Route::Session { session_id }, "Back to session" }
                    }
                },
            }
        }
    }
}
