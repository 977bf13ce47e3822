use dioxus::prelude::*;
use dioxus_router::Link;

use conceptly_core::model::SessionId;

use super::dashboard::SessionCard;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptRowVm, map_session_cards, map_session_details};

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();

    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let sessions = progress
                .history()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok::<_, ViewError>(map_session_cards(&sessions))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page history-page",
            header { class: "page__header",
                h2 { "Learning history" }
                p { "Your complete learning journey" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading history..." }
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
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    div { class: "empty-state",
                        h3 { "No sessions yet" }
                        p { "Start your first learning journey to see your history" }
                        Link { class: "btn btn-primary", to: Route::Dashboard {}, "Pick a topic" }
                    }
                },
                ViewState::Ready(cards) => rsx! {
                    ul { class: "session-list",
                        for card in cards {
                            SessionCard { key: "{card.id}", card, show_details: true }
                        }
                    }
                },
            }
        }
    }
}

#[component]
pub fn SessionDetailsView(session_id: u64) -> Element {
    rsx! {
        SessionDetailsPage { key: "{session_id}", session_id }
    }
}

#[component]
fn SessionDetailsPage(session_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();

    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let details = progress
                .session_details(SessionId::new(session_id))
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok::<_, ViewError>(map_session_details(&details))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page session-details-page",
            Link { class: "btn btn-ghost", to: Route::History {}, "Back to history" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading session..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(details) => rsx! {
                    header { class: "page__header",
                        h2 { "{details.topic}" }
                        p { class: "session-card__meta",
                            span { class: "{details.card.status_class}", "{details.card.status_label}" }
                            " · Started {details.card.created_at_str}"
                            if let Some(completed) = details.completed_label.clone() {
                                " · {completed}"
                            }
                            if let Some(xp) = details.card.xp_label.clone() {
                                " · {xp}"
                            }
                        }
                        p { "{details.attempts_label}" }
                    }
                    ol { class: "attempt-list",
                        for row in details.rows {
                            AttemptRow { key: "{row.number}", row }
                        }
                    }
                    if !details.completed {
                        Link {
                            class: "btn btn-primary",
                            to: Route::Session { session_id },
                            "Continue learning"
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn AttemptRow(row: AttemptRowVm) -> Element {
    rsx! {
        li { class: "attempt",
            span { class: "attempt__topic", "{row.number}. {row.topic}" }
            span { class: "attempt__count", "{row.attempts_label}" }
            if let Some(best) = row.best_label {
                span { class: "attempt__best", "{best}" }
            }
            if let Some(scores) = row.scores_label {
                span { class: "attempt__scores", "{scores}" }
            }
        }
    }
}
