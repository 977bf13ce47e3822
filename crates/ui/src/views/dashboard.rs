use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use conceptly_core::model::TutorMode;
use services::{AuthError, RECENT_BADGES, RECENT_SESSIONS, SessionError};

use super::analytics::BadgeGrid;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    BadgeVm, ProfileVm, SessionCardVm, create_session_error_message, map_badges, map_profile,
    map_session_cards, tutor_mode_options,
};

const TUTOR_MODE_FAILED: &str = "Failed to update tutor mode.";

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    profile: ProfileVm,
    tutor_mode: TutorMode,
    sessions: Vec<SessionCardVm>,
    badges: Vec<BadgeVm>,
}

fn profile_error(err: &AuthError) -> ViewError {
    match err {
        AuthError::SignedOut => ViewError::SignedOut,
        _ => ViewError::Unknown,
    }
}

fn sessions_error(err: &SessionError) -> ViewError {
    match err {
        SessionError::Api(api) if api.is_unauthorized() => ViewError::SignedOut,
        _ => ViewError::Unknown,
    }
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let sessions = ctx.sessions();
    let gamification = ctx.gamification();

    let resource = use_resource(move || {
        let auth = auth.clone();
        let sessions = sessions.clone();
        let gamification = gamification.clone();
        async move {
            let profile = auth.profile().await.map_err(|err| profile_error(&err))?;
            let recent = sessions
                .recent_sessions(RECENT_SESSIONS)
                .await
                .map_err(|err| sessions_error(&err))?;
            // The dashboard still renders when badges cannot be loaded.
            let badges = gamification
                .recent_badges(RECENT_BADGES)
                .await
                .unwrap_or_default();
            Ok::<_, ViewError>(DashboardData {
                profile: map_profile(&profile),
                tutor_mode: profile.mode(),
                sessions: map_session_cards(&recent),
                badges: map_badges(&badges),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_logout = {
        let auth = ctx.auth();
        move |_: MouseEvent| {
            let auth = auth.clone();
            spawn(async move {
                // The in-memory token is dropped even if the stored pair cannot be removed.
                let _ = auth.logout().await;
                let _ = navigator.replace(Route::Login {});
            });
        }
    };

    rsx! {
        div { class: "page dashboard",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err @ ViewError::SignedOut) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
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
                ViewState::Ready(data) => rsx! {
                    header { class: "dashboard__header",
                        div {
                            h2 { "{data.profile.greeting}" }
                            p { class: "dashboard__level",
                                span { "{data.profile.level_label}" }
                                " · "
                                span { "{data.profile.xp_label}" }
                            }
                            div { class: "progress",
                                div {
                                    class: "progress__bar",
                                    style: "width: {data.profile.level_progress}%",
                                }
                            }
                        }
                        button {
                            class: "btn btn-ghost",
                            id: "dashboard-logout",
                            r#type: "button",
                            onclick: on_logout,
                            "Sign out"
                        }
                    }
                    TutorModePicker { initial: data.tutor_mode }
                    NewSessionForm {}
                    if !data.badges.is_empty() {
                        section { class: "dashboard__badges",
                            h3 { "Recent badges" }
                            BadgeGrid { badges: data.badges }
                        }
                    }
                    section { class: "dashboard__recent",
                        h3 { "Recent sessions" }
                        if data.sessions.is_empty() {
                            p { "No sessions yet. Pick a topic to start learning." }
                        } else {
                            ul { class: "session-list",
                                for card in data.sessions {
                                    SessionCard { key: "{card.id}", card }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn TutorModePicker(initial: TutorMode) -> Element {
    let ctx = use_context::<AppContext>();
    let mut mode = use_signal(|| initial);
    let mut error = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let on_change = move |evt: FormEvent| {
        let Ok(selected) = evt.value().parse::<TutorMode>() else {
            return;
        };
        if busy() || selected == mode() {
            return;
        }
        let previous = mode();
        mode.set(selected);
        busy.set(true);
        let gamification = ctx.gamification();
        spawn(async move {
            let result = gamification.set_tutor_mode(selected).await;
            busy.set(false);
            match result {
                Ok(profile) => {
                    mode.set(profile.mode());
                    error.set(None);
                }
                Err(_) => {
                    mode.set(previous);
                    error.set(Some(TUTOR_MODE_FAILED));
                }
            }
        });
    };

    rsx! {
        section { class: "tutor-mode",
            h3 { "Tutor personality" }
            select {
                id: "tutor-mode",
                disabled: busy(),
                onchange: on_change,
                for option in tutor_mode_options(mode()) {
                    option {
                        key: "{option.value}",
                        value: option.value,
                        selected: option.selected,
                        "{option.label}"
                    }
                }
            }
            if let Some(message) = error() {
                p { class: "form-error", role: "alert", "{message}" }
            }
        }
    }
}

#[component]
fn NewSessionForm() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut topic = use_signal(String::new);
    let mut notes = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let sessions = ctx.sessions();
        let (topic_value, notes_value) = (topic(), notes());
        spawn(async move {
            let result = sessions
                .create_session(&topic_value, Some(&notes_value))
                .await;
            busy.set(false);
            match result {
                Ok(session) => {
                    error.set(None);
                    let _ = navigator.push(Route::Session {
                        session_id: session.id().value(),
                    });
                }
                Err(err) => error.set(Some(create_session_error_message(&err))),
            }
        });
    };

    rsx! {
        form { class: "new-session", onsubmit: on_submit,
            h3 { "What do you want to learn?" }
            input {
                id: "new-session-topic",
                placeholder: "e.g. How do black holes form?",
                value: "{topic}",
                oninput: move |evt| topic.set(evt.value()),
            }
            textarea {
                id: "new-session-notes",
                placeholder: "Anything you already know or want to focus on (optional)",
                value: "{notes}",
                oninput: move |evt| notes.set(evt.value()),
            }
            if let Some(message) = error() {
                p { class: "form-error", role: "alert", "{message}" }
            }
            button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                if busy() { "Starting..." } else { "Start learning" }
            }
        }
    }
}

#[component]
pub(super) fn SessionCard(card: SessionCardVm, #[props(default)] show_details: bool) -> Element {
    rsx! {
        li { class: "session-card",
            Link { class: "session-card__link", to: Route::Session { session_id: card.id },
                span { class: "session-card__topic", "{card.topic}" }
                span { class: "{card.status_class}", "{card.status_label}" }
            }
            p { class: "session-card__meta",
                "Started {card.created_at_str}"
                if let Some(xp) = card.xp_label {
                    " · {xp}"
                }
            }
            if show_details {
                Link {
                    class: "btn btn-ghost session-card__details",
                    to: Route::SessionDetails { session_id: card.id },
                    "Details"
                }
            }
        }
    }
}
