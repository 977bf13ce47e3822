#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use conceptly_core::model::{CheckpointId, SessionId};
use services::{
    ContentRequest, ContentResponse, Destination, LoadPhase, RevealProgress, SessionController,
};

use super::content::ContentBlocks;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    CheckpointItemVm, CheckpointState, CompletionSummaryVm, SessionScreenVm, map_completion,
    map_session_screen,
};

/// Run a detached explanation fetch and hand the answer back to the controller.
///
/// While the controller is lent out to an async operation the answer is
/// parked and applied by [`put_back`].
fn run_content_request(
    mut controller: Signal<Option<SessionController>>,
    mut parked: Signal<Vec<ContentResponse>>,
    request: Option<ContentRequest>,
) {
    let Some(request) = request else {
        return;
    };
    spawn(async move {
        let response = request.send().await;
        let mut guard = controller.write();
        match guard.as_mut() {
            Some(controller) => controller.apply_content(response),
            None => parked.write().push(response),
        }
    });
}

/// Return a borrowed controller, applying answers that arrived meanwhile.
fn put_back(
    mut controller: Signal<Option<SessionController>>,
    mut parked: Signal<Vec<ContentResponse>>,
    mut current: SessionController,
) {
    for response in parked.write().drain(..) {
        current.apply_content(response);
    }
    controller.set(Some(current));
}

fn destination_route(destination: Destination) -> Route {
    match destination {
        Destination::Dashboard => Route::Dashboard {},
    }
}

#[component]
pub fn SessionView(session_id: u64) -> Element {
    // keyed so that another session id mounts a fresh controller
    rsx! {
        SessionPage { key: "{session_id}", session_id }
    }
}

#[component]
fn SessionPage(session_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let id = SessionId::new(session_id);

    let controller = use_signal(|| Some(ctx.session_controller()));
    let parked = use_signal(Vec::<ContentResponse>::new);
    let summary = use_signal(|| None::<(CompletionSummaryVm, Destination)>);
    let reveal = use_signal(|| None::<RevealProgress>);
    let mut completing = use_signal(|| false);
    let reveal_rx = use_hook(|| {
        controller
            .peek()
            .as_ref()
            .map(SessionController::subscribe_reveal)
    });

    use_future(move || {
        let rx = reveal_rx.clone();
        let mut reveal = reveal;
        async move {
            let Some(mut rx) = rx else {
                return;
            };
            while rx.changed().await.is_ok() {
                let progress = *rx.borrow_and_update();
                reveal.set(Some(progress));
            }
        }
    });

    let resource = use_resource(move || {
        let mut controller = controller;
        async move {
            let Some(mut loaded) = controller.write().take() else {
                return Err(ViewError::Unknown);
            };
            loaded.load_session(id).await;
            let phase = loaded.phase();
            put_back(controller, parked, loaded);
            Ok::<_, ViewError>(phase)
        }
    });
    let state = view_state_from_resource(&resource);

    use_drop(move || {
        let mut controller = controller;
        if let Ok(mut guard) = controller.try_write() {
            if let Some(controller) = guard.as_mut() {
                controller.close();
            }
        }
    });

    let select = use_callback(move |checkpoint_id: CheckpointId| {
        let mut controller = controller;
        let request = controller
            .write()
            .as_mut()
            .and_then(|controller| controller.begin_select(checkpoint_id));
        run_content_request(controller, parked, request);
    });

    let retry_content = use_callback(move |checkpoint_id: CheckpointId| {
        let mut controller = controller;
        let request = controller
            .write()
            .as_mut()
            .and_then(|controller| controller.retry_content(checkpoint_id));
        run_content_request(controller, parked, request);
    });

    let skip = move |_: MouseEvent| {
        let mut controller = controller;
        if let Some(controller) = controller.write().as_mut() {
            controller.skip_reveal();
        }
    };

    let refresh = move |_: MouseEvent| {
        let mut controller = controller;
        spawn(async move {
            let Some(mut current) = controller.write().take() else {
                return;
            };
            current.refresh_completion_eligibility().await;
            put_back(controller, parked, current);
        });
    };

    let complete = use_callback(move |()| {
        if completing() {
            return;
        }
        completing.set(true);
        let mut controller = controller;
        let mut completing = completing;
        let mut summary = summary;
        spawn(async move {
            let Some(mut current) = controller.write().take() else {
                completing.set(false);
                return;
            };
            let result = current.complete_session().await;
            put_back(controller, parked, current);
            completing.set(false);
            if let Ok(outcome) = result {
                summary.set(Some((map_completion(&outcome), outcome.navigate_to)));
            }
        });
    });

    let leave = move |_: MouseEvent| {
        if let Some((_, destination)) = summary() {
            let _ = navigator.replace(destination_route(destination));
        }
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SessionTestHandles>() {
                handles.register(complete);
            }
        }
    }

    // Re-render on every reveal tick.
    let _ = reveal.read();
    let screen = controller.read().as_ref().and_then(map_session_screen);
    let failure_message = controller
        .read()
        .as_ref()
        .and_then(|controller| controller.message().map(ToString::to_string))
        .unwrap_or_else(|| ViewError::Unknown.message().to_string());

    rsx! {
        div { class: "page session-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "session-loading", "Preparing your learning path..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(LoadPhase::Failed) => rsx! {
                    div { class: "session-failed",
                        p { role: "alert", "{failure_message}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                        Link { class: "btn btn-ghost", to: Route::Dashboard {}, "Back to dashboard" }
                    }
                },
                ViewState::Ready(_) => match (screen, summary()) {
                    (_, Some((summary, _))) => rsx! {
                        CompletionPanel { summary, on_leave: leave }
                    },
                    (None, None) => rsx! {
                        p { class: "session-loading", "Loading..." }
                    },
                    (Some(screen), None) => rsx! {
                        SessionLayout {
                            session_id,
                            screen,
                            completing: completing(),
                            on_select: select,
                            on_retry: retry_content,
                            on_skip: skip,
                            on_refresh: refresh,
                            on_complete: move |_| complete.call(()),
                        }
                    },
                },
            }
        }
    }
}

#[component]
fn SessionLayout(
    session_id: u64,
    screen: SessionScreenVm,
    completing: bool,
    on_select: EventHandler<CheckpointId>,
    on_retry: EventHandler<CheckpointId>,
    on_skip: EventHandler<MouseEvent>,
    on_refresh: EventHandler<MouseEvent>,
    on_complete: EventHandler<MouseEvent>,
) -> Element {
    let active_id = screen.active.as_ref().map(|active| active.id);

    rsx! {
        header { class: "session-header",
            h2 { class: "session-header__topic", "{screen.topic}" }
            p { class: "session-header__progress", "{screen.progress_label}" }
            div { class: "progress",
                div { class: "progress__bar", style: "width: {screen.progress_percent}%" }
            }
        }
        div { class: "session-body",
            nav { class: "checkpoint-list",
                ol {
                    for item in screen.items {
                        CheckpointRow { key: "{item.id}", item, on_select }
                    }
                }
                button {
                    class: "btn btn-ghost",
                    id: "session-refresh",
                    r#type: "button",
                    onclick: move |evt| on_refresh.call(evt),
                    "Refresh progress"
                }
            }
            section { class: "checkpoint-panel",
                if let Some(active) = screen.active {
                    h3 { class: "checkpoint-panel__title", "{active.title}" }
                    if !active.objectives.is_empty() {
                        ul { class: "checkpoint-panel__objectives",
                            for objective in active.objectives {
                                li { "{objective}" }
                            }
                        }
                    }
                    if let Some(message) = screen.message.clone() {
                        div { class: "session-message", role: "alert",
                            p { "{message}" }
                            if screen.content_failed {
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| on_retry.call(CheckpointId::new(active.id)),
                                    "Try again"
                                }
                            }
                        }
                    }
                    ContentBlocks { blocks: screen.blocks }
                    div { class: "checkpoint-panel__actions",
                        if screen.revealing {
                            button {
                                class: "btn btn-ghost",
                                id: "session-skip",
                                r#type: "button",
                                onclick: move |evt| on_skip.call(evt),
                                "Show all"
                            }
                        }
                        if active.completed {
                            span { class: "badge badge--done", "Checkpoint completed" }
                        } else {
                            Link {
                                class: "btn btn-primary",
                                to: Route::Quiz { session_id, checkpoint_id: active.id },
                                "Take the quiz"
                            }
                        }
                    }
                } else {
                    p { "No checkpoints in this session yet." }
                }
            }
        }
        footer { class: "session-footer",
            if screen.completed {
                p { class: "badge badge--done", "Session completed" }
            } else if screen.can_complete {
                button {
                    class: "btn btn-primary",
                    id: "session-complete",
                    r#type: "button",
                    disabled: completing,
                    onclick: move |evt| on_complete.call(evt),
                    if completing { "Completing..." } else { "Complete session" }
                }
            }
            if let (Some(message), None) = (screen.message, active_id) {
                p { class: "session-message", role: "alert", "{message}" }
            }
        }
    }
}

#[component]
fn CompletionPanel(summary: CompletionSummaryVm, on_leave: EventHandler<MouseEvent>) -> Element {
    rsx! {
        section { class: "completion-summary", role: "status",
            h2 { "{summary.message}" }
            p { class: "completion-summary__xp", "{summary.xp_label}" }
            if let Some(level_up) = summary.level_up_label {
                p { class: "completion-summary__level", "{level_up}" }
            }
            if !summary.badges.is_empty() {
                h3 { "New badges" }
                ul { class: "completion-summary__badges",
                    for badge in summary.badges {
                        li { key: "{badge}", "{badge}" }
                    }
                }
            }
            button {
                class: "btn btn-primary",
                id: "session-leave",
                r#type: "button",
                onclick: move |evt| on_leave.call(evt),
                "Back to dashboard"
            }
        }
    }
}

#[component]
fn CheckpointRow(item: CheckpointItemVm, on_select: EventHandler<CheckpointId>) -> Element {
    let locked = item.state == CheckpointState::Locked;
    let id = CheckpointId::new(item.id);

    rsx! {
        li {
            button {
                class: "{item.state.class()}",
                r#type: "button",
                disabled: locked,
                onclick: move |_| on_select.call(id),
                span { class: "checkpoint__number", "{item.number}" }
                span { class: "checkpoint__topic", "{item.topic}" }
                if let Some(score) = item.score_label.clone() {
                    span { class: "checkpoint__score", "{score}" }
                }
                if locked {
                    span { class: "checkpoint__lock", "Locked" }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SessionTestHandles {
    complete: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl SessionTestHandles {
    pub(crate) fn register(&self, complete: Callback<()>) {
        *self.complete.borrow_mut() = Some(complete);
    }

    pub(crate) fn complete(&self) -> Callback<()> {
        (*self.complete.borrow()).expect("session complete registered")
    }
}
