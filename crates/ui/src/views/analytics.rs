use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{BadgeVm, MetricVm, map_analytics};

#[component]
pub fn AnalyticsView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();

    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let report = progress
                .report()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok::<_, ViewError>(map_analytics(&report))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page analytics-page",
            header { class: "page__header",
                h2 { "Learning analytics" }
                p { "Track your progress, streaks and achievements" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading analytics..." }
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
                ViewState::Ready(vm) => rsx! {
                    section { class: "metric-grid",
                        for metric in vm.metrics {
                            MetricCard { key: "{metric.label}", metric }
                        }
                    }
                    section { class: "streaks",
                        p { "{vm.streak_label}" }
                        p { "{vm.longest_streak_label}" }
                    }
                    section { class: "analytics__badges",
                        h3 { "{vm.badges_label}" }
                        if vm.badges.is_empty() {
                            p { "No badges yet. Complete a session to earn your first one." }
                        } else {
                            BadgeGrid { badges: vm.badges }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn MetricCard(metric: MetricVm) -> Element {
    rsx! {
        div { class: "{metric.tone.class()}",
            span { class: "metric__label", "{metric.label}" }
            span { class: "metric__value", "{metric.value}" }
        }
    }
}

#[component]
pub(super) fn BadgeGrid(badges: Vec<BadgeVm>) -> Element {
    rsx! {
        ul { class: "badge-grid",
            for badge in badges {
                li { key: "{badge.id}", class: "badge-card",
                    span { class: "badge-card__icon", "{badge.icon}" }
                    h4 { class: "badge-card__title", "{badge.title}" }
                    p { class: "badge-card__description", "{badge.description}" }
                    p { class: "badge-card__date", "{badge.earned_on}" }
                }
            }
        }
    }
}
