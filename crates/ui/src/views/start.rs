use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

/// Landing route: dashboard when a stored session was restored, login otherwise.
#[component]
pub fn StartView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    use_effect(move || {
        let target = if ctx.take_signed_in_on_launch() {
            Route::Dashboard {}
        } else {
            Route::Login {}
        };
        let _ = navigator.replace(target);
    });

    rsx! {
        div { class: "page",
            p { "Loading..." }
        }
    }
}
