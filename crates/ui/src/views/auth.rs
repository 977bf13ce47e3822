use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::auth_error_message;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let auth = ctx.auth();
        let (email_value, password_value) = (email(), password());
        spawn(async move {
            let result = auth.login(&email_value, &password_value).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    error.set(None);
                    let _ = navigator.replace(Route::Dashboard {});
                }
                Err(err) => error.set(Some(auth_error_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page auth-page",
            h2 { "Sign in" }
            form { class: "auth-form", onsubmit: on_submit,
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", role: "alert", "{message}" }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
            p { class: "auth-switch",
                "No account yet? "
                Link { to: Route::Register {}, "Create one" }
            }
        }
    }
}

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let auth = ctx.auth();
        let form = (name(), email(), password(), confirm());
        spawn(async move {
            let (name, email, password, confirm) = form;
            let result = auth.register(&name, &email, &password, &confirm).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    error.set(None);
                    let _ = navigator.replace(Route::Dashboard {});
                }
                Err(err) => error.set(Some(auth_error_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page auth-page",
            h2 { "Create your account" }
            form { class: "auth-form", onsubmit: on_submit,
                label { r#for: "register-name", "Name" }
                input {
                    id: "register-name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                label { r#for: "register-email", "Email" }
                input {
                    id: "register-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "register-password", "Password" }
                input {
                    id: "register-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                label { r#for: "register-confirm", "Confirm password" }
                input {
                    id: "register-confirm",
                    r#type: "password",
                    value: "{confirm}",
                    oninput: move |evt| confirm.set(evt.value()),
                }
                p { class: "form-hint", "At least 6 characters, with letters and numbers." }
                if let Some(message) = error() {
                    p { class: "form-error", role: "alert", "{message}" }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                    if busy() { "Creating account..." } else { "Create account" }
                }
            }
            p { class: "auth-switch",
                "Already registered? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
