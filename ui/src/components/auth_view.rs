use dioxus::prelude::*;

use quad_client::flows;
use quad_common::forms::{LoginInput, SignupInput};
use quad_common::nav::AuthTab;

use super::backend_api::use_backend;
use super::notices::{self, use_notices, NoticeBanners};

#[component]
pub fn AuthView() -> Element {
    let mut tab = use_signal(AuthTab::default);
    let mut notice_state = use_notices();
    let active = *tab.read();

    let form = match active {
        AuthTab::Login => rsx! { LoginForm {} },
        AuthTab::Signup => rsx! { SignupForm {} },
    };

    rsx! {
        div { class: "auth-container",
            div { class: "auth-box",
                h1 { class: "auth-title", "Quad" }
                p { class: "auth-subtitle", "Your Campus Community" }
                div { class: "auth-tabs",
                    button {
                        class: if active == AuthTab::Login { "tab-button active" } else { "tab-button" },
                        onclick: move |_| {
                            // Switching tabs drops any leftover banner.
                            notice_state.write().dismiss();
                            tab.set(AuthTab::Login);
                        },
                        "Login"
                    }
                    button {
                        class: if active == AuthTab::Signup { "tab-button active" } else { "tab-button" },
                        onclick: move |_| {
                            notice_state.write().dismiss();
                            tab.set(AuthTab::Signup);
                        },
                        "Sign Up"
                    }
                }
                NoticeBanners {}
                {form}
            }
        }
    }
}

#[component]
fn LoginForm() -> Element {
    let backend = use_backend();
    let notice_state = use_notices();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);

    rsx! {
        div { class: "auth-form",
            div { class: "form-group",
                label { "Email" }
                input {
                    r#type: "email",
                    placeholder: "you@campus.edu",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
            }
            div { class: "form-group",
                label { "Password" }
                input {
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
            }
            button {
                class: "auth-button",
                disabled: *busy.read(),
                onclick: move |_| {
                    let backend = backend.clone();
                    spawn(async move {
                        busy.set(true);
                        let input = LoginInput {
                            email: email.read().clone(),
                            password: password.read().clone(),
                        };
                        match flows::submit_login(&backend, &input).await {
                            Ok(_) => {
                                notices::show_success(notice_state, "Login successful! Welcome back.");
                            }
                            Err(error) => notices::show_error(notice_state, error.user_message()),
                        }
                        busy.set(false);
                    });
                },
                if *busy.read() {
                    span { class: "loading" }
                } else {
                    "Login"
                }
            }
        }
    }
}

#[component]
fn SignupForm() -> Element {
    let backend = use_backend();
    let notice_state = use_notices();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut busy = use_signal(|| false);

    rsx! {
        div { class: "auth-form",
            div { class: "form-group",
                label { "Full Name" }
                input {
                    r#type: "text",
                    placeholder: "Jordan Lee",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
            }
            div { class: "form-group",
                label { "Email" }
                input {
                    r#type: "email",
                    placeholder: "you@campus.edu",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
            }
            div { class: "form-group",
                label { "Password" }
                input {
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
            }
            div { class: "form-group",
                label { "Confirm Password" }
                input {
                    r#type: "password",
                    value: "{confirm}",
                    oninput: move |evt| confirm.set(evt.value()),
                }
            }
            button {
                class: "auth-button",
                disabled: *busy.read(),
                onclick: move |_| {
                    let backend = backend.clone();
                    spawn(async move {
                        busy.set(true);
                        let input = SignupInput {
                            name: name.read().clone(),
                            email: email.read().clone(),
                            password: password.read().clone(),
                            confirm: confirm.read().clone(),
                        };
                        match flows::submit_signup(&backend, &input).await {
                            Ok(_) => notices::show_success(
                                notice_state,
                                "Account created successfully! Welcome to Quad.",
                            ),
                            Err(error) => notices::show_error(notice_state, error.user_message()),
                        }
                        busy.set(false);
                    });
                },
                if *busy.read() {
                    span { class: "loading" }
                } else {
                    "Create Account"
                }
            }
        }
    }
}
