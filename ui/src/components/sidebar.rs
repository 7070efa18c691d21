use dioxus::prelude::*;

use quad_common::nav::Section;

use super::backend_api::{use_backend_action, SessionAction};
use super::shared_state::{use_nav, use_shared_state};

#[component]
pub fn Sidebar() -> Element {
    let shared = use_shared_state();
    let mut nav = use_nav();
    let actions = use_backend_action();

    let state = shared.read();
    let Some(identity) = state.identity.clone() else {
        // Only rendered signed-in; the shell swaps views before this
        // can show stale data.
        return rsx! {};
    };
    let connected = state.connected;
    let last_error = state.last_error.clone();
    drop(state);

    let initials = identity.initials();
    let user_name = identity.display_label().to_owned();
    let user_email = identity.email.clone();

    let current = nav.read().clone();
    let sidebar_class = if current.menu_open {
        "sidebar mobile-open"
    } else {
        "sidebar"
    };
    let item_class = |section: Section| {
        if current.section == section {
            "nav-item active"
        } else {
            "nav-item"
        }
    };
    let status_class = if connected {
        "connection-status online"
    } else {
        "connection-status offline"
    };
    let error_line = last_error.map(|error| {
        rsx! {
            p { class: "connection-error", "{error}" }
        }
    });

    rsx! {
        button {
            class: "menu-toggle",
            onclick: move |_| nav.write().toggle_menu(),
            "☰"
        }
        aside { class: sidebar_class,
            div { class: "sidebar-header",
                h2 { class: "brand", "Quad" }
            }
            div { class: "user-info",
                div { class: "user-avatar", "{initials}" }
                div { class: "user-details",
                    p { class: "user-name", "{user_name}" }
                    p { class: "user-email", "{user_email}" }
                }
            }
            nav { class: "sidebar-nav",
                button {
                    class: item_class(Section::Chat),
                    onclick: move |_| nav.write().show_section(Section::Chat),
                    span { class: "nav-icon", "💬" }
                    "Campus Chat"
                }
                button {
                    class: item_class(Section::Marketplace),
                    onclick: move |_| nav.write().show_section(Section::Marketplace),
                    span { class: "nav-icon", "🛒" }
                    "Marketplace"
                }
            }
            div { class: "sidebar-footer",
                p { class: status_class,
                    span { class: "status-dot" }
                    if connected {
                        "Online"
                    } else {
                        "Offline"
                    }
                }
                {error_line}
                button {
                    class: "logout-button",
                    onclick: move |_| actions.send(SessionAction::Logout),
                    "Logout"
                }
            }
        }
    }
}
