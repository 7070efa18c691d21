use dioxus::prelude::*;

use quad_client::flows;
use quad_common::chat::{project_feed, EMPTY_FEED_BODY, EMPTY_FEED_HEADING};

use super::backend_api::use_backend;
use super::shared_state::use_shared_state;

#[component]
pub fn ChatView() -> Element {
    let backend = use_backend();
    let shared = use_shared_state();
    let mut draft = use_signal(String::new);
    let mut sending = use_signal(|| false);

    let (feed, author) = {
        let state = shared.read();
        let Some(identity) = state.identity.clone() else {
            return rsx! {};
        };
        (project_feed(&state.messages, &identity.uid), identity)
    };

    // Keep the feed pinned to the newest message after every redraw.
    use_effect(move || {
        let count = shared.read().messages.len();
        #[cfg(target_family = "wasm")]
        if count > 0 {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("chat-messages"))
            {
                el.set_scroll_top(el.scroll_height());
            }
        }
        #[cfg(not(target_family = "wasm"))]
        let _ = count;
    });

    let body = if feed.is_empty() {
        rsx! {
            div { class: "empty-chat",
                div { class: "icon", "💬" }
                h3 { "{EMPTY_FEED_HEADING}" }
                p { "{EMPTY_FEED_BODY}" }
            }
        }
    } else {
        rsx! {
            for view in feed {
                div { key: "{view.id.0}", class: view.bubble_class(),
                    div {
                        class: "message-avatar",
                        style: "background: {view.avatar_color}",
                        "{view.avatar_initial}"
                    }
                    div { class: "message-bubble",
                        div { class: "message-content", "{view.content}" }
                        div { class: "message-time", "{view.time_label}" }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "content-section",
            header { class: "content-header",
                h2 { "Campus Chat" }
                p { class: "content-subtitle", "Messages are anonymous" }
            }
            div { id: "chat-messages", class: "chat-messages", {body} }
            div { class: "chat-composer",
                textarea {
                    id: "chat-input",
                    class: "chat-input",
                    placeholder: "Share something with your campus...",
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
                button {
                    class: "send-btn",
                    disabled: *sending.read(),
                    onclick: {
                        let backend = backend.clone();
                        let author = author.clone();
                        move |_| {
                            let backend = backend.clone();
                            let author = author.clone();
                            spawn(async move {
                                sending.set(true);
                                let input = draft.read().clone();
                                match flows::send_message(&backend, &input, &author).await {
                                    Ok(Some(_)) => draft.set(String::new()),
                                    Ok(None) => {}
                                    Err(error) => {
                                        tracing::error!(%error, "message send failed");
                                        super::alert(
                                            &error.action_message("Failed to send message."),
                                        );
                                    }
                                }
                                sending.set(false);
                            });
                        }
                    },
                    if *sending.read() {
                        "⏳"
                    } else {
                        "➤"
                    }
                }
            }
        }
    }
}
