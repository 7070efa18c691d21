use dioxus::prelude::*;

use quad_client::flows;
use quad_common::forms::ListingInput;
use quad_common::listing::ListingCategory;

use super::backend_api::use_backend;
use super::notices::{self, use_notices};
use super::shared_state::{use_nav, use_shared_state};

fn parse_category(value: &str) -> Option<ListingCategory> {
    ListingCategory::all()
        .iter()
        .copied()
        .find(|c| c.token() == value)
}

/// The add-item modal. Mounted only while the overlay is open, so every
/// open starts from a fresh form.
#[component]
pub fn ListingForm() -> Element {
    let backend = use_backend();
    let shared = use_shared_state();
    let mut nav = use_nav();
    let notice_state = use_notices();

    let Some(seller) = shared.read().identity.clone() else {
        return rsx! {};
    };

    let mut title = use_signal(String::new);
    let mut price = use_signal(String::new);
    let mut category = use_signal(String::new);
    let mut description = use_signal(String::new);
    // Sellers almost always want to be reached at their account email.
    let mut contact = use_signal({
        let email = seller.email.clone();
        move || email
    });
    let mut busy = use_signal(|| false);

    rsx! {
        div { class: "modal active", onclick: move |_| nav.write().close_overlay(),
            div { class: "modal-content", onclick: move |evt| evt.stop_propagation(),
                div { class: "modal-header",
                    h2 { "Add New Item" }
                    button {
                        class: "close-button",
                        onclick: move |_| nav.write().close_overlay(),
                        "×"
                    }
                }
                div { class: "form-group",
                    label { "Title" }
                    input {
                        id: "item-title",
                        r#type: "text",
                        placeholder: "What are you selling?",
                        value: "{title}",
                        oninput: move |evt| title.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Price (₹)" }
                    input {
                        id: "item-price",
                        r#type: "number",
                        min: "0",
                        step: "0.01",
                        value: "{price}",
                        oninput: move |evt| price.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Category" }
                    select {
                        id: "item-category",
                        value: "{category}",
                        onchange: move |evt| category.set(evt.value()),
                        option { value: "", "Select a category" }
                        for entry in ListingCategory::all().iter().copied() {
                            {
                                let value = entry.token();
                                let label = entry.label();
                                rsx! {
                                    option { key: "{value}", value, "{label}" }
                                }
                            }
                        }
                    }
                }
                div { class: "form-group",
                    label { "Description" }
                    textarea {
                        id: "item-description",
                        placeholder: "Condition, age, pickup details...",
                        value: "{description}",
                        oninput: move |evt| description.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Contact" }
                    input {
                        id: "item-contact",
                        r#type: "text",
                        value: "{contact}",
                        oninput: move |evt| contact.set(evt.value()),
                    }
                }
                button {
                    id: "add-item-btn",
                    class: "submit-button",
                    disabled: *busy.read(),
                    onclick: {
                        let backend = backend.clone();
                        let seller = seller.clone();
                        move |_| {
                            let backend = backend.clone();
                            let seller = seller.clone();
                            spawn(async move {
                                busy.set(true);
                                let input = ListingInput {
                                    title: title.read().clone(),
                                    price: price.read().clone(),
                                    category: parse_category(&category.read()),
                                    description: description.read().clone(),
                                    contact: contact.read().clone(),
                                };
                                match flows::submit_listing(&backend, &input, &seller).await {
                                    Ok(_) => {
                                        nav.write().close_overlay();
                                        notices::show_success(
                                            notice_state,
                                            "Item added successfully! It will appear in the marketplace.",
                                        );
                                    }
                                    Err(error) => {
                                        tracing::error!(%error, "listing submit failed");
                                        super::alert(&error.action_message("Failed to add item."));
                                    }
                                }
                                busy.set(false);
                            });
                        }
                    },
                    if *busy.read() {
                        span { class: "loading" }
                    } else {
                        "Add Item"
                    }
                }
            }
        }
    }
}
