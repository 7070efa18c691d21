use dioxus::prelude::*;

use quad_common::listing::{CardView, Listing};

use super::shared_state::{use_nav, use_shared_state};

/// Detail overlay for one listing. Clicking the backdrop or the close
/// button dismisses it; clicks inside the card do not.
#[component]
pub fn ListingDetail(listing: Listing) -> Element {
    let shared = use_shared_state();
    let mut nav = use_nav();

    let session = shared.read().identity.as_ref().map(|i| i.uid.clone());
    let card = CardView::project(&listing, session.as_ref());

    rsx! {
        div { class: "modal active", onclick: move |_| nav.write().close_overlay(),
            div { class: "modal-content", onclick: move |evt| evt.stop_propagation(),
                div { class: "modal-header",
                    h2 { id: "detail-title", "{card.title}" }
                    button {
                        class: "close-button",
                        onclick: move |_| nav.write().close_overlay(),
                        "×"
                    }
                }
                div { id: "detail-image", class: "detail-image", "{card.emoji}" }
                div { id: "detail-price", class: "detail-price", "{card.price_label}" }
                p { id: "detail-description", class: "detail-description", "{card.description}" }
                div { class: "detail-meta",
                    div { class: "detail-row",
                        span { class: "detail-label", "Category" }
                        span { id: "detail-category", "{card.category_badge}" }
                    }
                    div { class: "detail-row",
                        span { class: "detail-label", "Posted" }
                        span { id: "detail-date", "{card.date_label}" }
                    }
                    div { class: "detail-row",
                        span { class: "detail-label", "Contact" }
                        span { id: "detail-contact", "{card.contact}" }
                    }
                }
            }
        }
    }
}
