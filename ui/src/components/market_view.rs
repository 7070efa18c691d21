use dioxus::prelude::*;

use quad_common::listing::{CardView, ListingFilter};

use super::shared_state::{use_nav, use_shared_state};

/// Dropdown wire value: `all` or the category token.
fn filter_value(filter: ListingFilter) -> &'static str {
    match filter {
        ListingFilter::All => "all",
        ListingFilter::Category(c) => c.token(),
    }
}

fn parse_filter(value: &str) -> ListingFilter {
    ListingFilter::options()
        .into_iter()
        .find(|f| filter_value(*f) == value)
        .unwrap_or_default()
}

#[component]
pub fn MarketView() -> Element {
    let mut shared = use_shared_state();
    let mut nav = use_nav();

    let state = shared.read();
    let session = state.identity.as_ref().map(|i| i.uid.clone());
    let filter = state.board.filter();
    let empty = state.board.empty_state();
    let cards: Vec<_> = state
        .board
        .visible()
        .into_iter()
        .map(|listing| (listing.clone(), CardView::project(listing, session.as_ref())))
        .collect();
    drop(state);

    let grid = if cards.is_empty() {
        rsx! {
            div { class: "empty-marketplace",
                div { class: "icon", "🛒" }
                h3 { "{empty.heading}" }
                p { "{empty.body}" }
            }
        }
    } else {
        rsx! {
            for (listing, card) in cards {
                div {
                    key: "{card.id.0}",
                    class: "item-card",
                    onclick: move |_| nav.write().open_detail(listing.clone()),
                    div { class: "item-image",
                        "{card.emoji}"
                        div { class: "item-category-badge", "{card.category_badge}" }
                    }
                    div { class: "item-info",
                        h3 { class: "item-title", "{card.title}" }
                        p { class: "item-description", "{card.description}" }
                        div { class: "item-footer",
                            div { class: "item-price", "{card.price_label}" }
                            div { class: "item-contact", {card.contact_hint()} }
                        }
                        div { class: "item-meta",
                            span { "{card.seller_label}" }
                            span { "{card.date_label}" }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "content-section",
            header { class: "content-header",
                h2 { "Marketplace" }
                div { class: "marketplace-controls",
                    select {
                        id: "category-filter",
                        value: filter_value(filter),
                        onchange: move |evt| {
                            shared.write().board.set_filter(parse_filter(&evt.value()));
                        },
                        for option in ListingFilter::options() {
                            {
                                let value = filter_value(option);
                                let label = option.label();
                                rsx! {
                                    option { key: "{value}", value, "{label}" }
                                }
                            }
                        }
                    }
                    button {
                        class: "add-item-button",
                        onclick: move |_| nav.write().open_add_listing(),
                        "+ Add Item"
                    }
                }
            }
            div { id: "items-grid", class: "items-grid", {grid} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quad_common::listing::ListingCategory;

    #[test]
    fn every_dropdown_option_round_trips() {
        for option in ListingFilter::options() {
            assert_eq!(parse_filter(filter_value(option)), option);
        }
    }

    #[test]
    fn unknown_dropdown_value_falls_back_to_all() {
        assert_eq!(parse_filter("vehicles"), ListingFilter::All);
        assert_eq!(
            parse_filter("books"),
            ListingFilter::Category(ListingCategory::Books)
        );
    }
}
