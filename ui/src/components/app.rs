use dioxus::prelude::*;

use quad_client::DefaultBackend;
use quad_common::nav::{DashboardNav, Overlay, Section};

use super::auth_view::AuthView;
use super::backend_api::{create_backend, use_backend_coroutine};
use super::chat_view::ChatView;
use super::listing_detail::ListingDetail;
use super::listing_form::ListingForm;
use super::market_view::MarketView;
use super::notices::{NoticeBanners, NoticeState};
use super::shared_state::{use_nav, use_shared_state, SharedState};
use super::sidebar::Sidebar;

#[component]
pub fn App() -> Element {
    let backend = use_hook(create_backend);

    match backend {
        Ok(backend) => rsx! { Shell { backend } },
        Err(message) => rsx! {
            div { class: "boot-error",
                h2 { "Quad could not start" }
                p { "{message}" }
            }
        },
    }
}

/// Hosts the contexts and the backend coroutine. Everything below here
/// can assume they exist.
#[component]
fn Shell(backend: DefaultBackend) -> Element {
    use_context_provider(|| backend.clone());
    use_context_provider(|| Signal::new(SharedState::new()));
    use_context_provider(|| Signal::new(DashboardNav::default()));
    use_context_provider(|| Signal::new(NoticeState::default()));
    use_backend_coroutine();

    let shared = use_shared_state();
    let (resolved, signed_in) = {
        let state = shared.read();
        (state.resolved, state.identity.is_some())
    };

    // Hold the blank screen until the auth provider has reported once,
    // so a restored session never flashes the login form.
    if !resolved {
        return rsx! {
            div { class: "boot-screen",
                span { class: "loading" }
            }
        };
    }

    if signed_in {
        rsx! { Dashboard {} }
    } else {
        rsx! { AuthView {} }
    }
}

#[component]
fn Dashboard() -> Element {
    let nav = use_nav();
    let current = nav.read().clone();

    let section = match current.section {
        Section::Chat => rsx! { ChatView {} },
        Section::Marketplace => rsx! { MarketView {} },
    };
    let overlay = match current.overlay {
        Overlay::None => rsx! {},
        Overlay::AddListing => rsx! { ListingForm {} },
        Overlay::Detail(listing) => rsx! { ListingDetail { listing } },
    };

    rsx! {
        div { class: "dashboard-container",
            Sidebar {}
            main { class: "main-content",
                NoticeBanners {}
                {section}
            }
        }
        {overlay}
    }
}
