//! UI components for the campus board.

pub mod app;
pub mod auth_view;
pub mod backend_api;
pub mod chat_view;
pub mod listing_detail;
pub mod listing_form;
pub mod market_view;
pub mod notices;
pub mod shared_state;
pub mod sidebar;

/// Blocking browser alert, the failure surface for feed writes.
#[cfg(target_family = "wasm")]
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(not(target_family = "wasm"))]
pub(crate) fn alert(message: &str) {
    tracing::warn!("alert: {message}");
}
