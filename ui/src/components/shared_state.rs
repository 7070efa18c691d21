use dioxus::prelude::*;

use quad_common::chat::ChatMessage;
use quad_common::identity::Identity;
use quad_common::listing::ListingBoard;
use quad_common::nav::DashboardNav;

/// Backend-sourced state shared across all components.
///
/// The bridge coroutine writes everything here as the backend pushes
/// identity changes and feed snapshots; the one user-driven field is
/// the board's category filter.
#[derive(Clone, Debug, Default)]
pub struct SharedState {
    /// Signed-in identity, if any.
    pub identity: Option<Identity>,
    /// True once the auth provider has reported at least once; until
    /// then neither the auth forms nor the dashboard should render.
    pub resolved: bool,
    /// Last chat snapshot, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Marketplace snapshot cache plus the active category filter.
    pub board: ListingBoard,
    /// Whether the backend reports itself reachable.
    pub connected: bool,
    /// Last bridge-level error, for the sidebar diagnostic line.
    pub last_error: Option<String>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn use_shared_state() -> Signal<SharedState> {
    use_context::<Signal<SharedState>>()
}

pub fn use_nav() -> Signal<DashboardNav> {
    use_context::<Signal<DashboardNav>>()
}
