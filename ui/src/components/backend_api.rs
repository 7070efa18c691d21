use std::rc::Rc;

use dioxus::prelude::*;
use futures::channel::mpsc;
use futures::StreamExt;

use quad_client::backend::{AuthProvider, LiveStore, SnapshotCallback};
use quad_client::protocol::Snapshot;
use quad_client::session::SessionController;
use quad_client::DefaultBackend;
use quad_common::identity::Identity;
use quad_common::listing::ListingBoard;

use super::notices::{self, use_notices, NoticeState};
use super::shared_state::{use_shared_state, SharedState};

/// Actions the UI sends to the backend coroutine.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// End the current session.
    Logout,
}

/// Backend pushes folded into the coroutine's event loop.
enum BackendEvent {
    Identity(Option<Identity>),
    Chat(Snapshot),
    Market(Snapshot),
    Connection(bool),
}

/// Build the backend this page runs against: the gateway client on
/// live builds, the in-memory backend otherwise.
#[cfg(all(target_family = "wasm", feature = "live"))]
pub fn create_backend() -> Result<DefaultBackend, String> {
    use quad_client::live;
    live::LiveClient::connect(&live::gateway_url())
        .map_err(|error| format!("Gateway connection failed: {error}"))
}

#[cfg(not(all(target_family = "wasm", feature = "live")))]
pub fn create_backend() -> Result<DefaultBackend, String> {
    #[cfg(feature = "example-data")]
    {
        Ok(quad_client::memory::MemoryBackend::with_example_data())
    }
    #[cfg(not(feature = "example-data"))]
    {
        Ok(quad_client::memory::MemoryBackend::new())
    }
}

/// Handle to the running backend, for flow calls from event handlers.
pub fn use_backend() -> DefaultBackend {
    use_context::<DefaultBackend>()
}

/// Get a handle to send actions to the backend coroutine.
pub fn use_backend_action() -> Coroutine<SessionAction> {
    use_coroutine_handle::<SessionAction>()
}

/// Start the backend session pump.
///
/// Watches the auth provider, keeps the two feed subscriptions in step
/// with the session, and folds every pushed snapshot into shared state.
pub fn use_backend_coroutine() {
    let backend = use_backend();
    let shared = use_shared_state();
    let notices = use_notices();
    use_coroutine(move |rx: UnboundedReceiver<SessionAction>| {
        backend_comms(backend.clone(), shared, notices, rx)
    });
}

async fn backend_comms(
    backend: DefaultBackend,
    mut shared: Signal<SharedState>,
    notices: Signal<NoticeState>,
    mut rx: UnboundedReceiver<SessionAction>,
) {
    let (events_tx, mut events) = mpsc::unbounded::<BackendEvent>();

    let tx = events_tx.clone();
    let _identity_watch = backend.watch_identity(Rc::new(move |identity| {
        let _ = tx.unbounded_send(BackendEvent::Identity(identity));
    }));
    let tx = events_tx.clone();
    let _connection_watch = backend.watch_connection(Rc::new(move |connected| {
        let _ = tx.unbounded_send(BackendEvent::Connection(connected));
    }));

    let mut controller = SessionController::new(backend.clone());

    loop {
        futures::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                apply_event(event, &mut controller, &events_tx, &mut shared);
            }
            action = rx.next() => {
                let Some(action) = action else { break };
                match action {
                    SessionAction::Logout => match backend.sign_out().await {
                        Ok(()) => {
                            notices::show_success(notices, "Logged out successfully.");
                        }
                        Err(error) => {
                            tracing::warn!(%error, "logout failed");
                            shared.write().last_error = Some(error.user_message().to_owned());
                            notices::show_error(notices, "Error logging out. Please try again.");
                        }
                    },
                }
            }
        }
    }
}

fn apply_event(
    event: BackendEvent,
    controller: &mut SessionController<DefaultBackend>,
    events_tx: &mpsc::UnboundedSender<BackendEvent>,
    shared: &mut Signal<SharedState>,
) {
    match event {
        BackendEvent::Identity(identity) => {
            let on_chat: SnapshotCallback = {
                let tx = events_tx.clone();
                Rc::new(move |snapshot| {
                    let _ = tx.unbounded_send(BackendEvent::Chat(snapshot));
                })
            };
            let on_market: SnapshotCallback = {
                let tx = events_tx.clone();
                Rc::new(move |snapshot| {
                    let _ = tx.unbounded_send(BackendEvent::Market(snapshot));
                })
            };
            controller.identity_changed(identity.as_ref(), on_chat, on_market);

            let mut state = shared.write();
            state.resolved = true;
            state.last_error = None;
            if identity.is_none() {
                state.messages.clear();
                state.board = ListingBoard::default();
            }
            state.identity = identity;
        }
        BackendEvent::Chat(snapshot) => {
            let mut state = shared.write();
            // A snapshot can race the teardown; never repopulate a
            // signed-out view.
            if state.identity.is_some() {
                state.messages = snapshot.decode_messages();
            }
        }
        BackendEvent::Market(snapshot) => {
            let mut state = shared.write();
            if state.identity.is_some() {
                state.board.replace(snapshot.decode_listings());
            }
        }
        BackendEvent::Connection(connected) => {
            shared.write().connected = connected;
        }
    }
}
