//! WebSocket transport to the quad gateway.
//!
//! One JSON text frame per request or event, correlated by
//! `request_id`. The client caches the last pushed identity and
//! connection status so watch registrations can emit immediately, the
//! same contract the in-memory backend honors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use quad_common::identity::{Identity, RecordId};

use crate::backend::{
    AuthProvider, ConnectionCallback, IdentityCallback, LiveStore, SnapshotCallback,
};
use crate::error::{AuthError, StoreError};
use crate::protocol::{ClientRequest, Collection, ServerEvent, SnapshotOrder};
use crate::subscription::Subscription;

/// Default gateway URL; overridable at compile-time via the
/// QUAD_GATEWAY_URL env var, or at runtime via a ?gateway=<port> query
/// parameter (e.g. ?gateway=9301).
const DEFAULT_GATEWAY_URL: &str = "ws://localhost:9300/v1/session";

/// Resolve the gateway URL for this page load.
pub fn gateway_url() -> String {
    let compile_time_url = option_env!("QUAD_GATEWAY_URL").unwrap_or(DEFAULT_GATEWAY_URL);
    let url = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .and_then(|qs| {
            web_sys::UrlSearchParams::new_with_str(&qs)
                .ok()?
                .get("gateway")
        })
        .map(|port| format!("ws://localhost:{port}/v1/session"));
    match url {
        Some(u) => u,
        None => compile_time_url.to_string(),
    }
}

/// A reply routed back to the caller that issued the request.
enum CallResult {
    Auth(Result<Option<Identity>, AuthError>),
    Write(Result<RecordId, StoreError>),
}

struct LiveInner {
    socket: WebSocket,
    next_id: u64,
    pending: HashMap<u64, oneshot::Sender<CallResult>>,
    /// Last identity the gateway pushed; what new watchers see first.
    identity: Option<Identity>,
    connected: bool,
    identity_watchers: Vec<(u64, IdentityCallback)>,
    snapshot_watchers: HashMap<u64, SnapshotCallback>,
    connection_watchers: Vec<(u64, ConnectionCallback)>,
}

/// Gateway-backed implementation of [`AuthProvider`] and [`LiveStore`].
#[derive(Clone)]
pub struct LiveClient {
    inner: Rc<RefCell<LiveInner>>,
}

/// Pointer identity; handles are equal when they share the socket.
impl PartialEq for LiveClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl LiveClient {
    /// Open the socket and wire its handlers. The returned client is
    /// usable at once; calls made before the handshake completes fail
    /// once the socket reports itself closed.
    pub fn connect(url: &str) -> Result<LiveClient, StoreError> {
        let socket = WebSocket::new(url).map_err(|error| {
            tracing::error!(?error, url, "gateway socket failed to open");
            StoreError::Unavailable
        })?;

        let inner = Rc::new(RefCell::new(LiveInner {
            socket: socket.clone(),
            next_id: 1,
            pending: HashMap::new(),
            identity: None,
            connected: false,
            identity_watchers: Vec::new(),
            snapshot_watchers: HashMap::new(),
            connection_watchers: Vec::new(),
        }));

        // The page holds one client for its whole lifetime, so the
        // handler closures are forgotten rather than stored.
        let weak = Rc::downgrade(&inner);
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(inner) = weak.upgrade() else { return };
            let Some(text) = event.data().as_string() else {
                tracing::warn!("non-text frame from gateway");
                return;
            };
            match serde_json::from_str::<ServerEvent>(&text) {
                Ok(event) => dispatch(&inner, event),
                Err(error) => tracing::warn!(%error, "gateway frame failed to decode"),
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let weak = Rc::downgrade(&inner);
        let onopen = Closure::<dyn FnMut()>::new(move || {
            tracing::info!("connected to quad gateway");
            if let Some(inner) = weak.upgrade() {
                set_connected(&inner, true);
            }
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let weak = Rc::downgrade(&inner);
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            tracing::warn!(code = event.code(), "gateway socket closed");
            if let Some(inner) = weak.upgrade() {
                fail_in_flight(&inner);
                set_connected(&inner, false);
            }
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        let weak = Rc::downgrade(&inner);
        let onerror = Closure::<dyn FnMut()>::new(move || {
            tracing::error!("gateway socket error");
            if let Some(inner) = weak.upgrade() {
                fail_in_flight(&inner);
                set_connected(&inner, false);
            }
        });
        socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        Ok(LiveClient { inner })
    }

    fn send(&self, request: &ClientRequest) -> Result<(), StoreError> {
        let text = serde_json::to_string(request).map_err(|error| {
            tracing::error!(%error, "request failed to encode");
            StoreError::Other
        })?;
        let socket = self.inner.borrow().socket.clone();
        socket.send_with_str(&text).map_err(|error| {
            tracing::warn!(?error, "gateway send failed");
            StoreError::Unavailable
        })
    }

    /// Issue one request and wait for its correlated reply. A send
    /// failure or a dropped socket resolves the call here rather than
    /// leaving the future pending.
    async fn call(&self, build: impl FnOnce(u64) -> ClientRequest) -> Result<CallResult, StoreError> {
        let (tx, rx) = oneshot::channel();
        let (request_id, request) = {
            let mut state = self.inner.borrow_mut();
            let request_id = state.next_id;
            state.next_id += 1;
            state.pending.insert(request_id, tx);
            (request_id, build(request_id))
        };
        if let Err(error) = self.send(&request) {
            self.inner.borrow_mut().pending.remove(&request_id);
            return Err(error);
        }
        rx.await.map_err(|_| StoreError::Unavailable)
    }

    async fn auth_call(
        &self,
        build: impl FnOnce(u64) -> ClientRequest,
    ) -> Result<Option<Identity>, AuthError> {
        match self.call(build).await {
            Ok(CallResult::Auth(result)) => result,
            Ok(CallResult::Write(_)) => {
                tracing::error!("write reply to an auth request");
                Err(AuthError::Other)
            }
            Err(_) => Err(AuthError::Other),
        }
    }

    async fn write_call(
        &self,
        build: impl FnOnce(u64) -> ClientRequest,
    ) -> Result<RecordId, StoreError> {
        match self.call(build).await? {
            CallResult::Write(result) => result,
            CallResult::Auth(_) => {
                tracing::error!("auth reply to a write request");
                Err(StoreError::Other)
            }
        }
    }

    fn take_token(&self) -> u64 {
        let mut state = self.inner.borrow_mut();
        let token = state.next_id;
        state.next_id += 1;
        token
    }
}

fn dispatch(inner: &Rc<RefCell<LiveInner>>, event: ServerEvent) {
    match event {
        ServerEvent::AuthOk {
            request_id,
            identity,
        } => resolve(inner, request_id, CallResult::Auth(Ok(identity))),
        ServerEvent::AuthFailed { request_id, code } => {
            resolve(inner, request_id, CallResult::Auth(Err(code)))
        }
        ServerEvent::WriteOk { request_id, id } => {
            resolve(inner, request_id, CallResult::Write(Ok(id)))
        }
        ServerEvent::WriteFailed { request_id, code } => {
            resolve(inner, request_id, CallResult::Write(Err(code)))
        }
        ServerEvent::IdentityChanged { identity } => {
            let watchers: Vec<IdentityCallback> = {
                let mut state = inner.borrow_mut();
                state.identity = identity.clone();
                state
                    .identity_watchers
                    .iter()
                    .map(|(_, cb)| Rc::clone(cb))
                    .collect()
            };
            for callback in watchers {
                callback(identity.clone());
            }
        }
        ServerEvent::Snapshot {
            subscription_id,
            snapshot,
        } => {
            let callback = inner.borrow().snapshot_watchers.get(&subscription_id).cloned();
            match callback {
                Some(callback) => callback(snapshot),
                // A frame can race a just-released subscription.
                None => tracing::debug!(subscription_id, "snapshot for a released subscription"),
            }
        }
        ServerEvent::Connection { connected } => set_connected(inner, connected),
    }
}

fn resolve(inner: &Rc<RefCell<LiveInner>>, request_id: u64, result: CallResult) {
    let sender = inner.borrow_mut().pending.remove(&request_id);
    match sender {
        Some(tx) => {
            let _ = tx.send(result);
        }
        None => tracing::warn!(request_id, "reply without a waiting caller"),
    }
}

/// Dropping the senders wakes every in-flight call with a channel
/// error, which the callers report as unavailable.
fn fail_in_flight(inner: &Rc<RefCell<LiveInner>>) {
    inner.borrow_mut().pending.clear();
}

fn set_connected(inner: &Rc<RefCell<LiveInner>>, connected: bool) {
    let watchers: Vec<ConnectionCallback> = {
        let mut state = inner.borrow_mut();
        if state.connected == connected {
            return;
        }
        state.connected = connected;
        state
            .connection_watchers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect()
    };
    for callback in watchers {
        callback(connected);
    }
}

impl AuthProvider for LiveClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = email.to_owned();
        let password = password.to_owned();
        let identity = self
            .auth_call(|request_id| ClientRequest::SignUp {
                request_id,
                email,
                password,
            })
            .await?;
        identity.ok_or(AuthError::Other)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = email.to_owned();
        let password = password.to_owned();
        let identity = self
            .auth_call(|request_id| ClientRequest::SignIn {
                request_id,
                email,
                password,
            })
            .await?;
        identity.ok_or(AuthError::Other)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth_call(|request_id| ClientRequest::SignOut { request_id })
            .await?;
        Ok(())
    }

    async fn update_profile(&self, display_name: &str) -> Result<(), AuthError> {
        let display_name = display_name.to_owned();
        self.auth_call(|request_id| ClientRequest::UpdateProfile {
            request_id,
            display_name,
        })
        .await?;
        Ok(())
    }

    fn watch_identity(&self, callback: IdentityCallback) -> Subscription {
        let (token, current) = {
            let mut state = self.inner.borrow_mut();
            let token = state.next_id;
            state.next_id += 1;
            state.identity_watchers.push((token, Rc::clone(&callback)));
            (token, state.identity.clone())
        };
        callback(current);

        let weak: Weak<RefCell<LiveInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .identity_watchers
                    .retain(|(t, _)| *t != token);
            }
        })
    }
}

impl LiveStore for LiveClient {
    async fn write(&self, collection: Collection, record: Value) -> Result<RecordId, StoreError> {
        self.write_call(|request_id| ClientRequest::Write {
            request_id,
            collection,
            record,
        })
        .await
    }

    fn subscribe(
        &self,
        collection: Collection,
        order: SnapshotOrder,
        callback: SnapshotCallback,
    ) -> Subscription {
        let subscription_id = self.take_token();
        self.inner
            .borrow_mut()
            .snapshot_watchers
            .insert(subscription_id, callback);
        // The gateway pushes the current snapshot as soon as it accepts
        // the subscription, so there is nothing to emit locally here.
        if let Err(error) = self.send(&ClientRequest::Subscribe {
            subscription_id,
            collection,
            order,
        }) {
            tracing::warn!(%error, "subscribe did not reach the gateway");
        }

        let weak: Weak<RefCell<LiveInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            inner.borrow_mut().snapshot_watchers.remove(&subscription_id);
            // Best effort; a closed socket already dropped it server-side.
            let request = ClientRequest::Unsubscribe { subscription_id };
            if let Ok(text) = serde_json::to_string(&request) {
                let socket = inner.borrow().socket.clone();
                let _ = socket.send_with_str(&text);
            }
        })
    }

    fn watch_connection(&self, callback: ConnectionCallback) -> Subscription {
        let (token, connected) = {
            let mut state = self.inner.borrow_mut();
            let token = state.next_id;
            state.next_id += 1;
            state.connection_watchers.push((token, Rc::clone(&callback)));
            (token, state.connected)
        };
        callback(connected);

        let weak: Weak<RefCell<LiveInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .connection_watchers
                    .retain(|(t, _)| *t != token);
            }
        })
    }
}
