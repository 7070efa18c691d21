use std::rc::Rc;

use serde_json::Value;

use quad_common::identity::{Identity, RecordId};

use crate::error::{AuthError, StoreError};
use crate::protocol::{Collection, Snapshot, SnapshotOrder};
use crate::subscription::Subscription;

/// Receives the current identity on registration and on every change.
pub type IdentityCallback = Rc<dyn Fn(Option<Identity>)>;

/// Receives a full ordered snapshot on registration and on every change.
pub type SnapshotCallback = Rc<dyn Fn(Snapshot)>;

/// Receives connection status flips.
pub type ConnectionCallback = Rc<dyn Fn(bool)>;

/// The auth collaborator. All session state lives behind it; the client
/// only reacts to what `watch_identity` delivers.
///
/// These traits are consumed on the browser's single thread, so the
/// futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Set the display name on the signed-in account and re-notify
    /// identity watchers, so the header updates without a reload.
    async fn update_profile(&self, display_name: &str) -> Result<(), AuthError>;

    /// Register an identity watcher. Fires immediately with the current
    /// identity, then again on every change.
    fn watch_identity(&self, callback: IdentityCallback) -> Subscription;
}

/// The live document store. The store owns all records and assigns ids
/// and creation timestamps; the client never mutates data locally.
#[allow(async_fn_in_trait)]
pub trait LiveStore {
    /// Append a record. The returned id is also the one later snapshots
    /// carry for this record.
    async fn write(&self, collection: Collection, record: Value) -> Result<RecordId, StoreError>;

    /// Register a snapshot watcher. Delivers the current snapshot
    /// immediately, then a full replacement on every change.
    fn subscribe(
        &self,
        collection: Collection,
        order: SnapshotOrder,
        callback: SnapshotCallback,
    ) -> Subscription;

    /// Register a connection watcher. Fires immediately with the
    /// current status.
    fn watch_connection(&self, callback: ConnectionCallback) -> Subscription;
}
