use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use serde_json::Value;

use quad_common::identity::{Identity, RecordId, UserId};

use crate::backend::{
    AuthProvider, ConnectionCallback, IdentityCallback, LiveStore, SnapshotCallback,
};
use crate::error::{AuthError, StoreError};
use crate::protocol::{Collection, Document, Snapshot, SnapshotOrder};
use crate::subscription::Subscription;

/// Failed sign-ins tolerated per email before the account is rate
/// limited.
const MAX_SIGN_IN_FAILURES: u32 = 5;

/// Minimum password length the provider accepts.
const MIN_PASSWORD_LEN: usize = 6;

struct StoredUser {
    uid: UserId,
    email: String,
    password: String,
    display_name: Option<String>,
}

struct StoredDoc {
    id: RecordId,
    /// Insertion order; breaks ties between equal timestamps.
    seq: u64,
    /// `None` between acceptance of a write and timestamp assignment.
    timestamp: Option<DateTime<Utc>>,
    data: Value,
}

struct StoreWatcher {
    token: u64,
    collection: Collection,
    order: SnapshotOrder,
    callback: SnapshotCallback,
}

struct Inner {
    users: Vec<StoredUser>,
    session: Option<Identity>,
    documents: HashMap<Collection, Vec<StoredDoc>>,
    identity_watchers: Vec<(u64, IdentityCallback)>,
    store_watchers: Vec<StoreWatcher>,
    connection_watchers: Vec<(u64, ConnectionCallback)>,
    connected: bool,
    sign_in_failures: HashMap<String, u32>,
    next_uid: u64,
    next_doc: u64,
    next_token: u64,
    sign_up_calls: u32,
    sign_in_calls: u32,
    fail_next_write: Option<StoreError>,
}

impl Inner {
    fn new() -> Inner {
        Inner {
            users: Vec::new(),
            session: None,
            documents: HashMap::new(),
            identity_watchers: Vec::new(),
            store_watchers: Vec::new(),
            connection_watchers: Vec::new(),
            connected: true,
            sign_in_failures: HashMap::new(),
            next_uid: 1,
            next_doc: 1,
            next_token: 1,
            sign_up_calls: 0,
            sign_in_calls: 0,
            fail_next_write: None,
        }
    }

    fn take_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    fn find_user(&self, email: &str) -> Option<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn identity_of(&self, user: &StoredUser) -> Identity {
        Identity {
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        }
    }

    /// Build the snapshot one watcher sees: documents ordered by
    /// assigned timestamp, pending writes sorting as newest.
    fn snapshot_for(&self, collection: Collection, order: SnapshotOrder) -> Snapshot {
        let empty = Vec::new();
        let docs = self.documents.get(&collection).unwrap_or(&empty);
        let mut refs: Vec<&StoredDoc> = docs.iter().collect();
        refs.sort_by_key(|d| (d.timestamp.is_none(), d.timestamp, d.seq));
        if order == SnapshotOrder::TimestampDesc {
            refs.reverse();
        }
        let documents = refs
            .into_iter()
            .map(|doc| {
                let mut data = doc.data.clone();
                if let (Some(ts), Value::Object(fields)) = (doc.timestamp, &mut data) {
                    fields.insert("timestamp".into(), Value::String(ts.to_rfc3339()));
                }
                Document {
                    id: doc.id.clone(),
                    data,
                }
            })
            .collect();
        Snapshot {
            collection,
            documents,
        }
    }
}

/// In-memory stand-in for the auth provider and the live store.
///
/// Backs the app when no gateway is configured and every native test.
/// It reproduces the collaborator behaviors the client depends on:
/// immediate emission on watch registration, full-snapshot delivery,
/// two-phase timestamp assignment, and the auth failure codes.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Rc<RefCell<Inner>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pointer identity; handles are equal when they share state.
impl PartialEq for MemoryBackend {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MemoryBackend {
    pub fn new() -> MemoryBackend {
        MemoryBackend {
            inner: Rc::new(RefCell::new(Inner::new())),
        }
    }

    /// A backend seeded with two accounts and a handful of records, for
    /// browsing the app without a gateway. Sign in as
    /// `alice@campus.edu` / `sunrise42` or `ben@campus.edu` / `hilltop77`.
    #[cfg(feature = "example-data")]
    pub fn with_example_data() -> MemoryBackend {
        use serde_json::json;

        let backend = MemoryBackend::new();
        {
            let mut inner = backend.inner.borrow_mut();
            inner.users.push(StoredUser {
                uid: UserId("u1".into()),
                email: "alice@campus.edu".into(),
                password: "sunrise42".into(),
                display_name: Some("Alice Chen".into()),
            });
            inner.users.push(StoredUser {
                uid: UserId("u2".into()),
                email: "ben@campus.edu".into(),
                password: "hilltop77".into(),
                display_name: Some("Ben Osei".into()),
            });
            inner.next_uid = 3;

            let now = Utc::now();
            let mut push = |collection: Collection, minutes_ago: i64, data: Value| {
                let seq = inner.next_doc;
                inner.next_doc += 1;
                inner.documents.entry(collection).or_default().push(StoredDoc {
                    id: RecordId(format!("d{seq}")),
                    seq,
                    timestamp: Some(now - chrono::Duration::minutes(minutes_ago)),
                    data,
                });
            };

            push(
                Collection::Messages,
                40,
                json!({
                    "content": "Anyone selling a desk fan?",
                    "userId": "u1",
                    "userEmail": "alice@campus.edu",
                    "anonymous": true,
                }),
            );
            push(
                Collection::Messages,
                25,
                json!({
                    "content": "Check the marketplace, just listed mine!",
                    "userId": "u2",
                    "userEmail": "ben@campus.edu",
                    "anonymous": true,
                }),
            );
            push(
                Collection::Marketplace,
                30,
                json!({
                    "title": "Calculus textbook (8th ed.)",
                    "price": 350.0,
                    "category": "books",
                    "description": "Light highlighting in chapters 1-3.",
                    "contact": "alice@campus.edu",
                    "sellerId": "u1",
                    "sellerEmail": "alice@campus.edu",
                    "sellerName": "Alice Chen",
                    "status": "active",
                }),
            );
            push(
                Collection::Marketplace,
                20,
                json!({
                    "title": "Desk fan",
                    "price": 600.0,
                    "category": "other",
                    "description": "Three speeds, quiet.",
                    "contact": "hostel B, room 14",
                    "sellerId": "u2",
                    "sellerEmail": "ben@campus.edu",
                    "sellerName": "Ben Osei",
                    "status": "active",
                }),
            );
        }
        backend
    }

    // ── Test and demo knobs ────────────────────────────────────────────

    /// Number of `sign_up` calls that reached the provider.
    pub fn sign_up_attempts(&self) -> u32 {
        self.inner.borrow().sign_up_calls
    }

    /// Number of `sign_in` calls that reached the provider.
    pub fn sign_in_attempts(&self) -> u32 {
        self.inner.borrow().sign_in_calls
    }

    pub fn user_count(&self) -> usize {
        self.inner.borrow().users.len()
    }

    pub fn active_store_subscriptions(&self) -> usize {
        self.inner.borrow().store_watchers.len()
    }

    pub fn active_identity_watchers(&self) -> usize {
        self.inner.borrow().identity_watchers.len()
    }

    /// Make the next `write` fail with the given code.
    pub fn fail_next_write(&self, error: StoreError) {
        self.inner.borrow_mut().fail_next_write = Some(error);
    }

    /// Flip the reported connection status and notify watchers.
    pub fn set_connected(&self, connected: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.connected == connected {
                return;
            }
            inner.connected = connected;
        }
        let watchers: Vec<ConnectionCallback> = self
            .inner
            .borrow()
            .connection_watchers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in watchers {
            callback(connected);
        }
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn notify_identity(&self) {
        let (watchers, session) = {
            let inner = self.inner.borrow();
            let watchers: Vec<IdentityCallback> = inner
                .identity_watchers
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect();
            (watchers, inner.session.clone())
        };
        for callback in watchers {
            callback(session.clone());
        }
    }

    /// Deliver per-watcher snapshots for one collection, invoking the
    /// callbacks outside the state borrow.
    fn deliver(&self, collection: Collection) {
        let deliveries: Vec<(SnapshotCallback, Snapshot)> = {
            let inner = self.inner.borrow();
            inner
                .store_watchers
                .iter()
                .filter(|w| w.collection == collection)
                .map(|w| (Rc::clone(&w.callback), inner.snapshot_for(collection, w.order)))
                .collect()
        };
        for (callback, snapshot) in deliveries {
            callback(snapshot);
        }
    }

    fn set_session(&self, session: Option<Identity>) {
        self.inner.borrow_mut().session = session;
        self.notify_identity();
    }
}

impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let mut inner = self.inner.borrow_mut();
            inner.sign_up_calls += 1;

            let email = email.trim();
            if !email.contains('@') {
                return Err(AuthError::InvalidEmail);
            }
            if password.len() < MIN_PASSWORD_LEN {
                return Err(AuthError::WeakPassword);
            }
            if inner.find_user(email).is_some() {
                return Err(AuthError::EmailAlreadyInUse);
            }

            let uid = UserId(format!("u{}", inner.next_uid));
            inner.next_uid += 1;
            let identity = Identity {
                uid: uid.clone(),
                email: email.to_owned(),
                display_name: None,
            };
            inner.users.push(StoredUser {
                uid,
                email: email.to_owned(),
                password: password.to_owned(),
                display_name: None,
            });
            inner.sign_in_failures.remove(&email.to_ascii_lowercase());
            identity
        };
        tracing::info!(email = %identity.email, "account created");
        self.set_session(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let mut inner = self.inner.borrow_mut();
            inner.sign_in_calls += 1;

            let email = email.trim();
            let key = email.to_ascii_lowercase();
            if inner.sign_in_failures.get(&key).copied().unwrap_or(0) >= MAX_SIGN_IN_FAILURES {
                return Err(AuthError::TooManyRequests);
            }

            let matched = inner
                .find_user(email)
                .map(|user| (user.password == password, inner.identity_of(user)));
            let Some((password_ok, identity)) = matched else {
                return Err(AuthError::UserNotFound);
            };
            if !password_ok {
                *inner.sign_in_failures.entry(key).or_insert(0) += 1;
                return Err(AuthError::WrongPassword);
            }
            inner.sign_in_failures.remove(&key);
            identity
        };
        self.set_session(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_session(None);
        Ok(())
    }

    async fn update_profile(&self, display_name: &str) -> Result<(), AuthError> {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(session) = inner.session.clone() else {
                return Err(AuthError::Other);
            };
            let name = (!display_name.trim().is_empty()).then(|| display_name.trim().to_owned());
            if let Some(user) = inner.users.iter_mut().find(|u| u.uid == session.uid) {
                user.display_name = name.clone();
            }
            if let Some(session) = inner.session.as_mut() {
                session.display_name = name;
            }
        }
        // Re-notify so the header picks up the new name immediately.
        self.notify_identity();
        Ok(())
    }

    fn watch_identity(&self, callback: IdentityCallback) -> Subscription {
        let token = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.take_token();
            inner.identity_watchers.push((token, Rc::clone(&callback)));
            token
        };
        let current = self.inner.borrow().session.clone();
        callback(current);

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
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

impl LiveStore for MemoryBackend {
    async fn write(&self, collection: Collection, record: Value) -> Result<RecordId, StoreError> {
        let id = {
            let mut inner = self.inner.borrow_mut();
            if let Some(error) = inner.fail_next_write.take() {
                return Err(error);
            }
            if !inner.connected {
                return Err(StoreError::Unavailable);
            }
            let seq = inner.next_doc;
            inner.next_doc += 1;
            let id = RecordId(format!("d{seq}"));
            inner.documents.entry(collection).or_default().push(StoredDoc {
                id: id.clone(),
                seq,
                timestamp: None,
                data: record,
            });
            id
        };

        // First delivery carries the pending write without a timestamp,
        // then the assigned timestamp arrives in a second snapshot.
        self.deliver(collection);
        {
            let mut inner = self.inner.borrow_mut();
            let now = Utc::now();
            if let Some(doc) = inner
                .documents
                .entry(collection)
                .or_default()
                .iter_mut()
                .find(|d| d.id == id)
            {
                doc.timestamp = Some(now);
            }
        }
        self.deliver(collection);
        Ok(id)
    }

    fn subscribe(
        &self,
        collection: Collection,
        order: SnapshotOrder,
        callback: SnapshotCallback,
    ) -> Subscription {
        let (token, first) = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.take_token();
            inner.store_watchers.push(StoreWatcher {
                token,
                collection,
                order,
                callback: Rc::clone(&callback),
            });
            (token, inner.snapshot_for(collection, order))
        };
        callback(first);

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .store_watchers
                    .retain(|w| w.token != token);
            }
        })
    }

    fn watch_connection(&self, callback: ConnectionCallback) -> Subscription {
        let (token, connected) = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.take_token();
            inner.connection_watchers.push((token, Rc::clone(&callback)));
            (token, inner.connected)
        };
        callback(connected);

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
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
