use quad_common::identity::Identity;

use crate::backend::{LiveStore, SnapshotCallback};
use crate::protocol::{Collection, SnapshotOrder};
use crate::subscription::Subscription;

/// Owns the per-session store subscriptions.
///
/// Feed subscriptions exist exactly while someone is signed in: every
/// identity change first releases whatever is held, then a signed-in
/// identity opens the chat feed (oldest first) and the marketplace
/// board (newest first). Routing each auth event through here keeps a
/// repeated sign-in from stacking duplicate feeds.
pub struct SessionController<S: LiveStore> {
    store: S,
    chat: Option<Subscription>,
    market: Option<Subscription>,
}

impl<S: LiveStore> SessionController<S> {
    pub fn new(store: S) -> SessionController<S> {
        SessionController {
            store,
            chat: None,
            market: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True while the feed subscriptions are held.
    pub fn is_live(&self) -> bool {
        self.chat.is_some()
    }

    /// React to an auth state change. Old subscriptions are always
    /// released before new ones open, so this is safe to call with the
    /// same identity twice.
    pub fn identity_changed(
        &mut self,
        identity: Option<&Identity>,
        on_chat: SnapshotCallback,
        on_market: SnapshotCallback,
    ) {
        self.release();
        let Some(identity) = identity else {
            tracing::debug!("signed out, feeds released");
            return;
        };
        tracing::debug!(uid = %identity.uid.as_str(), "signed in, opening feeds");
        self.chat = Some(
            self.store
                .subscribe(Collection::Messages, SnapshotOrder::TimestampAsc, on_chat),
        );
        self.market = Some(self.store.subscribe(
            Collection::Marketplace,
            SnapshotOrder::TimestampDesc,
            on_market,
        ));
    }

    /// Drop both feed subscriptions. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut sub) = self.chat.take() {
            sub.cancel();
        }
        if let Some(mut sub) = self.market.take() {
            sub.cancel();
        }
    }
}

impl<S: LiveStore> Drop for SessionController<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn ignore() -> SnapshotCallback {
        Rc::new(|_| {})
    }

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: quad_common::identity::UserId(uid.into()),
            email: format!("{uid}@campus.edu"),
            display_name: None,
        }
    }

    #[test]
    fn sign_in_opens_both_feeds_and_sign_out_closes_them() {
        let backend = MemoryBackend::new();
        let mut controller = SessionController::new(backend.clone());

        controller.identity_changed(Some(&identity("u1")), ignore(), ignore());
        assert!(controller.is_live());
        assert_eq!(backend.active_store_subscriptions(), 2);

        controller.identity_changed(None, ignore(), ignore());
        assert!(!controller.is_live());
        assert_eq!(backend.active_store_subscriptions(), 0);
    }

    #[test]
    fn repeated_sign_in_does_not_stack_subscriptions() {
        let backend = MemoryBackend::new();
        let mut controller = SessionController::new(backend.clone());

        controller.identity_changed(Some(&identity("u1")), ignore(), ignore());
        controller.identity_changed(Some(&identity("u1")), ignore(), ignore());
        assert_eq!(backend.active_store_subscriptions(), 2);
    }

    #[test]
    fn dropping_the_controller_releases_the_feeds() {
        let backend = MemoryBackend::new();
        {
            let mut controller = SessionController::new(backend.clone());
            controller.identity_changed(Some(&identity("u1")), ignore(), ignore());
            assert_eq!(backend.active_store_subscriptions(), 2);
        }
        assert_eq!(backend.active_store_subscriptions(), 0);
    }

    #[test]
    fn released_feeds_see_no_further_snapshots() {
        use crate::protocol::Collection;
        use serde_json::json;
        use std::cell::RefCell;

        let backend = MemoryBackend::new();
        let mut controller = SessionController::new(backend.clone());
        let chat_snapshots = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&chat_snapshots);
        controller.identity_changed(
            Some(&identity("u1")),
            Rc::new(move |_| *sink.borrow_mut() += 1),
            ignore(),
        );
        assert_eq!(*chat_snapshots.borrow(), 1);

        controller.identity_changed(None, ignore(), ignore());
        block_on(backend.write(
            Collection::Messages,
            json!({
                "content": "late",
                "userId": "u1",
                "userEmail": "u1@campus.edu",
                "anonymous": true,
            }),
        ))
        .unwrap();
        assert_eq!(*chat_snapshots.borrow(), 1);
    }
}
