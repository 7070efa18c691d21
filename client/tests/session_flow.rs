//! End-to-end flows against the in-memory backend: the same wiring the
//! app uses, minus the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc;
use futures::executor::block_on;

use quad_client::backend::{AuthProvider, SnapshotCallback};
use quad_client::error::StoreError;
use quad_client::flows;
use quad_client::memory::MemoryBackend;
use quad_client::protocol::Snapshot;
use quad_client::session::SessionController;
use quad_common::chat::{project_feed, PENDING_TIME_LABEL};
use quad_common::forms::{ListingInput, LoginInput, SignupInput};
use quad_common::identity::Identity;
use quad_common::listing::{CardView, ListingBoard, ListingCategory, ListingFilter};

fn signup_input(name: &str, email: &str) -> SignupInput {
    SignupInput {
        name: name.into(),
        email: email.into(),
        password: "longenough".into(),
        confirm: "longenough".into(),
    }
}

fn listing_input(title: &str, price: &str, category: ListingCategory) -> ListingInput {
    ListingInput {
        title: title.into(),
        price: price.into(),
        category: Some(category),
        description: "As new.".into(),
        contact: "room 12".into(),
    }
}

fn snapshot_recorder() -> (SnapshotCallback, Rc<RefCell<Vec<Snapshot>>>) {
    let seen: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (Rc::new(move |snapshot| sink.borrow_mut().push(snapshot)), seen)
}

fn ignore_snapshots() -> SnapshotCallback {
    Rc::new(|_| {})
}

#[test]
fn account_journey_signs_up_out_and_back_in() {
    let backend = MemoryBackend::new();
    block_on(async {
        let input = signup_input("Priya Sharma", "priya@campus.edu");
        let created = flows::submit_signup(&backend, &input).await.unwrap();
        assert_eq!(created.display_name.as_deref(), Some("Priya Sharma"));

        backend.sign_out().await.unwrap();

        let login = LoginInput {
            email: "priya@campus.edu".into(),
            password: "longenough".into(),
        };
        let back = flows::submit_login(&backend, &login).await.unwrap();
        // The stored profile keeps the display name across sessions.
        assert_eq!(back.display_name.as_deref(), Some("Priya Sharma"));
        assert_eq!(back.uid, created.uid);
    });
    assert_eq!(backend.user_count(), 1);
}

/// The app pumps identity events through a channel into the session
/// controller; feeds must exist exactly while someone is signed in.
#[test]
fn feeds_follow_the_auth_state() {
    let backend = MemoryBackend::new();
    let (tx, mut rx) = mpsc::unbounded::<Option<Identity>>();
    let _watch = backend.watch_identity(Rc::new(move |identity| {
        let _ = tx.unbounded_send(identity);
    }));
    let mut controller = SessionController::new(backend.clone());

    let mut drain = |controller: &mut SessionController<MemoryBackend>| {
        while let Ok(Some(identity)) = rx.try_next() {
            controller.identity_changed(identity.as_ref(), ignore_snapshots(), ignore_snapshots());
        }
    };

    // Registration emits the signed-out state immediately.
    drain(&mut controller);
    assert_eq!(backend.active_store_subscriptions(), 0);

    block_on(flows::submit_signup(
        &backend,
        &signup_input("Priya Sharma", "priya@campus.edu"),
    ))
    .unwrap();
    drain(&mut controller);
    assert!(controller.is_live());
    assert_eq!(backend.active_store_subscriptions(), 2);

    block_on(backend.sign_out()).unwrap();
    drain(&mut controller);
    assert!(!controller.is_live());
    assert_eq!(backend.active_store_subscriptions(), 0);
}

#[test]
fn sent_message_shows_pending_then_delivered() {
    let backend = MemoryBackend::new();
    let identity = block_on(flows::submit_signup(
        &backend,
        &signup_input("Priya Sharma", "priya@campus.edu"),
    ))
    .unwrap();

    let (on_chat, chat_snapshots) = snapshot_recorder();
    let mut controller = SessionController::new(backend.clone());
    controller.identity_changed(Some(&identity), on_chat, ignore_snapshots());
    assert_eq!(chat_snapshots.borrow().len(), 1);

    let sent = block_on(flows::send_message(&backend, "  hello campus  ", &identity)).unwrap();
    assert!(sent.is_some());

    let snapshots = chat_snapshots.borrow();
    assert_eq!(snapshots.len(), 3);

    let pending = project_feed(&snapshots[1].decode_messages(), &identity.uid);
    assert_eq!(pending[0].content, "hello campus");
    assert_eq!(pending[0].time_label, PENDING_TIME_LABEL);
    assert_eq!(pending[0].bubble_class(), "message own");

    let delivered = project_feed(&snapshots[2].decode_messages(), &identity.uid);
    assert_ne!(delivered[0].time_label, PENDING_TIME_LABEL);
}

#[test]
fn marketplace_shows_newest_first_and_filters_by_category() {
    let backend = MemoryBackend::new();
    let seller = block_on(flows::submit_signup(
        &backend,
        &signup_input("Priya Sharma", "priya@campus.edu"),
    ))
    .unwrap();

    let (on_market, market_snapshots) = snapshot_recorder();
    let mut controller = SessionController::new(backend.clone());
    controller.identity_changed(Some(&seller), ignore_snapshots(), on_market);

    block_on(async {
        flows::submit_listing(
            &backend,
            &listing_input("Calculus textbook", "350", ListingCategory::Books),
            &seller,
        )
        .await
        .unwrap();
        flows::submit_listing(
            &backend,
            &listing_input("USB keyboard", "499.50", ListingCategory::Electronics),
            &seller,
        )
        .await
        .unwrap();
    });

    let mut board = ListingBoard::default();
    let last = market_snapshots.borrow().last().cloned().unwrap();
    board.replace(last.decode_listings());

    let titles: Vec<&str> = board.visible().iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["USB keyboard", "Calculus textbook"]);

    board.set_filter(ListingFilter::Category(ListingCategory::Electronics));
    let visible = board.visible();
    assert_eq!(visible.len(), 1);
    let card = CardView::project(visible[0], Some(&seller.uid));
    assert_eq!(card.price_label, "₹499.50");
    assert_eq!(card.seller_label, "By You");

    board.set_filter(ListingFilter::Category(ListingCategory::Furniture));
    assert!(board.visible().is_empty());
    assert_eq!(board.empty_state().heading, "No items in this category!");
}

#[test]
fn other_sellers_cards_carry_their_name_and_contact() {
    let backend = MemoryBackend::new();
    let seller = block_on(flows::submit_signup(
        &backend,
        &signup_input("Priya Sharma", "priya@campus.edu"),
    ))
    .unwrap();
    block_on(flows::submit_listing(
        &backend,
        &listing_input("Desk lamp", "150", ListingCategory::Furniture),
        &seller,
    ))
    .unwrap();

    let viewer = block_on(flows::submit_signup(
        &backend,
        &signup_input("Ben Osei", "ben@campus.edu"),
    ))
    .unwrap();

    let (on_market, market_snapshots) = snapshot_recorder();
    let mut controller = SessionController::new(backend.clone());
    controller.identity_changed(Some(&viewer), ignore_snapshots(), on_market);

    let last = market_snapshots.borrow().last().cloned().unwrap();
    let listings = last.decode_listings();
    let card = CardView::project(&listings[0], Some(&viewer.uid));
    assert_eq!(card.seller_label, "By Priya Sharma");
    assert_eq!(card.contact, "room 12");
    assert_eq!(card.contact_hint(), "Click to contact");
}

#[test]
fn chat_send_failure_names_the_action() {
    let backend = MemoryBackend::new();
    let identity = block_on(flows::submit_signup(
        &backend,
        &signup_input("Priya Sharma", "priya@campus.edu"),
    ))
    .unwrap();

    backend.fail_next_write(StoreError::Unavailable);
    let err = block_on(flows::send_message(&backend, "hello", &identity)).unwrap_err();
    assert_eq!(
        err.action_message("Failed to send message."),
        "Failed to send message. Please check your internet connection."
    );
}

#[cfg(feature = "example-data")]
#[test]
fn example_accounts_sign_in_and_see_the_seeded_board() {
    let backend = MemoryBackend::with_example_data();
    let login = LoginInput {
        email: "alice@campus.edu".into(),
        password: "sunrise42".into(),
    };
    let alice = block_on(flows::submit_login(&backend, &login)).unwrap();
    assert_eq!(alice.display_name.as_deref(), Some("Alice Chen"));

    let (on_market, market_snapshots) = snapshot_recorder();
    let mut controller = SessionController::new(backend.clone());
    controller.identity_changed(Some(&alice), ignore_snapshots(), on_market);

    let first = market_snapshots.borrow().last().cloned().unwrap();
    let mut board = ListingBoard::default();
    board.replace(first.decode_listings());
    let titles: Vec<&str> = board.visible().iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Desk fan", "Calculus textbook (8th ed.)"]);
}
