//! Chat room wiring: subscription, feed and composer together

use std::sync::atomic::Ordering;
use std::time::Instant;

use roomchat::egui_app::messaging::ChatRoom;
use roomchat::shared::{AppConfig, ChangeKind};

use crate::common::{eventually, user, FakeBackend};

fn config(page_size: usize) -> AppConfig {
    AppConfig::builder().page_size(page_size).build().unwrap()
}

#[test]
fn test_mount_loads_and_subscribes() {
    let backend = FakeBackend::with_messages(30);
    let mut room = ChatRoom::mount(backend.clone(), &config(20));
    assert!(room.is_subscribed());

    assert!(eventually(|| {
        room.update(Instant::now());
        room.feed.messages().len() == 20
    }));
    assert!(room.feed.has_more());
    assert!(room.scroll_to_newest);
}

#[test]
fn test_own_message_arrives_through_change_notification() {
    let backend = FakeBackend::with_messages(5);
    let mut room = ChatRoom::mount(backend.clone(), &config(50));
    assert!(eventually(|| {
        room.update(Instant::now());
        !room.feed.is_busy()
    }));
    room.scroll_to_newest = false;

    room.composer.input = "hi all".to_string();
    room.submit(&user("ada"), Instant::now()).unwrap();

    assert!(eventually(|| {
        room.update(Instant::now());
        room.composer.input.is_empty()
            && room.feed.messages().last().map(|m| m.message_content.as_str()) == Some("hi all")
    }));
    assert!(room.scroll_to_newest);
    assert_eq!(room.composer.cooldown_remaining(), 3);
}

#[test]
fn test_external_insert_refreshes_feed() {
    let backend = FakeBackend::with_messages(5);
    let mut room = ChatRoom::mount(backend.clone(), &config(50));
    assert!(eventually(|| {
        room.update(Instant::now());
        room.feed.messages().len() == 5
    }));

    backend.insert_external("from elsewhere");
    backend.notify(ChangeKind::Update);
    assert!(eventually(|| {
        room.update(Instant::now());
        room.feed.messages().len() == 6 && !room.feed.is_busy()
    }));
}

#[test]
fn test_scrolling_to_top_pages_once_per_arrival() {
    let backend = FakeBackend::with_messages(100);
    let mut room = ChatRoom::mount(backend.clone(), &config(10));
    assert!(eventually(|| {
        room.update(Instant::now());
        !room.feed.is_busy()
    }));

    room.on_scrolled_to_top(true);
    assert!(eventually(|| {
        room.update(Instant::now());
        !room.feed.is_busy()
    }));
    // still at the top: no further page until the list leaves and returns
    room.on_scrolled_to_top(true);
    assert!(!room.feed.is_busy());
    assert_eq!(room.feed.messages().len(), 20);

    room.on_scrolled_to_top(false);
    room.on_scrolled_to_top(true);
    assert!(room.feed.is_busy());
}

#[test]
fn test_teardown_stops_notifications() {
    let backend = FakeBackend::with_messages(5);
    let mut room = ChatRoom::mount(backend.clone(), &config(50));
    assert!(eventually(|| {
        room.update(Instant::now());
        !room.feed.is_busy()
    }));

    room.teardown();
    assert!(backend.unsubscribed.load(Ordering::SeqCst));
    assert!(room.feed.messages().is_empty());

    let fetches = backend.queries().len();
    backend.insert_external("after teardown");
    room.update(Instant::now());
    assert!(!room.feed.is_busy());
    assert_eq!(backend.queries().len(), fetches);
}
