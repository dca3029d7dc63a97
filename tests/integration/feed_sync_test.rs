//! Feed synchronizer against the scripted backend

use std::sync::atomic::Ordering;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use roomchat::egui_app::backend::{PageQuery, SortOrder};
use roomchat::egui_app::messaging::FeedSynchronizer;

use crate::common::{FakeBackend, TIMEOUT};

fn ids(sync: &FeedSynchronizer) -> Vec<i64> {
    sync.messages().iter().map(|m| m.id).collect()
}

fn settle(sync: &mut FeedSynchronizer) {
    while sync.is_busy() {
        sync.wait(TIMEOUT);
    }
}

#[test]
fn test_initial_load_is_newest_page_ascending() {
    let backend = FakeBackend::with_messages(120);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);

    sync.load_initial();
    settle(&mut sync);

    assert_eq!(ids(&sync), (71..=120).collect::<Vec<_>>());
    assert!(sync.has_more());
    assert_eq!(
        backend.queries(),
        vec![PageQuery {
            order: SortOrder::Descending,
            offset: 0,
            limit: 50
        }]
    );
}

#[test]
fn test_paging_back_to_the_first_message() {
    let backend = FakeBackend::with_messages(120);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);

    assert!(sync.load_older());
    settle(&mut sync);
    assert_eq!(sync.messages().len(), 100);
    assert_eq!(sync.messages()[0].id, 21);
    assert!(sync.has_more());

    assert!(sync.load_older());
    settle(&mut sync);
    assert_eq!(ids(&sync), (1..=120).collect::<Vec<_>>());
    assert!(!sync.has_more());

    assert!(!sync.load_older());
    let offsets: Vec<usize> = backend.queries().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
}

#[test]
fn test_exact_multiple_needs_one_empty_fetch() {
    let backend = FakeBackend::with_messages(100);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);
    sync.load_older();
    settle(&mut sync);
    assert!(sync.has_more());

    sync.load_older();
    settle(&mut sync);
    assert!(!sync.has_more());
    assert_eq!(sync.messages().len(), 100);
    assert_eq!(backend.queries().len(), 3);
}

#[test]
fn test_overlapping_load_older_is_dropped() {
    let backend = FakeBackend::with_messages(200);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);

    backend.close_gate();
    assert!(sync.load_older());
    assert!(!sync.load_older());
    assert!(!sync.load_older());
    backend.open_gate();
    settle(&mut sync);

    assert_eq!(backend.queries().len(), 2);
    assert_eq!(sync.messages().len(), 100);
}

#[test]
fn test_change_burst_during_fetch_coalesces_into_one_refresh() {
    let backend = FakeBackend::with_messages(10);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);

    backend.close_gate();
    sync.load_initial();
    for _ in 0..5 {
        sync.on_external_change();
    }
    assert!(sync.is_refresh_queued());
    backend.open_gate();

    assert!(sync.wait(TIMEOUT));
    // the follow-up refresh starts as soon as the first fetch is applied
    assert!(sync.is_busy());
    settle(&mut sync);

    assert_eq!(backend.queries().len(), 2);
    assert!(backend.queries().iter().all(|q| q.offset == 0));
    assert!(!sync.is_refresh_queued());
}

#[test]
fn test_idle_change_notification_fetches_once() {
    let backend = FakeBackend::with_messages(10);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);

    backend.insert_external("fresh");
    sync.on_external_change();
    settle(&mut sync);

    assert_eq!(backend.queries().len(), 2);
    let last = sync.messages().last().unwrap();
    assert_eq!(last.id, 11);
    assert_eq!(last.message_content, "fresh");
}

#[test]
fn test_refresh_replaces_paged_window() {
    let backend = FakeBackend::with_messages(120);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);
    sync.load_older();
    settle(&mut sync);
    assert_eq!(sync.messages().len(), 100);

    sync.on_external_change();
    settle(&mut sync);
    assert_eq!(ids(&sync), (71..=120).collect::<Vec<_>>());
}

#[test]
fn test_failed_fetch_keeps_window_and_flag() {
    let backend = FakeBackend::with_messages(120);
    let mut sync = FeedSynchronizer::new(backend.clone(), 50);
    sync.load_initial();
    settle(&mut sync);
    let before = ids(&sync);

    backend.fail_fetch.store(true, Ordering::SeqCst);
    sync.load_older();
    settle(&mut sync);
    assert_eq!(ids(&sync), before);
    assert!(sync.has_more());
    assert!(sync.last_error().is_some());

    backend.fail_fetch.store(false, Ordering::SeqCst);
    sync.load_older();
    settle(&mut sync);
    assert_eq!(sync.messages().len(), 100);
    assert!(sync.last_error().is_none());
}

#[test]
fn test_shared_backend_handle() {
    let backend = FakeBackend::with_messages(3);
    let mut first = FeedSynchronizer::new(backend.clone(), 50);
    let mut second = FeedSynchronizer::new(backend.clone(), 2);
    first.load_initial();
    second.load_initial();
    settle(&mut first);
    settle(&mut second);
    assert_eq!(ids(&first), vec![1, 2, 3]);
    assert_eq!(ids(&second), vec![2, 3]);
    assert_eq!(Arc::strong_count(&backend), 3);
}
