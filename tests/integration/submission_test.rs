//! Submission control against the scripted backend

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use roomchat::egui_app::messaging::{SubmissionControl, SubmitPhase, SubmitRejected};

use crate::common::{user, FakeBackend, TIMEOUT};

#[test]
fn test_insert_payload_comes_from_session_user() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let author = user("linus");
    let t0 = Instant::now();

    control.input = "hello, room".to_string();
    control.submit(&author, t0).unwrap();
    control.wait(TIMEOUT, t0);

    let inserts = backend.inserts();
    assert_eq!(inserts.len(), 1);
    assert_eq!(inserts[0].user_name, "linus");
    assert_eq!(inserts[0].user_id, author.id);
    assert_eq!(inserts[0].message_content, "hello, room");
    assert_eq!(
        inserts[0].user_avatar_url.as_deref(),
        Some("https://cdn.example.com/avatars/linus.png")
    );
    assert_eq!(inserts[0].provider.as_deref(), Some("email"));
}

#[test]
fn test_cooldown_timeline() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let author = user("ada");
    let t0 = Instant::now();

    control.input = "one".to_string();
    control.submit(&author, t0).unwrap();
    control.wait(TIMEOUT, t0);
    assert!(control.input.is_empty());
    assert!(control.take_scroll_request());

    let mut seen = Vec::new();
    for second in 0..=3 {
        control.poll(t0 + Duration::from_secs(second));
        seen.push(control.cooldown_remaining());
    }
    assert_eq!(seen, vec![3, 2, 1, 0]);

    control.input = "two".to_string();
    assert_eq!(control.submit(&author, t0 + Duration::from_secs(3)), Ok(()));
    control.wait(TIMEOUT, t0 + Duration::from_secs(3));
    assert_eq!(backend.inserts().len(), 2);
}

#[test]
fn test_submit_during_cooldown_makes_no_call() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let author = user("ada");
    let t0 = Instant::now();

    control.input = "one".to_string();
    control.submit(&author, t0).unwrap();
    control.wait(TIMEOUT, t0);

    control.input = "two".to_string();
    assert_matches!(
        control.submit(&author, t0 + Duration::from_millis(500)),
        Err(SubmitRejected::CoolingDown(3))
    );
    assert_eq!(control.placeholder(), "Wait 3 seconds");
    assert_eq!(backend.inserts().len(), 1);
}

#[test]
fn test_body_over_limit_makes_no_call() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);

    control.input = "x".repeat(256);
    assert_matches!(
        control.submit(&user("ada"), Instant::now()),
        Err(SubmitRejected::TooLong { length: 256, max: 255 })
    );
    assert!(backend.inserts().is_empty());
    assert_eq!(control.input.len(), 256);
}

#[test]
fn test_body_at_limit_is_sent() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let t0 = Instant::now();

    control.input = "x".repeat(255);
    assert_eq!(control.submit(&user("ada"), t0), Ok(()));
    control.wait(TIMEOUT, t0);
    assert_eq!(backend.inserts().len(), 1);
}

#[test]
fn test_failed_insert_keeps_input_and_skips_cooldown() {
    let backend = FakeBackend::with_messages(0);
    backend.fail_insert.store(true, Ordering::SeqCst);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let t0 = Instant::now();

    control.input = "will fail".to_string();
    control.submit(&user("ada"), t0).unwrap();
    control.wait(TIMEOUT, t0);

    assert_eq!(control.input, "will fail");
    assert_eq!(control.phase(), SubmitPhase::Idle);
    assert_eq!(control.cooldown_remaining(), 0);
    assert_eq!(
        control.take_notice().as_deref(),
        Some("value too long for type character varying(255)")
    );

    backend.fail_insert.store(false, Ordering::SeqCst);
    assert_eq!(control.submit(&user("ada"), t0), Ok(()));
}

#[test]
fn test_labels_follow_phase() {
    let backend = FakeBackend::with_messages(0);
    let mut control = SubmissionControl::new(backend.clone(), 3, 255);
    let t0 = Instant::now();

    assert_eq!(control.button_label(), "Send");
    assert_eq!(control.placeholder(), "Type a message");

    control.input = "hi".to_string();
    control.submit(&user("ada"), t0).unwrap();
    assert_eq!(control.button_label(), "Sending...");
    assert_matches!(control.submit(&user("ada"), t0), Err(SubmitRejected::InFlight));
    control.wait(TIMEOUT, t0);
    assert_eq!(control.button_label(), "Send");
}
