//! Integration tests

pub mod feed_sync_test;
pub mod submission_test;
pub mod chat_room_test;
pub mod realtime_test;
pub mod config_test;
