//! Property-based tests

pub mod message_proptest;
