//! Common test utilities and helpers
//!
//! - Scripted in-memory backend
//! - Fixtures for users and messages

pub mod fixtures;

pub use fake_backend::*;
pub use fixtures::*;
