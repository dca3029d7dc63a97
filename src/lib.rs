//! Roomchat - Main Library
//!
//! A desktop client for one shared real-time chat room. Messages live in a
//! table on a managed backend; the client pages through them newest-first,
//! refetches when the backend pushes a change notification, and rate-limits
//! its own submissions with a short cooldown.
//!
//! # Module Structure
//!
//! - **`shared`** - UI-independent types
//!   - Message rows, insert payloads and the length rule
//!   - Change notifications, session and user types
//!   - Configuration and error types
//!
//! - **`egui_app`** - Native desktop app (egui/eframe)
//!   - Backend binding (REST + realtime websocket)
//!   - Feed synchronizer and submission control
//!   - Login, profile editor and chat room views
//!
//! # Threading
//!
//! egui runs a single UI thread. Network calls run on worker threads and
//! report back over channels that the UI polls every frame; the realtime
//! subscription runs on a shared tokio runtime.
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, ChatError>`; configuration returns
//! `ConfigError`. Nothing is fatal to the UI: failures are logged with
//! `tracing` and surfaced as notices.

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod egui_app;
