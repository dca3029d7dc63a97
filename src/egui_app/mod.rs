//! egui Native Desktop App Module
//!
//! Desktop client for a single shared chat room backed by a managed
//! Postgres service (REST table API, auth, storage, realtime websocket).
//!
//! # Architecture
//!
//! - **`config`** - Configuration plus the session access token
//! - **`backend`** - `ChatBackend` / `AccountBackend` traits and their HTTP and websocket implementation
//! - **`messaging`** - Feed synchronizer, submission control, chat room components
//! - **`auth`** - Login flow state and input checks
//! - **`profile`** - Display name and avatar editor
//! - **`worker`** - Background jobs polled from the frame loop
//! - **`state`** / **`views`** / **`theme`** - egui application shell
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs        - Module exports and documentation
//! ├── main.rs       - Binary entry point
//! ├── config.rs     - Configuration management
//! ├── auth.rs       - Login state
//! ├── profile.rs    - Profile editor
//! ├── types.rs      - View enums
//! ├── worker.rs     - Background jobs
//! ├── backend/      - Backend binding
//! ├── messaging/    - Chat room
//! ├── state/        - AppState
//! ├── theme/        - Colors and frames
//! └── views/        - Screens
//! ```

pub mod config;
pub mod auth;
pub mod types;
pub mod backend;
pub mod worker;
pub mod state;
pub mod views;
pub mod theme;
pub mod messaging;
pub mod profile;

// Re-export commonly used types
pub use config::Config;
pub use auth::AuthState;
pub use types::{AppView, AuthStep};
pub use state::AppState;
pub use backend::{AccountBackend, ChatBackend, PageQuery, RestBackend, SortOrder, Subscription, SubscriptionStatus};
pub use messaging::{ChatRoom, FeedSynchronizer, SubmissionControl};
