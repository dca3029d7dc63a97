//! Test fixtures

use std::time::{Duration, Instant};

use roomchat::shared::user::{AppMetadata, UserMetadata};
use roomchat::shared::{Message, SessionUser};
use uuid::Uuid;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn user(name: &str) -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        email: Some(format!("{}@example.com", name)),
        user_metadata: UserMetadata {
            preferred_username: Some(name.to_string()),
            name: None,
            avatar_url: Some(format!("https://cdn.example.com/avatars/{}.png", name)),
        },
        app_metadata: AppMetadata {
            provider: Some("email".to_string()),
        },
    }
}

pub fn message(id: i64) -> Message {
    Message {
        id,
        user_name: format!("user{}", id % 3),
        user_id: Uuid::nil(),
        user_avatar_url: None,
        provider: Some("email".to_string()),
        message_content: format!("message {}", id),
        created_at: None,
    }
}

/// Poll `done` until it returns true or the timeout passes
pub fn eventually(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    done()
}
