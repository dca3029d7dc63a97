//! Profile editor
//!
//! Edits the display name and avatar of the signed-in user. A chosen avatar
//! file is uploaded as `<user id>.<extension>` first; its public URL then
//! goes into the profile update together with the name.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::egui_app::backend::AccountBackend;
use crate::egui_app::worker::{self, JobPoll};
use crate::shared::{ChatError, ProfileUpdate, SessionUser};

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";

/// Storage object name for `user`'s avatar taken from `path`
pub fn avatar_file_name(user: &SessionUser, path: &Path) -> Result<String, ChatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ChatError::validation("avatar", "The avatar file has no extension"))?;
    Ok(format!("{}.{}", user.id, ext.to_ascii_lowercase()))
}

/// Content type of an avatar file; only images are accepted
pub fn avatar_content_type(path: &Path) -> Result<String, ChatError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ChatError::validation("avatar", format!("{} is not an image", path.display())));
    }
    Ok(mime.essence_str().to_string())
}

/// Upload the avatar (if any) and update the profile. Runs on a worker.
pub fn apply_profile_update(
    backend: &dyn AccountBackend,
    user: &SessionUser,
    name: String,
    avatar: Option<PathBuf>,
) -> Result<SessionUser, ChatError> {
    let mut avatar_url = user.avatar_url().map(str::to_string);

    if let Some(path) = avatar {
        let file_name = avatar_file_name(user, &path)?;
        let content_type = avatar_content_type(&path)?;
        let bytes = std::fs::read(&path)?;
        tracing::info!("Uploading avatar {} ({} bytes)", file_name, bytes.len());
        avatar_url = Some(backend.upload_avatar(&file_name, bytes, &content_type)?);
    }

    backend.update_profile(&ProfileUpdate { name, avatar_url })
}

/// Outcome of a finished profile update, for the view to act on
#[derive(Debug)]
pub enum ProfileOutcome {
    Updated(SessionUser),
    Failed(String),
}

#[derive(Default)]
pub struct ProfileEditor {
    pub open: bool,
    pub name_input: String,
    /// Path of a new avatar image; empty keeps the current one
    pub avatar_path_input: String,
    pending: Option<Receiver<Result<SessionUser, ChatError>>>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the editor prefilled from `user`
    pub fn open_for(&mut self, user: &SessionUser) {
        self.open = true;
        self.name_input = user.user_metadata.name.clone().unwrap_or_default();
        self.avatar_path_input.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_saving() {
            "Updating..."
        } else {
            "Update Profile"
        }
    }

    /// Start saving. Input problems are returned right away.
    pub fn submit(&mut self, backend: Arc<dyn AccountBackend>, user: &SessionUser) -> Result<(), String> {
        if self.is_saving() {
            return Ok(());
        }
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            return Err("Username is required".to_string());
        }
        let avatar = match self.avatar_path_input.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        let user = user.clone();
        self.pending = Some(worker::run_in_background("profile-update", move || {
            apply_profile_update(backend.as_ref(), &user, name, avatar)
        }));
        Ok(())
    }

    /// Pick up a finished save. Success closes the editor.
    pub fn poll(&mut self) -> Option<ProfileOutcome> {
        let polled = worker::poll_job(self.pending.as_ref()?);
        self.finish(polled)
    }

    /// Like `poll`, but blocks up to `timeout`
    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<ProfileOutcome> {
        let polled = worker::wait_job(self.pending.as_ref()?, timeout);
        self.finish(polled)
    }

    fn finish(&mut self, polled: JobPoll<Result<SessionUser, ChatError>>) -> Option<ProfileOutcome> {
        let result = match polled {
            JobPoll::Pending => return None,
            JobPoll::Ready(result) => result,
            JobPoll::Lost => Err(ChatError::network("profile worker exited without a result")),
        };
        self.pending = None;

        match result {
            Ok(user) => {
                tracing::info!("Profile updated for {}", user.id);
                self.open = false;
                self.avatar_path_input.clear();
                Some(ProfileOutcome::Updated(user))
            }
            Err(e) => {
                tracing::error!("Profile update failed: {}", e);
                Some(ProfileOutcome::Failed(e.user_message()))
            }
        }
    }
}
