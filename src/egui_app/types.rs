/**
 * Shared Types Module
 *
 * View and step enums shared by the egui views.
 */

/// Current app view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    /// Email login screen
    Auth,
    /// The chat room
    Chat,
}

/// Where the user is in the emailed-code login flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStep {
    /// Asking for the email address
    #[default]
    EnterEmail,
    /// Code sent; asking for it
    EnterCode,
}
