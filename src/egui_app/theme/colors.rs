//! Color constants for the chat room.
//!
//! Dark slate surfaces with a green accent.

use eframe::egui::Color32;

/// Window background
pub const BG_DARK: Color32 = Color32::from_rgb(0x1C, 0x1C, 0x1C);

/// Top bar and chat header background
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x23, 0x23, 0x23);

/// Message list background
pub const FEED_BG: Color32 = Color32::from_rgb(0x18, 0x18, 0x18);

/// Message bubble for the signed-in user's messages
pub const BUBBLE_OWN: Color32 = Color32::from_rgb(0x1F, 0x4D, 0x3A);

/// Message bubble for everyone else
pub const BUBBLE_OTHER: Color32 = Color32::from_rgb(0x2E, 0x2E, 0x2E);

/// Bubble and card borders
pub const BORDER: Color32 = Color32::from_rgb(0x3E, 0x3E, 0x3E);

/// Composer background
pub const INPUT_BAR_BG: Color32 = Color32::from_rgb(0x26, 0x26, 0x26);

/// Primary text
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xED, 0xED, 0xED);

/// Secondary text (names, timestamps, hints)
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x9B, 0x9B, 0x9B);

/// Accent for buttons and avatars
pub const ACCENT: Color32 = Color32::from_rgb(0x3E, 0xCF, 0x8E);

/// Text drawn on the accent color
pub const TEXT_ON_ACCENT: Color32 = Color32::from_rgb(0x10, 0x10, 0x10);

pub const SUCCESS: Color32 = Color32::from_rgb(0x16, 0xA3, 0x4A);

pub const ERROR: Color32 = Color32::from_rgb(0xDC, 0x26, 0x26);

pub const WARNING: Color32 = Color32::from_rgb(0xEA, 0xB3, 0x08);

/// Connecting status
pub const INFO: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);

/// Neutral status
pub const MUTED: Color32 = Color32::from_rgb(0x6B, 0x72, 0x80);
