//! Chat Header Component
//!
//! Room title, live-update status pill, and the user's actions.

use eframe::egui;

use crate::egui_app::backend::SubscriptionStatus;
use crate::egui_app::messaging::state::ChatRoom;
use crate::egui_app::theme::{colors, styles};

/// What the user asked for from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    EditProfile,
    SignOut,
}

/// Label and color for a subscription status
pub fn status_label(status: Option<&SubscriptionStatus>) -> (&'static str, egui::Color32) {
    match status {
        Some(SubscriptionStatus::Connected) => ("Live", colors::SUCCESS),
        Some(SubscriptionStatus::Retrying) => ("Retrying", colors::WARNING),
        Some(SubscriptionStatus::Connecting) => ("Connecting", colors::INFO),
        Some(SubscriptionStatus::Error(_)) => ("Offline", colors::ERROR),
        Some(SubscriptionStatus::Disconnected) | None => ("Disconnected", colors::MUTED),
    }
}

/// Render the chat header
pub fn render(ui: &mut egui::Ui, room: &mut ChatRoom, display_name: &str) -> HeaderAction {
    let mut action = HeaderAction::None;

    styles::top_bar_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("# chat").strong().size(16.0).color(colors::TEXT_LIGHT));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Sign out").clicked() {
                    action = HeaderAction::SignOut;
                }
                if ui.button("Profile").clicked() {
                    action = HeaderAction::EditProfile;
                }
                ui.colored_label(colors::TEXT_SECONDARY, display_name);
                ui.add_space(8.0);

                if ui.button("Log").on_hover_text("Show connection log").clicked() {
                    room.show_connection_log = !room.show_connection_log;
                }

                let (label, color) = status_label(room.subscription_status.as_ref());
                let pill = styles::pill_frame(color).show(ui, |ui| {
                    ui.label(egui::RichText::new(label).color(color).strong());
                });
                if let Some(SubscriptionStatus::Error(message)) = &room.subscription_status {
                    pill.response.on_hover_text(message);
                }
            });
        });
    });

    if room.show_connection_log {
        let mut open = true;
        egui::Window::new("Connection Log")
            .open(&mut open)
            .collapsible(true)
            .resizable(true)
            .default_size(egui::vec2(420.0, 260.0))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .show(ui.ctx(), |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for line in room.status_log.iter().rev() {
                        ui.label(egui::RichText::new(line).color(colors::TEXT_SECONDARY));
                    }
                });
            });
        if !open {
            room.show_connection_log = false;
        }
    }

    action
}
