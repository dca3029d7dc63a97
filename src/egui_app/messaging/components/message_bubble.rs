//! Message Bubble Component
//!
//! One message: author avatar and name, body, send time.

use eframe::egui;

use crate::egui_app::theme::{colors, styles};
use crate::shared::Message;

/// Render a message bubble
pub fn render(ui: &mut egui::Ui, message: &Message, is_own_message: bool) {
    let align = if is_own_message { egui::Align::RIGHT } else { egui::Align::LEFT };

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        let max_width = ui.available_width() * 0.7;

        ui.allocate_ui_with_layout(egui::vec2(max_width, 0.0), egui::Layout::top_down(align), |ui| {
            ui.horizontal(|ui| {
                if !is_own_message {
                    styles::avatar_badge(ui, &message.initial());
                }
                styles::bubble_frame(is_own_message).show(ui, |ui| {
                    ui.label(egui::RichText::new(&message.user_name).color(colors::ACCENT).strong());
                    ui.label(egui::RichText::new(&message.message_content).color(colors::TEXT_LIGHT));
                    if let Some(time) = format_time(message) {
                        ui.label(egui::RichText::new(time).color(colors::TEXT_SECONDARY).small());
                    }
                });
            });
        });
    });

    ui.add_space(4.0);
}

/// Local send time as HH:MM
fn format_time(message: &Message) -> Option<String> {
    message
        .created_at
        .map(|ts| ts.with_timezone(&chrono::Local).format("%H:%M").to_string())
}
