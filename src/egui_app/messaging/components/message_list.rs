//! Message List Component
//!
//! Scrollable feed, oldest at the top. Reaching the top requests the
//! previous page; a button does the same for users without a scroll wheel.

use eframe::egui;
use uuid::Uuid;

use super::message_bubble;
use crate::egui_app::messaging::state::ChatRoom;
use crate::egui_app::theme::colors;

/// Distance from the top, in points, that counts as "scrolled to the top"
const TOP_THRESHOLD: f32 = 4.0;

/// Render the message list
pub fn render(ui: &mut egui::Ui, room: &mut ChatRoom, current_user_id: Option<Uuid>) {
    let scroll_to_newest = std::mem::take(&mut room.scroll_to_newest);

    let output = egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);
            render_history_header(ui, room);

            let messages = room.feed.messages();
            if messages.is_empty() && !room.feed.is_busy() {
                render_empty_state(ui);
            }

            let mut last_date: Option<String> = None;
            for message in messages {
                if let Some(date) = message.created_at.map(|ts| {
                    ts.with_timezone(&chrono::Local).format("%A, %e %B %Y").to_string()
                }) {
                    if last_date.as_ref() != Some(&date) {
                        render_date_separator(ui, &date);
                        last_date = Some(date);
                    }
                }

                let is_own = current_user_id == Some(message.user_id);
                message_bubble::render(ui, message, is_own);
            }

            ui.add_space(8.0);
            if scroll_to_newest {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });

    let scrollable = output.content_size.y > output.inner_rect.height();
    room.on_scrolled_to_top(scrollable && output.state.offset.y <= TOP_THRESHOLD);
}

/// Top of the list: a spinner while paging, else a button when more exists
fn render_history_header(ui: &mut egui::Ui, room: &mut ChatRoom) {
    ui.vertical_centered(|ui| {
        if room.feed.is_busy() {
            ui.spinner();
        } else if room.feed.has_more() {
            if ui.button("Load older messages").clicked() {
                room.feed.load_older();
            }
        } else if !room.feed.messages().is_empty() {
            ui.colored_label(colors::TEXT_SECONDARY, "Beginning of the conversation");
        }
    });
    ui.add_space(8.0);
}

fn render_empty_state(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.colored_label(colors::TEXT_SECONDARY, "No messages yet");
        ui.add_space(8.0);
        ui.colored_label(colors::TEXT_SECONDARY, "Send a message to start the conversation");
    });
}

fn render_date_separator(ui: &mut egui::Ui, date: &str) {
    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        ui.colored_label(colors::TEXT_SECONDARY, date);
    });
    ui.add_space(12.0);
}
