//! Input Bar Component
//!
//! Composer at the bottom of the chat room. The placeholder shows the
//! cooldown countdown; the counter turns red past the length limit.

use std::time::Instant;

use eframe::egui;

use crate::egui_app::messaging::state::ChatRoom;
use crate::egui_app::messaging::submission::SubmitRejected;
use crate::egui_app::theme::{colors, styles};
use crate::shared::SessionUser;

/// Render the input bar
pub fn render(ui: &mut egui::Ui, room: &mut ChatRoom, user: &SessionUser) {
    styles::input_bar_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        ui.horizontal(|ui| {
            let enabled = room.composer.can_submit();
            let hint = room.composer.placeholder();

            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut room.composer.input)
                    .hint_text(hint)
                    .desired_width(ui.available_width() - 140.0),
            );

            let length = room.composer.input_len();
            let max = room.composer.max_chars();
            let counter_color = if length > max { colors::ERROR } else { colors::TEXT_SECONDARY };
            ui.colored_label(counter_color, format!("{}/{}", length, max));

            let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
            let mut send = response.lost_focus() && enter_pressed;

            let button = egui::Button::new(
                egui::RichText::new(room.composer.button_label()).color(colors::TEXT_ON_ACCENT),
            )
            .fill(colors::ACCENT);
            if ui.add_enabled(enabled, button).clicked() {
                send = true;
            }

            if send {
                if let Err(SubmitRejected::TooLong { .. }) = room.submit(user, Instant::now()) {
                    response.request_focus();
                }
            }
        });
    });
}
