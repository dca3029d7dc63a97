use eframe::egui;

use crate::egui_app::messaging::components::chat_header::{self, HeaderAction};
use crate::egui_app::messaging::components::{input_bar, message_list};
use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(user) = state.auth_state.user().cloned() else {
        return;
    };
    let display_name = user.display_name();

    let mut action = HeaderAction::None;
    if let Some(room) = state.chat_room.as_mut() {
        egui::TopBottomPanel::top("chat_header")
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                action = chat_header::render(ui, room, &display_name);
            });

        egui::TopBottomPanel::bottom("input_bar")
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                input_bar::render(ui, room, &user);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::FEED_BG).inner_margin(egui::Margin::symmetric(12, 0)))
            .show(ctx, |ui| {
                message_list::render(ui, room, Some(user.id));
            });
    }

    match action {
        HeaderAction::EditProfile => state.open_profile(),
        HeaderAction::SignOut => state.logout(),
        HeaderAction::None => {}
    }
}
