use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;
use crate::egui_app::AppView;

pub mod auth_view;
pub mod chat_view;
pub mod profile_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    let frame_style = egui::Frame::default()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8));

    egui::TopBottomPanel::top("top_panel")
        .frame(frame_style)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("💬 Roomchat").size(18.0).strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(16.0);
                    if let Some(user) = state.auth_state.user() {
                        ui.colored_label(colors::TEXT_SECONDARY, user.email.as_deref().unwrap_or_default());
                    } else {
                        ui.colored_label(colors::TEXT_SECONDARY, state.config.app().backend_url.as_str());
                    }
                });
            });
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let frame = egui::Frame::default()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(0));

    match state.current_view {
        AppView::Auth => {
            egui::CentralPanel::default()
                .frame(frame)
                .show(ctx, |ui| auth_view::render(ui, state));
        }
        AppView::Chat => chat_view::render(ctx, state),
    }

    profile_view::render(ctx, state);
    render_notice(ctx, state);
}

/// Modal notice; blocks the rest of the UI until dismissed
pub fn render_notice(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.notice.clone() else {
        return;
    };

    let modal = egui::Modal::new(egui::Id::new("notice")).show(ctx, |ui| {
        ui.set_max_width(360.0);
        ui.label(egui::RichText::new(message).color(colors::TEXT_LIGHT));
        ui.add_space(12.0);
        ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
    });

    if modal.inner || modal.should_close() {
        state.dismiss_notice();
    }
}
