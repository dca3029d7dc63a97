use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;
use crate::egui_app::types::AuthStep;

const INPUT_WIDTH: f32 = 280.0;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let available_rect = ui.available_rect_before_wrap();

    ui.scope_builder(egui::UiBuilder::new().max_rect(available_rect), |ui| {
        ui.vertical_centered(|ui| {
            let top_space = (available_rect.height() - 280.0).max(0.0) / 2.0;
            ui.add_space(top_space);

            ui.label(egui::RichText::new("💬 Roomchat").size(32.0).strong().color(colors::TEXT_LIGHT));
            ui.add_space(20.0);

            let heading = match state.auth_state.step {
                AuthStep::EnterEmail => "Sign in with your email",
                AuthStep::EnterCode => "Enter your login code",
            };
            ui.label(egui::RichText::new(heading).size(20.0).color(colors::TEXT_LIGHT));
            ui.add_space(16.0);

            if let Some(ref error) = state.auth_state.error {
                ui.label(egui::RichText::new(error).color(colors::ERROR));
                ui.add_space(8.0);
            }
            if let Some(ref info) = state.auth_state.info {
                ui.label(egui::RichText::new(info).color(colors::TEXT_SECONDARY));
                ui.add_space(8.0);
            }

            match state.auth_state.step {
                AuthStep::EnterEmail => render_email_step(ui, state),
                AuthStep::EnterCode => render_code_step(ui, state),
            }

            if state.auth_state.loading {
                ui.add_space(15.0);
                ui.spinner();
            }
        });
    });
}

fn render_email_step(ui: &mut egui::Ui, state: &mut AppState) {
    let response = ui.add_sized(
        [INPUT_WIDTH, 28.0],
        egui::TextEdit::singleline(&mut state.email_input).hint_text("you@example.com"),
    );
    ui.add_space(16.0);

    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let clicked = ui
        .add_enabled(!state.auth_state.loading, primary_button("Send login code"))
        .clicked();
    if (clicked || enter) && !state.auth_state.loading {
        state.handle_request_code();
    }
}

fn render_code_step(ui: &mut egui::Ui, state: &mut AppState) {
    let response = ui.add_sized(
        [INPUT_WIDTH, 28.0],
        egui::TextEdit::singleline(&mut state.code_input).hint_text("123456"),
    );
    ui.add_space(16.0);

    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let clicked = ui
        .add_enabled(!state.auth_state.loading, primary_button("Sign in"))
        .clicked();
    if (clicked || enter) && !state.auth_state.loading {
        state.handle_verify_code();
    }

    ui.add_space(8.0);
    if ui.button("Use a different email").clicked() {
        state.restart_login();
    }
}

fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(colors::TEXT_ON_ACCENT))
        .fill(colors::ACCENT)
        .min_size(egui::vec2(160.0, 32.0))
}
