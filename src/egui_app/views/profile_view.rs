use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles};

/// Profile editor window
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.profile.open {
        return;
    }
    let Some(user) = state.auth_state.user().cloned() else {
        state.profile.close();
        return;
    };

    let initial = user
        .display_name()
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    let mut open = true;
    let mut save = false;
    let mut cancel = false;

    egui::Window::new("Update Profile")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(320.0);

            ui.horizontal(|ui| {
                styles::avatar_badge(ui, &initial);
                ui.colored_label(colors::TEXT_SECONDARY, user.avatar_url().unwrap_or("No avatar"));
            });
            ui.add_space(8.0);

            ui.label("Avatar image");
            ui.add(
                egui::TextEdit::singleline(&mut state.profile.avatar_path_input)
                    .hint_text("/path/to/avatar.png (leave empty to keep)"),
            );
            ui.add_space(8.0);

            ui.label("Username");
            ui.text_edit_singleline(&mut state.profile.name_input);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                let label = state.profile.button_label();
                if ui.add_enabled(!state.profile.is_saving(), egui::Button::new(label)).clicked() {
                    save = true;
                }
            });
        });

    if save {
        state.save_profile();
    }
    if cancel || !open {
        state.profile.close();
    }
}
