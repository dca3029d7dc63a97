//! Theme styling helpers.

use eframe::egui::{self, Color32, CornerRadius, Stroke};
use super::colors;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();

    style.visuals.window_fill = colors::TOP_BAR_BG;
    style.visuals.window_stroke = Stroke::new(1.0, colors::BORDER);
    style.visuals.panel_fill = colors::BG_DARK;

    style.visuals.widgets.inactive.bg_fill = colors::INPUT_BAR_BG;
    style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors::ACCENT);
    style.visuals.selection.bg_fill = colors::BUBBLE_OWN;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    ctx.set_style(style);
}

/// Frame for the top bar and chat header
pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Frame for the composer
pub fn input_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::INPUT_BAR_BG)
        .stroke(Stroke::new(1.0, colors::BORDER))
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Frame for a message bubble; the tail corner sits on the author's side
pub fn bubble_frame(is_own: bool) -> egui::Frame {
    let (fill, nw, ne) = if is_own {
        (colors::BUBBLE_OWN, 12, 4)
    } else {
        (colors::BUBBLE_OTHER, 4, 12)
    };
    egui::Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, colors::BORDER))
        .corner_radius(CornerRadius { nw, ne, sw: 12, se: 12 })
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Status pill: tinted fill with a solid border
pub fn pill_frame(color: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(color.linear_multiply(0.15))
        .stroke(Stroke::new(1.0, color))
        .corner_radius(CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(8, 4))
}

/// Round avatar badge showing an initial
pub fn avatar_badge(ui: &mut egui::Ui, initial: &str) {
    egui::Frame::new()
        .fill(colors::ACCENT)
        .corner_radius(CornerRadius::same(16))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(initial).color(colors::TEXT_ON_ACCENT).strong());
        });
}
