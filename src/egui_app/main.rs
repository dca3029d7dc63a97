/**
 * Roomchat - Main Entry Point
 *
 * Loads `.env`, installs the tracing subscriber, reads configuration and
 * runs the egui frame loop.
 */
use std::time::{Duration, Instant};

use eframe::egui;
use roomchat::egui_app::{theme, views, AppState, Config};
use tracing_subscriber::EnvFilter;

/// Upper bound between frames, so worker results are picked up promptly
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<(), eframe::Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roomchat=info")),
        )
        .init();

    let config = Config::new();
    tracing::info!("Backend: {}", config.app().backend_url);

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Roomchat",
        options,
        Box::new(|cc| {
            theme::apply_global_theme(&cc.egui_ctx);
            Ok(Box::new(RoomchatApp { state }))
        }),
    )
}

struct RoomchatApp {
    state: AppState,
}

impl eframe::App for RoomchatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.state.update(now);

        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);

        let wake = self
            .state
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .map_or(POLL_INTERVAL, |until| until.min(POLL_INTERVAL));
        ctx.request_repaint_after(wake);
    }
}
