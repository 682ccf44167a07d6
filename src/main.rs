//! LTN-Editor.
//!
//! Interaktiver Editor für Low-Traffic-Neighbourhoods: OSM-Straßennetz
//! importieren, Nachbarschafts-Grenzen zeichnen, Schleichwege ansehen.

use std::time::Duration;

use eframe::egui;
use ltn_editor::{ui, AppController, AppIntent, AppState, EditorOptions};

fn main() -> Result<(), eframe::Error> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<(), eframe::Error> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("LTN-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 800.0])
                .with_title("LTN-Editor"),
            renderer: eframe::Renderer::Glow,
            ..Default::default()
        };

        eframe::run_native(
            "LTN-Editor",
            options,
            Box::new(|_cc| Ok(Box::new(EditorApp::new()))),
        )
    }
}

/// Haupt-Anwendungsstruktur
struct EditorApp {
    state: AppState,
    controller: AppController,
    map_view: ui::MapViewState,
}

impl EditorApp {
    fn new() -> Self {
        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = EditorOptions::config_path();
        let editor_options = EditorOptions::load_from_file(&config_path);

        let mut state = AppState::with_options(editor_options);
        let mut controller = AppController::new();
        controller.start(&mut state);

        Self {
            state,
            controller,
            map_view: ui::MapViewState::new(),
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let tasks_finished = self.controller.poll_tasks(&mut self.state);

        let events = self.collect_ui_events(ctx);
        let has_meaningful_events = events
            .iter()
            .any(|e| !matches!(e, AppIntent::ViewportResized { .. }));

        self.process_events(events);

        if has_meaningful_events || tasks_finished {
            ctx.request_repaint();
        } else if self.state.tasks.any_busy() {
            // Hintergrund-Aufgabe läuft: regelmäßig nachsehen
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl EditorApp {
    fn collect_ui_events(&mut self, ctx: &egui::Context) -> Vec<AppIntent> {
        let mut events = Vec::new();

        ui::render_status_bar(ctx, &self.state);
        events.extend(ui::render_menu(ctx, &self.state));
        events.extend(ui::render_sidebar(ctx, &self.state));
        events.extend(ui::handle_file_dialogs(&mut self.state.ui));
        events.extend(ui::show_about_window(ctx, &self.state));
        events.extend(ui::collect_keyboard_intents(ctx, &self.state));
        events.extend(self.map_view.show(ctx, &self.state));

        events
    }

    fn process_events(&mut self, events: Vec<AppIntent>) {
        for event in events {
            if let Err(e) = self.controller.handle_intent(&mut self.state, event) {
                log::error!("Event-Verarbeitung fehlgeschlagen: {}", e);
            }
        }
    }
}
