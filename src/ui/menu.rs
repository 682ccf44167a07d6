//! Top-Menü (Projekt, Bearbeiten, Ansicht, Modus, Hilfe).

use crate::app::{AppIntent, AppState, Mode};

/// Rendert die Menü-Leiste
pub fn render_menu(ctx: &egui::Context, state: &AppState) -> Vec<AppIntent> {
    let mut events = Vec::new();
    let has_model = state.model().is_some();
    let drawing = state.mode().uses_route_drawer();
    let filtering = *state.mode() == Mode::Neighbourhood;
    let busy = state.tasks.any_busy();

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("Projekt", |ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("OSM-Datei importieren…"))
                    .clicked()
                {
                    events.push(AppIntent::ImportNetworkRequested);
                    ui.close();
                }

                if ui
                    .add_enabled(has_model, egui::Button::new("Speichern"))
                    .clicked()
                {
                    events.push(AppIntent::SaveProjectRequested);
                    ui.close();
                }

                if ui
                    .add_enabled(has_model, egui::Button::new("Projekt wechseln"))
                    .clicked()
                {
                    events.push(AppIntent::SwitchProjectRequested);
                    ui.close();
                }

                ui.separator();

                if ui.button("Beenden").clicked() {
                    events.push(AppIntent::ExitRequested);
                    ui.close();
                }
            });

            ui.menu_button("Bearbeiten", |ui| {
                let can_undo = (drawing && state.route.as_ref().is_some_and(|r| r.can_undo()))
                    || (filtering && state.filter_history.can_undo());
                let can_redo = (drawing && state.route.as_ref().is_some_and(|r| r.can_redo()))
                    || (filtering && state.filter_history.can_redo());

                if ui
                    .add_enabled(can_undo, egui::Button::new("Rückgängig (Ctrl+Z)"))
                    .clicked()
                {
                    events.push(AppIntent::UndoRequested);
                    ui.close();
                }

                if ui
                    .add_enabled(can_redo, egui::Button::new("Wiederholen (Ctrl+Y)"))
                    .clicked()
                {
                    events.push(AppIntent::RedoRequested);
                    ui.close();
                }
            });

            ui.menu_button("Ansicht", |ui| {
                if ui.button("Zoom +").clicked() {
                    events.push(AppIntent::ZoomInRequested);
                    ui.close();
                }
                if ui.button("Zoom −").clicked() {
                    events.push(AppIntent::ZoomOutRequested);
                    ui.close();
                }
                if ui
                    .add_enabled(has_model, egui::Button::new("Auf Netz einpassen"))
                    .clicked()
                {
                    events.push(AppIntent::FitToModelRequested);
                    ui.close();
                }
            });

            ui.menu_button("Modus", |ui| {
                let entries = [
                    ("Netz", Mode::Network),
                    ("Neue Nachbarschaft", Mode::SetBoundary { existing: None }),
                    ("Nachbarschaft", Mode::Neighbourhood),
                    ("Schleichwege", Mode::ViewShortcuts),
                    ("Route", Mode::Route),
                ];
                for (label, mode) in entries {
                    let enabled = state.validate_transition(&mode).is_ok();
                    let active = state.mode().kind() == mode.kind();
                    let clicked = ui
                        .add_enabled_ui(enabled, |ui| ui.selectable_label(active, label))
                        .inner
                        .clicked();
                    if clicked {
                        events.push(AppIntent::ModeRequested { mode });
                        ui.close();
                    }
                }
            });

            ui.menu_button("Hilfe", |ui| {
                if ui.button("Info").clicked() {
                    events.push(AppIntent::ToggleAboutRequested);
                    ui.close();
                }
            });
        });
    });

    events
}
