//! Datei-Dialoge und modale Fenster.

use crate::app::{AppIntent, AppState, UiState};

/// Verarbeitet den ausstehenden Import-Dialog und gibt AppIntents zurück.
pub fn handle_file_dialogs(ui_state: &mut UiState) -> Vec<AppIntent> {
    let mut events = Vec::new();

    if ui_state.show_import_dialog {
        ui_state.show_import_dialog = false;

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("OpenStreetMap XML", &["osm", "xml"])
            .pick_file()
        {
            events.push(AppIntent::NetworkFileSelected { path });
        }
    }

    events
}

/// Zeigt das Info-Fenster (Bedienung und Version).
pub fn show_about_window(ctx: &egui::Context, state: &AppState) -> Vec<AppIntent> {
    let mut events = Vec::new();
    if !state.view.show_about {
        return events;
    }

    let mut open = true;
    egui::Window::new("LTN-Editor")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            ui.separator();
            ui.label("Linksklick: Wegpunkt setzen, Filter setzen bzw. Straße wählen");
            ui.label("Shift+Klick: Wegpunkt einfügen bzw. Punkt der Filter-Linie");
            ui.label("Rechtsklick: Wegpunkt entfernen");
            ui.label("Ziehen: Wegpunkt verschieben oder Karte bewegen");
            ui.label("Ctrl+Z / Ctrl+Y: Rückgängig / Wiederholen");
            ui.label("S: Einrasten umschalten, Esc: zurück");
        });

    if !open {
        events.push(AppIntent::ToggleAboutRequested);
    }
    events
}
