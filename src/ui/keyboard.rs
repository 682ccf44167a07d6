//! Keyboard-Shortcuts.
//!
//! Verarbeitet globale Tastenkombinationen und mappt sie auf `AppIntent`s.

use crate::app::{AppIntent, AppState, Mode};

/// Verarbeitet Keyboard-Shortcuts und gibt AppIntents zurück.
pub fn collect_keyboard_intents(ctx: &egui::Context, state: &AppState) -> Vec<AppIntent> {
    let mut events = Vec::new();
    // Textfelder haben Vorrang
    if ctx.wants_keyboard_input() {
        return events;
    }

    let (modifiers, key_z, key_y, key_o, key_s, key_escape, key_s_plain) = ctx.input(|i| {
        (
            i.modifiers,
            i.key_pressed(egui::Key::Z),
            i.key_pressed(egui::Key::Y),
            i.key_pressed(egui::Key::O),
            i.key_pressed(egui::Key::S),
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::S) && i.modifiers.is_none(),
        )
    });

    // Undo / Redo (Cmd/Ctrl + Z / Y, Shift+Cmd+Z)
    if modifiers.command && key_z && !modifiers.shift {
        events.push(AppIntent::UndoRequested);
    }
    if modifiers.command && (key_y || (modifiers.shift && key_z)) {
        events.push(AppIntent::RedoRequested);
    }

    if modifiers.command && key_o && !state.tasks.any_busy() {
        events.push(AppIntent::ImportNetworkRequested);
    }
    if modifiers.command && key_s && state.model().is_some() {
        events.push(AppIntent::SaveProjectRequested);
    }

    // S allein: Einrasten umschalten
    if key_s_plain && state.mode().uses_route_drawer() {
        events.push(AppIntent::ToggleSnapModeRequested);
    }

    // Escape: eine Ebene zurück
    if key_escape {
        match state.mode() {
            Mode::ViewShortcuts => events.push(AppIntent::ModeRequested {
                mode: Mode::Neighbourhood,
            }),
            Mode::Neighbourhood => events.push(AppIntent::CloseNeighbourhoodRequested),
            Mode::SetBoundary { .. } | Mode::Route => events.push(AppIntent::ModeRequested {
                mode: Mode::Network,
            }),
            Mode::Title | Mode::Network => {}
        }
    }

    events
}
