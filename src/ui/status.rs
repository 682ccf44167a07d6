//! Status-Bar am unteren Bildschirmrand.

use crate::app::AppState;

/// Rendert die Status-Bar
pub fn render_status_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let kind = state.mode().kind();
            let controller = state.modes.controller(kind);
            let name = controller.map_or(kind.as_str(), |c| c.name());
            ui.label(format!("Modus: {}", name));

            if let Some(controller) = controller {
                let text = controller.status_text(&state.mode_context());
                if !text.is_empty() {
                    ui.separator();
                    ui.label(text);
                }
            }

            if let Some(surface) = &state.map_surface {
                ui.separator();
                ui.label(format!(
                    "{:.1} m/px | {:.5}, {:.5}",
                    surface.meters_per_pixel(),
                    surface.center.y,
                    surface.center.x
                ));
            }

            if state.tasks.any_busy() {
                ui.separator();
                ui.spinner();
            }

            if let Some(msg) = &state.ui.status_message {
                ui.separator();
                if state.ui.last_error.is_some() {
                    ui.colored_label(egui::Color32::from_rgb(220, 60, 40), msg);
                } else {
                    ui.label(msg);
                }
            }
        });
    });
}
