//! Seitenleiste: rendert den Inhalt, den der gemountete Modus eingehängt hat.

use crate::app::regions::SidebarItem;
use crate::app::{AppIntent, AppState};

/// Rendert die Seitenleiste und gibt ausgelöste Intents zurück.
pub fn render_sidebar(ctx: &egui::Context, state: &AppState) -> Vec<AppIntent> {
    let mut events = Vec::new();

    egui::SidePanel::left("mode_sidebar")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            let Some(content) = state.regions.sidebar.get() else {
                ui.label("…");
                return;
            };

            ui.heading(&content.title);
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for item in &content.items {
                    render_item(ui, item, &mut events);
                }
            });
        });

    events
}

fn render_item(ui: &mut egui::Ui, item: &SidebarItem, events: &mut Vec<AppIntent>) {
    match item {
        SidebarItem::Heading(text) => {
            ui.add_space(4.0);
            ui.strong(text);
        }
        SidebarItem::Text(text) => {
            ui.label(text);
        }
        SidebarItem::Warning(text) => {
            ui.colored_label(egui::Color32::from_rgb(220, 60, 40), text);
        }
        SidebarItem::Action(action) => {
            if ui
                .add_enabled(action.enabled, egui::Button::new(&action.label))
                .clicked()
            {
                events.push(action.intent.clone());
            }
        }
        SidebarItem::Input {
            label,
            field,
            value,
            multiline,
        } => {
            ui.label(label);
            // Kopie editieren; Änderungen laufen als Intent zurück in den State
            let mut text = value.clone();
            let response = if *multiline {
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .desired_rows(4)
                        .code_editor(),
                )
            } else {
                ui.text_edit_singleline(&mut text)
            };
            if response.changed() {
                events.push(AppIntent::TextFieldChanged {
                    field: *field,
                    value: text,
                });
            }
        }
        SidebarItem::Code(code) => {
            let mut text = code.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .desired_rows(3),
            );
        }
        SidebarItem::Separator => {
            ui.separator();
        }
    }
}
