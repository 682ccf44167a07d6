//! Schleichweg-Ansicht: Straßen im Inneren der Nachbarschaft anklicken und prüfen.
//!
//! Ohne Auswahl zeigt die Karte alle Schleichwege, mit Auswahl nur die, die
//! über die gewählte Straße führen.

use glam::DVec2;

use super::neighbourhood::interior_lines;
use super::{add_filter_layer, add_ring_layer, ModeContext, ModeController, MountContext};
use crate::app::mode::{Mode, ModeKind};
use crate::app::regions::{MapOverlay, OverlayShape, SidebarAction, SidebarContent};
use crate::app::{AppCommand, AppIntent};
use crate::core::Shortcuts;
use crate::error::EditorResult;

fn shortcuts(ctx: &ModeContext<'_>) -> Option<Shortcuts> {
    let model = ctx.model?;
    let (_, boundary) = model.active_neighbourhood()?;
    Some(Shortcuts::new(model, boundary))
}

/// Modus zur Ansicht einzelner Straßen im Inneren.
#[derive(Debug, Default)]
pub struct ViewShortcutsMode;

impl ViewShortcutsMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self
    }
}

impl ModeController for ViewShortcutsMode {
    fn kind(&self) -> ModeKind {
        ModeKind::ViewShortcuts
    }

    fn name(&self) -> &str {
        "Schleichwege"
    }

    fn status_text(&self, _ctx: &ModeContext<'_>) -> String {
        "Straße im Inneren anklicken".into()
    }

    fn on_mount(&mut self, _mode: &Mode, ctx: &mut MountContext<'_>) -> EditorResult<()> {
        ctx.ui.selected_road = None;
        Ok(())
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let mut content = SidebarContent::new(ModeKind::ViewShortcuts, "Schleichwege");
        let shortcuts = shortcuts(ctx).unwrap_or_default();
        content.text(format!(
            "{} Schleichwege zwischen {} Einfahrten",
            shortcuts.paths.len(),
            shortcuts.entrances().len()
        ));

        let selected = ctx
            .ui
            .selected_road
            .and_then(|id| ctx.model.and_then(|m| m.roads.get(id.0)).map(|r| (id, r)));
        match selected {
            Some((id, road)) => {
                content.heading(road.label());
                content.text(format!("Länge: {:.0} m", road.length_m()));
                content.text(format!("Typ: {}", road.highway));
                let through = shortcuts.subset(id);
                content.text(format!("{} Schleichwege über diese Straße", through.len()));
                for path in through {
                    content.text(format!(
                        "• {} Straßen, {:.0} m",
                        path.roads.len(),
                        path.length_m
                    ));
                }
            }
            None => {
                content.text(self.status_text(ctx));
            }
        }
        content.action(SidebarAction::new(
            "Zurück zur Nachbarschaft",
            AppIntent::ModeRequested {
                mode: Mode::Neighbourhood,
            },
        ));
        content
    }

    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay {
        let mut overlay = MapOverlay::new(ModeKind::ViewShortcuts);
        let Some(model) = ctx.model else {
            return overlay;
        };
        overlay.add(
            "interior-roads",
            OverlayShape::Lines(interior_lines(model)),
            ctx.options.interior_road_color,
            ctx.options.road_width_px * 2.0,
        );
        if let Some((_, boundary)) = model.active_neighbourhood() {
            add_ring_layer(
                &mut overlay,
                "boundary",
                boundary.exterior(),
                ctx.options.boundary_color,
                ctx.options.route_width_px,
            );
        }
        let shortcuts = shortcuts(ctx).unwrap_or_default();
        let paths: Vec<Vec<DVec2>> = match ctx.ui.selected_road {
            Some(id) => shortcuts
                .subset(id)
                .into_iter()
                .map(|p| p.geometry.clone())
                .collect(),
            None => shortcuts.paths.iter().map(|p| p.geometry.clone()).collect(),
        };
        overlay.add(
            "shortcuts",
            OverlayShape::Lines(paths),
            ctx.options.route_color,
            ctx.options.road_width_px * 2.0,
        );
        if let Some(road) = ctx.ui.selected_road.and_then(|id| model.roads.get(id.0)) {
            overlay.add(
                "selected-road",
                OverlayShape::Lines(vec![road.geometry.clone()]),
                ctx.options.highlight_color,
                ctx.options.route_width_px,
            );
        }
        add_filter_layer(&mut overlay, model, ctx.options);
        overlay
    }

    fn map_click_commands(&self, position: DVec2, _ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        vec![AppCommand::SelectRoadAt { position }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::core::test_support::grid_network;
    use crate::core::{Polygon, RoadId};
    use std::sync::Arc;

    fn state_with_inner_square() -> AppState {
        let mut network = grid_network(4, 0.001);
        network.set_neighbourhood(
            "Mitte",
            Polygon::new(vec![
                DVec2::new(0.0006, 0.0006),
                DVec2::new(0.0024, 0.0006),
                DVec2::new(0.0024, 0.0024),
                DVec2::new(0.0006, 0.0024),
            ]),
        );
        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state
    }

    fn shortcut_lines(overlay: &MapOverlay) -> usize {
        match overlay.layer("shortcuts").map(|l| &l.shape) {
            Some(OverlayShape::Lines(lines)) => lines.len(),
            _ => 0,
        }
    }

    #[test]
    fn selecting_a_road_narrows_shortcuts_to_it() {
        let mut state = state_with_inner_square();
        let mode = ViewShortcutsMode::new();
        assert_eq!(shortcut_lines(&mode.overlay(&state.mode_context())), 6);

        let road = state
            .model()
            .and_then(|m| m.active_neighbourhood().map(|(_, b)| m.interior_roads(b)))
            .and_then(|roads| roads.first().copied())
            .expect("Straße im Inneren");
        state.ui.selected_road = Some(road);

        let ctx = state.mode_context();
        let through = shortcut_lines(&mode.overlay(&ctx));
        assert!(through >= 1 && through < 6);
        assert!(mode
            .sidebar(&ctx)
            .items
            .iter()
            .any(|item| matches!(item, crate::app::SidebarItem::Text(t) if t == &format!("{through} Schleichwege über diese Straße"))));
    }

    #[test]
    fn unknown_selection_shows_no_shortcut() {
        let mut state = state_with_inner_square();
        state.ui.selected_road = Some(RoadId(999));
        let overlay = ViewShortcutsMode::new().overlay(&state.mode_context());
        assert_eq!(shortcut_lines(&overlay), 0);
        assert!(overlay.layer("selected-road").is_none());
    }
}
