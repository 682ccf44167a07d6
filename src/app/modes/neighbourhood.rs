//! Aktive Nachbarschaft: Grenze, Straßen im Inneren und modale Filter.
//!
//! Ein Klick setzt einen Filter auf die nächste Straße im Inneren; Shift-Klicks
//! zeichnen eine Linie, entlang der mehrere Filter auf einmal gesetzt werden.

use glam::DVec2;

use super::{
    add_filter_layer, add_ring_layer, add_road_layer, ModeContext, ModeController, MountContext,
};
use crate::app::mode::{BoundaryRef, Mode, ModeKind};
use crate::app::regions::{MapOverlay, OverlayShape, SidebarAction, SidebarContent, SidebarItem};
use crate::app::{AppCommand, AppIntent};
use crate::core::{FilterKind, RoadNetwork, Shortcuts};
use crate::error::EditorResult;

/// Straßen-Geometrien im Inneren der aktiven Nachbarschaft.
pub(crate) fn interior_lines(model: &RoadNetwork) -> Vec<Vec<glam::DVec2>> {
    let Some((_, boundary)) = model.active_neighbourhood() else {
        return Vec::new();
    };
    model
        .interior_roads(boundary)
        .into_iter()
        .map(|id| model.roads[id.0].geometry.clone())
        .collect()
}

/// Modus für die geöffnete Nachbarschaft.
#[derive(Debug, Default)]
pub struct NeighbourhoodMode;

impl NeighbourhoodMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self
    }
}

impl ModeController for NeighbourhoodMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Neighbourhood
    }

    fn name(&self) -> &str {
        "Nachbarschaft"
    }

    fn status_text(&self, ctx: &ModeContext<'_>) -> String {
        ctx.model
            .and_then(|m| m.active_neighbourhood())
            .map(|(name, boundary)| {
                let count = ctx.model.map_or(0, |m| m.interior_roads(boundary).len());
                format!("{name}: {count} Straßen im Inneren")
            })
            .unwrap_or_default()
    }

    fn on_mount(&mut self, _mode: &Mode, ctx: &mut MountContext<'_>) -> EditorResult<()> {
        ctx.ui.selected_road = None;
        ctx.ui.filter_line.clear();
        Ok(())
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let active = ctx.model.and_then(|m| m.active_neighbourhood());
        let title = active.map_or_else(|| "Nachbarschaft".to_string(), |(name, _)| name.to_string());
        let mut content = SidebarContent::new(ModeKind::Neighbourhood, title);
        let Some((name, _)) = active else {
            content.push(SidebarItem::Warning("Keine Nachbarschaft geöffnet".into()));
            return content;
        };

        content.text(self.status_text(ctx));
        if let Some((model, boundary)) = ctx
            .model
            .and_then(|m| m.active_neighbourhood().map(|(_, b)| (m, b)))
        {
            let shortcuts = Shortcuts::new(model, boundary);
            content.text(format!("{} Schleichwege", shortcuts.paths.len()));
        }

        content.push(SidebarItem::Separator);
        content.heading("Modale Filter");
        for kind in FilterKind::ALL {
            let marker = if kind == ctx.ui.filter_kind { "● " } else { "○ " };
            content.action(SidebarAction::new(
                format!("{marker}{}", kind.label()),
                AppIntent::FilterKindSelected { kind },
            ));
        }
        if let Some(model) = ctx.model {
            for (road, filter) in model.modal_filters() {
                let label = model
                    .roads
                    .get(road.0)
                    .map_or_else(|| format!("Straße {}", road.0), |r| r.label());
                content.action(SidebarAction::new(
                    format!("✖ {} ({label})", filter.kind.label()),
                    AppIntent::DeleteModalFilterRequested { road: *road },
                ));
            }
        }
        let line_points = ctx.ui.filter_line.len();
        content.action(
            SidebarAction::new(
                format!("Filter entlang der Linie ({line_points} Punkte)"),
                AppIntent::ApplyFilterLineRequested,
            )
            .enabled(line_points >= 2),
        );
        content.action(
            SidebarAction::new("Linie verwerfen", AppIntent::ClearFilterLineRequested)
                .enabled(line_points > 0),
        );
        content.action(
            SidebarAction::new("Rückgängig", AppIntent::UndoRequested)
                .enabled(ctx.filter_history.can_undo()),
        );
        content.action(
            SidebarAction::new("Wiederholen", AppIntent::RedoRequested)
                .enabled(ctx.filter_history.can_redo()),
        );

        content.push(SidebarItem::Separator);
        content.action(SidebarAction::new(
            "Schleichwege anzeigen",
            AppIntent::ModeRequested {
                mode: Mode::ViewShortcuts,
            },
        ));
        content.action(SidebarAction::new(
            "Grenze ändern",
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary {
                    existing: Some(BoundaryRef(name.to_string())),
                },
            },
        ));
        content.action(SidebarAction::new(
            "Route zeichnen",
            AppIntent::ModeRequested { mode: Mode::Route },
        ));
        content.push(SidebarItem::Separator);
        content.action(SidebarAction::new(
            "Zurück zum Netz",
            AppIntent::CloseNeighbourhoodRequested,
        ));
        content
    }

    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay {
        let mut overlay = MapOverlay::new(ModeKind::Neighbourhood);
        let Some(model) = ctx.model else {
            return overlay;
        };
        add_road_layer(&mut overlay, model, ctx.options);
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
        add_filter_layer(&mut overlay, model, ctx.options);
        overlay.add(
            "filter-line",
            OverlayShape::Lines(vec![ctx.ui.filter_line.clone()]),
            ctx.options.filter_color,
            ctx.options.road_width_px,
        );
        overlay
    }

    fn map_click_commands(&self, position: DVec2, _ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        vec![AppCommand::AddModalFilter { position }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::core::test_support::grid_network;
    use crate::core::Polygon;
    use std::sync::Arc;

    #[test]
    fn overlay_highlights_interior_roads() {
        // 3×3-Gitter: vier Straßen haben ihren Mittelpunkt im Quadrat oben rechts
        let mut network = grid_network(3, 0.001);
        network.set_neighbourhood(
            "Ecke",
            Polygon::new(vec![
                DVec2::new(0.0009, 0.0009),
                DVec2::new(0.0021, 0.0009),
                DVec2::new(0.0021, 0.0021),
                DVec2::new(0.0009, 0.0021),
            ]),
        );
        let mut state = AppState::new();
        state.replace_model(Arc::new(network));

        let overlay = NeighbourhoodMode::new().overlay(&state.mode_context());
        match &overlay.layer("interior-roads").expect("Ebene").shape {
            OverlayShape::Lines(lines) => assert_eq!(lines.len(), 4),
            other => panic!("unerwartete Geometrie: {other:?}"),
        }
        assert!(overlay.layer("boundary").is_some());
        assert!(overlay.layer("modal-filters").is_none());
    }

    #[test]
    fn filters_appear_in_sidebar_and_overlay() {
        let mut network = grid_network(4, 0.001);
        let square = Polygon::new(vec![
            DVec2::new(0.0006, 0.0006),
            DVec2::new(0.0024, 0.0006),
            DVec2::new(0.0024, 0.0024),
            DVec2::new(0.0006, 0.0024),
        ]);
        network.set_neighbourhood("Mitte", square.clone());
        let interior = network.interior_roads(&square);
        let road = network
            .add_modal_filter(DVec2::new(0.0015, 0.001), &interior, FilterKind::NoEntry)
            .expect("Filter");
        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state.ui.filter_line = vec![DVec2::new(0.0007, 0.0015)];

        let mode = NeighbourhoodMode::new();
        let ctx = state.mode_context();
        let sidebar = mode.sidebar(&ctx);
        assert!(sidebar
            .actions()
            .any(|a| matches!(a.intent, AppIntent::DeleteModalFilterRequested { road: r } if r == road)));
        let apply = sidebar
            .actions()
            .find(|a| matches!(a.intent, AppIntent::ApplyFilterLineRequested))
            .expect("Linien-Aktion");
        assert!(!apply.enabled, "ein Punkt ist noch keine Linie");
        assert!(sidebar
            .actions()
            .any(|a| matches!(a.intent, AppIntent::CloseNeighbourhoodRequested)));

        let overlay = mode.overlay(&ctx);
        match &overlay.layer("modal-filters").expect("Filter-Ebene").shape {
            OverlayShape::Points(points) => assert_eq!(points.len(), 1),
            other => panic!("unerwartete Geometrie: {other:?}"),
        }
        assert_eq!(
            mode.map_click_commands(DVec2::new(0.0015, 0.002), &ctx),
            vec![AppCommand::AddModalFilter {
                position: DVec2::new(0.0015, 0.002)
            }]
        );
    }
}
