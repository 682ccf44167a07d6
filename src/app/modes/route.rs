//! Freie Route über das Netz zeichnen.

use glam::DVec2;

use super::{
    add_filter_layer, add_road_layer, add_route_layers, ModeContext, ModeController, MountContext,
};
use crate::app::mode::{Mode, ModeKind};
use crate::app::regions::{MapOverlay, OverlayShape, SidebarAction, SidebarContent, SidebarItem};
use crate::app::{AppCommand, AppIntent};
use crate::error::{EditorResult, ValidationError};

/// Modus zum Zeichnen einer Route.
#[derive(Debug, Default)]
pub struct RouteMode;

impl RouteMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self
    }
}

impl ModeController for RouteMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Route
    }

    fn name(&self) -> &str {
        "Route"
    }

    fn status_text(&self, ctx: &ModeContext<'_>) -> String {
        match ctx.route {
            Some(route) if route.len() >= 2 => format!(
                "{} Wegpunkte, {:.0} m",
                route.len(),
                route.route().length_m()
            ),
            Some(route) => format!("{} Wegpunkte", route.len()),
            None => String::new(),
        }
    }

    fn on_mount(&mut self, _mode: &Mode, ctx: &mut MountContext<'_>) -> EditorResult<()> {
        let route = ctx.route.as_deref_mut().ok_or(ValidationError::ModelRequired {
            mode: ModeKind::Route.as_str(),
        })?;
        route.reset();
        ctx.ui.route_comparison = None;
        Ok(())
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let mut content = SidebarContent::new(ModeKind::Route, "Route zeichnen");
        let Some(route) = ctx.route else {
            return content;
        };

        content.text(self.status_text(ctx));
        for failure in route.route().failures() {
            content.push(SidebarItem::Warning(failure.to_string()));
        }

        for (index, waypoint) in route.waypoints().iter().enumerate() {
            let kind = if waypoint.snapped { "eingerastet" } else { "frei" };
            content.action(SidebarAction::new(
                format!(
                    "✖ {}: {:.5}, {:.5} ({kind})",
                    index + 1,
                    waypoint.position.y,
                    waypoint.position.x
                ),
                AppIntent::WaypointRemoveRequested { index },
            ));
        }

        content.push(SidebarItem::Separator);
        content.action(SidebarAction::new("Rückgängig", AppIntent::UndoRequested).enabled(route.can_undo()));
        content.action(SidebarAction::new("Wiederholen", AppIntent::RedoRequested).enabled(route.can_redo()));
        let snap_label = if route.snap_mode() {
            "Einrasten: an"
        } else {
            "Einrasten: aus"
        };
        content.action(SidebarAction::new(snap_label, AppIntent::ToggleSnapModeRequested));
        content.action(
            SidebarAction::new("Alle Wegpunkte entfernen", AppIntent::ClearRouteRequested)
                .enabled(!route.is_empty()),
        );

        content.push(SidebarItem::Separator);
        content.action(
            SidebarAction::new("Route vergleichen", AppIntent::CompareRouteRequested)
                .enabled(route.len() >= 2),
        );
        if let Some(comparison) = &ctx.ui.route_comparison {
            let describe = |path: Option<&crate::core::RoadPath>| {
                path.map_or_else(|| "keine Verbindung".to_string(), |p| format!("{:.0} m", p.length_m))
            };
            content.text(format!("Ohne Filter: {}", describe(comparison.before.as_ref())));
            content.text(format!("Mit Filtern: {}", describe(comparison.after.as_ref())));
            if let Some(detour) = comparison.detour_m() {
                content.text(format!("Umweg: {detour:.0} m"));
            }
        }
        content.action(SidebarAction::new(
            "Zurück zum Netz",
            AppIntent::ModeRequested {
                mode: Mode::Network,
            },
        ));
        content
    }

    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay {
        let mut overlay = MapOverlay::new(ModeKind::Route);
        if let Some(model) = ctx.model {
            add_road_layer(&mut overlay, model, ctx.options);
            add_filter_layer(&mut overlay, model, ctx.options);
        }
        if let Some(comparison) = &ctx.ui.route_comparison {
            for (id, path, color) in [
                ("route-before", &comparison.before, ctx.options.route_before_color),
                ("route-after", &comparison.after, ctx.options.highlight_color),
            ] {
                if let Some(path) = path {
                    overlay.add(
                        id,
                        OverlayShape::Lines(vec![path.geometry.clone()]),
                        color,
                        ctx.options.route_width_px * 1.5,
                    );
                }
            }
        }
        if let Some(route) = ctx.route {
            add_route_layers(&mut overlay, route, ctx.options);
        }
        overlay
    }

    fn map_click_commands(&self, position: DVec2, _ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        vec![AppCommand::AddWaypoint { position }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::route_drawer::RouteDrawer;
    use crate::app::AppState;
    use crate::core::test_support::grid_network;
    use crate::core::NetworkModel;
    use std::sync::Arc;

    #[test]
    fn sidebar_lists_waypoints_with_remove_actions() {
        let network = grid_network(3, 0.001);
        let mut route = RouteDrawer::new(network.to_snapping_graph(), network.bounds(), 10);
        route.add_waypoint(DVec2::new(0.0, 0.0)).expect("im Gebiet");
        route.add_waypoint(DVec2::new(0.002, 0.0)).expect("im Gebiet");

        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state.route = Some(route);

        let ctx = state.mode_context();
        let sidebar = RouteMode::new().sidebar(&ctx);
        let removes = sidebar
            .actions()
            .filter(|a| matches!(a.intent, AppIntent::WaypointRemoveRequested { .. }))
            .count();
        assert_eq!(removes, 2);

        let overlay = RouteMode::new().overlay(&ctx);
        match &overlay.layer("waypoints").expect("Wegpunkte").shape {
            OverlayShape::Points(points) => assert_eq!(points.len(), 2),
            other => panic!("unerwartete Geometrie: {other:?}"),
        }
        assert!(overlay.layer("route").is_some());
        assert!(overlay.layer("failed-segments").is_none());
    }

    #[test]
    fn comparison_shows_both_routes() {
        let network = grid_network(3, 0.001);
        let comparison =
            crate::core::compare_route(&network, DVec2::ZERO, DVec2::new(0.002, 0.0))
                .expect("Vergleich");
        let mut route = RouteDrawer::new(network.to_snapping_graph(), network.bounds(), 10);
        route.add_waypoint(DVec2::ZERO).expect("im Gebiet");
        route.add_waypoint(DVec2::new(0.002, 0.0)).expect("im Gebiet");

        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state.route = Some(route);
        state.ui.route_comparison = Some(comparison);

        let ctx = state.mode_context();
        let sidebar = RouteMode::new().sidebar(&ctx);
        let compare = sidebar
            .actions()
            .find(|a| matches!(a.intent, AppIntent::CompareRouteRequested))
            .expect("Vergleichs-Aktion");
        assert!(compare.enabled);
        assert!(sidebar
            .items
            .iter()
            .any(|i| matches!(i, SidebarItem::Text(t) if t == "Umweg: 0 m")));

        let overlay = RouteMode::new().overlay(&ctx);
        assert!(overlay.layer("route-before").is_some());
        assert!(overlay.layer("route-after").is_some());
    }
}
