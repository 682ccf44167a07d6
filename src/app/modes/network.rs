//! Netz-Übersicht: alle Straßen, gespeicherte Nachbarschaften, Projekt-Aktionen.

use glam::DVec2;

use super::{add_ring_layer, add_road_layer, ModeContext, ModeController};
use crate::app::mode::{BoundaryRef, Mode, ModeKind};
use crate::app::regions::{MapOverlay, OverlayShape, SidebarAction, SidebarContent, SidebarItem, TextField};
use crate::app::{AppCommand, AppIntent};
use crate::core::NetworkModel;

/// Modus für das gesamte geladene Netz.
#[derive(Debug, Default)]
pub struct NetworkMode;

impl NetworkMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self
    }
}

impl ModeController for NetworkMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Network
    }

    fn name(&self) -> &str {
        "Netz"
    }

    fn status_text(&self, ctx: &ModeContext<'_>) -> String {
        match ctx.model {
            Some(model) => format!(
                "{} Straßen, {} Kreuzungen",
                model.roads.len(),
                model.intersections.len()
            ),
            None => String::new(),
        }
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let title = if ctx.ui.project_name.is_empty() {
            "Netz".to_string()
        } else {
            format!("Netz: {}", ctx.ui.project_name)
        };
        let mut content = SidebarContent::new(ModeKind::Network, title);
        let Some(model) = ctx.model else {
            return content;
        };

        content.text(self.status_text(ctx));
        let degrees: Vec<String> = model
            .degree_histogram()
            .into_iter()
            .map(|(degree, count)| format!("{degree}: {count}"))
            .collect();
        if !degrees.is_empty() {
            content.text(format!("Kreuzungsgrade {}", degrees.join(", ")));
        }
        content.text(format!("{} modale Filter", model.modal_filters().len()));
        content.action(SidebarAction::new(
            "Neue Nachbarschaft zeichnen",
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary { existing: None },
            },
        ));
        content.action(SidebarAction::new(
            "Route zeichnen",
            AppIntent::ModeRequested { mode: Mode::Route },
        ));

        content.push(SidebarItem::Separator);
        content.heading("Nachbarschaften");
        let mut any = false;
        for name in model.neighbourhood_names() {
            any = true;
            content.action(SidebarAction::new(
                format!("Öffnen: {name}"),
                AppIntent::OpenNeighbourhoodRequested {
                    name: name.to_string(),
                },
            ));
            content.action(SidebarAction::new(
                format!("Grenze bearbeiten: {name}"),
                AppIntent::ModeRequested {
                    mode: Mode::SetBoundary {
                        existing: Some(BoundaryRef(name.to_string())),
                    },
                },
            ));
        }
        if !any {
            content.text("Noch keine Nachbarschaft angelegt");
        }

        content.push(SidebarItem::Separator);
        content.push(SidebarItem::Input {
            label: "Projektname".into(),
            field: TextField::ProjectName,
            value: ctx.ui.project_name.clone(),
            multiline: false,
        });
        content.action(SidebarAction::new(
            "Projekt speichern",
            AppIntent::SaveProjectRequested,
        ));
        content.action(SidebarAction::new(
            "Projekt wechseln",
            AppIntent::SwitchProjectRequested,
        ));
        content
    }

    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay {
        let mut overlay = MapOverlay::new(ModeKind::Network);
        let Some(model) = ctx.model else {
            return overlay;
        };
        // Abgedunkelte Umgebung: Untersuchungsgebiet bleibt als Loch frei
        let bounds = model.bounds();
        let outer = bounds.expanded(10.0 * bounds.size().max_element());
        let mask = bounds
            .inverted_within(&outer)
            .into_iter()
            .map(|p| p.exterior().to_vec())
            .collect();
        overlay.add(
            "study-area-mask",
            OverlayShape::Fill(mask),
            ctx.options.mask_color,
            0.0,
        );
        add_road_layer(&mut overlay, model, ctx.options);
        add_ring_layer(
            &mut overlay,
            "study-area",
            model.boundary_geometry().exterior(),
            ctx.options.road_color,
            1.0,
        );

        let rings: Vec<Vec<DVec2>> = model
            .neighbourhood_names()
            .filter_map(|name| model.neighbourhood(name))
            .map(|p| {
                let mut ring = p.exterior().to_vec();
                if let Some(first) = ring.first().copied() {
                    ring.push(first);
                }
                ring
            })
            .collect();
        overlay.add(
            "neighbourhoods",
            OverlayShape::Lines(rings),
            ctx.options.boundary_color,
            ctx.options.route_width_px * 0.5,
        );
        overlay
    }

    /// Klick in eine gespeicherte Nachbarschaft öffnet sie.
    fn map_click_commands(&self, position: DVec2, ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        let Some(model) = ctx.model else {
            return Vec::new();
        };
        model
            .neighbourhood_names()
            .find(|name| model.neighbourhood(name).is_some_and(|p| p.contains(position)))
            .map(|name| {
                vec![AppCommand::OpenNeighbourhood {
                    name: name.to_string(),
                }]
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::core::test_support::grid_network;
    use crate::core::Polygon;
    use std::sync::Arc;

    fn state_with_neighbourhood() -> AppState {
        let mut network = grid_network(4, 0.001);
        network.set_neighbourhood(
            "Mitte",
            Polygon::new(vec![
                DVec2::new(0.0005, 0.0005),
                DVec2::new(0.0025, 0.0005),
                DVec2::new(0.0025, 0.0025),
                DVec2::new(0.0005, 0.0025),
            ]),
        );
        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state
    }

    #[test]
    fn overlay_shows_roads_and_stored_boundaries() {
        let state = state_with_neighbourhood();
        let overlay = NetworkMode::new().overlay(&state.mode_context());

        match &overlay.layer("roads").expect("Straßen").shape {
            OverlayShape::Lines(lines) => assert_eq!(lines.len(), 24),
            other => panic!("unerwartete Geometrie: {other:?}"),
        }
        assert!(overlay.layer("study-area").is_some());
        assert!(overlay.layer("neighbourhoods").is_some());
        match &overlay.layer("study-area-mask").expect("Maske").shape {
            OverlayShape::Fill(areas) => assert_eq!(areas.len(), 4),
            other => panic!("unerwartete Geometrie: {other:?}"),
        }
        // Maske liegt unter den Straßen
        assert_eq!(overlay.layers[0].id, "study-area-mask");
    }

    #[test]
    fn sidebar_summarises_intersection_degrees() {
        let state = state_with_neighbourhood();
        let sidebar = NetworkMode::new().sidebar(&state.mode_context());
        assert!(sidebar.items.iter().any(
            |i| matches!(i, SidebarItem::Text(t) if t == "Kreuzungsgrade 2: 4, 3: 8, 4: 4")
        ));
        assert!(sidebar
            .items
            .iter()
            .any(|i| matches!(i, SidebarItem::Text(t) if t == "0 modale Filter")));
    }

    #[test]
    fn click_inside_boundary_opens_it() {
        let state = state_with_neighbourhood();
        let ctx = state.mode_context();
        let commands = NetworkMode::new().map_click_commands(DVec2::new(0.0015, 0.0015), &ctx);
        assert_eq!(
            commands,
            vec![AppCommand::OpenNeighbourhood {
                name: "Mitte".into()
            }]
        );

        let outside = NetworkMode::new().map_click_commands(DVec2::new(0.0029, 0.0029), &ctx);
        assert!(outside.is_empty());
    }

    #[test]
    fn sidebar_offers_edit_for_each_boundary() {
        let state = state_with_neighbourhood();
        let sidebar = NetworkMode::new().sidebar(&state.mode_context());
        assert!(sidebar.actions().any(|a| a.intent
            == AppIntent::ModeRequested {
                mode: Mode::SetBoundary {
                    existing: Some(BoundaryRef("Mitte".into()))
                }
            }));
    }
}
