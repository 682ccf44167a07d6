//! Kartenansicht: zeichnet das Overlay des Modus und übersetzt Maus-Input in Intents.
//!
//! - Linksklick: Klick an den Modus, mit Shift Wegpunkt einfügen
//!   (in der Nachbarschaft: Punkt der Filter-Linie)
//! - Rechtsklick: Wegpunkt unter dem Zeiger entfernen
//! - Linksziehen auf einem Wegpunkt: verschieben, sonst Karte verschieben
//! - Scrollen: Zoom auf den Zeiger

use glam::{DVec2, Vec2};

use crate::app::regions::OverlayShape;
use crate::app::{AppIntent, AppState, Mode};
use crate::core::MapSurface;
use crate::shared::EditorOptions;

/// Zustand eines laufenden Linksziehens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum PrimaryDrag {
    #[default]
    None,
    Pan,
    /// Wegpunkt wird von der Geo-Position `from` gezogen
    Waypoint { from: DVec2 },
}

/// Verwaltet den Input-Zustand der Kartenansicht.
#[derive(Debug, Default)]
pub struct MapViewState {
    primary_drag: PrimaryDrag,
}

impl MapViewState {
    /// Neuer, leerer Input-Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendert die Karte und sammelt Intents.
    pub fn show(&mut self, ctx: &egui::Context, state: &AppState) -> Vec<AppIntent> {
        let mut events = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_gray(30)))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let size = [rect.width(), rect.height()];

                let Some(surface) = state.map_surface.as_ref() else {
                    events.push(AppIntent::MapViewReady { size });
                    return;
                };
                if surface.viewport_size != Vec2::from(size) {
                    events.push(AppIntent::ViewportResized { size });
                }

                draw_overlay(&painter, rect, surface, state);
                if let PrimaryDrag::Waypoint { from } = self.primary_drag {
                    if let Some(pos) = response.interact_pointer_pos() {
                        painter.line_segment(
                            [to_pos2(rect, surface.geo_to_screen(from)), pos],
                            egui::Stroke::new(
                                1.5,
                                EditorOptions::color32(state.options.highlight_color),
                            ),
                        );
                    }
                }

                self.collect_events(ui, &response, surface, state, &mut events);
            });
        events
    }

    fn collect_events(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        surface: &MapSurface,
        state: &AppState,
        events: &mut Vec<AppIntent>,
    ) {
        let rect = response.rect;
        let to_geo = |pos: egui::Pos2| surface.screen_to_geo(to_local(rect, pos));
        let modifiers = ui.input(|i| i.modifiers);

        // Klicks
        if response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let position = to_geo(pos);
                if modifiers.shift && *state.mode() == Mode::Neighbourhood {
                    events.push(AppIntent::FilterLinePointRequested { position });
                } else if modifiers.shift {
                    events.push(AppIntent::WaypointInsertRequested { position });
                } else {
                    events.push(AppIntent::MapClicked { position });
                }
            }
        }
        if response.clicked_by(egui::PointerButton::Secondary) {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(AppIntent::WaypointRemoveAtRequested {
                    position: to_geo(pos),
                });
            }
        }

        // Ziehen
        if response.drag_started_by(egui::PointerButton::Primary) {
            self.primary_drag = match response.interact_pointer_pos().map(to_geo) {
                Some(from) if waypoint_under(state, surface, from) => PrimaryDrag::Waypoint { from },
                _ => PrimaryDrag::Pan,
            };
        }
        let delta = ui.input(|i| i.pointer.delta());
        if delta != egui::Vec2::ZERO {
            let panning = (response.dragged_by(egui::PointerButton::Primary)
                && self.primary_drag == PrimaryDrag::Pan)
                || response.dragged_by(egui::PointerButton::Middle);
            if panning {
                events.push(AppIntent::MapPan {
                    delta: Vec2::new(delta.x, delta.y),
                });
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let PrimaryDrag::Waypoint { from } = self.primary_drag {
                if let Some(pos) = response.interact_pointer_pos() {
                    events.push(AppIntent::WaypointDragFinished {
                        from,
                        to: to_geo(pos),
                    });
                }
            }
            self.primary_drag = PrimaryDrag::None;
        }

        // Scroll-Zoom auf den Zeiger
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                let step = state.options.map_scroll_zoom_step;
                let factor = if scroll > 0.0 { step } else { 1.0 / step };
                events.push(AppIntent::MapZoom {
                    factor,
                    anchor: response.hover_pos().map(|p| to_local(rect, p)),
                });
            }
        }
    }
}

/// Liegt ein Wegpunkt des Routen-Koordinators unter der Position?
fn waypoint_under(state: &AppState, surface: &MapSurface, position: DVec2) -> bool {
    if !state.mode().uses_route_drawer() {
        return false;
    }
    let radius_m = state.options.waypoint_hit_radius_px as f64 * surface.meters_per_pixel();
    state
        .route
        .as_ref()
        .and_then(|r| r.nearest_waypoint(position, radius_m))
        .is_some()
}

fn to_local(rect: egui::Rect, pos: egui::Pos2) -> Vec2 {
    Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

fn to_pos2(rect: egui::Rect, local: Vec2) -> egui::Pos2 {
    egui::pos2(rect.min.x + local.x, rect.min.y + local.y)
}

/// Zeichnet alle Ebenen des eingehängten Overlays.
fn draw_overlay(painter: &egui::Painter, rect: egui::Rect, surface: &MapSurface, state: &AppState) {
    let Some(overlay) = state.regions.map_overlay.get() else {
        return;
    };
    let project = |p: &DVec2| to_pos2(rect, surface.geo_to_screen(*p));

    for layer in &overlay.layers {
        let color = EditorOptions::color32(layer.color);
        let stroke = egui::Stroke::new(layer.width, color);
        match &layer.shape {
            OverlayShape::Lines(lines) => {
                for line in lines {
                    let points: Vec<egui::Pos2> = line.iter().map(project).collect();
                    painter.add(egui::Shape::line(points, stroke));
                }
            }
            OverlayShape::Polygon(ring) => {
                let points: Vec<egui::Pos2> = ring.iter().map(project).collect();
                painter.add(egui::Shape::closed_line(points, stroke));
            }
            OverlayShape::Points(points) => {
                for p in points {
                    painter.circle_filled(project(p), layer.width, color);
                }
            }
            OverlayShape::Fill(areas) => {
                for area in areas {
                    let points: Vec<egui::Pos2> = area.iter().map(project).collect();
                    painter.add(egui::Shape::convex_polygon(
                        points,
                        color,
                        egui::Stroke::NONE,
                    ));
                }
            }
        }
    }
}
