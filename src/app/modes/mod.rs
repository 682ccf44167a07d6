//! Trait-basierte Modus-Controller.
//!
//! Jeder Modus implementiert `ModeController` und wird beim `ModeManager`
//! registriert. Controller liefern reine Daten (Seitenleiste, Overlay,
//! Commands für Kartenklicks); Mutationen laufen über die Handler.

mod mode_controller;
pub mod neighbourhood;
pub mod network;
pub mod route;
pub mod set_boundary;
pub mod title;
pub mod view_shortcuts;

pub use mode_controller::ModeController;

use glam::DVec2;

use super::history::EditHistory;
use super::mode::ModeKind;
use super::regions::{MapOverlay, OverlayShape};
use super::route_drawer::RouteDrawer;
use super::state::UiState;
use super::tasks::BackgroundTasks;
use super::Mode;
use crate::core::{MapSurface, ModalFilters, ProjectStore, RoadNetwork};
use crate::shared::EditorOptions;

/// Lesesicht auf die Session für Controller.
pub struct ModeContext<'a> {
    /// Aktiver Modus inkl. Nutzdaten
    pub mode: &'a Mode,
    /// Geladenes Netz
    pub model: Option<&'a RoadNetwork>,
    /// Routen-Koordinator
    pub route: Option<&'a RouteDrawer>,
    /// Undo/Redo der modalen Filter
    pub filter_history: &'a EditHistory<ModalFilters>,
    /// Kartenfläche
    pub map_surface: Option<&'a MapSurface>,
    /// UI-Zustand
    pub ui: &'a UiState,
    /// Optionen
    pub options: &'a EditorOptions,
    /// Laufende Hintergrund-Aufgaben
    pub tasks: &'a BackgroundTasks,
    /// Projekt-Speicher
    pub store: &'a dyn ProjectStore,
}

/// Veränderbare Sicht für den Mount-Hook.
pub struct MountContext<'a> {
    /// Geladenes Netz
    pub model: Option<&'a RoadNetwork>,
    /// Routen-Koordinator
    pub route: Option<&'a mut RouteDrawer>,
    /// UI-Zustand
    pub ui: &'a mut UiState,
}

// ── ModeManager ──────────────────────────────────────────────────

/// Registry aller Modus-Controller; merkt sich den gemounteten Modus.
pub struct ModeManager {
    controllers: Vec<Box<dyn ModeController>>,
    mounted: Option<ModeKind>,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    /// Erstellt einen ModeManager mit allen Standard-Controllern.
    pub fn new() -> Self {
        let mut manager = Self {
            controllers: Vec::new(),
            mounted: None,
        };
        manager.register(Box::new(title::TitleMode::new()));
        manager.register(Box::new(network::NetworkMode::new()));
        manager.register(Box::new(set_boundary::SetBoundaryMode::new()));
        manager.register(Box::new(neighbourhood::NeighbourhoodMode::new()));
        manager.register(Box::new(view_shortcuts::ViewShortcutsMode::new()));
        manager.register(Box::new(route::RouteMode::new()));
        manager
    }

    /// Registriert einen Controller; ersetzt einen vorhandenen gleicher Art.
    pub fn register(&mut self, controller: Box<dyn ModeController>) {
        let kind = controller.kind();
        self.controllers.retain(|c| c.kind() != kind);
        self.controllers.push(controller);
    }

    /// Anzahl registrierter Controller.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Controller für eine Modus-Art.
    pub fn controller(&self, kind: ModeKind) -> Option<&dyn ModeController> {
        self.controllers
            .iter()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_ref())
    }

    /// Veränderbarer Controller für eine Modus-Art.
    pub fn controller_mut(&mut self, kind: ModeKind) -> Option<&mut (dyn ModeController + 'static)> {
        self.controllers
            .iter_mut()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_mut())
    }

    /// Aktuell gemounteter Modus.
    pub fn mounted(&self) -> Option<ModeKind> {
        self.mounted
    }

    pub(crate) fn set_mounted(&mut self, kind: Option<ModeKind>) {
        self.mounted = kind;
    }
}

// ── Gemeinsame Overlay-Bausteine ─────────────────────────────────

/// Alle Straßen des Netzes als Linien-Ebene.
pub(crate) fn add_road_layer(overlay: &mut MapOverlay, model: &RoadNetwork, options: &EditorOptions) {
    let lines = model.roads.iter().map(|r| r.geometry.clone()).collect();
    overlay.add(
        "roads",
        OverlayShape::Lines(lines),
        options.road_color,
        options.road_width_px,
    );
}

/// Route des Koordinators: erfolgreiche Segmente, Fehlstellen und Wegpunkte.
pub(crate) fn add_route_layers(overlay: &mut MapOverlay, route: &RouteDrawer, options: &EditorOptions) {
    let geometry = route.route();
    let waypoints = route.waypoints();

    let mut ok_lines = Vec::new();
    let mut failed_lines = Vec::new();
    for segment in &geometry.segments {
        match &segment.result {
            Ok(points) => ok_lines.push(points.clone()),
            Err(_) => {
                let from = waypoints[segment.index].position;
                let to = waypoints[segment.index + 1].position;
                failed_lines.push(vec![from, to]);
            }
        }
    }

    overlay.add(
        "route",
        OverlayShape::Lines(ok_lines),
        options.route_color,
        options.route_width_px,
    );
    overlay.add(
        "failed-segments",
        OverlayShape::Lines(failed_lines),
        options.failed_segment_color,
        options.route_width_px,
    );
    overlay.add(
        "waypoints",
        OverlayShape::Points(waypoints.iter().map(|w| w.position).collect()),
        options.waypoint_color,
        options.waypoint_radius_px,
    );
}

/// Modale Filter des Netzes als Punkt-Ebene.
pub(crate) fn add_filter_layer(overlay: &mut MapOverlay, model: &RoadNetwork, options: &EditorOptions) {
    let points = model.modal_filters().values().map(|f| f.position).collect();
    overlay.add(
        "modal-filters",
        OverlayShape::Points(points),
        options.filter_color,
        options.waypoint_radius_px * 1.5,
    );
}

/// Geschlossener Umriss als Ebene.
pub(crate) fn add_ring_layer(
    overlay: &mut MapOverlay,
    id: &'static str,
    ring: &[DVec2],
    color: [f32; 4],
    width: f32,
) {
    overlay.add(id, OverlayShape::Polygon(ring.to_vec()), color, width);
}
