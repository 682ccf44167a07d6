//! Routen-Koordinator: Wegpunkte, eingerastete Geometrie und Undo/Redo.
//!
//! Der Koordinator wird erzeugt, sobald ein Netz geladen ist, und von den Modi
//! `SetBoundary` und `Route` verwendet. Jede Änderung an der Wegpunkt-Liste legt
//! vorher einen Snapshot im Verlauf ab und verwirft die zwischengespeicherte
//! Geometrie; `route()` berechnet sie bei Bedarf neu.

mod geometry;


pub use crate::core::Waypoint;
pub use geometry::{RouteGeometry, RouteSegment};

use std::cell::OnceCell;
use std::sync::Arc;

use glam::DVec2;

use super::history::EditHistory;
use crate::core::geo::{distance_to_segment, haversine_distance_m};
use crate::core::{GeoBounds, Polygon, SnappingGraph};
use crate::error::ValidationError;

/// Eine Ring-Ecke gilt als Kreuzung, wenn sie höchstens so weit vom
/// eingerasteten Knoten entfernt liegt.
const RING_VERTEX_ON_NODE_M: f64 = 1.0;

/// Zeichnet eine Route auf dem Straßennetz.
pub struct RouteDrawer {
    graph: Arc<dyn SnappingGraph>,
    extent: GeoBounds,
    waypoints: Vec<Waypoint>,
    history: EditHistory<Vec<Waypoint>>,
    history_depth: usize,
    snap_mode: bool,
    cache: OnceCell<RouteGeometry>,
}

impl std::fmt::Debug for RouteDrawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDrawer")
            .field("extent", &self.extent)
            .field("waypoints", &self.waypoints)
            .field("snap_mode", &self.snap_mode)
            .finish_non_exhaustive()
    }
}

impl RouteDrawer {
    /// Erstellt einen leeren Koordinator für ein Netz.
    pub fn new(graph: Arc<dyn SnappingGraph>, extent: GeoBounds, history_depth: usize) -> Self {
        Self {
            graph,
            extent,
            waypoints: Vec::new(),
            history: EditHistory::new_with_capacity(history_depth),
            history_depth,
            snap_mode: true,
            cache: OnceCell::new(),
        }
    }

    /// Aktuelle Wegpunkte.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Anzahl Wegpunkte.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Keine Wegpunkte gesetzt.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Ausdehnung, innerhalb der Wegpunkte liegen müssen.
    pub fn extent(&self) -> GeoBounds {
        self.extent
    }

    /// Neue Wegpunkte rasten ein (`true`) oder bleiben frei (`false`).
    pub fn snap_mode(&self) -> bool {
        self.snap_mode
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn check_position(&self, pos: DVec2) -> Result<(), ValidationError> {
        if self.extent.contains(pos) {
            Ok(())
        } else {
            Err(ValidationError::OutOfExtent {
                lon: pos.x,
                lat: pos.y,
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index < self.waypoints.len() {
            Ok(())
        } else {
            Err(ValidationError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            })
        }
    }

    /// Snapshot vor einer Änderung ablegen und Cache verwerfen.
    fn begin_edit(&mut self) {
        self.history.record_snapshot(self.waypoints.clone());
        self.cache.take();
    }

    fn new_waypoint(&self, position: DVec2) -> Waypoint {
        Waypoint {
            position,
            snapped: self.snap_mode,
        }
    }

    /// Hängt einen Wegpunkt an.
    pub fn add_waypoint(&mut self, position: DVec2) -> Result<(), ValidationError> {
        self.check_position(position)?;
        self.begin_edit();
        let waypoint = self.new_waypoint(position);
        self.waypoints.push(waypoint);
        Ok(())
    }

    /// Fügt einen Wegpunkt vor `index` ein (`index == len` hängt an).
    pub fn insert_waypoint(&mut self, index: usize, position: DVec2) -> Result<(), ValidationError> {
        if index > self.waypoints.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            });
        }
        self.check_position(position)?;
        self.begin_edit();
        let waypoint = self.new_waypoint(position);
        self.waypoints.insert(index, waypoint);
        Ok(())
    }

    /// Verschiebt einen Wegpunkt; das Snap-Flag bleibt erhalten.
    pub fn move_waypoint(&mut self, index: usize, position: DVec2) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.check_position(position)?;
        self.begin_edit();
        self.waypoints[index].position = position;
        Ok(())
    }

    /// Entfernt einen Wegpunkt; nachfolgende Indizes rücken auf.
    pub fn delete_waypoint(&mut self, index: usize) -> Result<Waypoint, ValidationError> {
        self.check_index(index)?;
        self.begin_edit();
        Ok(self.waypoints.remove(index))
    }

    /// Entfernt alle Wegpunkte (rückgängig machbar).
    pub fn clear(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.begin_edit();
        self.waypoints.clear();
    }

    /// Leere Route mit frischem Verlauf (neuer Zeichenvorgang).
    pub fn reset(&mut self) {
        self.waypoints.clear();
        self.history = EditHistory::new_with_capacity(self.history_depth);
        self.snap_mode = true;
        self.cache.take();
    }

    /// Lädt gespeicherte Wegpunkte einer Grenze (Grenze bearbeiten).
    ///
    /// Wegpunkte außerhalb der Ausdehnung werden übersprungen.
    pub fn load_waypoints(&mut self, waypoints: &[Waypoint]) {
        self.reset();
        for waypoint in waypoints {
            if self.extent.contains(waypoint.position) {
                self.waypoints.push(*waypoint);
            } else {
                log::warn!(
                    "Wegpunkt {:?} liegt außerhalb des Netzes, übersprungen",
                    waypoint.position
                );
            }
        }
    }

    /// Rekonstruiert Wegpunkte aus einem Ring ohne gespeicherte Wegpunkte.
    ///
    /// Nur Ecken, die auf einer Kreuzung liegen, werden eingerastete Wegpunkte.
    /// Stützpunkte der Straßen-Geometrie entstehen beim Routen wieder.
    pub fn load_ring(&mut self, ring: &Polygon) {
        self.reset();
        let mut skipped = 0;
        for vertex in ring.vertices() {
            if !self.extent.contains(*vertex) {
                log::warn!("Grenzpunkt {:?} liegt außerhalb des Netzes, übersprungen", vertex);
                continue;
            }
            let on_node = self.graph.snap(*vertex).is_some_and(|hit| {
                haversine_distance_m(hit.position, *vertex) <= RING_VERTEX_ON_NODE_M
            });
            if on_node {
                self.waypoints.push(Waypoint::snapped(*vertex));
            } else {
                skipped += 1;
            }
        }
        log::debug!(
            "Ring geladen: {} Wegpunkte, {} Stützpunkte übergangen",
            self.waypoints.len(),
            skipped
        );
    }

    /// Schaltet um, ob neue Wegpunkte einrasten. Gibt den neuen Zustand zurück.
    pub fn toggle_snap_mode(&mut self) -> bool {
        self.snap_mode = !self.snap_mode;
        self.snap_mode
    }

    /// Macht die letzte Änderung rückgängig. `false`, wenn nichts zu tun war.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_undo_with_current(self.waypoints.clone()) {
            Some(previous) => {
                self.waypoints = previous;
                self.cache.take();
                true
            }
            None => false,
        }
    }

    /// Stellt die zuletzt rückgängig gemachte Änderung wieder her.
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo_with_current(self.waypoints.clone()) {
            Some(next) => {
                self.waypoints = next;
                self.cache.take();
                true
            }
            None => false,
        }
    }

    /// Eingerastete Geometrie (aus dem Cache oder neu berechnet).
    pub fn route(&self) -> &RouteGeometry {
        self.cache
            .get_or_init(|| geometry::compute_route(self.graph.as_ref(), &self.waypoints))
    }

    /// Schließt die Route zu einem Grenz-Polygon.
    ///
    /// Braucht mindestens drei Wegpunkte; alle Segmente inklusive des
    /// schließenden Segments (letzter → erster Wegpunkt) müssen gelingen.
    pub fn to_polygon(&self) -> Result<Polygon, ValidationError> {
        let n = self.waypoints.len();
        if n < 3 || !self.route().failures().is_empty() {
            return Err(ValidationError::IncompleteBoundary);
        }
        let closing = geometry::compute_segment(
            self.graph.as_ref(),
            n - 1,
            (n - 1, &self.waypoints[n - 1]),
            (0, &self.waypoints[0]),
        )
        .map_err(|_| ValidationError::IncompleteBoundary)?;

        let mut ring = self.route().points.clone();
        geometry::append_points(&mut ring, &closing);
        let polygon = Polygon::new(ring);
        if polygon.is_valid() {
            Ok(polygon)
        } else {
            Err(ValidationError::IncompleteBoundary)
        }
    }

    /// Index des nächsten Wegpunkts innerhalb von `max_distance_m`.
    pub fn nearest_waypoint(&self, position: DVec2, max_distance_m: f64) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(idx, wp)| (idx, haversine_distance_m(position, wp.position)))
            .filter(|(_, dist)| *dist <= max_distance_m)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }

    /// Einfügeposition für einen Klick: hinter dem Wegpunkt, dessen Segment am
    /// nächsten liegt. Ohne Segmente wird angehängt.
    pub fn insertion_index(&self, position: DVec2) -> usize {
        if self.waypoints.len() < 2 {
            return self.waypoints.len();
        }
        let route = self.route();
        let mut best = (self.waypoints.len(), f64::INFINITY);
        for (index, pair) in self.waypoints.windows(2).enumerate() {
            let line: Vec<DVec2> = match route.segments.get(index).map(|s| &s.result) {
                Some(Ok(points)) if points.len() >= 2 => points.clone(),
                _ => vec![pair[0].position, pair[1].position],
            };
            let dist = line
                .windows(2)
                .map(|seg| distance_to_segment(position, seg[0], seg[1]))
                .fold(f64::INFINITY, f64::min);
            if dist < best.1 {
                best = (index + 1, dist);
            }
        }
        best.0
    }
}
