//! Das geladene Straßennetz (Modell) mit Kreuzungen, Straßen und Nachbarschaften.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::DVec2;
use indexmap::IndexMap;

use super::filters::{FilterKind, ModalFilter, ModalFilters};
use super::geo::{
    closest_point_on_polyline, distance_to_segment, polyline_intersection, polyline_length_m,
    trim_position, GeoBounds, Polygon,
};
use super::model::NetworkModel;
use super::savefile::{SavedBoundary, SavedFilter, SavedState, SavedWaypoint};
use super::snapping::{GraphEdge, NodeId, RouteGraph, SnappingGraph};
use super::waypoint::Waypoint;
use crate::error::ImportError;

/// Standard-Snap-Distanz des exportierten Graphen.
pub const DEFAULT_SNAP_DISTANCE_M: f64 = crate::shared::options::SNAP_MAX_DISTANCE_M;

/// ID einer Straße (Index in `RoadNetwork::roads`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadId(pub usize);

/// Kreuzung oder Endpunkt einer Straße.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Ursprüngliche OSM-Node-ID
    pub osm_id: i64,
    /// Position (lon/lat)
    pub position: DVec2,
}

/// Straßenabschnitt zwischen zwei Kreuzungen.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Ursprüngliche OSM-Way-ID
    pub osm_way_id: i64,
    /// Start-Kreuzung (Index in `intersections`)
    pub src: NodeId,
    /// End-Kreuzung (Index in `intersections`)
    pub dst: NodeId,
    /// Polyline von `src` nach `dst`
    pub geometry: Vec<DVec2>,
    /// Straßenname (OSM-Tag `name`)
    pub name: Option<String>,
    /// Straßenklasse (OSM-Tag `highway`)
    pub highway: String,
}

impl Road {
    /// Länge in Metern.
    pub fn length_m(&self) -> f64 {
        polyline_length_m(&self.geometry)
    }

    /// Anzeigename (Name oder Straßenklasse).
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("unbenannt ({})", self.highway))
    }

    /// Mittelpunkt der Polyline (nach Stützpunkten, nicht nach Länge).
    pub fn midpoint(&self) -> DVec2 {
        match self.geometry.len() {
            0 => DVec2::ZERO,
            n if n % 2 == 1 => self.geometry[n / 2],
            n => (self.geometry[n / 2 - 1] + self.geometry[n / 2]) * 0.5,
        }
    }
}

/// Gespeicherte Grenze samt der Wegpunkte, aus denen sie gezeichnet wurde.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBoundary {
    /// Geschlossener Ring entlang der Straßen
    pub polygon: Polygon,
    /// Wegpunkte des Zeichenvorgangs (leer bei alten Speicherständen)
    pub waypoints: Vec<Waypoint>,
}

/// Vollständiges Netzmodell eines Projekts.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    /// Alle Kreuzungen; Index = `NodeId`
    pub intersections: Vec<Intersection>,
    /// Alle Straßen; Index = `RoadId`
    pub roads: Vec<Road>,
    bounds: GeoBounds,
    /// Gespeicherte Nachbarschafts-Grenzen in Einfügereihenfolge
    neighbourhoods: IndexMap<String, StoredBoundary>,
    /// Name der aktuell geöffneten Nachbarschaft
    active_neighbourhood: Option<String>,
    modal_filters: ModalFilters,
    /// Maximale Snap-Distanz des exportierten Graphen
    snap_max_distance_m: f64,
}

impl RoadNetwork {
    /// Baut ein Modell aus bereits zerlegten Teilen.
    ///
    /// `bounds` fällt auf die Ausdehnung der Kreuzungen zurück.
    pub fn from_parts(
        intersections: Vec<Intersection>,
        roads: Vec<Road>,
        bounds: Option<GeoBounds>,
    ) -> Result<Self, ImportError> {
        if roads.is_empty() {
            return Err(ImportError::NoRoads);
        }
        let bounds = bounds
            .or_else(|| GeoBounds::from_points(intersections.iter().map(|i| &i.position)))
            .ok_or(ImportError::NoRoads)?;

        Ok(Self {
            intersections,
            roads,
            bounds,
            neighbourhoods: IndexMap::new(),
            active_neighbourhood: None,
            modal_filters: ModalFilters::new(),
            snap_max_distance_m: DEFAULT_SNAP_DISTANCE_M,
        })
    }

    /// Lädt ein Modell aus OSM-XML-Bytes plus optionalem Speicherstand (JSON).
    pub fn load(input_bytes: &[u8], saved: Option<&str>) -> Result<Self, ImportError> {
        let mut network = crate::xml::parse_osm_network(input_bytes)?;
        if let Some(saved) = saved {
            let state = SavedState::from_json(saved)?;
            network.apply_saved_state(&state)?;
        }
        log::info!(
            "Netz geladen: {} Kreuzungen, {} Straßen, {} Nachbarschaften, {} Filter",
            network.intersections.len(),
            network.roads.len(),
            network.neighbourhoods.len(),
            network.modal_filters.len()
        );
        Ok(network)
    }

    /// Setzt die maximale Snap-Distanz für `to_snapping_graph`.
    pub fn with_snap_distance(mut self, meters: f64) -> Self {
        self.snap_max_distance_m = meters;
        self
    }

    /// Snapping-Graph mit expliziter maximaler Snap-Distanz.
    pub fn build_route_graph(&self, max_snap_distance_m: f64) -> RouteGraph {
        let positions = self.intersections.iter().map(|i| i.position).collect();
        let edges = self
            .roads
            .iter()
            .map(|r| GraphEdge {
                node1: r.src,
                node2: r.dst,
                geometry: r.geometry.clone(),
            })
            .collect();
        RouteGraph::new(positions, edges, max_snap_distance_m)
    }

    // ── Nachbarschaften ──────────────────────────────────────────────

    /// Speichert (oder ersetzt) eine Nachbarschafts-Grenze ohne Wegpunkte und öffnet sie.
    pub fn set_neighbourhood(&mut self, name: &str, boundary: Polygon) {
        self.set_drawn_neighbourhood(name, boundary, Vec::new());
    }

    /// Speichert (oder ersetzt) eine gezeichnete Grenze samt Wegpunkten und öffnet sie.
    pub fn set_drawn_neighbourhood(
        &mut self,
        name: &str,
        polygon: Polygon,
        waypoints: Vec<Waypoint>,
    ) {
        let stored = StoredBoundary { polygon, waypoints };
        if self.neighbourhoods.insert(name.to_string(), stored).is_some() {
            log::info!("Nachbarschaft '{}' aktualisiert", name);
        } else {
            log::info!("Nachbarschaft '{}' angelegt", name);
        }
        self.active_neighbourhood = Some(name.to_string());
    }

    /// Entfernt eine gespeicherte Grenze. `false`, wenn der Name unbekannt ist.
    pub fn remove_neighbourhood(&mut self, name: &str) -> bool {
        if self.neighbourhoods.shift_remove(name).is_none() {
            return false;
        }
        if self.active_neighbourhood.as_deref() == Some(name) {
            self.active_neighbourhood = None;
        }
        log::info!("Nachbarschaft '{}' entfernt", name);
        true
    }

    /// Öffnet eine gespeicherte Nachbarschaft. `false`, wenn der Name unbekannt ist.
    pub fn open_neighbourhood(&mut self, name: &str) -> bool {
        if self.neighbourhoods.contains_key(name) {
            self.active_neighbourhood = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Schließt die aktive Nachbarschaft (die Grenze bleibt gespeichert).
    pub fn close_neighbourhood(&mut self) {
        if let Some(name) = self.active_neighbourhood.take() {
            log::debug!("Nachbarschaft '{}' geschlossen", name);
        }
    }

    /// Grenze einer gespeicherten Nachbarschaft.
    pub fn neighbourhood(&self, name: &str) -> Option<&Polygon> {
        self.neighbourhoods.get(name).map(|b| &b.polygon)
    }

    /// Grenze samt Wegpunkten.
    pub fn stored_boundary(&self, name: &str) -> Option<&StoredBoundary> {
        self.neighbourhoods.get(name)
    }

    /// Namen aller gespeicherten Nachbarschaften in Einfügereihenfolge.
    pub fn neighbourhood_names(&self) -> impl Iterator<Item = &str> {
        self.neighbourhoods.keys().map(String::as_str)
    }

    /// Name und Grenze der aktiven Nachbarschaft.
    pub fn active_neighbourhood(&self) -> Option<(&str, &Polygon)> {
        let name = self.active_neighbourhood.as_deref()?;
        self.neighbourhoods.get(name).map(|b| (name, &b.polygon))
    }

    /// Straßen, deren Mittelpunkt innerhalb der Grenze liegt.
    pub fn interior_roads(&self, boundary: &Polygon) -> Vec<RoadId> {
        self.roads
            .iter()
            .enumerate()
            .filter(|(_, road)| boundary.contains(road.midpoint()))
            .map(|(idx, _)| RoadId(idx))
            .collect()
    }

    /// Nächstgelegene Straße aus `candidates` (Abstand in Grad-Einheiten).
    pub fn nearest_road(&self, pos: DVec2, candidates: &[RoadId]) -> Option<RoadId> {
        candidates
            .iter()
            .filter_map(|id| {
                let road = self.roads.get(id.0)?;
                let dist = road
                    .geometry
                    .windows(2)
                    .map(|pair| distance_to_segment(pos, pair[0], pair[1]))
                    .fold(f64::INFINITY, f64::min);
                Some((*id, dist))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    // ── Modale Filter ────────────────────────────────────────────────

    /// Alle Filter, nach Straße sortiert.
    pub fn modal_filters(&self) -> &ModalFilters {
        &self.modal_filters
    }

    /// Ersetzt alle Filter (Undo/Redo).
    pub fn replace_modal_filters(&mut self, filters: ModalFilters) {
        self.modal_filters = filters;
    }

    /// Liegt auf der Straße ein Filter?
    pub fn is_filtered(&self, road: RoadId) -> bool {
        self.modal_filters.contains_key(&road)
    }

    /// Setzt einen Filter auf die nächstgelegene Straße aus `candidates`.
    ///
    /// Der Filter sitzt auf dem Punkt der Straße, der `pos` am nächsten liegt.
    /// Ein vorhandener Filter derselben Straße wird ersetzt.
    pub fn add_modal_filter(
        &mut self,
        pos: DVec2,
        candidates: &[RoadId],
        kind: FilterKind,
    ) -> Option<RoadId> {
        let road = self.nearest_road(pos, candidates)?;
        let (position, _) = closest_point_on_polyline(pos, &self.roads[road.0].geometry)?;
        self.modal_filters.insert(road, ModalFilter { kind, position });
        log::info!("Filter '{}' auf Straße {:?}", kind.label(), road);
        Some(road)
    }

    /// Setzt einen Filter auf jede Straße aus `candidates`, die `line` kreuzt.
    ///
    /// Gibt die gefilterten Straßen in aufsteigender Reihenfolge zurück.
    pub fn add_many_modal_filters(
        &mut self,
        line: &[DVec2],
        candidates: &[RoadId],
        kind: FilterKind,
    ) -> Vec<RoadId> {
        let mut hits: Vec<(RoadId, DVec2)> = candidates
            .iter()
            .filter_map(|id| {
                let road = self.roads.get(id.0)?;
                polyline_intersection(&road.geometry, line).map(|pos| (*id, pos))
            })
            .collect();
        hits.sort_by_key(|(id, _)| *id);
        hits.dedup_by_key(|(id, _)| *id);
        for (road, position) in &hits {
            self.modal_filters.insert(
                *road,
                ModalFilter {
                    kind,
                    position: *position,
                },
            );
        }
        log::info!("{} Filter entlang der Linie gesetzt", hits.len());
        hits.into_iter().map(|(id, _)| id).collect()
    }

    /// Entfernt den Filter einer Straße.
    pub fn delete_modal_filter(&mut self, road: RoadId) -> Option<ModalFilter> {
        self.modal_filters.remove(&road)
    }

    // ── Speicherstand ────────────────────────────────────────────────

    /// Exportiert Nachbarschaften und Filter mit gerundeten Koordinaten.
    pub fn to_saved_state(&self) -> SavedState {
        let trimmed_pair = |p: DVec2| {
            let p = trim_position(p);
            [p.x, p.y]
        };
        SavedState {
            version: SavedState::CURRENT_VERSION,
            neighbourhoods: self
                .neighbourhoods
                .iter()
                .map(|(name, stored)| SavedBoundary {
                    name: name.clone(),
                    ring: stored.polygon.trimmed().to_lon_lat_pairs(),
                    waypoints: stored
                        .waypoints
                        .iter()
                        .map(|w| SavedWaypoint {
                            point: trimmed_pair(w.position),
                            snapped: w.snapped,
                        })
                        .collect(),
                })
                .collect(),
            active: self.active_neighbourhood.clone(),
            modal_filters: self
                .modal_filters
                .iter()
                .map(|(road, filter)| SavedFilter {
                    road: road.0,
                    kind: filter.kind,
                    point: trimmed_pair(filter.position),
                })
                .collect(),
        }
    }

    /// Übernimmt einen Speicherstand. Ersetzt alle Nachbarschaften und Filter.
    ///
    /// Bei einem Fehler bleibt das Modell unverändert.
    pub fn apply_saved_state(&mut self, state: &SavedState) -> Result<(), ImportError> {
        let mut neighbourhoods = IndexMap::new();
        for boundary in &state.neighbourhoods {
            let polygon = Polygon::from_lon_lat_pairs(&boundary.ring);
            if !polygon.is_valid() {
                return Err(ImportError::SavedState(format!(
                    "Grenze '{}' hat weniger als drei Ecken",
                    boundary.name
                )));
            }
            let waypoints = boundary
                .waypoints
                .iter()
                .map(|w| Waypoint {
                    position: DVec2::new(w.point[0], w.point[1]),
                    snapped: w.snapped,
                })
                .collect();
            neighbourhoods.insert(
                boundary.name.clone(),
                StoredBoundary { polygon, waypoints },
            );
        }
        let active = state
            .active
            .clone()
            .filter(|name| neighbourhoods.contains_key(name));

        let mut modal_filters = ModalFilters::new();
        for saved in &state.modal_filters {
            if saved.road >= self.roads.len() {
                return Err(ImportError::SavedState(format!(
                    "Filter auf unbekannter Straße {}",
                    saved.road
                )));
            }
            modal_filters.insert(
                RoadId(saved.road),
                ModalFilter {
                    kind: saved.kind,
                    position: DVec2::new(saved.point[0], saved.point[1]),
                },
            );
        }

        self.neighbourhoods = neighbourhoods;
        self.active_neighbourhood = active;
        self.modal_filters = modal_filters;
        Ok(())
    }

    /// Anzahl Kreuzungen je Straßenanzahl (für die Statistik im Netz-Modus).
    pub fn degree_histogram(&self) -> BTreeMap<usize, usize> {
        let mut degree = vec![0usize; self.intersections.len()];
        for road in &self.roads {
            for node in [road.src, road.dst] {
                if let Some(d) = degree.get_mut(node.0 as usize) {
                    *d += 1;
                }
            }
        }
        let mut histogram = BTreeMap::new();
        for d in degree {
            *histogram.entry(d).or_insert(0) += 1;
        }
        histogram
    }
}

impl NetworkModel for RoadNetwork {
    fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    fn boundary_geometry(&self) -> Polygon {
        self.bounds.to_polygon()
    }

    fn to_snapping_graph(&self) -> Arc<dyn SnappingGraph> {
        Arc::new(self.build_route_graph(self.snap_max_distance_m))
    }
}
