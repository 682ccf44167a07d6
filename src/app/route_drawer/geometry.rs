//! Abgeleitete Routen-Geometrie: pro Wegpunkt-Paar ein Segment.

use glam::DVec2;

use crate::core::Waypoint;
use crate::core::geo::polyline_length_m;
use crate::core::SnappingGraph;
use crate::error::SnapFailure;

/// Ergebnis eines Segments (Wegpunkt `index` → `index + 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    /// Segment-Index
    pub index: usize,
    /// Geometrie oder Fehler dieses Segments
    pub result: Result<Vec<DVec2>, SnapFailure>,
}

/// Eingerastete Geometrie der gesamten Route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    /// Durchgehende Linie; leer, sobald ein Segment fehlschlägt
    pub points: Vec<DVec2>,
    /// Alle Segmente inkl. Fehlern
    pub segments: Vec<RouteSegment>,
}

impl RouteGeometry {
    /// Kein erfolgreiches Segment.
    pub fn is_empty(&self) -> bool {
        self.successful().next().is_none()
    }

    /// Geometrien der erfolgreichen Segmente in Reihenfolge.
    pub fn successful(&self) -> impl Iterator<Item = &[DVec2]> {
        self.segments
            .iter()
            .filter_map(|s| s.result.as_ref().ok().map(Vec::as_slice))
    }

    /// Alle Segment-Fehler in Segment-Reihenfolge.
    pub fn failures(&self) -> Vec<SnapFailure> {
        self.segments
            .iter()
            .filter_map(|s| s.result.as_ref().err().copied())
            .collect()
    }

    /// Summe der erfolgreichen Segmente in Metern (ohne Lücken).
    pub fn length_m(&self) -> f64 {
        self.successful().map(polyline_length_m).sum()
    }
}

/// Endpunkt eines Segments: eingerastet (über den Graphen) oder frei.
fn resolve(
    graph: &dyn SnappingGraph,
    segment: usize,
    waypoint_idx: usize,
    waypoint: &Waypoint,
) -> Result<(DVec2, Option<crate::core::NodeId>), SnapFailure> {
    if !waypoint.snapped {
        return Ok((waypoint.position, None));
    }
    graph
        .snap(waypoint.position)
        .map(|hit| (hit.position, Some(hit.node)))
        .ok_or(SnapFailure::NoSnapCandidate {
            segment,
            waypoint: waypoint_idx,
        })
}

/// Geometrie eines Segments zwischen zwei Wegpunkten.
///
/// Freie Endpunkte werden per Gerade angebunden, eingerastete über `connect`.
pub(crate) fn compute_segment(
    graph: &dyn SnappingGraph,
    segment: usize,
    (from_idx, from): (usize, &Waypoint),
    (to_idx, to): (usize, &Waypoint),
) -> Result<Vec<DVec2>, SnapFailure> {
    let (start, start_node) = resolve(graph, segment, from_idx, from)?;
    let (end, end_node) = resolve(graph, segment, to_idx, to)?;

    match (start_node, end_node) {
        (Some(a), Some(b)) => graph.connect(a, b).ok_or(SnapFailure::NoPath {
            segment,
            from: a,
            to: b,
        }),
        _ => Ok(vec![start, end]),
    }
}

/// Berechnet die komplette Route neu.
///
/// `points` wird nur gefüllt, wenn alle Segmente gelingen; fehlgeschlagene
/// Segmente werden nicht per Gerade überbrückt.
pub(crate) fn compute_route(graph: &dyn SnappingGraph, waypoints: &[Waypoint]) -> RouteGeometry {
    let mut geometry = RouteGeometry::default();
    for (index, pair) in waypoints.windows(2).enumerate() {
        let result = compute_segment(graph, index, (index, &pair[0]), (index + 1, &pair[1]));
        geometry.segments.push(RouteSegment { index, result });
    }
    if geometry.segments.iter().all(|s| s.result.is_ok()) {
        let mut points = Vec::new();
        for segment in geometry.successful() {
            append_points(&mut points, segment);
        }
        geometry.points = points;
    }
    geometry
}

/// Hängt Punkte an, ohne den gemeinsamen Verbindungspunkt zu doppeln.
pub(crate) fn append_points(target: &mut Vec<DVec2>, points: &[DVec2]) {
    for pt in points {
        if target.last() != Some(pt) {
            target.push(*pt);
        }
    }
}
