//! Kürzeste Wege über eine Auswahl von Straßen (Schleichwege, Routenvergleich).
//!
//! Anders als der Snapping-Graph kennt dieser Graph die Straßen-IDs, damit
//! Ergebnisse auf einzelne Straßen zurückgeführt und Filter berücksichtigt
//! werden können.

use glam::DVec2;
use petgraph::graphmap::UnGraphMap;

use super::geo::haversine_distance_m;
use super::network::{RoadId, RoadNetwork};
use super::snapping::NodeId;
use super::spatial::SpatialIndex;

/// Ein Weg über mehrere Straßen.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPath {
    /// Befahrene Straßen in Reihenfolge
    pub roads: Vec<RoadId>,
    /// Durchgehende Geometrie vom Start zum Ziel
    pub geometry: Vec<DVec2>,
    /// Länge in Metern
    pub length_m: f64,
}

impl RoadPath {
    /// Führt der Weg über diese Straße?
    pub fn uses(&self, road: RoadId) -> bool {
        self.roads.contains(&road)
    }
}

/// Ungerichteter Graph über einer Straßen-Auswahl.
pub(crate) struct RoadGraph<'a> {
    network: &'a RoadNetwork,
    graph: UnGraphMap<NodeId, RoadId>,
    lengths_m: Vec<f64>,
}

impl<'a> RoadGraph<'a> {
    /// Baut den Graphen aus `roads`. Unbekannte IDs und Schleifen werden übergangen.
    pub(crate) fn new(network: &'a RoadNetwork, roads: impl IntoIterator<Item = RoadId>) -> Self {
        let lengths_m: Vec<f64> = network.roads.iter().map(|r| r.length_m()).collect();
        let mut graph = UnGraphMap::new();
        for id in roads {
            let Some(road) = network.roads.get(id.0) else {
                continue;
            };
            if road.src == road.dst {
                continue;
            }
            // Bei parallelen Straßen gewinnt die kürzere
            let replace = graph
                .edge_weight(road.src, road.dst)
                .map(|existing: &RoadId| lengths_m[id.0] < lengths_m[existing.0])
                .unwrap_or(true);
            if replace {
                graph.add_edge(road.src, road.dst, id);
            }
        }
        Self {
            network,
            graph,
            lengths_m,
        }
    }

    /// Liegt die Kreuzung auf mindestens einer Straße des Graphen?
    pub(crate) fn contains_node(&self, node: NodeId) -> bool {
        self.graph.contains_node(node)
    }

    fn position(&self, node: NodeId) -> Option<DVec2> {
        self.network
            .intersections
            .get(node.0 as usize)
            .map(|i| i.position)
    }

    /// Kürzester Weg zwischen zwei verschiedenen Kreuzungen.
    pub(crate) fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<RoadPath> {
        if from == to || !self.contains_node(from) || !self.contains_node(to) {
            return None;
        }
        let goal = self.position(to)?;
        let (length_m, nodes) = petgraph::algo::astar(
            &self.graph,
            from,
            |n| n == to,
            |(_, _, id)| self.lengths_m[id.0],
            |n| {
                self.position(n)
                    .map(|p| haversine_distance_m(p, goal))
                    .unwrap_or(0.0)
            },
        )?;

        let mut roads = Vec::with_capacity(nodes.len());
        let mut geometry: Vec<DVec2> = Vec::new();
        for pair in nodes.windows(2) {
            let id = *self.graph.edge_weight(pair[0], pair[1])?;
            let road = self.network.roads.get(id.0)?;
            let points: Box<dyn Iterator<Item = &DVec2>> = if road.src == pair[0] {
                Box::new(road.geometry.iter())
            } else {
                Box::new(road.geometry.iter().rev())
            };
            for pt in points {
                if geometry.last() != Some(pt) {
                    geometry.push(*pt);
                }
            }
            roads.push(id);
        }
        Some(RoadPath {
            roads,
            geometry,
            length_m,
        })
    }
}

/// Route zwischen zwei Punkten ohne und mit modalen Filtern.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComparison {
    /// Ohne Filter (`None`: keine Verbindung)
    pub before: Option<RoadPath>,
    /// Mit Filtern (`None`: durch Filter getrennt)
    pub after: Option<RoadPath>,
}

impl RouteComparison {
    /// Umweg in Metern durch die Filter (`None`, wenn eine Seite fehlt).
    pub fn detour_m(&self) -> Option<f64> {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => Some(after.length_m - before.length_m),
            _ => None,
        }
    }
}

/// Vergleicht die kürzeste Route zwischen den Kreuzungen nahe `from` und `to`
/// vor und nach den modalen Filtern. `None` ohne Kreuzungen im Netz.
pub fn compare_route(network: &RoadNetwork, from: DVec2, to: DVec2) -> Option<RouteComparison> {
    let positions: Vec<DVec2> = network.intersections.iter().map(|i| i.position).collect();
    let index = SpatialIndex::from_positions(&positions);
    let start = index.nearest(from)?.node_id;
    let end = index.nearest(to)?.node_id;

    let all = (0..network.roads.len()).map(RoadId);
    let before = RoadGraph::new(network, all.clone()).shortest_path(start, end);
    let after = RoadGraph::new(network, all.filter(|id| !network.is_filtered(*id)))
        .shortest_path(start, end);
    log::debug!(
        "Routenvergleich {:?} -> {:?}: vorher {:?} m, nachher {:?} m",
        start,
        end,
        before.as_ref().map(|p| p.length_m.round()),
        after.as_ref().map(|p| p.length_m.round())
    );
    Some(RouteComparison { before, after })
}
