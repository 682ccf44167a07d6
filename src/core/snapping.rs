//! Snapping-Graph: projiziert beliebige Positionen auf Kreuzungen und
//! verbindet zwei Kreuzungen über den kürzesten Weg im Straßennetz.

use glam::DVec2;
use petgraph::graphmap::DiGraphMap;

use super::geo::{haversine_distance_m, polyline_length_m};
use super::spatial::SpatialIndex;

/// ID einer Kreuzung im Snapping-Graphen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// ID einer Kante (Straßenabschnitt) im Snapping-Graphen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

/// Ergebnis eines Snap-Vorgangs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedNode {
    /// Kreuzung, auf die eingerastet wurde
    pub node: NodeId,
    /// Position der Kreuzung
    pub position: DVec2,
}

/// Schmale Abfrage-Schnittstelle, die der Routen-Koordinator verwendet.
///
/// Implementierungen müssen deterministisch sein: gleiche Eingabe, gleicher Knoten.
pub trait SnappingGraph {
    /// Rastet eine Position auf den nächstgelegenen Knoten ein (`None` = kein Kandidat).
    fn snap(&self, pos: DVec2) -> Option<SnappedNode>;

    /// Geometrie des Wegs von `from` nach `to` (beginnt bei `from`, endet bei `to`).
    /// `None`, wenn keine Verbindung existiert.
    fn connect(&self, from: NodeId, to: NodeId) -> Option<Vec<DVec2>>;
}

/// Kante mit Geometrie, wie sie beim Aufbau des Graphen übergeben wird.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// Startknoten (erster Punkt der Geometrie)
    pub node1: NodeId,
    /// Endknoten (letzter Punkt der Geometrie)
    pub node2: NodeId,
    /// Polyline von `node1` nach `node2`
    pub geometry: Vec<DVec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DirectedEdge {
    id: EdgeId,
    forwards: bool,
}

/// Routbarer Graph über Kreuzungen und Straßenabschnitten.
pub struct RouteGraph {
    positions: Vec<DVec2>,
    edges: Vec<GraphEdge>,
    lengths_m: Vec<f64>,
    graph: DiGraphMap<NodeId, DirectedEdge>,
    index: SpatialIndex,
    max_snap_distance_m: f64,
}

impl RouteGraph {
    /// Baut den Graphen. Kanten mit unbekannten Knoten werden verworfen.
    ///
    /// Alle Kanten sind in beide Richtungen befahrbar.
    pub fn new(positions: Vec<DVec2>, edges: Vec<GraphEdge>, max_snap_distance_m: f64) -> Self {
        let node_count = positions.len() as u32;
        let mut graph: DiGraphMap<NodeId, DirectedEdge> = DiGraphMap::new();
        for idx in 0..node_count {
            graph.add_node(NodeId(idx));
        }

        let mut kept = Vec::with_capacity(edges.len());
        let mut lengths_m = Vec::with_capacity(edges.len());
        for edge in edges {
            if edge.node1.0 >= node_count || edge.node2.0 >= node_count {
                log::warn!(
                    "Kante {:?} -> {:?} verweist auf unbekannten Knoten, verworfen",
                    edge.node1,
                    edge.node2
                );
                continue;
            }
            let id = EdgeId(kept.len() as u32);
            let length = polyline_length_m(&edge.geometry);
            // Bei parallelen Kanten gewinnt die kürzere
            let replace = graph
                .edge_weight(edge.node1, edge.node2)
                .map(|existing| length < lengths_m[existing.id.0 as usize])
                .unwrap_or(true);
            if replace {
                graph.add_edge(edge.node1, edge.node2, DirectedEdge { id, forwards: true });
                graph.add_edge(
                    edge.node2,
                    edge.node1,
                    DirectedEdge {
                        id,
                        forwards: false,
                    },
                );
            }
            lengths_m.push(length);
            kept.push(edge);
        }

        let index = SpatialIndex::from_positions(&positions);

        Self {
            positions,
            edges: kept,
            lengths_m,
            graph,
            index,
            max_snap_distance_m,
        }
    }

    /// Anzahl der Knoten.
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Anzahl der Kanten.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Position eines Knotens.
    pub fn node_position(&self, node: NodeId) -> Option<DVec2> {
        self.positions.get(node.0 as usize).copied()
    }

    fn edge_geometry(&self, dir_edge: DirectedEdge) -> Vec<DVec2> {
        let mut pts = self.edges[dir_edge.id.0 as usize].geometry.clone();
        if !dir_edge.forwards {
            pts.reverse();
        }
        pts
    }
}

impl SnappingGraph for RouteGraph {
    fn snap(&self, pos: DVec2) -> Option<SnappedNode> {
        let hit = self.index.nearest(pos)?;
        let position = self.node_position(hit.node_id)?;
        if haversine_distance_m(pos, position) > self.max_snap_distance_m {
            return None;
        }
        Some(SnappedNode {
            node: hit.node_id,
            position,
        })
    }

    fn connect(&self, from: NodeId, to: NodeId) -> Option<Vec<DVec2>> {
        let goal_pt = self.node_position(to)?;
        self.node_position(from)?;

        let (_, path) = petgraph::algo::astar(
            &self.graph,
            from,
            |n| n == to,
            |(_, _, dir_edge)| self.lengths_m[dir_edge.id.0 as usize],
            |n| {
                self.node_position(n)
                    .map(|p| haversine_distance_m(p, goal_pt))
                    .unwrap_or(0.0)
            },
        )?;

        let mut points = vec![self.positions[from.0 as usize]];
        for pair in path.windows(2) {
            let dir_edge = *self.graph.edge_weight(pair[0], pair[1])?;
            for pt in self.edge_geometry(dir_edge) {
                if points.last() != Some(&pt) {
                    points.push(pt);
                }
            }
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drei Knoten in einer Reihe, der vierte isoliert.
    fn line_graph() -> RouteGraph {
        let positions = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.001, 0.0),
            DVec2::new(0.002, 0.0),
            DVec2::new(0.01, 0.01),
        ];
        let edges = vec![
            GraphEdge {
                node1: NodeId(0),
                node2: NodeId(1),
                geometry: vec![positions[0], DVec2::new(0.0005, 0.0001), positions[1]],
            },
            GraphEdge {
                node1: NodeId(2),
                node2: NodeId(1),
                geometry: vec![positions[2], positions[1]],
            },
        ];
        RouteGraph::new(positions, edges, 50.0)
    }

    #[test]
    fn snap_returns_nearest_node_within_distance() {
        let graph = line_graph();
        let hit = graph
            .snap(DVec2::new(0.00101, 0.00001))
            .expect("Knoten 1 erwartet");
        assert_eq!(hit.node, NodeId(1));
        assert_eq!(hit.position, DVec2::new(0.001, 0.0));
    }

    #[test]
    fn snap_rejects_far_away_positions() {
        let graph = line_graph();
        assert!(graph.snap(DVec2::new(0.005, 0.005)).is_none());
    }

    #[test]
    fn connect_follows_edge_geometry_in_both_directions() {
        let graph = line_graph();

        let forwards = graph.connect(NodeId(0), NodeId(2)).expect("Weg erwartet");
        assert_eq!(forwards.first(), Some(&DVec2::new(0.0, 0.0)));
        assert_eq!(forwards.last(), Some(&DVec2::new(0.002, 0.0)));
        assert_eq!(forwards.len(), 4);

        let backwards = graph.connect(NodeId(2), NodeId(0)).expect("Weg erwartet");
        let mut reversed = forwards.clone();
        reversed.reverse();
        assert_eq!(backwards, reversed);
    }

    #[test]
    fn connect_to_isolated_node_fails() {
        let graph = line_graph();
        assert!(graph.connect(NodeId(0), NodeId(3)).is_none());
    }

    #[test]
    fn connect_same_node_is_single_point() {
        let graph = line_graph();
        assert_eq!(graph.connect(NodeId(1), NodeId(1)), Some(vec![DVec2::new(0.001, 0.0)]));
    }

    #[test]
    fn edges_with_unknown_nodes_are_dropped() {
        let graph = RouteGraph::new(
            vec![DVec2::ZERO],
            vec![GraphEdge {
                node1: NodeId(0),
                node2: NodeId(7),
                geometry: vec![DVec2::ZERO, DVec2::ONE],
            }],
            10.0,
        );
        assert_eq!(graph.edge_count(), 0);
    }
}
