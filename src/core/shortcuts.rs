//! Schleichwege durch eine Nachbarschaft.
//!
//! Ein Schleichweg verbindet zwei Einfahrten der Nachbarschaft ausschließlich
//! über Straßen im Inneren. Einfahrten sind Kreuzungen, an denen eine Straße im
//! Inneren auf eine Straße außerhalb trifft. Straßen mit modalem Filter sind
//! nicht befahrbar. Betrachtet wird jedes ungeordnete Einfahrten-Paar einmal.

use std::collections::BTreeSet;

use super::geo::Polygon;
use super::network::{RoadId, RoadNetwork};
use super::routing::{RoadGraph, RoadPath};
use super::snapping::NodeId;

/// Alle Schleichwege einer Nachbarschaft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shortcuts {
    /// Kürzester Weg je verbundenem Einfahrten-Paar
    pub paths: Vec<RoadPath>,
    entrances: Vec<NodeId>,
}

impl Shortcuts {
    /// Berechnet die Schleichwege innerhalb von `boundary`.
    pub fn new(network: &RoadNetwork, boundary: &Polygon) -> Self {
        let interior: BTreeSet<RoadId> = network.interior_roads(boundary).into_iter().collect();

        let mut touches_inside = BTreeSet::new();
        let mut touches_outside = BTreeSet::new();
        for (idx, road) in network.roads.iter().enumerate() {
            let side = if interior.contains(&RoadId(idx)) {
                &mut touches_inside
            } else {
                &mut touches_outside
            };
            side.insert(road.src);
            side.insert(road.dst);
        }

        let passable = interior
            .iter()
            .copied()
            .filter(|id| !network.is_filtered(*id));
        let graph = RoadGraph::new(network, passable);
        let entrances: Vec<NodeId> = touches_inside
            .intersection(&touches_outside)
            .copied()
            .filter(|node| graph.contains_node(*node))
            .collect();

        let mut paths = Vec::new();
        for (i, from) in entrances.iter().enumerate() {
            for to in &entrances[i + 1..] {
                if let Some(path) = graph.shortest_path(*from, *to) {
                    paths.push(path);
                }
            }
        }
        log::debug!(
            "{} Schleichwege zwischen {} Einfahrten",
            paths.len(),
            entrances.len()
        );
        Self { paths, entrances }
    }

    /// Befahrbare Einfahrten in aufsteigender Reihenfolge.
    pub fn entrances(&self) -> &[NodeId] {
        &self.entrances
    }

    /// Schleichwege, die über `road` führen.
    pub fn subset(&self, road: RoadId) -> Vec<&RoadPath> {
        self.paths.iter().filter(|p| p.uses(road)).collect()
    }

    /// Anzahl Schleichwege über `road`.
    pub fn count_on(&self, road: RoadId) -> usize {
        self.paths.iter().filter(|p| p.uses(road)).count()
    }
}
