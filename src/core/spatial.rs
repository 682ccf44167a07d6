//! Spatial-Index (KD-Tree) für schnelle Kreuzungs-Abfragen beim Snapping.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::NodeId;

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID des gefundenen Knotens
    pub node_id: NodeId,
    /// Euklidische Distanz zum Suchpunkt (in Grad-Einheiten)
    pub distance: f64,
}

/// Read-only Spatial-Index über allen Knoten eines Snapping-Graphen.
///
/// Euklidische Distanz auf WGS84-Koordinaten reicht hier: gesucht wird nur der
/// nächste Knoten zum Cursor, immer in einem kleinen Gebiet.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    node_ids: Vec<NodeId>,
}

impl SpatialIndex {
    /// Baut einen neuen Index aus Knoten-Positionen (Index in `positions` = `NodeId`).
    pub fn from_positions(positions: &[DVec2]) -> Self {
        let entries: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&entries).into();
        let node_ids = (0..positions.len()).map(|i| NodeId(i as u32)).collect();

        Self { tree, node_ids }
    }

    /// Gibt die Anzahl indexierter Knoten zurück.
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    /// Gibt `true` zurück, wenn keine Knoten im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Findet den nächsten Knoten zur gegebenen Position.
    ///
    /// Bei gleich weit entfernten Kandidaten gewinnt die kleinste `NodeId`,
    /// damit das Ergebnis nicht von der inneren Baumstruktur abhängt.
    pub fn nearest(&self, query: DVec2) -> Option<SpatialMatch> {
        if self.is_empty() || !query.is_finite() {
            return None;
        }

        let q = [query.x, query.y];
        let best = self.tree.nearest_one::<SquaredEuclidean>(&q);
        // Rundung im Baum darf keinen gleich weiten Knoten ausschließen;
        // verglichen wird danach exakt.
        let radius = (best.distance * (1.0 + 4.0 * f64::EPSILON)).max(f64::MIN_POSITIVE);

        let winner = self
            .tree
            .within::<SquaredEuclidean>(&q, radius)
            .into_iter()
            .filter(|entry| entry.distance <= best.distance)
            .filter_map(|entry| {
                let node_id = *self.node_ids.get(entry.item as usize)?;
                Some((node_id, entry.distance))
            })
            .min_by_key(|(node_id, _)| *node_id)
            .unwrap_or((NodeId(best.item as u32), best.distance));

        Some(SpatialMatch {
            node_id: winner.0,
            distance: winner.1.sqrt(),
        })
    }
}
