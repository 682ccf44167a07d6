//! Schmale Abfrage-Schnittstelle auf ein geladenes Netzmodell.

use std::sync::Arc;

use super::geo::{GeoBounds, Polygon};
use super::snapping::SnappingGraph;

/// Was die Session vom Netzmodell braucht.
///
/// Grenzen- und Schleichweg-Berechnung bleiben im Modell; die Session fragt nur ab.
pub trait NetworkModel {
    /// Ausdehnung des Netzes (Wegpunkte außerhalb werden abgelehnt).
    fn bounds(&self) -> GeoBounds;

    /// Umriss des Untersuchungsgebiets.
    fn boundary_geometry(&self) -> Polygon;

    /// Exportiert einen Snapping-Graphen für den Routen-Koordinator.
    fn to_snapping_graph(&self) -> Arc<dyn SnappingGraph>;
}
