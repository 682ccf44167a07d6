//! Core-Domänentypen: Geometrie, Netzmodell, Snapping-Graph, Filter und Speicher.

pub mod filters;
pub mod geo;
pub mod map_surface;
pub mod model;
/// Netzmodell mit Straßen, Kreuzungen und Nachbarschafts-Grenzen
pub mod network;
pub mod overpass;
pub mod routing;
pub mod savefile;
pub mod shortcuts;
pub mod snapping;
pub mod spatial;
pub mod storage;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod test_support;

pub use filters::{FilterKind, ModalFilter, ModalFilters};
pub use geo::{GeoBounds, Polygon};
pub use map_surface::MapSurface;
pub use model::NetworkModel;
pub use network::{Intersection, Road, RoadId, RoadNetwork, StoredBoundary};
pub use routing::{compare_route, RoadPath, RouteComparison};
pub use savefile::{SavedBoundary, SavedFilter, SavedState, SavedWaypoint};
pub use shortcuts::Shortcuts;
pub use snapping::{EdgeId, GraphEdge, NodeId, RouteGraph, SnappedNode, SnappingGraph};
pub use spatial::{SpatialIndex, SpatialMatch};
pub use storage::{project_key, DirectoryStore, MemoryStore, ProjectRecord, ProjectStore};
pub use waypoint::Waypoint;
