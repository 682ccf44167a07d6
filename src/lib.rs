//! LTN-Editor Library.
//! Sitzungs-Controller für Low-Traffic-Neighbourhoods auf OSM-Straßennetzen,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod error;
pub mod shared;
pub mod ui;
pub mod xml;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, BoundaryRef, Mode, ModeKind, RouteDrawer,
    UiState, ViewState,
};
pub use core::{
    compare_route, FilterKind, GeoBounds, MapSurface, ModalFilter, NetworkModel, Polygon,
    ProjectRecord, ProjectStore, RoadId, RoadNetwork, RouteComparison, Shortcuts, SnappingGraph,
    SpatialIndex, SpatialMatch, Waypoint,
};
pub use error::{EditorError, EditorResult, ImportError, SnapFailure, StorageError, ValidationError};
pub use shared::EditorOptions;
pub use xml::parse_osm_network;
