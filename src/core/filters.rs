//! Modale Filter: Sperren für den Durchgangsverkehr auf einzelnen Straßen.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::network::RoadId;

/// Art eines modalen Filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Poller: nur zu Fuß und mit dem Rad passierbar
    #[default]
    WalkCycleOnly,
    /// Einfahrt verboten
    NoEntry,
    /// Busschleuse
    BusGate,
    /// Schulstraße (zeitweise gesperrt)
    SchoolStreet,
}

impl FilterKind {
    /// Alle Arten in Anzeigereihenfolge.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::WalkCycleOnly,
        FilterKind::NoEntry,
        FilterKind::BusGate,
        FilterKind::SchoolStreet,
    ];

    /// Anzeigename.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::WalkCycleOnly => "Poller",
            FilterKind::NoEntry => "Einfahrt verboten",
            FilterKind::BusGate => "Busschleuse",
            FilterKind::SchoolStreet => "Schulstraße",
        }
    }
}

/// Ein Filter auf einer Straße.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalFilter {
    /// Art
    pub kind: FilterKind,
    /// Lage auf der Straßen-Geometrie (lon/lat)
    pub position: DVec2,
}

/// Alle Filter eines Netzes; höchstens einer pro Straße.
pub type ModalFilters = BTreeMap<RoadId, ModalFilter>;
