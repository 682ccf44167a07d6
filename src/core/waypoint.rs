//! Wegpunkt einer gezeichneten Route oder Grenze.

use glam::DVec2;

/// Vom Nutzer gesetzter Punkt. Identität ist die Position in der Liste.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position (lon/lat), so wie geklickt
    pub position: DVec2,
    /// `true`: rastet auf die nächste Kreuzung ein; `false`: freier Punkt
    pub snapped: bool,
}

impl Waypoint {
    /// Eingerasteter Wegpunkt.
    pub fn snapped(position: DVec2) -> Self {
        Self {
            position,
            snapped: true,
        }
    }

    /// Freier Wegpunkt (wird per Gerade verbunden).
    pub fn free(position: DVec2) -> Self {
        Self {
            position,
            snapped: false,
        }
    }
}
