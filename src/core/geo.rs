//! Geografische Basistypen: Bounding-Box, Polygon, Distanzen, Koordinaten-Rundung.
//!
//! Positionen sind `glam::DVec2` mit `x = Längengrad` und `y = Breitengrad` (WGS84).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Mittlerer Erdradius in Metern (Haversine).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Anzahl Nachkommastellen für exportierte Koordinaten (≈10 cm Genauigkeit).
pub const COORD_DECIMALS: i32 = 6;

/// Rundet eine Koordinate auf 6 Nachkommastellen.
pub fn trim_coord(value: f64) -> f64 {
    let factor = 10f64.powi(COORD_DECIMALS);
    (value * factor).round() / factor
}

/// Rundet beide Komponenten einer Position auf 6 Nachkommastellen.
pub fn trim_position(pos: DVec2) -> DVec2 {
    DVec2::new(trim_coord(pos.x), trim_coord(pos.y))
}

/// Großkreis-Distanz zwischen zwei Positionen in Metern.
pub fn haversine_distance_m(a: DVec2, b: DVec2) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Länge einer Polyline in Metern.
pub fn polyline_length_m(points: &[DVec2]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance_m(pair[0], pair[1]))
        .sum()
}

/// Lotfußpunkt von `p` auf der Strecke `a`–`b` (auf die Strecke begrenzt).
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Kürzester Abstand (in Grad-Einheiten) eines Punkts zu einer Strecke.
pub fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Nächster Punkt auf einer Polyline und sein Abstand (Grad-Einheiten).
pub fn closest_point_on_polyline(p: DVec2, line: &[DVec2]) -> Option<(DVec2, f64)> {
    match line {
        [] => None,
        [only] => Some((*only, p.distance(*only))),
        _ => line
            .windows(2)
            .map(|pair| {
                let q = closest_point_on_segment(p, pair[0], pair[1]);
                (q, p.distance(q))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1)),
    }
}

/// Schnittpunkt zweier Strecken (`None` bei parallelen oder disjunkten Strecken).
pub fn segment_intersection(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> Option<DVec2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.perp_dot(s);
    if denom.abs() <= f64::EPSILON * r.length() * s.length() {
        return None;
    }
    let t = (q1 - p1).perp_dot(s) / denom;
    let u = (q1 - p1).perp_dot(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

/// Erster Schnittpunkt zweier Polylines (in Laufrichtung von `a`).
pub fn polyline_intersection(a: &[DVec2], b: &[DVec2]) -> Option<DVec2> {
    a.windows(2).find_map(|sa| {
        b.windows(2)
            .find_map(|sb| segment_intersection(sa[0], sa[1], sb[0], sb[1]))
    })
}

/// Achsen-parallele Bounding-Box in WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Süd-West-Ecke
    pub min: DVec2,
    /// Nord-Ost-Ecke
    pub max: DVec2,
}

impl GeoBounds {
    /// Erstellt eine Bounding-Box aus zwei Ecken (Reihenfolge egal).
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Kleinste Box, die alle Punkte umschließt. `None` bei leerer Eingabe.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Prüft, ob die Position innerhalb (inkl. Rand) liegt.
    pub fn contains(&self, pos: DVec2) -> bool {
        pos.is_finite()
            && pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
    }

    /// Mittelpunkt der Box.
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Ausdehnung (Breite, Höhe) in Grad.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Box, die um `margin` Grad in jede Richtung vergrößert ist.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    /// Maske um die Box: vier Rechtecke, die zusammen `outer` ohne `self` abdecken.
    ///
    /// Alle Teile sind konvex und lassen sich direkt füllen.
    pub fn inverted_within(&self, outer: &GeoBounds) -> Vec<Polygon> {
        let (o, i) = (outer, self);
        let rect = |min: DVec2, max: DVec2| GeoBounds::new(min, max).to_polygon();
        vec![
            // unten und oben über die volle Breite
            rect(o.min, DVec2::new(o.max.x, i.min.y)),
            rect(DVec2::new(o.min.x, i.max.y), o.max),
            // links und rechts zwischen den Bändern
            rect(DVec2::new(o.min.x, i.min.y), DVec2::new(i.min.x, i.max.y)),
            rect(DVec2::new(i.max.x, i.min.y), DVec2::new(o.max.x, i.max.y)),
        ]
    }

    /// Rechteck-Polygon der Box (gegen den Uhrzeigersinn, geschlossen).
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(vec![
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ])
    }
}

/// Einfaches Polygon ohne Löcher.
///
/// Der Ring ist intern immer geschlossen (erster Punkt == letzter Punkt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<DVec2>,
}

impl Polygon {
    /// Erstellt ein Polygon und schließt den Ring bei Bedarf.
    pub fn new(mut exterior: Vec<DVec2>) -> Self {
        if let (Some(first), Some(last)) = (exterior.first().copied(), exterior.last().copied()) {
            if first != last {
                exterior.push(first);
            }
        }
        Self { exterior }
    }

    /// Geschlossener Außenring.
    pub fn exterior(&self) -> &[DVec2] {
        &self.exterior
    }

    /// Ring ohne den schließenden Wiederholungspunkt.
    pub fn vertices(&self) -> &[DVec2] {
        let n = self.exterior.len();
        if n > 1 {
            &self.exterior[..n - 1]
        } else {
            &self.exterior
        }
    }

    /// Ein gültiges Polygon braucht mindestens drei verschiedene Ecken.
    pub fn is_valid(&self) -> bool {
        self.vertices().len() >= 3
    }

    /// Punkt-in-Polygon-Test (Ray-Casting, Rand zählt nicht garantiert).
    pub fn contains(&self, pos: DVec2) -> bool {
        let ring = self.vertices();
        if ring.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > pos.y) != (b.y > pos.y) {
                let x_cross = (b.x - a.x) * (pos.y - a.y) / (b.y - a.y) + a.x;
                if pos.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Bounding-Box des Rings.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.exterior.iter())
    }

    /// Kopie mit auf 6 Nachkommastellen gerundeten Koordinaten.
    pub fn trimmed(&self) -> Self {
        Self {
            exterior: self.exterior.iter().map(|p| trim_position(*p)).collect(),
        }
    }

    /// Ring als `[lon, lat]`-Paare (GeoJSON-Reihenfolge).
    pub fn to_lon_lat_pairs(&self) -> Vec<[f64; 2]> {
        self.exterior.iter().map(|p| [p.x, p.y]).collect()
    }

    /// Baut ein Polygon aus `[lon, lat]`-Paaren.
    pub fn from_lon_lat_pairs(pairs: &[[f64; 2]]) -> Self {
        Self::new(pairs.iter().map(|p| DVec2::new(p[0], p[1])).collect())
    }
}
