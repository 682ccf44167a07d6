//! Overpass-Abfrage für ein Gebiet aus einem eingefügten GeoJSON-Polygon.
//!
//! Nur der Abfragetext wird gebaut; das Absenden übernimmt der Nutzer.

use serde_json::Value;

use super::geo::{trim_coord, Polygon};
use crate::error::ImportError;

/// Liest ein Polygon aus GeoJSON-Text (`Polygon`, `Feature` oder erste Feature
/// einer `FeatureCollection`). Nur der Außenring wird verwendet.
pub fn polygon_from_geojson(text: &str) -> Result<Polygon, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::GeoJson(e.to_string()))?;
    let geometry = find_polygon_geometry(&value)
        .ok_or_else(|| ImportError::GeoJson("GeoJSON enthält kein Polygon".into()))?;

    let ring = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .and_then(|rings| rings.first())
        .and_then(Value::as_array)
        .ok_or_else(|| ImportError::GeoJson("Polygon ohne Außenring".into()))?;

    let mut pairs = Vec::with_capacity(ring.len());
    for coord in ring {
        let pair = coord
            .as_array()
            .filter(|c| c.len() >= 2)
            .and_then(|c| Some([c[0].as_f64()?, c[1].as_f64()?]))
            .ok_or_else(|| ImportError::GeoJson(format!("Ungültige Koordinate: {coord}")))?;
        pairs.push(pair);
    }

    let polygon = Polygon::from_lon_lat_pairs(&pairs);
    if !polygon.is_valid() {
        return Err(ImportError::GeoJson(
            "Polygon braucht mindestens drei Ecken".into(),
        ));
    }
    Ok(polygon)
}

fn find_polygon_geometry(value: &Value) -> Option<&Value> {
    match value.get("type")?.as_str()? {
        "Polygon" => Some(value),
        "Feature" => find_polygon_geometry(value.get("geometry")?),
        "FeatureCollection" => value
            .get("features")?
            .as_array()?
            .iter()
            .find_map(find_polygon_geometry),
        _ => None,
    }
}

/// Baut die Overpass-QL-Abfrage für alle Objekte im Polygon.
///
/// Koordinaten werden auf 6 Nachkommastellen gerundet und als `lat lon` notiert.
pub fn overpass_query(polygon: &Polygon) -> String {
    let poly = polygon
        .vertices()
        .iter()
        .map(|p| format!("{} {}", trim_coord(p.y), trim_coord(p.x)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[out:xml][timeout:180];(nwr(poly:\"{poly}\");node(w)->.x;<;);out meta;")
}

/// Vollständige Abfrage-URL für einen Overpass-Endpunkt.
pub fn overpass_url(endpoint: &str, query: &str) -> String {
    let mut encoded = String::with_capacity(query.len() * 2);
    for byte in query.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("{endpoint}?data={encoded}")
}
