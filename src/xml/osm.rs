//! Parser für OSM-XML-Extrakte (Overpass- oder JOSM-Export).
//!
//! Übernommen werden Nodes, Ways mit befahrbarem `highway`-Tag und `<bounds>`.
//! Ways werden an gemeinsam genutzten Nodes in Straßenabschnitte zerlegt.

use std::collections::HashMap;

use glam::DVec2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::{GeoBounds, Intersection, NodeId, Road, RoadNetwork};
use crate::error::ImportError;

/// Straßenklassen, die für Kfz-Verkehr relevant sind.
const ROUTABLE_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
    "service",
];

#[derive(Debug, Default)]
struct RawWay {
    id: i64,
    node_refs: Vec<i64>,
    highway: Option<String>,
    name: Option<String>,
}

fn xml_err(e: impl std::fmt::Display) -> ImportError {
    ImportError::Xml(e.to_string())
}

/// Liest alle Attribute eines Elements als (Schlüssel, Wert)-Paare.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ImportError> {
    let mut out = Vec::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(xml_err)?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| ImportError::Encoding)?
            .to_string();
        let value = attr.unescape_value().map_err(xml_err)?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_f64(attrs: &[(String, String)], key: &str) -> Option<f64> {
    attr(attrs, key)?.parse().ok().filter(|v: &f64| v.is_finite())
}

/// Parsed ein OSM-XML-Dokument zu einem Straßennetz.
pub fn parse_osm_network(input_bytes: &[u8]) -> Result<RoadNetwork, ImportError> {
    if input_bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ImportError::Empty);
    }
    let text = std::str::from_utf8(input_bytes).map_err(|_| ImportError::Encoding)?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut buffer = Vec::new();

    let mut nodes: HashMap<i64, DVec2> = HashMap::new();
    let mut ways: Vec<RawWay> = Vec::new();
    let mut declared_bounds: Option<GeoBounds> = None;
    let mut current_way: Option<RawWay> = None;
    let mut saw_osm_root = false;

    loop {
        let event = reader.read_event_into(&mut buffer).map_err(xml_err)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"osm" => saw_osm_root = true,
                    b"bounds" => {
                        let attrs = attributes(e)?;
                        if let (Some(min_lat), Some(min_lon), Some(max_lat), Some(max_lon)) = (
                            parse_f64(&attrs, "minlat"),
                            parse_f64(&attrs, "minlon"),
                            parse_f64(&attrs, "maxlat"),
                            parse_f64(&attrs, "maxlon"),
                        ) {
                            declared_bounds = Some(GeoBounds::new(
                                DVec2::new(min_lon, min_lat),
                                DVec2::new(max_lon, max_lat),
                            ));
                        }
                    }
                    b"node" => {
                        let attrs = attributes(e)?;
                        let id = attr(&attrs, "id").and_then(|v| v.parse::<i64>().ok());
                        let lat = parse_f64(&attrs, "lat");
                        let lon = parse_f64(&attrs, "lon");
                        match (id, lat, lon) {
                            (Some(id), Some(lat), Some(lon)) => {
                                nodes.insert(id, DVec2::new(lon, lat));
                            }
                            _ => {
                                return Err(ImportError::InvalidNode(format!(
                                    "id={:?} lat={:?} lon={:?}",
                                    attr(&attrs, "id"),
                                    attr(&attrs, "lat"),
                                    attr(&attrs, "lon")
                                )))
                            }
                        }
                    }
                    b"way" => {
                        let attrs = attributes(e)?;
                        let id = attr(&attrs, "id")
                            .and_then(|v| v.parse::<i64>().ok())
                            .unwrap_or_default();
                        let way = RawWay {
                            id,
                            ..RawWay::default()
                        };
                        if is_empty {
                            log::debug!("Way {} ohne Inhalt ignoriert", id);
                        } else {
                            current_way = Some(way);
                        }
                    }
                    b"nd" => {
                        if let Some(way) = current_way.as_mut() {
                            let attrs = attributes(e)?;
                            if let Some(node_ref) =
                                attr(&attrs, "ref").and_then(|v| v.parse::<i64>().ok())
                            {
                                way.node_refs.push(node_ref);
                            }
                        }
                    }
                    b"tag" => {
                        if let Some(way) = current_way.as_mut() {
                            let attrs = attributes(e)?;
                            match (attr(&attrs, "k"), attr(&attrs, "v")) {
                                (Some("highway"), Some(v)) => way.highway = Some(v.to_string()),
                                (Some("name"), Some(v)) => way.name = Some(v.to_string()),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"way" {
                    if let Some(way) = current_way.take() {
                        ways.push(way);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }

    if !saw_osm_root {
        return Err(ImportError::Xml("kein <osm>-Wurzelelement".into()));
    }

    let routable: Vec<RawWay> = ways
        .into_iter()
        .filter(|w| {
            w.highway
                .as_deref()
                .is_some_and(|h| ROUTABLE_HIGHWAYS.contains(&h))
        })
        .collect();

    build_network(&nodes, routable, declared_bounds)
}

/// Zerlegt Ways an Kreuzungen und baut das Netzmodell.
fn build_network(
    nodes: &HashMap<i64, DVec2>,
    ways: Vec<RawWay>,
    declared_bounds: Option<GeoBounds>,
) -> Result<RoadNetwork, ImportError> {
    // Nur Nodes mit bekannter Position; abgeschnittene Extrakte verweisen auf fehlende Nodes
    let ways: Vec<RawWay> = ways
        .into_iter()
        .map(|mut w| {
            let before = w.node_refs.len();
            w.node_refs.retain(|id| nodes.contains_key(id));
            if w.node_refs.len() != before {
                log::warn!(
                    "Way {}: {} Node-Referenzen ohne Position übersprungen",
                    w.id,
                    before - w.node_refs.len()
                );
            }
            w
        })
        .filter(|w| w.node_refs.len() >= 2)
        .collect();

    let mut usage: HashMap<i64, usize> = HashMap::new();
    for way in &ways {
        for id in &way.node_refs {
            *usage.entry(*id).or_insert(0) += 1;
        }
    }

    let mut intersection_ids: HashMap<i64, NodeId> = HashMap::new();
    let mut intersections: Vec<Intersection> = Vec::new();
    let mut intersection_for = |osm_id: i64, intersections: &mut Vec<Intersection>| -> NodeId {
        *intersection_ids.entry(osm_id).or_insert_with(|| {
            let id = NodeId(intersections.len() as u32);
            intersections.push(Intersection {
                osm_id,
                position: nodes[&osm_id],
            });
            id
        })
    };

    let mut roads = Vec::new();
    let mut all_points: Vec<DVec2> = Vec::new();
    for way in &ways {
        let last = way.node_refs.len() - 1;
        let mut start_idx = 0;
        for (idx, osm_id) in way.node_refs.iter().enumerate().skip(1) {
            let is_split = idx == last || usage.get(osm_id).copied().unwrap_or(0) > 1;
            if !is_split {
                continue;
            }
            let refs = &way.node_refs[start_idx..=idx];
            let geometry: Vec<DVec2> = refs.iter().map(|id| nodes[id]).collect();
            all_points.extend_from_slice(&geometry);

            let src = intersection_for(refs[0], &mut intersections);
            let dst = intersection_for(*osm_id, &mut intersections);
            roads.push(Road {
                osm_way_id: way.id,
                src,
                dst,
                geometry,
                name: way.name.clone(),
                highway: way.highway.clone().unwrap_or_default(),
            });
            start_idx = idx;
        }
    }

    let bounds = declared_bounds.or_else(|| GeoBounds::from_points(all_points.iter()));
    RoadNetwork::from_parts(intersections, roads, bounds)
}
