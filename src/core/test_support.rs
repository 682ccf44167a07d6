//! Gemeinsame Test-Netze für Unit-Tests.

use glam::DVec2;

use super::network::{Intersection, Road, RoadNetwork};
use super::snapping::NodeId;

/// Quadratisches Gitter mit `n × n` Kreuzungen im Abstand `spacing` (Grad).
///
/// Kreuzung `(i, j)` liegt bei `(i * spacing, j * spacing)` und hat die ID `j * n + i`.
pub fn grid_network(n: usize, spacing: f64) -> RoadNetwork {
    build_grid(n, spacing, false)
}

/// Wie [`grid_network`], jede Straße hat aber einen Stützpunkt in der Mitte.
pub fn grid_network_with_shape_points(n: usize, spacing: f64) -> RoadNetwork {
    build_grid(n, spacing, true)
}

fn build_grid(n: usize, spacing: f64, shape_points: bool) -> RoadNetwork {
    let mut intersections = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            intersections.push(Intersection {
                osm_id: (j * n + i) as i64,
                position: DVec2::new(i as f64 * spacing, j as f64 * spacing),
            });
        }
    }

    let mut roads = Vec::new();
    let add_road = |a: usize, b: usize, roads: &mut Vec<Road>| {
        let (a_pos, b_pos) = (intersections[a].position, intersections[b].position);
        roads.push(Road {
            osm_way_id: roads.len() as i64,
            src: NodeId(a as u32),
            dst: NodeId(b as u32),
            geometry: if shape_points {
                vec![a_pos, (a_pos + b_pos) * 0.5, b_pos]
            } else {
                vec![a_pos, b_pos]
            },
            name: None,
            highway: "residential".into(),
        });
    };
    for j in 0..n {
        for i in 0..n {
            let id = j * n + i;
            if i + 1 < n {
                add_road(id, id + 1, &mut roads);
            }
            if j + 1 < n {
                add_road(id, id + n, &mut roads);
            }
        }
    }

    match RoadNetwork::from_parts(intersections, roads, None) {
        Ok(network) => network,
        Err(e) => panic!("Test-Gitter ungültig: {e}"),
    }
}
