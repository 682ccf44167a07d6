/// Integration-Tests für OSM-Import und Speicherstand
use glam::DVec2;
use ltn_editor::core::SavedState;
use ltn_editor::{
    parse_osm_network, ImportError, NetworkModel, Polygon, RoadNetwork, RouteDrawer,
};

const GRID: &str = include_str!("fixtures/grid_4x4.osm");

fn center_square() -> Polygon {
    Polygon::new(vec![
        DVec2::new(13.4006, 52.5006),
        DVec2::new(13.4024, 52.5006),
        DVec2::new(13.4024, 52.5024),
        DVec2::new(13.4006, 52.5024),
    ])
}

#[test]
fn test_parse_grid_splits_ways_at_intersections() {
    let network = parse_osm_network(GRID.as_bytes()).unwrap();

    // 4 Quer- und 4 Längswege mit je 3 Abschnitten; der Fußweg fällt weg
    assert_eq!(network.roads.len(), 24);
    assert_eq!(network.intersections.len(), 16);
    assert!(network.roads.iter().all(|r| r.highway == "residential"));
    assert_eq!(network.roads[0].name.as_deref(), Some("Querstraße 1"));
}

#[test]
fn test_grid_degree_histogram() {
    let network = parse_osm_network(GRID.as_bytes()).unwrap();
    let histogram = network.degree_histogram();

    assert_eq!(histogram.get(&2), Some(&4));
    assert_eq!(histogram.get(&3), Some(&8));
    assert_eq!(histogram.get(&4), Some(&4));
}

#[test]
fn test_declared_bounds_define_extent() {
    let network = parse_osm_network(GRID.as_bytes()).unwrap();
    let bounds = network.bounds();

    approx::assert_relative_eq!(bounds.min.x, 13.4, epsilon = 1e-9);
    approx::assert_relative_eq!(bounds.max.y, 52.503, epsilon = 1e-9);
    assert!(network.boundary_geometry().is_valid());
}

#[test]
fn test_interior_roads_of_center_square() {
    let network = parse_osm_network(GRID.as_bytes()).unwrap();
    let interior = network.interior_roads(&center_square());
    assert_eq!(interior.len(), 4);
}

#[test]
fn test_saved_state_is_applied_on_load() {
    let mut network = parse_osm_network(GRID.as_bytes()).unwrap();
    network.set_neighbourhood("Mitte", center_square());
    let saved = network.to_saved_state().to_json();

    let reloaded = RoadNetwork::load(GRID.as_bytes(), Some(&saved)).unwrap();

    assert!(reloaded.neighbourhood("Mitte").is_some());
    let (active, _) = reloaded.active_neighbourhood().expect("aktive Nachbarschaft");
    assert_eq!(active, "Mitte");

    let parsed = SavedState::from_json(&saved).unwrap();
    assert_eq!(parsed.neighbourhoods.len(), 1);
}

#[test]
fn test_corrupt_saved_state_is_rejected() {
    let result = RoadNetwork::load(GRID.as_bytes(), Some("{ kein json"));
    assert!(matches!(result, Err(ImportError::SavedState(_))));
}

#[test]
fn test_file_without_routable_roads_is_rejected() {
    let xml = r#"<osm version="0.6">
  <node id="1" lat="52.0" lon="13.0"/>
  <node id="2" lat="52.0" lon="13.1"/>
  <way id="5"><nd ref="1"/><nd ref="2"/><tag k="highway" v="footway"/></way>
</osm>"#;
    assert_eq!(parse_osm_network(xml.as_bytes()).err(), Some(ImportError::NoRoads));
}

#[test]
fn test_snapped_route_across_grid() {
    let network = parse_osm_network(GRID.as_bytes()).unwrap();
    let mut drawer = RouteDrawer::new(network.to_snapping_graph(), network.bounds(), 10);

    drawer.add_waypoint(DVec2::new(13.400, 52.500)).unwrap();
    drawer.add_waypoint(DVec2::new(13.403, 52.503)).unwrap();

    let route = drawer.route();
    assert!(route.failures().is_empty());
    // Manhattan-Weg über das Gitter: mindestens eine Ecke pro Gitterschritt
    assert!(route.points.len() >= 7);
    let first = route.points.first().copied().unwrap();
    let last = route.points.last().copied().unwrap();
    assert!(first.distance(DVec2::new(13.400, 52.500)) < 1e-9);
    assert!(last.distance(DVec2::new(13.403, 52.503)) < 1e-9);
}
