use std::sync::Arc;

use glam::{DVec2, Vec2};

use crate::app::route_drawer::RouteDrawer;
use crate::app::{AppCommand, AppIntent, AppState, Mode};
use crate::core::test_support::grid_network;
use crate::core::{MapSurface, NetworkModel};

use super::map_intent_to_commands;

fn state_in_mode(mode: Mode) -> AppState {
    let network = grid_network(3, 0.001);
    let route = RouteDrawer::new(network.to_snapping_graph(), network.bounds(), 10);
    let mut state = AppState::new();
    state.replace_model(Arc::new(network));
    state.route = Some(route);
    state.replace_mode(mode);
    state
}

#[test]
fn save_requested_maps_to_save_project() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::SaveProjectRequested);

    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], AppCommand::SaveProject));
}

#[test]
fn map_view_ready_creates_surface_only_once() {
    let mut state = AppState::new();

    let first = map_intent_to_commands(&state, AppIntent::MapViewReady { size: [800.0, 600.0] });
    assert!(matches!(first[0], AppCommand::InitMapSurface { .. }));

    state.map_surface = Some(MapSurface::new(Vec2::new(800.0, 600.0)));
    let second = map_intent_to_commands(&state, AppIntent::MapViewReady { size: [640.0, 480.0] });
    assert_eq!(second.len(), 1);
    assert!(matches!(second[0], AppCommand::ResizeMapSurface { .. }));
}

#[test]
fn zoom_in_and_out_use_configured_step() {
    let state = AppState::new();
    let step = state.options.map_zoom_step;

    let zoom_in = map_intent_to_commands(&state, AppIntent::ZoomInRequested);
    let zoom_out = map_intent_to_commands(&state, AppIntent::ZoomOutRequested);

    assert_eq!(zoom_in, vec![AppCommand::ZoomMap { factor: step, anchor: None }]);
    assert_eq!(
        zoom_out,
        vec![AppCommand::ZoomMap {
            factor: 1.0 / step,
            anchor: None
        }]
    );
}

#[test]
fn map_click_in_title_does_nothing() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::MapClicked {
            position: DVec2::new(0.001, 0.001),
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn map_click_while_drawing_adds_waypoint() {
    let state = state_in_mode(Mode::SetBoundary { existing: None });
    let position = DVec2::new(0.001, 0.001);

    let commands = map_intent_to_commands(&state, AppIntent::MapClicked { position });

    assert_eq!(commands, vec![AppCommand::AddWaypoint { position }]);
}

#[test]
fn route_commands_are_dropped_outside_drawing_modes() {
    let state = state_in_mode(Mode::Network);

    assert!(map_intent_to_commands(&state, AppIntent::UndoRequested).is_empty());
    assert!(map_intent_to_commands(&state, AppIntent::ClearRouteRequested).is_empty());
    assert!(map_intent_to_commands(&state, AppIntent::FinishBoundaryRequested).is_empty());
}

#[test]
fn remove_at_position_hits_nearby_waypoint() {
    let mut state = state_in_mode(Mode::Route);
    if let Some(route) = state.route.as_mut() {
        route.add_waypoint(DVec2::new(0.0, 0.0)).expect("im Gebiet");
        route.add_waypoint(DVec2::new(0.002, 0.002)).expect("im Gebiet");
    }

    let hit = map_intent_to_commands(
        &state,
        AppIntent::WaypointRemoveAtRequested {
            position: DVec2::new(0.002, 0.00199),
        },
    );
    assert_eq!(hit, vec![AppCommand::DeleteWaypoint { index: 1 }]);

    let miss = map_intent_to_commands(
        &state,
        AppIntent::WaypointRemoveAtRequested {
            position: DVec2::new(0.001, 0.001),
        },
    );
    assert!(miss.is_empty());
}

#[test]
fn finish_boundary_uses_trimmed_name() {
    let mut state = state_in_mode(Mode::SetBoundary { existing: None });
    state.ui.boundary_name = "  Nordstadt ".into();

    let commands = map_intent_to_commands(&state, AppIntent::FinishBoundaryRequested);

    assert_eq!(
        commands,
        vec![AppCommand::FinishBoundary {
            name: "Nordstadt".into()
        }]
    );
}

#[test]
fn undo_in_neighbourhood_targets_filter_history() {
    let state = state_in_mode(Mode::Neighbourhood);

    assert_eq!(
        map_intent_to_commands(&state, AppIntent::UndoRequested),
        vec![AppCommand::UndoFilter]
    );
    assert_eq!(
        map_intent_to_commands(&state, AppIntent::RedoRequested),
        vec![AppCommand::RedoFilter]
    );
}

#[test]
fn filter_line_only_grows_in_neighbourhood() {
    let position = DVec2::new(0.001, 0.0005);
    let network_state = state_in_mode(Mode::Network);
    assert!(map_intent_to_commands(
        &network_state,
        AppIntent::FilterLinePointRequested { position }
    )
    .is_empty());

    let state = state_in_mode(Mode::Neighbourhood);
    assert_eq!(
        map_intent_to_commands(&state, AppIntent::FilterLinePointRequested { position }),
        vec![AppCommand::ExtendFilterLine { position }]
    );
}

#[test]
fn close_neighbourhood_returns_to_network() {
    let state = state_in_mode(Mode::Neighbourhood);

    assert_eq!(
        map_intent_to_commands(&state, AppIntent::CloseNeighbourhoodRequested),
        vec![
            AppCommand::CloseNeighbourhood,
            AppCommand::TransitionMode {
                mode: Mode::Network
            }
        ]
    );
}

#[test]
fn compare_route_only_in_route_mode() {
    let route_state = state_in_mode(Mode::Route);
    assert_eq!(
        map_intent_to_commands(&route_state, AppIntent::CompareRouteRequested),
        vec![AppCommand::CompareRoute]
    );

    let boundary_state = state_in_mode(Mode::SetBoundary { existing: None });
    assert!(map_intent_to_commands(&boundary_state, AppIntent::CompareRouteRequested).is_empty());
}
