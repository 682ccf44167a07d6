//! Mapping von UI-Intents auf mutierende App-Commands.

use glam::{DVec2, Vec2};

use super::{AppCommand, AppIntent, AppState, Mode};

/// Trefferradius für Wegpunkte in Metern (abhängig vom Zoom).
fn waypoint_hit_radius_m(state: &AppState) -> f64 {
    let px = state.options.waypoint_hit_radius_px as f64;
    match state.map_surface.as_ref() {
        Some(surface) => px * surface.meters_per_pixel(),
        None => state.options.snap_max_distance_m,
    }
}

/// Wegpunkt unter einer Position (nur in Modi mit Routen-Koordinator).
fn waypoint_at(state: &AppState, position: DVec2) -> Option<usize> {
    if !state.mode().uses_route_drawer() {
        return None;
    }
    state
        .route
        .as_ref()?
        .nearest_waypoint(position, waypoint_hit_radius_m(state))
}

/// Filter-Commands nur in der geöffneten Nachbarschaft.
fn neighbourhood_only(state: &AppState, command: AppCommand) -> Vec<AppCommand> {
    if *state.mode() == Mode::Neighbourhood {
        vec![command]
    } else {
        vec![]
    }
}

/// Route-Commands nur in Modi, die den Koordinator nutzen.
fn route_only(state: &AppState, command: AppCommand) -> Vec<AppCommand> {
    if state.mode().uses_route_drawer() && state.route.is_some() {
        vec![command]
    } else {
        vec![]
    }
}

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::ExitRequested => vec![AppCommand::RequestExit],
        AppIntent::ImportNetworkRequested => vec![AppCommand::OpenImportDialog],
        AppIntent::NetworkFileSelected { path } => vec![AppCommand::StartNetworkImport { path }],
        AppIntent::LoadProjectRequested { name } => vec![AppCommand::StartProjectLoad { name }],
        AppIntent::SaveProjectRequested => vec![AppCommand::SaveProject],
        AppIntent::SwitchProjectRequested => vec![AppCommand::SwitchProject],
        AppIntent::TextFieldChanged { field, value } => {
            vec![AppCommand::SetTextField { field, value }]
        }
        AppIntent::BuildOverpassQueryRequested => vec![AppCommand::BuildOverpassQuery],
        AppIntent::ModeRequested { mode } => vec![AppCommand::TransitionMode { mode }],

        // === Kartenfläche ===
        AppIntent::MapViewReady { size } => {
            let size = Vec2::from(size);
            if state.map_surface.is_some() {
                vec![AppCommand::ResizeMapSurface { size }]
            } else {
                vec![AppCommand::InitMapSurface { size }]
            }
        }
        AppIntent::ViewportResized { size } => vec![AppCommand::ResizeMapSurface {
            size: Vec2::from(size),
        }],
        AppIntent::MapPan { delta } => vec![AppCommand::PanMap { delta }],
        AppIntent::MapZoom { factor, anchor } => vec![AppCommand::ZoomMap { factor, anchor }],
        AppIntent::ZoomInRequested => vec![AppCommand::ZoomMap {
            factor: state.options.map_zoom_step,
            anchor: None,
        }],
        AppIntent::ZoomOutRequested => vec![AppCommand::ZoomMap {
            factor: 1.0 / state.options.map_zoom_step,
            anchor: None,
        }],
        AppIntent::FitToModelRequested => vec![AppCommand::FitToModel],

        // === Klicks: der gemountete Modus entscheidet ===
        AppIntent::MapClicked { position } => {
            let kind = state.mode().kind();
            match state.modes.controller(kind) {
                Some(controller) => controller.map_click_commands(position, &state.mode_context()),
                None => vec![],
            }
        }

        // === Wegpunkte ===
        AppIntent::WaypointInsertRequested { position } => {
            let Some(route) = state.route.as_ref() else {
                return vec![];
            };
            route_only(
                state,
                AppCommand::InsertWaypoint {
                    index: route.insertion_index(position),
                    position,
                },
            )
        }
        AppIntent::WaypointRemoveAtRequested { position } => waypoint_at(state, position)
            .map(|index| vec![AppCommand::DeleteWaypoint { index }])
            .unwrap_or_default(),
        AppIntent::WaypointRemoveRequested { index } => {
            route_only(state, AppCommand::DeleteWaypoint { index })
        }
        AppIntent::WaypointDragFinished { from, to } => waypoint_at(state, from)
            .map(|index| vec![AppCommand::MoveWaypoint { index, position: to }])
            .unwrap_or_default(),
        AppIntent::UndoRequested if *state.mode() == Mode::Neighbourhood => {
            vec![AppCommand::UndoFilter]
        }
        AppIntent::RedoRequested if *state.mode() == Mode::Neighbourhood => {
            vec![AppCommand::RedoFilter]
        }
        AppIntent::UndoRequested => route_only(state, AppCommand::Undo),
        AppIntent::RedoRequested => route_only(state, AppCommand::Redo),
        AppIntent::ToggleSnapModeRequested => route_only(state, AppCommand::ToggleSnapMode),
        AppIntent::ClearRouteRequested => route_only(state, AppCommand::ClearRoute),

        // === Nachbarschaften ===
        AppIntent::FinishBoundaryRequested => {
            if matches!(state.mode(), Mode::SetBoundary { .. }) {
                vec![AppCommand::FinishBoundary {
                    name: state.ui.boundary_name.trim().to_string(),
                }]
            } else {
                vec![]
            }
        }
        AppIntent::OpenNeighbourhoodRequested { name } => {
            vec![AppCommand::OpenNeighbourhood { name }]
        }
        AppIntent::CloseNeighbourhoodRequested => vec![
            AppCommand::CloseNeighbourhood,
            AppCommand::TransitionMode {
                mode: Mode::Network,
            },
        ],

        // === Modale Filter ===
        AppIntent::FilterLinePointRequested { position } => {
            neighbourhood_only(state, AppCommand::ExtendFilterLine { position })
        }
        AppIntent::ApplyFilterLineRequested => {
            neighbourhood_only(state, AppCommand::AddManyModalFilters)
        }
        AppIntent::ClearFilterLineRequested => vec![AppCommand::ClearFilterLine],
        AppIntent::DeleteModalFilterRequested { road } => {
            neighbourhood_only(state, AppCommand::DeleteModalFilter { road })
        }
        AppIntent::FilterKindSelected { kind } => vec![AppCommand::SetFilterKind { kind }],
        AppIntent::CompareRouteRequested => {
            if *state.mode() == Mode::Route {
                vec![AppCommand::CompareRoute]
            } else {
                vec![]
            }
        }

        AppIntent::ToggleAboutRequested => vec![AppCommand::ToggleAbout],
    }
}

#[cfg(test)]
mod tests;
