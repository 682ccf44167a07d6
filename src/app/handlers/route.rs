//! Handler für den Routen-Koordinator und Nachbarschafts-Grenzen.

use glam::DVec2;

use super::{mode, project};
use crate::app::mode::Mode;
use crate::app::route_drawer::RouteDrawer;
use crate::app::AppState;
use crate::core::compare_route as compare;
use crate::error::{EditorResult, ValidationError};

fn route_mut(state: &mut AppState) -> Result<&mut RouteDrawer, ValidationError> {
    let kind = state.mode().kind();
    state
        .route
        .as_mut()
        .ok_or(ValidationError::ModelRequired {
            mode: kind.as_str(),
        })
}

/// Wie `route_mut`, verwirft aber den letzten Routenvergleich.
fn edit_route(state: &mut AppState) -> Result<&mut RouteDrawer, ValidationError> {
    state.ui.route_comparison = None;
    route_mut(state)
}

/// Hängt einen Wegpunkt an.
pub fn add_waypoint(state: &mut AppState, position: DVec2) -> EditorResult<()> {
    edit_route(state)?.add_waypoint(position)?;
    Ok(())
}

/// Fügt einen Wegpunkt an `index` ein.
pub fn insert_waypoint(state: &mut AppState, index: usize, position: DVec2) -> EditorResult<()> {
    edit_route(state)?.insert_waypoint(index, position)?;
    Ok(())
}

/// Verschiebt einen Wegpunkt.
pub fn move_waypoint(state: &mut AppState, index: usize, position: DVec2) -> EditorResult<()> {
    edit_route(state)?.move_waypoint(index, position)?;
    Ok(())
}

/// Entfernt einen Wegpunkt.
pub fn delete_waypoint(state: &mut AppState, index: usize) -> EditorResult<()> {
    edit_route(state)?.delete_waypoint(index)?;
    Ok(())
}

/// Undo der letzten Wegpunkt-Änderung.
pub fn undo(state: &mut AppState) -> EditorResult<()> {
    if !edit_route(state)?.undo() {
        log::debug!("Nichts rückgängig zu machen");
    }
    Ok(())
}

/// Redo der zuletzt rückgängig gemachten Änderung.
pub fn redo(state: &mut AppState) -> EditorResult<()> {
    if !edit_route(state)?.redo() {
        log::debug!("Nichts zu wiederholen");
    }
    Ok(())
}

/// Schaltet das Einrasten neuer Wegpunkte um.
pub fn toggle_snap_mode(state: &mut AppState) -> EditorResult<()> {
    let snapping = route_mut(state)?.toggle_snap_mode();
    state.ui.set_status(if snapping {
        "Einrasten an"
    } else {
        "Einrasten aus"
    });
    Ok(())
}

/// Entfernt alle Wegpunkte (rückgängig machbar).
pub fn clear(state: &mut AppState) -> EditorResult<()> {
    edit_route(state)?.clear();
    Ok(())
}

/// Schließt die gezeichnete Route zur Grenze, speichert sie samt Wegpunkten und
/// öffnet die Nachbarschaft.
///
/// Wird eine bestehende Grenze unter neuem Namen gespeichert, verschwindet der
/// alte Eintrag.
pub fn finish_boundary(state: &mut AppState, name: String) -> EditorResult<()> {
    project::validate_name(&name)?;
    let route = route_mut(state)?;
    let polygon = route.to_polygon()?;
    let waypoints = route.waypoints().to_vec();
    let renamed_from = match state.mode() {
        Mode::SetBoundary {
            existing: Some(old),
        } if old.name() != name => Some(old.name().to_string()),
        _ => None,
    };

    let model = state
        .model_mut()
        .ok_or(ValidationError::ModelRequired { mode: "set-boundary" })?;
    if let Some(old) = &renamed_from {
        model.remove_neighbourhood(old);
    }
    model.set_drawn_neighbourhood(&name, polygon, waypoints);
    match renamed_from {
        Some(old) => state
            .ui
            .set_status(format!("Nachbarschaft '{old}' als '{name}' gespeichert")),
        None => state.ui.set_status(format!("Nachbarschaft '{name}' gespeichert")),
    }
    mode::transition(state, Mode::Neighbourhood)
}

/// Öffnet eine gespeicherte Nachbarschaft.
pub fn open_neighbourhood(state: &mut AppState, name: String) -> EditorResult<()> {
    let model = state
        .model_mut()
        .ok_or(ValidationError::ModelRequired {
            mode: "neighbourhood",
        })?;
    if !model.open_neighbourhood(&name) {
        return Err(ValidationError::UnknownBoundary(name).into());
    }
    state.ui.selected_road = None;
    mode::transition(state, Mode::Neighbourhood)
}

/// Schließt die aktive Nachbarschaft (die Grenze bleibt gespeichert).
pub fn close_neighbourhood(state: &mut AppState) {
    if let Some(model) = state.model_mut() {
        model.close_neighbourhood();
    }
    state.ui.selected_road = None;
    state.ui.filter_line.clear();
}

/// Vergleicht die Route vom ersten zum letzten Wegpunkt ohne und mit Filtern.
pub fn compare_route(state: &mut AppState) -> EditorResult<()> {
    let route = state.route.as_ref().ok_or(ValidationError::ModelRequired {
        mode: "route",
    })?;
    let (first, last) = match route.waypoints() {
        [first, .., last] => (first.position, last.position),
        _ => return Err(ValidationError::RouteTooShort.into()),
    };
    let model = state
        .model()
        .ok_or(ValidationError::ModelRequired { mode: "route" })?;
    let comparison = compare(model, first, last);
    let status = match comparison.as_ref().and_then(|c| c.detour_m()) {
        Some(detour) => format!("Umweg durch Filter: {detour:.0} m"),
        None => "Route vor oder nach den Filtern nicht möglich".to_string(),
    };
    state.ui.route_comparison = comparison;
    state.ui.set_status(status);
    Ok(())
}

/// Wählt die Straße im Inneren, die einer Position am nächsten liegt.
pub fn select_road_at(state: &mut AppState, position: DVec2) {
    let Some(model) = state.model() else {
        return;
    };
    let selected = model.active_neighbourhood().and_then(|(_, boundary)| {
        let interior = model.interior_roads(boundary);
        model.nearest_road(position, &interior)
    });
    if let Some(id) = selected {
        log::debug!("Straße {:?} ausgewählt", id);
    }
    state.ui.selected_road = selected;
}
