//! Handler für modale Filter in der geöffneten Nachbarschaft.
//!
//! Jede Änderung legt vorher die bisherigen Filter im eigenen Verlauf ab;
//! Route und Filter haben getrennte Undo/Redo-Stapel.

use glam::DVec2;

use crate::app::AppState;
use crate::core::{FilterKind, ModalFilters, RoadId, RoadNetwork};
use crate::error::{EditorResult, ValidationError};

fn model(state: &AppState) -> Result<&RoadNetwork, ValidationError> {
    state.model().map(|m| m.as_ref()).ok_or(ValidationError::ModelRequired {
        mode: "neighbourhood",
    })
}

/// Straßen im Inneren der aktiven Nachbarschaft plus die aktuellen Filter.
fn interior_and_filters(state: &AppState) -> Result<(Vec<RoadId>, ModalFilters), ValidationError> {
    let model = model(state)?;
    let (_, boundary) = model
        .active_neighbourhood()
        .ok_or(ValidationError::NoNeighbourhood)?;
    Ok((model.interior_roads(boundary), model.modal_filters().clone()))
}

fn model_mut(state: &mut AppState) -> Result<&mut RoadNetwork, ValidationError> {
    state.model_mut().ok_or(ValidationError::ModelRequired {
        mode: "neighbourhood",
    })
}

/// Setzt einen Filter auf die Straße im Inneren, die `position` am nächsten liegt.
pub fn add_modal_filter(state: &mut AppState, position: DVec2) -> EditorResult<()> {
    let (interior, before) = interior_and_filters(state)?;
    let kind = state.ui.filter_kind;
    let road = model_mut(state)?
        .add_modal_filter(position, &interior, kind)
        .ok_or(ValidationError::NoInteriorRoad)?;
    state.filter_history.record_snapshot(before);
    state
        .ui
        .set_status(format!("{} auf Straße {} gesetzt", kind.label(), road.0));
    Ok(())
}

/// Hängt einen Punkt an die Filter-Linie an.
pub fn extend_filter_line(state: &mut AppState, position: DVec2) {
    state.ui.filter_line.push(position);
}

/// Verwirft die Filter-Linie.
pub fn clear_filter_line(state: &mut AppState) {
    state.ui.filter_line.clear();
}

/// Setzt Filter auf alle Straßen im Inneren, die die Filter-Linie kreuzt.
///
/// Die Linie wird danach geleert, auch wenn sie keine Straße getroffen hat.
pub fn add_many_modal_filters(state: &mut AppState) -> EditorResult<()> {
    let line = std::mem::take(&mut state.ui.filter_line);
    if line.len() < 2 {
        return Ok(());
    }
    let (interior, before) = interior_and_filters(state)?;
    let kind = state.ui.filter_kind;
    let hit = model_mut(state)?.add_many_modal_filters(&line, &interior, kind);
    if hit.is_empty() {
        return Err(ValidationError::NoInteriorRoad.into());
    }
    state.filter_history.record_snapshot(before);
    state.ui.set_status(format!("{} Filter gesetzt", hit.len()));
    Ok(())
}

/// Entfernt den Filter einer Straße.
pub fn delete_modal_filter(state: &mut AppState, road: RoadId) -> EditorResult<()> {
    let before = model(state)?.modal_filters().clone();
    if model_mut(state)?.delete_modal_filter(road).is_some() {
        state.filter_history.record_snapshot(before);
        state.ui.set_status("Filter entfernt");
    }
    Ok(())
}

/// Wählt die Art neuer Filter.
pub fn set_filter_kind(state: &mut AppState, kind: FilterKind) {
    state.ui.filter_kind = kind;
}

/// Macht die letzte Filter-Änderung rückgängig.
pub fn undo(state: &mut AppState) -> EditorResult<()> {
    let current = model(state)?.modal_filters().clone();
    match state.filter_history.pop_undo_with_current(current) {
        Some(previous) => model_mut(state)?.replace_modal_filters(previous),
        None => log::debug!("Keine Filter-Änderung rückgängig zu machen"),
    }
    Ok(())
}

/// Stellt die zuletzt rückgängig gemachte Filter-Änderung wieder her.
pub fn redo(state: &mut AppState) -> EditorResult<()> {
    let current = model(state)?.modal_filters().clone();
    match state.filter_history.pop_redo_with_current(current) {
        Some(next) => model_mut(state)?.replace_modal_filters(next),
        None => log::debug!("Keine Filter-Änderung zu wiederholen"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::grid_network;
    use crate::core::Polygon;
    use std::sync::Arc;

    /// 4×4-Gitter mit geöffneter Nachbarschaft um die Kreuzungen 5, 6, 9, 10.
    fn state_with_neighbourhood() -> AppState {
        let mut network = grid_network(4, 0.001);
        network.set_neighbourhood(
            "Mitte",
            Polygon::new(vec![
                DVec2::new(0.0006, 0.0006),
                DVec2::new(0.0024, 0.0006),
                DVec2::new(0.0024, 0.0024),
                DVec2::new(0.0006, 0.0024),
            ]),
        );
        let mut state = AppState::new();
        state.replace_model(Arc::new(network));
        state
    }

    fn filter_count(state: &AppState) -> usize {
        state.model().map_or(0, |m| m.modal_filters().len())
    }

    #[test]
    fn filters_have_their_own_undo_and_redo() {
        let mut state = state_with_neighbourhood();
        state.ui.filter_kind = FilterKind::BusGate;

        add_modal_filter(&mut state, DVec2::new(0.0015, 0.00101)).expect("Filter");
        add_modal_filter(&mut state, DVec2::new(0.0015, 0.00199)).expect("Filter");
        assert_eq!(filter_count(&state), 2);
        assert!(state
            .model()
            .is_some_and(|m| m.modal_filters().values().all(|f| f.kind == FilterKind::BusGate)));

        undo(&mut state).expect("undo");
        assert_eq!(filter_count(&state), 1);
        undo(&mut state).expect("undo");
        assert_eq!(filter_count(&state), 0);
        assert!(!state.filter_history.can_undo());

        redo(&mut state).expect("redo");
        redo(&mut state).expect("redo");
        assert_eq!(filter_count(&state), 2);
        assert!(!state.filter_history.can_redo());
    }

    #[test]
    fn click_outside_interior_roads_sets_nothing() {
        let mut state = AppState::new();
        state.replace_model(Arc::new(grid_network(2, 0.001)));

        let result = add_modal_filter(&mut state, DVec2::new(0.0005, 0.0));
        assert_eq!(result, Err(ValidationError::NoNeighbourhood.into()));
        assert!(!state.filter_history.can_undo());
    }

    #[test]
    fn filter_line_filters_crossed_roads_in_one_step() {
        let mut state = state_with_neighbourhood();
        // Waagerecht durch die Mitte: kreuzt die Straßen 5-9 und 6-10
        extend_filter_line(&mut state, DVec2::new(0.0007, 0.0015));
        extend_filter_line(&mut state, DVec2::new(0.0023, 0.0015));

        add_many_modal_filters(&mut state).expect("Filter entlang der Linie");
        assert_eq!(filter_count(&state), 2);
        assert!(state.ui.filter_line.is_empty());

        undo(&mut state).expect("undo");
        assert_eq!(filter_count(&state), 0);
    }

    #[test]
    fn delete_is_undoable_and_unknown_road_is_ignored() {
        let mut state = state_with_neighbourhood();
        add_modal_filter(&mut state, DVec2::new(0.0015, 0.001)).expect("Filter");
        let road = state
            .model()
            .and_then(|m| m.modal_filters().keys().next().copied())
            .expect("Filter vorhanden");

        delete_modal_filter(&mut state, road).expect("entfernen");
        assert_eq!(filter_count(&state), 0);
        delete_modal_filter(&mut state, road).expect("zweites Entfernen ist kein Fehler");

        undo(&mut state).expect("undo");
        assert_eq!(filter_count(&state), 1);
    }
}
