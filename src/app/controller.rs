//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};
use crate::error::{EditorError, EditorResult};

/// Orchestriert UI-Events und Handler auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Mountet den Startmodus und hängt seine Regionen ein.
    pub fn start(&mut self, state: &mut AppState) {
        if let Err(e) = super::handlers::mode::mount_active(state) {
            log::error!("Startmodus nicht mountbar: {}", e);
        }
        super::handlers::mode::refresh_regions(state);
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    ///
    /// Der erste fehlgeschlagene Command bricht die Sequenz ab; der Fehler wird
    /// zusätzlich in der Statuszeile abgelegt.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> EditorResult<()> {
        if state.modes.mounted().is_none() {
            self.start(state);
        }
        let commands = self.map_intent_to_commands(state, intent);
        let touches_regions = commands.iter().any(|c| !is_view_only(c));

        let mut result = Ok(());
        for command in commands {
            if let Err(e) = self.handle_command(state, command) {
                result = Err(e);
                break;
            }
        }

        if touches_regions {
            super::handlers::mode::refresh_regions(state);
        }
        if let Err(e) = &result {
            report_error(state, e);
        }
        result
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(&mut self, state: &mut AppState, command: AppCommand) -> EditorResult<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Projekt ===
            AppCommand::RequestExit => state.should_exit = true,
            AppCommand::OpenImportDialog => handlers::project::request_import_dialog(state),
            AppCommand::StartNetworkImport { path } => handlers::project::start_import(state, path)?,
            AppCommand::StartProjectLoad { name } => {
                handlers::project::start_project_load(state, name)?
            }
            AppCommand::SaveProject => handlers::project::save(state)?,
            AppCommand::SwitchProject => handlers::project::switch_project(state),

            // === Eingaben ===
            AppCommand::SetTextField { field, value } => {
                handlers::input::set_text_field(state, field, value)
            }
            AppCommand::BuildOverpassQuery => handlers::input::build_overpass_query(state)?,

            // === Modus ===
            AppCommand::TransitionMode { mode } => handlers::mode::transition(state, mode)?,

            // === Kartenfläche ===
            AppCommand::InitMapSurface { size } => handlers::view::init_map_surface(state, size),
            AppCommand::ResizeMapSurface { size } => handlers::view::resize(state, size),
            AppCommand::PanMap { delta } => handlers::view::pan(state, delta),
            AppCommand::ZoomMap { factor, anchor } => handlers::view::zoom(state, factor, anchor),
            AppCommand::FitToModel => handlers::view::fit_to_model(state),
            AppCommand::ToggleAbout => handlers::view::toggle_about(state),

            // === Route / Grenze ===
            AppCommand::AddWaypoint { position } => handlers::route::add_waypoint(state, position)?,
            AppCommand::InsertWaypoint { index, position } => {
                handlers::route::insert_waypoint(state, index, position)?
            }
            AppCommand::MoveWaypoint { index, position } => {
                handlers::route::move_waypoint(state, index, position)?
            }
            AppCommand::DeleteWaypoint { index } => handlers::route::delete_waypoint(state, index)?,
            AppCommand::Undo => handlers::route::undo(state)?,
            AppCommand::Redo => handlers::route::redo(state)?,
            AppCommand::ToggleSnapMode => handlers::route::toggle_snap_mode(state)?,
            AppCommand::ClearRoute => handlers::route::clear(state)?,
            AppCommand::FinishBoundary { name } => handlers::route::finish_boundary(state, name)?,
            AppCommand::OpenNeighbourhood { name } => {
                handlers::route::open_neighbourhood(state, name)?
            }
            AppCommand::SelectRoadAt { position } => {
                handlers::route::select_road_at(state, position)
            }
            AppCommand::CloseNeighbourhood => handlers::route::close_neighbourhood(state),
            AppCommand::CompareRoute => handlers::route::compare_route(state)?,

            // === Modale Filter ===
            AppCommand::AddModalFilter { position } => {
                handlers::filters::add_modal_filter(state, position)?
            }
            AppCommand::ExtendFilterLine { position } => {
                handlers::filters::extend_filter_line(state, position)
            }
            AppCommand::AddManyModalFilters => handlers::filters::add_many_modal_filters(state)?,
            AppCommand::ClearFilterLine => handlers::filters::clear_filter_line(state),
            AppCommand::DeleteModalFilter { road } => {
                handlers::filters::delete_modal_filter(state, road)?
            }
            AppCommand::SetFilterKind { kind } => handlers::filters::set_filter_kind(state, kind),
            AppCommand::UndoFilter => handlers::filters::undo(state)?,
            AppCommand::RedoFilter => handlers::filters::redo(state)?,
        }

        Ok(())
    }

    /// Übernimmt fertige Hintergrund-Aufgaben (einmal pro Frame aufrufen).
    ///
    /// Gibt `true` zurück, wenn sich dadurch der Zustand geändert hat.
    pub fn poll_tasks(&mut self, state: &mut AppState) -> bool {
        let finished = state.tasks.poll();
        if finished.is_empty() {
            return false;
        }
        for (kind, result) in finished {
            if let Err(e) = super::handlers::project::finish_task(state, kind, result) {
                report_error(state, &e);
            }
        }
        super::handlers::mode::refresh_regions(state);
        true
    }
}

/// Commands, die nur die Kartenansicht verändern (keine Regionen-Auffrischung nötig).
fn is_view_only(command: &AppCommand) -> bool {
    matches!(
        command,
        AppCommand::PanMap { .. }
            | AppCommand::ZoomMap { .. }
            | AppCommand::ResizeMapSurface { .. }
            | AppCommand::ToggleAbout
    )
}

/// Legt einen Fehler für Statuszeile und Tests ab.
fn report_error(state: &mut AppState, error: &EditorError) {
    state.ui.status_message = Some(error.to_string());
    state.ui.last_error = Some(error.clone());
}
