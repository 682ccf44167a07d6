//! Handler für Import, Projekt laden/speichern und Projektwechsel.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::mode;
use crate::app::mode::Mode;
use crate::app::route_drawer::RouteDrawer;
use crate::app::tasks::{TaskKind, TaskOutput, TaskResult};
use crate::app::AppState;
use crate::core::{NetworkModel, ProjectRecord, RoadNetwork};
use crate::error::{EditorResult, ImportError, ValidationError};

/// Zulässige Projekt- und Nachbarschaftsnamen.
fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[\p{L}\p{N} _.\-]{1,64}$").ok())
        .as_ref()
}

/// Prüft einen Namen (Projekt oder Nachbarschaft).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed == name && name_pattern().is_some_and(|re| re.is_match(name)) {
        Ok(())
    } else {
        Err(ValidationError::InvalidName(name.to_string()))
    }
}

/// Dateiname ohne Endung als Vorschlag für den Projektnamen.
fn project_name_from_path(path: &std::path::Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    // ".osm.xml" und ähnliche Doppelendungen
    stem.split('.').next().unwrap_or_default().to_string()
}

/// Öffnet den Import-Dialog.
pub fn request_import_dialog(state: &mut AppState) {
    state.ui.show_import_dialog = true;
}

/// Startet den OSM-Import im Hintergrund.
pub fn start_import(state: &mut AppState, path: PathBuf) -> EditorResult<()> {
    state.ui.show_import_dialog = false;
    let job_path = path.clone();
    state.tasks.spawn(TaskKind::ImportNetwork, move || {
        let bytes = std::fs::read(&job_path).map_err(|e| ImportError::Io(e.to_string()))?;
        let network = RoadNetwork::load(&bytes, None)?;
        Ok(TaskOutput::NetworkImported {
            path: job_path,
            network,
        })
    })?;
    state.ui.set_status(format!("Importiere {}…", path.display()));
    log::info!("Import gestartet: {}", path.display());
    Ok(())
}

/// Lädt ein gespeichertes Projekt im Hintergrund.
pub fn start_project_load(state: &mut AppState, name: String) -> EditorResult<()> {
    let record = state.store.load_project(&name)?;
    let saved_json = record.saved.to_json();
    let job_name = name.clone();
    state.tasks.spawn(TaskKind::LoadProject, move || {
        let bytes = std::fs::read(&record.network_path)
            .map_err(|e| ImportError::Io(format!("{}: {e}", record.network_path.display())))?;
        let network = RoadNetwork::load(&bytes, Some(&saved_json))?;
        Ok(TaskOutput::ProjectLoaded {
            name: job_name,
            record,
            network,
        })
    })?;
    state.ui.set_status(format!("Lade Projekt '{name}'…"));
    Ok(())
}

/// Übernimmt ein fertiges Hintergrund-Ergebnis.
///
/// Fehler lassen den bisherigen Zustand unverändert.
pub fn finish_task(state: &mut AppState, kind: TaskKind, result: TaskResult) -> EditorResult<()> {
    match result {
        Ok(TaskOutput::NetworkImported { path, network }) => {
            if state.ui.project_name.trim().is_empty() {
                state.ui.project_name = project_name_from_path(&path);
            }
            install_model(state, network)?;
            state.ui.network_path = Some(path);
            state.ui.set_status("Netz importiert");
            Ok(())
        }
        Ok(TaskOutput::ProjectLoaded {
            name,
            record,
            network,
        }) => {
            install_model(state, network)?;
            state.ui.project_name = name;
            state.ui.network_path = Some(record.network_path);
            state.ui.set_status("Projekt geladen");
            Ok(())
        }
        Err(e) => {
            log::warn!("{} fehlgeschlagen: {}", kind, e);
            Err(e)
        }
    }
}

/// Ersetzt das Netz, baut den Routen-Koordinator neu und wechselt ins Netz.
pub fn install_model(state: &mut AppState, network: RoadNetwork) -> EditorResult<()> {
    let network = network.with_snap_distance(state.options.snap_max_distance_m);
    let graph = network.to_snapping_graph();
    let bounds = network.bounds();

    mode::unmount_active(state);
    state.replace_model(Arc::new(network));
    state.route = Some(RouteDrawer::new(graph, bounds, state.options.history_depth));

    match state.map_surface.as_mut() {
        Some(surface) => surface.fit_bounds(&bounds, state.options.fit_padding_px),
        None => state.view.pending_fit = true,
    }
    // Frisch geladenes Netz: immer Netz-Ansicht, auch wenn sie schon aktiv war
    mode::transition(state, Mode::Network)
}

/// Speichert das aktuelle Projekt unter dem eingegebenen Namen.
pub fn save(state: &mut AppState) -> EditorResult<()> {
    let name = state.ui.project_name.trim().to_string();
    validate_name(&name)?;
    let model = state.model().ok_or(ValidationError::ModelRequired { mode: "network" })?;
    let network_path = state
        .ui
        .network_path
        .clone()
        .ok_or_else(|| ImportError::Io("Quelldatei des Netzes unbekannt".into()))?;

    let record = ProjectRecord {
        network_path,
        saved: model.to_saved_state(),
    };
    state.store.save_project(&name, &record)?;
    state.ui.project_name = name.clone();
    state.ui.set_status(format!("Projekt '{name}' gespeichert"));
    log::info!("Projekt '{}' gespeichert", name);
    Ok(())
}

/// Verwirft das Netz und zeigt die Projektauswahl.
pub fn switch_project(state: &mut AppState) {
    mode::reset_to_title(state);
    state.ui.network_path = None;
    state.ui.selected_road = None;
    state.ui.set_status("Projekt geschlossen");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_be_plain_and_trimmed() {
        assert!(validate_name("Altstadt Nord").is_ok());
        assert!(validate_name("Süd-West_2").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(" Rand").is_err());
        assert!(validate_name("a/b").is_err());
    }

    #[test]
    fn project_name_drops_all_extensions() {
        assert_eq!(
            project_name_from_path(std::path::Path::new("/tmp/kiez.osm.xml")),
            "kiez"
        );
    }
}
