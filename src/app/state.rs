//! Session-Kontext: alle Stores der laufenden Editier-Sitzung.

use std::path::PathBuf;
use std::sync::Arc;

use glam::DVec2;

use super::command_log::CommandLog;
use super::history::EditHistory;
use super::mode::Mode;
use super::modes::{ModeContext, ModeManager, MountContext};
use super::regions::UiRegions;
use super::route_drawer::RouteDrawer;
use super::tasks::BackgroundTasks;
use crate::core::{
    DirectoryStore, FilterKind, MapSurface, MemoryStore, ModalFilters, ProjectStore, RoadId,
    RoadNetwork, RouteComparison,
};
use crate::error::{EditorError, ValidationError};
use crate::shared::EditorOptions;

/// Anzeige-Präferenzen (unabhängig vom Modus).
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Info-/Hilfe-Fenster sichtbar
    pub show_about: bool,
    /// Einpassen auf das Netz steht aus, bis die Kartenfläche existiert
    pub pending_fit: bool,
}

/// UI-bezogener Zustand (Eingabefelder, Meldungen, Dialoge).
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Letzte Statusmeldung
    pub status_message: Option<String>,
    /// Letzter Fehler (für Tests und rote Statuszeile)
    pub last_error: Option<EditorError>,
    /// Name des aktuellen Projekts
    pub project_name: String,
    /// Name für die zu speichernde Grenze
    pub boundary_name: String,
    /// Quelldatei des geladenen Netzes
    pub network_path: Option<PathBuf>,
    /// Eingefügtes GeoJSON-Polygon
    pub overpass_polygon_text: String,
    /// Zuletzt gebaute Overpass-Abfrage
    pub overpass_query: Option<String>,
    /// Ausgewählte Straße in der Schleichweg-Ansicht
    pub selected_road: Option<RoadId>,
    /// Art neuer modaler Filter
    pub filter_kind: FilterKind,
    /// Gezeichnete Linie für mehrere Filter auf einmal
    pub filter_line: Vec<DVec2>,
    /// Letzter Routenvergleich (verworfen, sobald sich die Route ändert)
    pub route_comparison: Option<RouteComparison>,
    /// Datei-Dialog für den Import anzeigen
    pub show_import_dialog: bool,
}

impl UiState {
    /// Setzt eine Info-Meldung und löscht den letzten Fehler.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.last_error = None;
    }
}

/// Hauptzustand der Anwendung.
pub struct AppState {
    /// Die einzige Kartenfläche (erst vorhanden, wenn die Kartenansicht bereit ist)
    pub map_surface: Option<MapSurface>,
    model: Option<Arc<RoadNetwork>>,
    mode: Mode,
    /// Seitenleiste und Karten-Overlay
    pub regions: UiRegions,
    /// Registrierte Modus-Controller
    pub modes: ModeManager,
    /// Routen-Koordinator (existiert genau dann, wenn ein Netz geladen ist)
    pub route: Option<RouteDrawer>,
    /// Undo/Redo der modalen Filter (unabhängig von der Route)
    pub filter_history: EditHistory<ModalFilters>,
    /// Anzeige-Präferenzen
    pub view: ViewState,
    /// UI-Zustand
    pub ui: UiState,
    /// Laufende Hintergrund-Aufgaben
    pub tasks: BackgroundTasks,
    /// Projekt-Speicher
    pub store: Box<dyn ProjectStore>,
    /// Ausgeführte Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Anwendung soll beendet werden
    pub should_exit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Neue Session mit Standard-Optionen und flüchtigem Speicher.
    pub fn new() -> Self {
        Self::with_store(EditorOptions::default(), Box::new(MemoryStore::new()))
    }

    /// Neue Session; öffnet das konfigurierte Speicherverzeichnis.
    pub fn with_options(options: EditorOptions) -> Self {
        let store: Box<dyn ProjectStore> = match options.store_dir.as_ref() {
            Some(dir) => match DirectoryStore::open(dir) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    log::warn!("Projekt-Speicher nicht nutzbar, nur im Speicher: {}", e);
                    Box::new(MemoryStore::new())
                }
            },
            None => Box::new(MemoryStore::new()),
        };
        Self::with_store(options, store)
    }

    /// Neue Session mit explizitem Speicher.
    pub fn with_store(options: EditorOptions, store: Box<dyn ProjectStore>) -> Self {
        Self {
            map_surface: None,
            model: None,
            mode: Mode::Title,
            regions: UiRegions::default(),
            modes: ModeManager::new(),
            route: None,
            filter_history: EditHistory::new_with_capacity(options.history_depth),
            view: ViewState::default(),
            ui: UiState::default(),
            tasks: BackgroundTasks::default(),
            store,
            command_log: CommandLog::new(),
            options,
            should_exit: false,
        }
    }

    /// Aktiver Modus.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Geladenes Netz.
    pub fn model(&self) -> Option<&Arc<RoadNetwork>> {
        self.model.as_ref()
    }

    /// Prüft, ob ein Wechsel in `mode` zulässig ist.
    pub fn validate_transition(&self, mode: &Mode) -> Result<(), ValidationError> {
        let Some(model) = self.model.as_deref() else {
            if mode.requires_model() {
                return Err(ValidationError::ModelRequired {
                    mode: mode.kind().as_str(),
                });
            }
            return Ok(());
        };

        if let Mode::SetBoundary {
            existing: Some(boundary),
        } = mode
        {
            if model.neighbourhood(boundary.name()).is_none() {
                return Err(ValidationError::UnknownBoundary(boundary.name().to_string()));
            }
        }
        if mode.requires_neighbourhood() && model.active_neighbourhood().is_none() {
            return Err(ValidationError::NoNeighbourhood);
        }
        Ok(())
    }

    /// Ersetzt den Modus. Nur über `handlers::mode::transition` aufrufen.
    pub(crate) fn replace_mode(&mut self, mode: Mode) -> Mode {
        std::mem::replace(&mut self.mode, mode)
    }

    /// Ersetzt das Netz vollständig. Nur über `handlers::project` aufrufen.
    pub(crate) fn replace_model(&mut self, model: Arc<RoadNetwork>) {
        self.model = Some(model);
        self.forget_edits();
    }

    /// Verwirft das Netz.
    pub(crate) fn clear_model(&mut self) {
        self.model = None;
        self.forget_edits();
    }

    /// Filter-Verlauf und netzbezogene Eingaben gelten nur für ein Netz.
    fn forget_edits(&mut self) {
        self.filter_history.clear();
        self.ui.selected_road = None;
        self.ui.filter_line.clear();
        self.ui.route_comparison = None;
    }

    /// Veränderbarer Zugriff auf das Netz (Copy-on-Write).
    pub(crate) fn model_mut(&mut self) -> Option<&mut RoadNetwork> {
        self.model.as_mut().map(Arc::make_mut)
    }

    /// Gespeicherte Projekte (für die Projektauswahl).
    pub fn project_names(&self) -> Vec<String> {
        self.store.project_names()
    }

    /// Lesesicht für Modus-Controller.
    pub fn mode_context(&self) -> ModeContext<'_> {
        ModeContext {
            mode: &self.mode,
            model: self.model.as_deref(),
            route: self.route.as_ref(),
            filter_history: &self.filter_history,
            map_surface: self.map_surface.as_ref(),
            ui: &self.ui,
            options: &self.options,
            tasks: &self.tasks,
            store: self.store.as_ref(),
        }
    }

    /// Teilt den Zustand für den Mount-Hook auf: Controller-Registry plus
    /// die Stores, die ein Controller beim Mounten verändern darf.
    pub(crate) fn split_for_mount(&mut self) -> (&mut ModeManager, &Mode, MountContext<'_>) {
        (
            &mut self.modes,
            &self.mode,
            MountContext {
                model: self.model.as_deref(),
                route: self.route.as_mut(),
                ui: &mut self.ui,
            },
        )
    }
}
