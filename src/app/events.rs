//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

use std::path::PathBuf;

use glam::{DVec2, Vec2};

use super::mode::Mode;
use super::regions::TextField;
use crate::core::{FilterKind, RoadId};

/// Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Anwendung beenden
    ExitRequested,
    /// Import-Dialog öffnen
    ImportNetworkRequested,
    /// OSM-Datei wurde im Dialog ausgewählt
    NetworkFileSelected { path: PathBuf },
    /// Gespeichertes Projekt laden
    LoadProjectRequested { name: String },
    /// Aktuelles Projekt speichern
    SaveProjectRequested,
    /// Zurück zur Projektauswahl
    SwitchProjectRequested,
    /// Text in einem Eingabefeld der Seitenleiste geändert
    TextFieldChanged { field: TextField, value: String },
    /// Overpass-Abfrage aus dem eingefügten Polygon bauen
    BuildOverpassQueryRequested,
    /// In einen anderen Modus wechseln
    ModeRequested { mode: Mode },
    /// Kartenansicht ist bereit (erste Größe bekannt)
    MapViewReady { size: [f32; 2] },
    /// Kartenansicht hat neue Größe
    ViewportResized { size: [f32; 2] },
    /// Karte um Pixel-Delta verschieben
    MapPan { delta: Vec2 },
    /// Karte zoomen (optional um einen Bildschirmpunkt)
    MapZoom { factor: f64, anchor: Option<Vec2> },
    /// Stufenweise hineinzoomen
    ZoomInRequested,
    /// Stufenweise herauszoomen
    ZoomOutRequested,
    /// Ansicht auf das Netz einpassen
    FitToModelRequested,
    /// Linksklick auf die Karte (Geo-Position)
    MapClicked { position: DVec2 },
    /// Shift-Klick: Wegpunkt in das nächste Segment einfügen
    WaypointInsertRequested { position: DVec2 },
    /// Rechtsklick: Wegpunkt unter dem Zeiger entfernen
    WaypointRemoveAtRequested { position: DVec2 },
    /// Wegpunkt per Index entfernen (Liste in der Seitenleiste)
    WaypointRemoveRequested { index: usize },
    /// Wegpunkt von `from` nach `to` gezogen
    WaypointDragFinished { from: DVec2, to: DVec2 },
    /// Rückgängig
    UndoRequested,
    /// Wiederholen
    RedoRequested,
    /// Einrasten neuer Wegpunkte umschalten
    ToggleSnapModeRequested,
    /// Alle Wegpunkte entfernen
    ClearRouteRequested,
    /// Gezeichnete Grenze unter dem eingegebenen Namen speichern
    FinishBoundaryRequested,
    /// Gespeicherte Nachbarschaft öffnen
    OpenNeighbourhoodRequested { name: String },
    /// Aktive Nachbarschaft schließen und zurück zum Netz
    CloseNeighbourhoodRequested,
    /// Shift-Klick in der Nachbarschaft: Punkt an die Filter-Linie anhängen
    FilterLinePointRequested { position: DVec2 },
    /// Filter auf alle Straßen setzen, die die Filter-Linie kreuzt
    ApplyFilterLineRequested,
    /// Filter-Linie verwerfen
    ClearFilterLineRequested,
    /// Filter einer Straße entfernen
    DeleteModalFilterRequested { road: RoadId },
    /// Art neuer Filter wählen
    FilterKindSelected { kind: FilterKind },
    /// Route vor und nach den Filtern vergleichen
    CompareRouteRequested,
    /// Info-Fenster ein-/ausblenden
    ToggleAboutRequested,
}

/// Mutierende Befehle, die der Controller auf den AppState anwendet.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Anwendung beenden
    RequestExit,
    /// Import-Dialog anzeigen
    OpenImportDialog,
    /// OSM-Import im Hintergrund starten
    StartNetworkImport { path: PathBuf },
    /// Projekt im Hintergrund laden
    StartProjectLoad { name: String },
    /// Projekt speichern
    SaveProject,
    /// Netz verwerfen und zur Projektauswahl
    SwitchProject,
    /// Eingabefeld setzen
    SetTextField { field: TextField, value: String },
    /// Overpass-Abfrage bauen
    BuildOverpassQuery,
    /// Modus wechseln
    TransitionMode { mode: Mode },
    /// Kartenfläche anlegen (einmal pro Kartenansicht)
    InitMapSurface { size: Vec2 },
    /// Kartenfläche neu dimensionieren
    ResizeMapSurface { size: Vec2 },
    /// Karte verschieben
    PanMap { delta: Vec2 },
    /// Karte zoomen
    ZoomMap { factor: f64, anchor: Option<Vec2> },
    /// Auf Netz-Ausdehnung einpassen
    FitToModel,
    /// Wegpunkt anhängen
    AddWaypoint { position: DVec2 },
    /// Wegpunkt einfügen
    InsertWaypoint { index: usize, position: DVec2 },
    /// Wegpunkt verschieben
    MoveWaypoint { index: usize, position: DVec2 },
    /// Wegpunkt entfernen
    DeleteWaypoint { index: usize },
    /// Route: rückgängig
    Undo,
    /// Route: wiederholen
    Redo,
    /// Snap-Modus umschalten
    ToggleSnapMode,
    /// Route leeren
    ClearRoute,
    /// Grenze speichern und Nachbarschaft öffnen
    FinishBoundary { name: String },
    /// Nachbarschaft öffnen
    OpenNeighbourhood { name: String },
    /// Aktive Nachbarschaft schließen
    CloseNeighbourhood,
    /// Filter auf die nächste Straße im Inneren setzen
    AddModalFilter { position: DVec2 },
    /// Punkt an die Filter-Linie anhängen
    ExtendFilterLine { position: DVec2 },
    /// Filter entlang der Filter-Linie setzen
    AddManyModalFilters,
    /// Filter-Linie leeren
    ClearFilterLine,
    /// Filter entfernen
    DeleteModalFilter { road: RoadId },
    /// Art neuer Filter setzen
    SetFilterKind { kind: FilterKind },
    /// Filter: rückgängig
    UndoFilter,
    /// Filter: wiederholen
    RedoFilter,
    /// Route vor/nach Filtern vergleichen
    CompareRoute,
    /// Straße unter einer Position auswählen (Schleichweg-Ansicht)
    SelectRoadAt { position: DVec2 },
    /// Info-Fenster umschalten
    ToggleAbout,
}
