//! Typisierte Fehler des Editors.
//!
//! Alle Fehler werden an der Controller-Grenze (`AppController::handle_intent`)
//! abgefangen und als Statusmeldung angezeigt.

use thiserror::Error;

use crate::app::tasks::TaskKind;
use crate::core::NodeId;

/// Fehler beim Laden eines Netzes oder Speicherstands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// Leere Eingabe
    #[error("Eingabe ist leer")]
    Empty,
    /// Eingabe ist kein gültiges UTF-8
    #[error("Eingabe ist kein gültiges UTF-8")]
    Encoding,
    /// XML-Syntaxfehler
    #[error("XML-Fehler: {0}")]
    Xml(String),
    /// Node mit fehlender oder ungültiger ID/Koordinate
    #[error("Ungültiger OSM-Node: {0}")]
    InvalidNode(String),
    /// Keine befahrbaren Straßen gefunden
    #[error("Keine befahrbaren Straßen im Netz gefunden")]
    NoRoads,
    /// GeoJSON-Eingabe nicht lesbar oder kein Polygon
    #[error("Ungültiges GeoJSON: {0}")]
    GeoJson(String),
    /// Speicherstand nicht lesbar oder inkonsistent
    #[error("Ungültiger Speicherstand: {0}")]
    SavedState(String),
    /// Datei konnte nicht gelesen werden
    #[error("Datei nicht lesbar: {0}")]
    Io(String),
}

/// Ungültige Eingabe an einer Session-Operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Index außerhalb der Wegpunkt-Liste
    #[error("Index {index} außerhalb des gültigen Bereichs (Länge {len})")]
    IndexOutOfRange {
        /// Angefragter Index
        index: usize,
        /// Aktuelle Länge
        len: usize,
    },
    /// Position außerhalb der Modell-Ausdehnung (oder nicht endlich)
    #[error("Position ({lon}, {lat}) liegt außerhalb des Netzes")]
    OutOfExtent {
        /// Längengrad
        lon: f64,
        /// Breitengrad
        lat: f64,
    },
    /// Modus braucht ein geladenes Netz
    #[error("Modus '{mode}' benötigt ein geladenes Netz")]
    ModelRequired {
        /// Name des angefragten Modus
        mode: &'static str,
    },
    /// Grenze mit diesem Namen existiert nicht
    #[error("Unbekannte Nachbarschaft '{0}'")]
    UnknownBoundary(String),
    /// Modus braucht eine aktive Nachbarschaft
    #[error("Keine Nachbarschaft geöffnet")]
    NoNeighbourhood,
    /// Route ist als Grenze unvollständig (zu wenig Punkte oder Snap-Fehler)
    #[error("Grenze unvollständig: mindestens drei Wegpunkte ohne Snap-Fehler nötig")]
    IncompleteBoundary,
    /// Routenvergleich braucht Start und Ziel
    #[error("Route braucht mindestens zwei Wegpunkte")]
    RouteTooShort,
    /// Aktion braucht eine Straße im Inneren der Nachbarschaft
    #[error("Keine Straße im Inneren der Nachbarschaft getroffen")]
    NoInteriorRoad,
    /// Projekt- oder Nachbarschaftsname ungültig
    #[error("Ungültiger Name '{0}'")]
    InvalidName(String),
}

/// Fehler eines einzelnen Routen-Segments. Bricht die Route nie ab.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SnapFailure {
    /// Wegpunkt hat keinen Snap-Kandidaten in Reichweite
    #[error("Segment {segment}: Wegpunkt {waypoint} liegt zu weit vom Netz entfernt")]
    NoSnapCandidate {
        /// Segment-Index (Wegpunkt i → i+1)
        segment: usize,
        /// Betroffener Wegpunkt
        waypoint: usize,
    },
    /// Keine Verbindung zwischen den eingerasteten Knoten
    #[error("Segment {segment}: keine Verbindung von {from:?} nach {to:?}")]
    NoPath {
        /// Segment-Index
        segment: usize,
        /// Start-Knoten
        from: NodeId,
        /// Ziel-Knoten
        to: NodeId,
    },
}

impl SnapFailure {
    /// Index des betroffenen Segments.
    pub fn segment(&self) -> usize {
        match self {
            Self::NoSnapCandidate { segment, .. } | Self::NoPath { segment, .. } => *segment,
        }
    }
}

/// Fehler des Projekt-Speichers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// Kein Eintrag unter diesem Schlüssel
    #[error("Kein Projekt unter '{key}' gespeichert")]
    NotFound {
        /// Gesuchter Schlüssel
        key: String,
    },
    /// Eintrag nicht lesbar
    #[error("Projekt '{key}' ist beschädigt: {reason}")]
    Corrupt {
        /// Schlüssel
        key: String,
        /// Ursache
        reason: String,
    },
    /// Dateisystem-Fehler
    #[error("Speicherfehler: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Sammel-Fehler aller Editor-Operationen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Import fehlgeschlagen
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Ungültige Eingabe
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Routen-Segment fehlgeschlagen
    #[error(transparent)]
    Snap(#[from] SnapFailure),
    /// Speicherfehler
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Eine Hintergrund-Aufgabe läuft bereits (die laufende Art)
    #[error("{0} läuft bereits")]
    Busy(TaskKind),
}

/// Ergebnis-Alias für Editor-Operationen.
pub type EditorResult<T> = Result<T, EditorError>;
