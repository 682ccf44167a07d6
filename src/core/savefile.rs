//! Speicherstand eines Projekts (JSON): Nachbarschafts-Grenzen und modale Filter.

use serde::{Deserialize, Serialize};

use super::filters::FilterKind;
use crate::error::ImportError;

/// Vom Nutzer gesetzter Grenz-Wegpunkt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedWaypoint {
    /// `[lon, lat]`, gerundet
    pub point: [f64; 2],
    /// Eingerastet oder frei
    pub snapped: bool,
}

/// Eine gespeicherte Grenze als `[lon, lat]`-Ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBoundary {
    /// Name der Nachbarschaft
    pub name: String,
    /// Geschlossener Ring, Koordinaten auf 6 Nachkommastellen gerundet
    pub ring: Vec<[f64; 2]>,
    /// Wegpunkte, aus denen der Ring gezeichnet wurde (fehlt in Version 1)
    #[serde(default)]
    pub waypoints: Vec<SavedWaypoint>,
}

/// Ein gespeicherter modaler Filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    /// Index der Straße im Netz
    pub road: usize,
    /// Art
    pub kind: FilterKind,
    /// Lage `[lon, lat]`, gerundet
    pub point: [f64; 2],
}

/// Alles, was neben dem Netz selbst gespeichert wird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    /// Format-Version
    pub version: u32,
    /// Grenzen in Einfügereihenfolge
    #[serde(default)]
    pub neighbourhoods: Vec<SavedBoundary>,
    /// Zuletzt geöffnete Nachbarschaft
    #[serde(default)]
    pub active: Option<String>,
    /// Modale Filter, nach Straße sortiert
    #[serde(default)]
    pub modal_filters: Vec<SavedFilter>,
}

impl SavedState {
    /// Aktuelle Format-Version.
    pub const CURRENT_VERSION: u32 = 2;

    /// Liest einen Speicherstand aus JSON.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let state: Self =
            serde_json::from_str(text).map_err(|e| ImportError::SavedState(e.to_string()))?;
        if state.version > Self::CURRENT_VERSION {
            return Err(ImportError::SavedState(format!(
                "Version {} wird nicht unterstützt",
                state.version
            )));
        }
        Ok(state)
    }

    /// Serialisiert den Speicherstand als JSON.
    pub fn to_json(&self) -> String {
        // Serialisierung von Strings und f64-Paaren kann nicht fehlschlagen
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            neighbourhoods: Vec::new(),
            active: None,
            modal_filters: Vec::new(),
        }
    }
}
