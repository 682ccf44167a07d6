//! Projekt-Speicher: Schlüssel-Wert-Ablage für gespeicherte Projekte.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::savefile::SavedState;
use crate::error::StorageError;

/// Präfix aller Projekt-Schlüssel.
pub const PROJECT_KEY_PREFIX: &str = "ltn_";

/// Schlüssel, unter dem ein Projekt gespeichert wird.
pub fn project_key(name: &str) -> String {
    format!("{PROJECT_KEY_PREFIX}{name}")
}

/// Gespeichertes Projekt: Quelle des Netzes plus Speicherstand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Pfad der OSM-Datei, aus der das Netz importiert wurde
    pub network_path: PathBuf,
    /// Gespeicherte Nachbarschaften
    #[serde(default)]
    pub saved: SavedState,
}

impl ProjectRecord {
    /// Liest einen Datensatz; Fehler werden dem Schlüssel zugeordnet.
    pub fn from_json(key: &str, text: &str) -> Result<Self, StorageError> {
        serde_json::from_str(text).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Serialisiert den Datensatz.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Io(e.to_string()))
    }
}

/// Ablage für Projekte. Zugriff nur über den exakten Schlüssel.
pub trait ProjectStore: Send {
    /// Liest den Wert unter `key`.
    fn get(&self, key: &str) -> Result<String, StorageError>;

    /// Schreibt (oder überschreibt) den Wert unter `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Entfernt den Wert unter `key`. Fehlende Schlüssel sind kein Fehler.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Alle Schlüssel (sortiert bzw. in Einfügereihenfolge).
    fn keys(&self) -> Vec<String>;

    /// Namen aller gespeicherten Projekte (ohne Präfix).
    fn project_names(&self) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(PROJECT_KEY_PREFIX).map(str::to_string))
            .collect()
    }

    /// Lädt und deserialisiert ein Projekt.
    fn load_project(&self, name: &str) -> Result<ProjectRecord, StorageError> {
        let key = project_key(name);
        let text = self.get(&key)?;
        ProjectRecord::from_json(&key, &text)
    }

    /// Serialisiert und speichert ein Projekt.
    fn save_project(&mut self, name: &str, record: &ProjectRecord) -> Result<(), StorageError> {
        let text = record.to_json()?;
        self.set(&project_key(name), &text)
    }
}

/// Flüchtiger Speicher (Tests, Sitzungen ohne Speicherverzeichnis).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
}

impl MemoryStore {
    /// Erstellt einen leeren Speicher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Speicher als Verzeichnis mit einer JSON-Datei pro Schlüssel.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Öffnet (und legt bei Bedarf an) ein Speicherverzeichnis.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        log::info!("Projekt-Speicher: {}", root.display());
        Ok(Self { root })
    }

    /// Wurzelverzeichnis.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Pfadtrenner im Schlüssel würden aus dem Verzeichnis herausführen
        let file: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(format!("{file}.json"))
    }
}

impl ProjectStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key), value)?;
        log::debug!("'{}' gespeichert", key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                name.strip_suffix(".json").map(str::to_string)
            })
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProjectRecord {
        ProjectRecord {
            network_path: PathBuf::from("/daten/kiez.osm"),
            saved: SavedState::default(),
        }
    }

    #[test]
    fn project_key_uses_prefix() {
        assert_eq!(project_key("Kiez"), "ltn_Kiez");
    }

    #[test]
    fn memory_store_round_trip_and_missing_key() {
        let mut store = MemoryStore::new();
        store.save_project("Kiez", &record()).expect("speichern");

        assert_eq!(store.load_project("Kiez").expect("laden"), record());
        assert_eq!(store.project_names(), vec!["Kiez".to_string()]);
        assert_eq!(
            store.load_project("Anders"),
            Err(StorageError::NotFound {
                key: "ltn_Anders".into()
            })
        );
    }

    #[test]
    fn corrupt_record_is_reported() {
        let mut store = MemoryStore::new();
        store.set("ltn_kaputt", "{").expect("schreiben");
        assert!(matches!(
            store.load_project("kaputt"),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn directory_store_persists_files() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let mut store = DirectoryStore::open(dir.path()).expect("öffnen");
        store.save_project("Kiez", &record()).expect("speichern");
        store.set("fremd", "x").expect("schreiben");

        let reopened = DirectoryStore::open(dir.path()).expect("öffnen");
        assert_eq!(reopened.load_project("Kiez").expect("laden"), record());
        assert_eq!(reopened.project_names(), vec!["Kiez".to_string()]);

        store.remove("ltn_Kiez").expect("entfernen");
        store.remove("ltn_Kiez").expect("doppelt entfernen ist ok");
        assert!(matches!(
            store.get("ltn_Kiez"),
            Err(StorageError::NotFound { .. })
        ));
    }
}
