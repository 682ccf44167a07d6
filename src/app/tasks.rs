//! Hintergrund-Aufgaben (Import, Projekt laden) mit Ergebnis-Kanal.
//!
//! Jede Aufgabe läuft in einem eigenen Thread und meldet genau ein Ergebnis.
//! Der UI-Thread fragt den Kanal pro Frame mit `try_recv` ab. Es läuft höchstens
//! eine Aufgabe gleichzeitig: jede ersetzt am Ende das Netz.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::core::{ProjectRecord, RoadNetwork};
use crate::error::{EditorError, EditorResult, ImportError};

/// Art einer Hintergrund-Aufgabe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    /// OSM-Datei importieren
    ImportNetwork,
    /// Gespeichertes Projekt laden
    LoadProject,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::ImportNetwork => f.write_str("Import"),
            TaskKind::LoadProject => f.write_str("Projekt laden"),
        }
    }
}

/// Ergebnis einer erfolgreichen Aufgabe.
#[derive(Debug)]
pub enum TaskOutput {
    /// Netz importiert
    NetworkImported {
        /// Quelldatei
        path: PathBuf,
        /// Geladenes Netz
        network: RoadNetwork,
    },
    /// Projekt geladen
    ProjectLoaded {
        /// Projektname
        name: String,
        /// Gespeicherter Datensatz
        record: ProjectRecord,
        /// Netz inklusive Speicherstand
        network: RoadNetwork,
    },
}

/// Abgeschlossene Aufgabe.
pub type TaskResult = EditorResult<TaskOutput>;

/// Laufende Hintergrund-Aufgaben.
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    in_flight: BTreeMap<TaskKind, Receiver<TaskResult>>,
}

impl BackgroundTasks {
    /// Startet eine Aufgabe. `Busy` mit der laufenden Art, wenn schon eine läuft.
    pub fn spawn<F>(&mut self, kind: TaskKind, job: F) -> EditorResult<()>
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        if let Some(running) = self.in_flight.keys().next() {
            log::warn!("{} abgelehnt, {} läuft noch", kind, running);
            return Err(EditorError::Busy(*running));
        }
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(format!("ltn-{kind:?}"))
            .spawn(move || {
                // Empfänger kann weg sein, wenn die Session beendet wurde
                let _ = tx.send(job());
            })
            .map_err(|e| ImportError::Io(e.to_string()))?;
        self.in_flight.insert(kind, rx);
        log::info!("{} gestartet", kind);
        Ok(())
    }

    /// Läuft eine Aufgabe dieser Art?
    pub fn is_busy(&self, kind: TaskKind) -> bool {
        self.in_flight.contains_key(&kind)
    }

    /// Läuft irgendeine Aufgabe?
    pub fn any_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Holt alle fertigen Ergebnisse ab (in Reihenfolge der Aufgabenart).
    pub fn poll(&mut self) -> Vec<(TaskKind, TaskResult)> {
        let mut finished = Vec::new();
        self.in_flight.retain(|kind, rx| match rx.try_recv() {
            Ok(result) => {
                finished.push((*kind, result));
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                log::error!("{} ohne Ergebnis beendet", kind);
                finished.push((
                    *kind,
                    Err(ImportError::Io(format!("{kind} abgebrochen")).into()),
                ));
                false
            }
        });
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::{Duration, Instant};

    fn poll_until_done(tasks: &mut BackgroundTasks) -> Vec<(TaskKind, TaskResult)> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while tasks.any_busy() && Instant::now() < deadline {
            results.extend(tasks.poll());
            thread::sleep(Duration::from_millis(2));
        }
        results
    }

    #[test]
    fn any_running_task_blocks_every_new_one() {
        let (release_tx, release_rx) = channel::<()>();
        let mut tasks = BackgroundTasks::default();
        tasks
            .spawn(TaskKind::ImportNetwork, move || {
                let _ = release_rx.recv();
                Err(ImportError::Empty.into())
            })
            .expect("erste Aufgabe startet");

        let second = tasks.spawn(TaskKind::ImportNetwork, || Err(ImportError::Empty.into()));
        assert_eq!(second, Err(EditorError::Busy(TaskKind::ImportNetwork)));
        assert!(tasks.is_busy(TaskKind::ImportNetwork));
        assert!(!tasks.is_busy(TaskKind::LoadProject));

        // Auch eine andere Art wartet, beide würden das Netz ersetzen
        let load = tasks.spawn(TaskKind::LoadProject, || Err(ImportError::Empty.into()));
        assert_eq!(load, Err(EditorError::Busy(TaskKind::ImportNetwork)));
        assert!(!tasks.is_busy(TaskKind::LoadProject));

        release_tx.send(()).expect("freigeben");
        let results = poll_until_done(&mut tasks);
        assert_eq!(results.len(), 1);
        assert!(!tasks.any_busy());
    }

    #[test]
    fn failed_job_is_reported_once() {
        let mut tasks = BackgroundTasks::default();
        tasks
            .spawn(TaskKind::LoadProject, || Err(ImportError::NoRoads.into()))
            .expect("startet");
        let results = poll_until_done(&mut tasks);
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            (TaskKind::LoadProject, Err(EditorError::Import(ImportError::NoRoads)))
        ));
    }
}
