//! Protokoll der ausgeführten Commands (Diagnose und Tests).

use super::AppCommand;

/// Speichert ausgeführte Commands in Reihenfolge.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<AppCommand>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf MAX_ENTRIES, die ältere Hälfte wird verworfen.
    pub fn record(&mut self, command: &AppCommand) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(command.clone());
    }

    /// Anzahl der geloggten Commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true`, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[AppCommand] {
        &self.entries
    }

    /// Zuletzt ausgeführter Command.
    pub fn last(&self) -> Option<&AppCommand> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_drops_older_half_when_full() {
        let mut log = CommandLog::new();
        for _ in 0..CommandLog::MAX_ENTRIES {
            log.record(&AppCommand::Undo);
        }
        log.record(&AppCommand::Redo);

        assert_eq!(log.len(), CommandLog::MAX_ENTRIES / 2 + 1);
        assert_eq!(log.last(), Some(&AppCommand::Redo));
    }
}
