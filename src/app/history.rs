//! Linearer Undo/Redo-Verlauf über beliebige Snapshots.

/// Einfacher Undo/Redo-Manager mit Snapshotting.
///
/// Gespeichert wird jeweils der Zustand *vor* einer Änderung. Beim Undo gibt der
/// Aufrufer den aktuellen Zustand mit, der dann auf den Redo-Stack wandert.
#[derive(Debug, Clone)]
pub struct EditHistory<S> {
    undo_stack: Vec<S>,
    redo_stack: Vec<S>,
    max_depth: usize,
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::new_with_capacity(crate::shared::options::HISTORY_DEPTH)
    }
}

impl<S> EditHistory<S> {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Speichert den Zustand vor einer Änderung. Verwirft den Redo-Zweig.
    pub fn record_snapshot(&mut self, snap: S) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snap);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Holt den letzten Undo-Eintrag und legt `current` auf den Redo-Stack.
    pub fn pop_undo_with_current(&mut self, current: S) -> Option<S> {
        let prev = self.undo_stack.pop()?;
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(current);
        Some(prev)
    }

    /// Holt den letzten Redo-Eintrag und legt `current` auf den Undo-Stack.
    pub fn pop_redo_with_current(&mut self, current: S) -> Option<S> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(current);
        Some(next)
    }

    /// Leert beide Stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let history: EditHistory<u32> = EditHistory::new_with_capacity(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_restores_snapshots() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot(vec![1]);

        let restored = history.pop_undo_with_current(vec![1, 2]);
        assert_eq!(restored, Some(vec![1]));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        let redone = history.pop_redo_with_current(vec![1]);
        assert_eq!(redone, Some(vec![1, 2]));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = EditHistory::new_with_capacity(10);
        history.record_snapshot(1);
        let _ = history.pop_undo_with_current(3);
        assert!(history.can_redo());

        history.record_snapshot(7);
        assert!(!history.can_redo());
    }

    #[test]
    fn respects_max_depth() {
        let mut history = EditHistory::new_with_capacity(3);
        for i in 1..=5 {
            history.record_snapshot(i);
        }

        let mut undone = Vec::new();
        while let Some(snap) = history.pop_undo_with_current(99) {
            undone.push(snap);
        }
        // Die ältesten Einträge fallen zuerst weg
        assert_eq!(undone, vec![5, 4, 3]);
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut history: EditHistory<u8> = EditHistory::new_with_capacity(10);
        assert!(history.pop_undo_with_current(1).is_none());
        assert!(history.pop_redo_with_current(1).is_none());
    }
}
