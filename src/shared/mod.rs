//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Editor-Optionen, die `app` und `ui` gemeinsam lesen.

pub mod options;

pub use options::EditorOptions;
