//! Aktiver Editier-Modus als Summentyp mit Nutzdaten pro Variante.

/// Verweis auf eine gespeicherte Nachbarschafts-Grenze (über ihren Namen).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundaryRef(pub String);

impl BoundaryRef {
    /// Name der Nachbarschaft.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Welcher Modus aktiv ist, plus die in ihn mitgenommenen Daten.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    /// Projektauswahl
    #[default]
    Title,
    /// Gesamtes Netz
    Network,
    /// Grenze zeichnen: `Some` bearbeitet eine gespeicherte Grenze, `None` startet neu
    SetBoundary {
        /// Zu bearbeitende Grenze
        existing: Option<BoundaryRef>,
    },
    /// Aktive Nachbarschaft
    Neighbourhood,
    /// Schleichwege der aktiven Nachbarschaft
    ViewShortcuts,
    /// Freie Route zeichnen
    Route,
}

/// Modus ohne Nutzdaten (Schlüssel für Controller und Regionen-Besitz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Projektauswahl
    Title,
    /// Gesamtes Netz
    Network,
    /// Grenze zeichnen
    SetBoundary,
    /// Aktive Nachbarschaft
    Neighbourhood,
    /// Schleichwege
    ViewShortcuts,
    /// Route zeichnen
    Route,
}

impl ModeKind {
    /// Alle Modi in Menü-Reihenfolge.
    pub const ALL: [ModeKind; 6] = [
        ModeKind::Title,
        ModeKind::Network,
        ModeKind::SetBoundary,
        ModeKind::Neighbourhood,
        ModeKind::ViewShortcuts,
        ModeKind::Route,
    ];

    /// Interner Name (Logs, Fehlermeldungen).
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Title => "title",
            ModeKind::Network => "network",
            ModeKind::SetBoundary => "set-boundary",
            ModeKind::Neighbourhood => "neighbourhood",
            ModeKind::ViewShortcuts => "view-shortcuts",
            ModeKind::Route => "route",
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Mode {
    /// Variante ohne Nutzdaten.
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Title => ModeKind::Title,
            Mode::Network => ModeKind::Network,
            Mode::SetBoundary { .. } => ModeKind::SetBoundary,
            Mode::Neighbourhood => ModeKind::Neighbourhood,
            Mode::ViewShortcuts => ModeKind::ViewShortcuts,
            Mode::Route => ModeKind::Route,
        }
    }

    /// Modus braucht ein geladenes Netz.
    pub fn requires_model(&self) -> bool {
        !matches!(self, Mode::Title)
    }

    /// Modus braucht eine geöffnete Nachbarschaft.
    pub fn requires_neighbourhood(&self) -> bool {
        matches!(self, Mode::Neighbourhood | Mode::ViewShortcuts)
    }

    /// Modus arbeitet mit dem Routen-Koordinator.
    pub fn uses_route_drawer(&self) -> bool {
        matches!(self, Mode::SetBoundary { .. } | Mode::Route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_mode_is_title() {
        assert_eq!(Mode::default(), Mode::Title);
        assert!(!Mode::Title.requires_model());
    }

    #[test]
    fn kind_drops_payload() {
        let mode = Mode::SetBoundary {
            existing: Some(BoundaryRef("Nord".into())),
        };
        assert_eq!(mode.kind(), ModeKind::SetBoundary);
        assert!(mode.uses_route_drawer());
        assert!(mode.requires_model());
        assert!(!mode.requires_neighbourhood());
    }

    #[test]
    fn shortcut_modes_need_neighbourhood() {
        assert!(Mode::Neighbourhood.requires_neighbourhood());
        assert!(Mode::ViewShortcuts.requires_neighbourhood());
        assert!(!Mode::Route.requires_neighbourhood());
    }
}
