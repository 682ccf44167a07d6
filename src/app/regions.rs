//! UI-Regionen mit genau einem Besitzer: Seitenleiste und Karten-Overlay.
//!
//! Der gemountete Modus-Controller liefert Inhalte, die Session hängt sie in die
//! Slots ein. Vor jedem Einhängen wird der alte Inhalt zurückgezogen und sein
//! Teardown-Hook aufgerufen.

use glam::DVec2;

use super::mode::ModeKind;
use super::AppIntent;

/// Inhalt einer besessenen Region.
pub trait RegionContent {
    /// Modus, der den Inhalt geliefert hat.
    fn owner(&self) -> ModeKind;

    /// Wird beim Zurückziehen aus dem Slot aufgerufen.
    fn teardown(&mut self) {}
}

/// Eingabefelder, die die Seitenleiste anbieten kann.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// Projektname
    ProjectName,
    /// Name der zu speichernden Nachbarschaft
    BoundaryName,
    /// GeoJSON-Polygon für die Overpass-Abfrage
    OverpassPolygon,
}

/// Schaltfläche in der Seitenleiste.
#[derive(Debug, Clone)]
pub struct SidebarAction {
    /// Beschriftung
    pub label: String,
    /// Intent, der beim Klick ausgelöst wird
    pub intent: AppIntent,
    /// Deaktiviert (z.B. während eines laufenden Imports)
    pub enabled: bool,
}

impl SidebarAction {
    /// Aktivierte Schaltfläche.
    pub fn new(label: impl Into<String>, intent: AppIntent) -> Self {
        Self {
            label: label.into(),
            intent,
            enabled: true,
        }
    }

    /// Setzt den Aktiv-Zustand.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Ein Element der Seitenleiste.
#[derive(Debug, Clone)]
pub enum SidebarItem {
    /// Überschrift
    Heading(String),
    /// Fließtext
    Text(String),
    /// Hervorgehobene Warnung
    Warning(String),
    /// Schaltfläche
    Action(SidebarAction),
    /// Einzeiliges oder mehrzeiliges Eingabefeld
    Input {
        /// Beschriftung
        label: String,
        /// Welches Feld
        field: TextField,
        /// Aktueller Wert
        value: String,
        /// Mehrzeilig
        multiline: bool,
    },
    /// Auswählbarer Text in Monospace (z.B. Overpass-Abfrage)
    Code(String),
    /// Trennlinie
    Separator,
}

/// Inhalt der Seitenleiste.
#[derive(Debug, Clone)]
pub struct SidebarContent {
    owner: ModeKind,
    /// Titel oberhalb der Elemente
    pub title: String,
    /// Elemente in Anzeigereihenfolge
    pub items: Vec<SidebarItem>,
}

impl SidebarContent {
    /// Leerer Inhalt für einen Modus.
    pub fn new(owner: ModeKind, title: impl Into<String>) -> Self {
        Self {
            owner,
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Hängt ein Element an.
    pub fn push(&mut self, item: SidebarItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Überschrift anhängen.
    pub fn heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(SidebarItem::Heading(text.into()))
    }

    /// Text anhängen.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(SidebarItem::Text(text.into()))
    }

    /// Schaltfläche anhängen.
    pub fn action(&mut self, action: SidebarAction) -> &mut Self {
        self.push(SidebarItem::Action(action))
    }

    /// Alle Schaltflächen (für Tests und Tastenkürzel).
    pub fn actions(&self) -> impl Iterator<Item = &SidebarAction> {
        self.items.iter().filter_map(|item| match item {
            SidebarItem::Action(action) => Some(action),
            _ => None,
        })
    }
}

impl RegionContent for SidebarContent {
    fn owner(&self) -> ModeKind {
        self.owner
    }

    fn teardown(&mut self) {
        log::debug!("Seitenleiste von '{}' zurückgezogen", self.owner);
        self.items.clear();
    }
}

/// Geometrie einer Overlay-Ebene.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    /// Mehrere Polylinien
    Lines(Vec<Vec<DVec2>>),
    /// Geschlossener Ring (Umriss)
    Polygon(Vec<DVec2>),
    /// Einzelne Punkte
    Points(Vec<DVec2>),
    /// Gefüllte konvexe Flächen
    Fill(Vec<Vec<DVec2>>),
}

/// Eine Ebene im Karten-Overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    /// Stabiler Bezeichner (für Tests und Hit-Tests)
    pub id: &'static str,
    /// Geometrie
    pub shape: OverlayShape,
    /// Farbe (RGBA)
    pub color: [f32; 4],
    /// Linienbreite bzw. Punkt-Radius in Pixeln
    pub width: f32,
}

/// Inhalt des Karten-Overlays.
#[derive(Debug, Clone)]
pub struct MapOverlay {
    owner: ModeKind,
    /// Ebenen von unten nach oben
    pub layers: Vec<OverlayLayer>,
}

impl MapOverlay {
    /// Leeres Overlay für einen Modus.
    pub fn new(owner: ModeKind) -> Self {
        Self {
            owner,
            layers: Vec::new(),
        }
    }

    /// Fügt eine Ebene hinzu, sofern sie Geometrie enthält.
    pub fn add(&mut self, id: &'static str, shape: OverlayShape, color: [f32; 4], width: f32) {
        let empty = match &shape {
            OverlayShape::Lines(lines) | OverlayShape::Fill(lines) => lines.is_empty(),
            OverlayShape::Polygon(ring) | OverlayShape::Points(ring) => ring.is_empty(),
        };
        if !empty {
            self.layers.push(OverlayLayer {
                id,
                shape,
                color,
                width,
            });
        }
    }

    /// Ebene per Bezeichner.
    pub fn layer(&self, id: &str) -> Option<&OverlayLayer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

impl RegionContent for MapOverlay {
    fn owner(&self) -> ModeKind {
        self.owner
    }

    fn teardown(&mut self) {
        log::debug!("Overlay von '{}' zurückgezogen", self.owner);
        self.layers.clear();
    }
}

/// Slot mit höchstens einem Inhalt.
#[derive(Debug)]
pub struct RegionSlot<T: RegionContent> {
    content: Option<T>,
    attach_count: usize,
    detach_count: usize,
}

impl<T: RegionContent> Default for RegionSlot<T> {
    fn default() -> Self {
        Self {
            content: None,
            attach_count: 0,
            detach_count: 0,
        }
    }
}

impl<T: RegionContent> RegionSlot<T> {
    /// Hängt neuen Inhalt ein; vorheriger Inhalt wird zuerst zurückgezogen.
    pub fn attach(&mut self, content: T) {
        self.detach();
        self.content = Some(content);
        self.attach_count += 1;
    }

    /// Zieht den Inhalt zurück (Teardown-Hook) und leert den Slot.
    pub fn detach(&mut self) {
        if let Some(mut old) = self.content.take() {
            old.teardown();
            self.detach_count += 1;
        }
    }

    /// Aktueller Inhalt.
    pub fn get(&self) -> Option<&T> {
        self.content.as_ref()
    }

    /// Gehört der Inhalt diesem Modus?
    pub fn is_owned_by(&self, kind: ModeKind) -> bool {
        self.content.as_ref().is_some_and(|c| c.owner() == kind)
    }

    /// Wie oft Inhalt eingehängt wurde.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Wie oft Inhalt zurückgezogen wurde.
    pub fn detach_count(&self) -> usize {
        self.detach_count
    }
}

/// Beide besessenen Regionen der Session.
#[derive(Debug, Default)]
pub struct UiRegions {
    /// Seitenleiste
    pub sidebar: RegionSlot<SidebarContent>,
    /// Karten-Overlay
    pub map_overlay: RegionSlot<MapOverlay>,
}

impl UiRegions {
    /// Übergibt beide Regionen an neue Inhalte (alte werden zuerst zurückgezogen).
    pub fn hand_over(&mut self, sidebar: SidebarContent, overlay: MapOverlay) {
        debug_assert_eq!(sidebar.owner(), overlay.owner());
        self.sidebar.detach();
        self.map_overlay.detach();
        self.sidebar.attach(sidebar);
        self.map_overlay.attach(overlay);
    }

    /// Zieht beide Inhalte zurück.
    pub fn retract_all(&mut self) {
        self.sidebar.detach();
        self.map_overlay.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_retracts_previous_content() {
        let mut slot: RegionSlot<SidebarContent> = RegionSlot::default();
        slot.attach(SidebarContent::new(ModeKind::Title, "Start"));
        slot.attach(SidebarContent::new(ModeKind::Network, "Netz"));

        assert!(slot.is_owned_by(ModeKind::Network));
        assert_eq!(slot.attach_count(), 2);
        assert_eq!(slot.detach_count(), 1);
    }

    #[test]
    fn detach_on_empty_slot_is_noop() {
        let mut slot: RegionSlot<MapOverlay> = RegionSlot::default();
        slot.detach();
        assert_eq!(slot.detach_count(), 0);
        assert!(slot.get().is_none());
    }

    #[test]
    fn hand_over_replaces_both_regions() {
        let mut regions = UiRegions::default();
        regions.hand_over(
            SidebarContent::new(ModeKind::Title, "Start"),
            MapOverlay::new(ModeKind::Title),
        );
        regions.hand_over(
            SidebarContent::new(ModeKind::Route, "Route"),
            MapOverlay::new(ModeKind::Route),
        );

        assert!(regions.sidebar.is_owned_by(ModeKind::Route));
        assert!(regions.map_overlay.is_owned_by(ModeKind::Route));
        assert_eq!(regions.sidebar.detach_count(), 1);

        regions.retract_all();
        assert!(regions.sidebar.get().is_none());
        assert!(regions.map_overlay.get().is_none());
    }

    #[test]
    fn empty_overlay_layers_are_skipped() {
        let mut overlay = MapOverlay::new(ModeKind::Network);
        overlay.add("roads", OverlayShape::Lines(Vec::new()), [1.0; 4], 1.0);
        overlay.add("pts", OverlayShape::Points(vec![DVec2::ZERO]), [1.0; 4], 1.0);
        assert_eq!(overlay.layers.len(), 1);
        assert!(overlay.layer("pts").is_some());
    }
}
