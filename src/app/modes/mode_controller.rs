//! ModeController-Trait: Schnittstelle für alle Editier-Modi.

use glam::DVec2;

use super::{ModeContext, MountContext};
use crate::app::mode::{Mode, ModeKind};
use crate::app::regions::{MapOverlay, SidebarContent};
use crate::app::AppCommand;
use crate::error::EditorResult;

/// Schnittstelle für alle Modi (Projektauswahl, Netz, Grenze, …).
///
/// Ein Controller besitzt Seitenleiste und Overlay nur, solange er gemountet
/// ist. Inhalte werden als Daten erzeugt; die Session hängt sie ein.
pub trait ModeController {
    /// Modus-Art, für die der Controller zuständig ist
    fn kind(&self) -> ModeKind;

    /// Anzeigename für Menü und Statusleiste
    fn name(&self) -> &str;

    /// Kurzer Hinweis für die Statusleiste
    fn status_text(&self, ctx: &ModeContext<'_>) -> String;

    /// Wird beim Betreten des Modus aufgerufen.
    fn on_mount(&mut self, _mode: &Mode, _ctx: &mut MountContext<'_>) -> EditorResult<()> {
        Ok(())
    }

    /// Wird beim Verlassen des Modus aufgerufen.
    fn on_unmount(&mut self) {}

    /// Inhalt der Seitenleiste.
    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent;

    /// Inhalt des Karten-Overlays.
    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay;

    /// Commands für einen Linksklick auf die Karte (Geo-Position).
    fn map_click_commands(&self, _position: DVec2, _ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        Vec::new()
    }
}
