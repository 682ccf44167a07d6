//! Projektauswahl: Import, gespeicherte Projekte, Overpass-Abfrage.

use super::{ModeContext, ModeController};
use crate::app::mode::ModeKind;
use crate::app::regions::{MapOverlay, SidebarAction, SidebarContent, SidebarItem, TextField};
use crate::app::tasks::TaskKind;
use crate::app::AppIntent;
use crate::core::overpass::overpass_url;

/// Startmodus ohne geladenes Netz.
#[derive(Debug, Default)]
pub struct TitleMode;

impl TitleMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self
    }
}

impl ModeController for TitleMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Title
    }

    fn name(&self) -> &str {
        "Projektauswahl"
    }

    fn status_text(&self, ctx: &ModeContext<'_>) -> String {
        if ctx.tasks.is_busy(TaskKind::ImportNetwork) {
            "Import läuft…".into()
        } else if ctx.tasks.is_busy(TaskKind::LoadProject) {
            "Projekt wird geladen…".into()
        } else {
            "OSM-Datei importieren oder Projekt laden".into()
        }
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let mut content = SidebarContent::new(ModeKind::Title, "LTN-Editor");
        let busy = ctx.tasks.any_busy();

        content.push(SidebarItem::Input {
            label: "Projektname".into(),
            field: TextField::ProjectName,
            value: ctx.ui.project_name.clone(),
            multiline: false,
        });
        content.action(
            SidebarAction::new("OSM-Datei importieren…", AppIntent::ImportNetworkRequested)
                .enabled(!busy),
        );
        if busy {
            content.text(self.status_text(ctx));
        }

        content.push(SidebarItem::Separator);
        content.heading("Gespeicherte Projekte");
        let names = ctx.store.project_names();
        if names.is_empty() {
            content.text("Keine gespeicherten Projekte");
        }
        for name in names {
            content.action(
                SidebarAction::new(name.clone(), AppIntent::LoadProjectRequested { name })
                    .enabled(!busy),
            );
        }

        content.push(SidebarItem::Separator);
        content.heading("Overpass-Abfrage");
        content.push(SidebarItem::Input {
            label: "Gebiet als GeoJSON-Polygon".into(),
            field: TextField::OverpassPolygon,
            value: ctx.ui.overpass_polygon_text.clone(),
            multiline: true,
        });
        content.action(
            SidebarAction::new("Abfrage erstellen", AppIntent::BuildOverpassQueryRequested)
                .enabled(!ctx.ui.overpass_polygon_text.trim().is_empty()),
        );
        if let Some(query) = &ctx.ui.overpass_query {
            content.push(SidebarItem::Code(query.clone()));
            content.push(SidebarItem::Code(overpass_url(
                &ctx.options.overpass_endpoint,
                query,
            )));
        }
        content
    }

    fn overlay(&self, _ctx: &ModeContext<'_>) -> MapOverlay {
        MapOverlay::new(ModeKind::Title)
    }
}
