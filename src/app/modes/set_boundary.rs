//! Grenze zeichnen oder bearbeiten (mit dem Routen-Koordinator).

use glam::DVec2;

use super::{add_road_layer, add_route_layers, ModeContext, ModeController, MountContext};
use crate::app::mode::{BoundaryRef, Mode, ModeKind};
use crate::app::regions::{MapOverlay, SidebarAction, SidebarContent, SidebarItem, TextField};
use crate::app::{AppCommand, AppIntent};
use crate::error::{EditorResult, ValidationError};

/// Modus zum Zeichnen einer Nachbarschafts-Grenze.
#[derive(Debug, Default)]
pub struct SetBoundaryMode {
    editing: Option<BoundaryRef>,
}

impl SetBoundaryMode {
    /// Neuer Controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grenze, die gerade bearbeitet wird (`None` bei einer neuen).
    pub fn editing(&self) -> Option<&BoundaryRef> {
        self.editing.as_ref()
    }
}

/// Erster freier Standardname ("Nachbarschaft 1", "Nachbarschaft 2", …).
fn default_boundary_name(ctx: &MountContext<'_>) -> String {
    let taken = |name: &str| ctx.model.is_some_and(|m| m.neighbourhood(name).is_some());
    (1..)
        .map(|n| format!("Nachbarschaft {n}"))
        .find(|name| !taken(name))
        .unwrap_or_default()
}

impl ModeController for SetBoundaryMode {
    fn kind(&self) -> ModeKind {
        ModeKind::SetBoundary
    }

    fn name(&self) -> &str {
        "Grenze zeichnen"
    }

    fn status_text(&self, ctx: &ModeContext<'_>) -> String {
        let count = ctx.route.map_or(0, |r| r.len());
        let snap = ctx.route.is_some_and(|r| r.snap_mode());
        format!(
            "{count} Wegpunkte, Einrasten {}",
            if snap { "an" } else { "aus" }
        )
    }

    fn on_mount(&mut self, mode: &Mode, ctx: &mut MountContext<'_>) -> EditorResult<()> {
        let Mode::SetBoundary { existing } = mode else {
            return Ok(());
        };
        let default_name = default_boundary_name(ctx);
        let route = ctx.route.as_deref_mut().ok_or(ValidationError::ModelRequired {
            mode: ModeKind::SetBoundary.as_str(),
        })?;

        match existing {
            Some(boundary) => {
                let stored = ctx
                    .model
                    .and_then(|m| m.stored_boundary(boundary.name()))
                    .ok_or_else(|| ValidationError::UnknownBoundary(boundary.name().to_string()))?;
                if stored.waypoints.is_empty() {
                    route.load_ring(&stored.polygon);
                } else {
                    route.load_waypoints(&stored.waypoints);
                }
                ctx.ui.boundary_name = boundary.name().to_string();
                log::info!("Grenze '{}' wird bearbeitet", boundary.name());
            }
            None => {
                route.reset();
                ctx.ui.boundary_name = default_name;
            }
        }
        self.editing = existing.clone();
        Ok(())
    }

    fn on_unmount(&mut self) {
        self.editing = None;
    }

    fn sidebar(&self, ctx: &ModeContext<'_>) -> SidebarContent {
        let title = match &self.editing {
            Some(boundary) => format!("Grenze bearbeiten: {}", boundary.name()),
            None => "Neue Grenze".to_string(),
        };
        let mut content = SidebarContent::new(ModeKind::SetBoundary, title);
        let Some(route) = ctx.route else {
            return content;
        };

        content.text("Klick: Wegpunkt anhängen, Shift-Klick: einfügen");
        content.text("Rechtsklick: entfernen, Ziehen: verschieben");
        content.text(self.status_text(ctx));
        for failure in route.route().failures() {
            content.push(SidebarItem::Warning(failure.to_string()));
        }

        content.push(SidebarItem::Input {
            label: "Name".into(),
            field: TextField::BoundaryName,
            value: ctx.ui.boundary_name.clone(),
            multiline: false,
        });
        let closable = route.to_polygon().is_ok();
        if !closable && route.len() >= 3 {
            content.push(SidebarItem::Warning("Grenze lässt sich nicht schließen".into()));
        }
        content.action(
            SidebarAction::new("Fertig", AppIntent::FinishBoundaryRequested).enabled(closable),
        );

        content.push(SidebarItem::Separator);
        content.action(SidebarAction::new("Rückgängig", AppIntent::UndoRequested).enabled(route.can_undo()));
        content.action(SidebarAction::new("Wiederholen", AppIntent::RedoRequested).enabled(route.can_redo()));
        let snap_label = if route.snap_mode() {
            "Einrasten: an"
        } else {
            "Einrasten: aus"
        };
        content.action(SidebarAction::new(snap_label, AppIntent::ToggleSnapModeRequested));
        content.action(
            SidebarAction::new("Alle Wegpunkte entfernen", AppIntent::ClearRouteRequested)
                .enabled(!route.is_empty()),
        );
        content.action(SidebarAction::new(
            "Abbrechen",
            AppIntent::ModeRequested {
                mode: Mode::Network,
            },
        ));
        content
    }

    fn overlay(&self, ctx: &ModeContext<'_>) -> MapOverlay {
        let mut overlay = MapOverlay::new(ModeKind::SetBoundary);
        if let Some(model) = ctx.model {
            add_road_layer(&mut overlay, model, ctx.options);
        }
        if let Some(route) = ctx.route {
            add_route_layers(&mut overlay, route, ctx.options);
        }
        overlay
    }

    fn map_click_commands(&self, position: DVec2, _ctx: &ModeContext<'_>) -> Vec<AppCommand> {
        vec![AppCommand::AddWaypoint { position }]
    }
}
